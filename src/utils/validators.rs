// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;
use url::Url;

/// 验证错误类型
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("invalid receipt url: {0}")]
    InvalidUrl(String),
    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

/// 邮箱统一转为去空白的小写形式
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 规范化并校验邮箱
pub fn validated_email(email: &str) -> Result<String, ValidationError> {
    let normalized = normalize_email(email);
    let valid = match normalized.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !normalized.contains(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(normalized)
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

/// 收据地址只接受 http(s)
pub fn validate_receipt_url(input: &str) -> Result<(), ValidationError> {
    match Url::parse(input) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::InvalidUrl(input.to_string())),
    }
}

pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Empty(field))
    } else {
        Ok(())
    }
}
