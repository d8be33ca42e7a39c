// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domain::repositories::member_repository::RepositoryError;
use crate::domain::services::admin_service::AdminError;
use crate::domain::services::auth_service::AuthError;
use crate::domain::services::credit_ledger::LedgerError;
use crate::domain::services::genai_service::GenAiError;
use crate::domain::services::generation_service::GenerationError;
use crate::domain::services::message_service::MessageError;
use crate::domain::services::payment_service::PaymentError;
use crate::domain::services::topup_service::TopupError;
use crate::utils::validators::ValidationError;

/// 表示层自身产生的请求错误
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Authentication required")]
    Unauthorized,
    #[error("Administrator access required")]
    Forbidden,
}

/// 应用错误类型
///
/// 封装所有可能的应用层错误，按领域错误类型映射HTTP状态码，
/// 响应体统一为 `{"success": false, "error": "..."}`
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(RequestError::BadRequest(message.into()).into())
    }

    fn status(&self) -> StatusCode {
        let err = &self.0;
        if let Some(e) = err.downcast_ref::<RequestError>() {
            return match e {
                RequestError::BadRequest(_) => StatusCode::BAD_REQUEST,
                RequestError::Unauthorized => StatusCode::UNAUTHORIZED,
                RequestError::Forbidden => StatusCode::FORBIDDEN,
            };
        }
        if let Some(e) = err.downcast_ref::<AuthError>() {
            return auth_status(e);
        }
        if let Some(e) = err.downcast_ref::<GenerationError>() {
            return generation_status(e);
        }
        if let Some(e) = err.downcast_ref::<LedgerError>() {
            return ledger_status(e);
        }
        if let Some(e) = err.downcast_ref::<TopupError>() {
            return topup_status(e);
        }
        if let Some(e) = err.downcast_ref::<MessageError>() {
            return message_status(e);
        }
        if let Some(e) = err.downcast_ref::<AdminError>() {
            return match e {
                AdminError::MemberNotFound(_) => StatusCode::NOT_FOUND,
                AdminError::InvalidUpdate(_) => StatusCode::BAD_REQUEST,
                AdminError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AdminError::Ledger(e) => ledger_status(e),
                AdminError::Repository(e) => repository_status(e),
            };
        }
        if let Some(e) = err.downcast_ref::<RepositoryError>() {
            return repository_status(e);
        }
        if err.downcast_ref::<ValidationError>().is_some()
            || err.downcast_ref::<validator::ValidationErrors>().is_some()
        {
            return StatusCode::BAD_REQUEST;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn repository_status(e: &RepositoryError) -> StatusCode {
    match e {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::AlreadyExists(_) => StatusCode::CONFLICT,
        RepositoryError::Database(_) | RepositoryError::InvalidData(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn auth_status(e: &AuthError) -> StatusCode {
    match e {
        AuthError::InvalidCredentials | AuthError::InvalidSession => StatusCode::UNAUTHORIZED,
        AuthError::PendingApproval | AuthError::Inactive | AuthError::Expired => {
            StatusCode::FORBIDDEN
        }
        AuthError::EmailTaken(_) => StatusCode::CONFLICT,
        AuthError::WeakPassword | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
        AuthError::Repository(e) => repository_status(e),
        AuthError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn ledger_status(e: &LedgerError) -> StatusCode {
    match e {
        LedgerError::InsufficientCredits { .. } => StatusCode::PAYMENT_REQUIRED,
        LedgerError::MemberNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        LedgerError::Repository(e) => repository_status(e),
    }
}

fn generation_status(e: &GenerationError) -> StatusCode {
    match e {
        GenerationError::Ledger(e) => ledger_status(e),
        GenerationError::GenAi(GenAiError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
        GenerationError::GenAi(_) => StatusCode::BAD_GATEWAY,
        GenerationError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        GenerationError::Repository(e) => repository_status(e),
    }
}

fn topup_status(e: &TopupError) -> StatusCode {
    match e {
        TopupError::NotFound => StatusCode::NOT_FOUND,
        TopupError::AlreadyDecided(_) => StatusCode::CONFLICT,
        TopupError::InvalidAmount(_)
        | TopupError::InvalidPrice(_)
        | TopupError::Validation(_) => StatusCode::BAD_REQUEST,
        TopupError::PaymentIncomplete(_) => StatusCode::PAYMENT_REQUIRED,
        TopupError::Payment(PaymentError::UnknownToken) => StatusCode::NOT_FOUND,
        TopupError::Payment(PaymentError::Gateway(_)) => StatusCode::BAD_GATEWAY,
        TopupError::Repository(e) => repository_status(e),
    }
}

fn message_status(e: &MessageError) -> StatusCode {
    match e {
        MessageError::Forbidden => StatusCode::FORBIDDEN,
        MessageError::NoRecipient => StatusCode::SERVICE_UNAVAILABLE,
        MessageError::RecipientRequired | MessageError::EmptyContent | MessageError::TooLong => {
            StatusCode::BAD_REQUEST
        }
        MessageError::UnknownRecipient(_) | MessageError::NotFound => StatusCode::NOT_FOUND,
        MessageError::Repository(e) => repository_status(e),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = self.0.to_string();

        if status.is_server_error() {
            error!("Request failed with {}: {:#}", status, self.0);
        }

        let body = Json(json!({ "success": false, "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
