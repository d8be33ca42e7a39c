// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequestDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 120, message = "Full name must be 1-120 characters"))]
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, message = "Email cannot be empty"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}
