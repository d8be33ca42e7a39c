// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

mod admin_api_test;
mod auth_api_test;
mod generation_api_test;
mod helpers;
mod message_api_test;
mod topup_api_test;
