// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供后台周期任务，目前包括会员到期检查
pub mod membership_expiry_worker;

pub use membership_expiry_worker::MembershipExpiryWorker;
