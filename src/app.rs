// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::repositories::member_repository::MemberRepository;
use crate::domain::repositories::message_repository::MessageRepository;
use crate::domain::repositories::settings_repository::SettingsRepository;
use crate::domain::repositories::topup_repository::TopupRepository;
use crate::domain::services::admin_service::AdminService;
use crate::domain::services::auth_service::{AdminDirectory, AuthService};
use crate::domain::services::credit_ledger::CreditLedger;
use crate::domain::services::genai_service::GenerativeClient;
use crate::domain::services::generation_service::{GenerationService, VideoPolling};
use crate::domain::services::key_rotation::ApiKeyRotator;
use crate::domain::services::message_service::MessageService;
use crate::domain::services::notification_service::Notifier;
use crate::domain::services::payment_service::PaymentGateway;
use crate::domain::services::settings_service::SettingsService;
use crate::domain::services::topup_service::TopupService;
use crate::infrastructure::repositories::member_repo_impl::MemberRepositoryImpl;
use crate::infrastructure::repositories::message_repo_impl::MessageRepositoryImpl;
use crate::infrastructure::repositories::settings_repo_impl::SettingsRepositoryImpl;
use crate::infrastructure::repositories::topup_repo_impl::TopupRepositoryImpl;
use crate::presentation::routes;
use crate::utils::retry_policy::RetryPolicy;
use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 外部依赖
///
/// 生成式AI客户端、通知和支付网关由调用方提供，
/// 测试中可替换为本地模拟实现
pub struct Collaborators {
    pub client: Arc<dyn GenerativeClient>,
    pub notifier: Arc<dyn Notifier>,
    pub gateway: Arc<dyn PaymentGateway>,
    /// 覆盖配置中的重试策略
    pub retry_policy: Option<RetryPolicy>,
}

/// 已装配的服务集合
#[derive(Clone)]
pub struct AppServices {
    pub members: Arc<dyn MemberRepository>,
    pub auth: Arc<AuthService>,
    pub ledger: Arc<CreditLedger>,
    pub rotator: Arc<ApiKeyRotator>,
    pub generation: Arc<GenerationService>,
    pub topups: Arc<TopupService>,
    pub messages: Arc<MessageService>,
    pub admin: Arc<AdminService>,
    pub settings: Arc<SettingsService>,
    /// 生成接口请求体字节上限
    pub upload_limit: usize,
}

impl AppServices {
    /// 根据配置与数据库连接装配全部服务
    pub fn build(settings: &Settings, db: Arc<DatabaseConnection>, deps: Collaborators) -> Self {
        let members: Arc<dyn MemberRepository> = Arc::new(MemberRepositoryImpl::new(db.clone()));
        let topup_repo: Arc<dyn TopupRepository> = Arc::new(TopupRepositoryImpl::new(db.clone()));
        let message_repo: Arc<dyn MessageRepository> =
            Arc::new(MessageRepositoryImpl::new(db.clone()));
        let settings_repo: Arc<dyn SettingsRepository> =
            Arc::new(SettingsRepositoryImpl::new(db));

        let admins = Arc::new(AdminDirectory::new(
            &settings.auth.admin_emails,
            settings.auth.admin_password.clone(),
        ));
        let ledger = Arc::new(CreditLedger::new(members.clone()));
        let settings_service = Arc::new(SettingsService::new(settings_repo));
        let rotator = Arc::new(ApiKeyRotator::new(&settings.ai.api_keys));

        let auth = Arc::new(AuthService::new(
            members.clone(),
            admins.clone(),
            deps.notifier.clone(),
            settings.auth.session_secret.clone(),
            settings.auth.session_ttl_hours,
            settings.membership.signup_credits,
        ));

        let generation = Arc::new(GenerationService::new(
            deps.client,
            rotator.clone(),
            deps
                .retry_policy
                .unwrap_or_else(|| settings.ai.retry_policy()),
            ledger.clone(),
            settings_service.clone(),
            VideoPolling {
                interval: settings.ai.video_poll_interval(),
                max_wait: settings.ai.video_max_wait(),
            },
        ));

        let topups = Arc::new(TopupService::new(
            topup_repo.clone(),
            deps.gateway,
            deps.notifier,
            settings.payment.price_per_credit,
        ));

        let messages = Arc::new(MessageService::new(message_repo, members.clone(), admins));
        let admin = Arc::new(AdminService::new(members.clone(), topup_repo, ledger.clone()));

        Self {
            members,
            auth,
            ledger,
            rotator,
            generation,
            topups,
            messages,
            admin,
            settings: settings_service,
            upload_limit: settings.server.max_upload_bytes,
        }
    }

    /// 构建带请求追踪的完整路由
    pub fn router(&self) -> Router {
        routes::routes(self).layer(TraceLayer::new_for_http())
    }
}
