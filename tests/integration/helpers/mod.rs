// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use axum_test::TestServer;
use satmoko_studio::app::{AppServices, Collaborators};
use satmoko_studio::config::settings::{
    AiSettings, AuthSettings, DatabaseSettings, MembershipSettings, NotificationSettings,
    PaymentSettings, ServerSettings, Settings, DEFAULT_MAX_UPLOAD_BYTES,
};
use satmoko_studio::domain::services::notification_service::NoopNotifier;
use satmoko_studio::infrastructure::ai::gemini_client::GeminiClient;
use satmoko_studio::infrastructure::database::connection;
use satmoko_studio::infrastructure::services::mock_payment_gateway::MockPaymentGateway;
use satmoko_studio::utils::retry_policy::RetryPolicy;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

pub const ADMIN_EMAIL: &str = "admin@satmoko.test";
pub const ADMIN_PASSWORD: &str = "admin-secret";
pub const MEMBER_PASSWORD: &str = "correct-horse";

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub ai: MockServer,
    pub services: AppServices,
    pub db: Arc<DatabaseConnection>,
}

pub fn test_settings(ai_base_url: &str) -> Settings {
    Settings {
        database: DatabaseSettings {
            url: connection::IN_MEMORY_SQLITE.to_string(),
            max_connections: Some(1),
            min_connections: Some(1),
            connect_timeout: None,
            idle_timeout: None,
        },
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            metrics_port: 0,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        },
        ai: AiSettings {
            base_url: ai_base_url.to_string(),
            api_keys: vec!["key-a".to_string(), "key-b".to_string()],
            text_model: "text-model".to_string(),
            image_model: "image-model".to_string(),
            video_model: "video-model".to_string(),
            tts_model: "tts-model".to_string(),
            request_timeout_secs: 5,
            max_attempts: 3,
            initial_backoff_ms: 0,
            enable_jitter: false,
            video_poll_interval_secs: 1,
            video_max_wait_secs: 5,
        },
        auth: AuthSettings {
            session_secret: "integration-secret".to_string(),
            session_ttl_hours: 1,
            admin_emails: vec![ADMIN_EMAIL.to_string()],
            admin_password: ADMIN_PASSWORD.to_string(),
        },
        payment: PaymentSettings {
            gateway: "mock".to_string(),
            merchant_key: "merchant".to_string(),
            price_per_credit: 100,
        },
        notification: NotificationSettings {
            telegram_bot_token: String::new(),
            telegram_chat_id: String::new(),
            api_base_url: "http://127.0.0.1:9".to_string(),
        },
        membership: MembershipSettings {
            signup_credits: 0,
            expiry_check_interval_secs: 60,
        },
    }
}

pub async fn spawn_app() -> TestApp {
    let db = Arc::new(connection::in_memory().await.unwrap());
    spawn_app_on(db).await
}

/// 在已有数据库上重新装配全部服务，模拟进程重启
pub async fn spawn_app_on(db: Arc<DatabaseConnection>) -> TestApp {
    let ai = MockServer::start().await;
    let settings = test_settings(&ai.uri());

    let services = AppServices::build(
        &settings,
        db.clone(),
        Collaborators {
            client: Arc::new(GeminiClient::new(&settings.ai).unwrap()),
            notifier: Arc::new(NoopNotifier),
            gateway: Arc::new(MockPaymentGateway::new(settings.payment.merchant_key.clone())),
            retry_policy: Some(RetryPolicy::immediate(settings.ai.max_attempts)),
        },
    );

    let server = TestServer::new(services.router()).unwrap();
    TestApp {
        server,
        ai,
        services,
        db,
    }
}

#[allow(dead_code)]
impl TestApp {
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .server
            .post("/v1/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["data"]["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    pub async fn signup(&self, email: &str) {
        self.server
            .post("/v1/auth/signup")
            .json(&json!({
                "email": email,
                "full_name": "Test Member",
                "password": MEMBER_PASSWORD,
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    /// 注册、激活并充值，返回会员令牌
    pub async fn active_member(&self, email: &str, credits: i64) -> String {
        self.signup(email).await;
        let admin = self.admin_token().await;

        self.server
            .patch(&format!("/v1/admin/members/{}", email))
            .authorization_bearer(&admin)
            .json(&json!({ "status": "active", "credits": credits }))
            .await
            .assert_status_ok();

        self.login(email, MEMBER_PASSWORD).await
    }

    pub async fn balance(&self, email: &str) -> i64 {
        self.services.ledger.balance(email).await.unwrap()
    }
}
