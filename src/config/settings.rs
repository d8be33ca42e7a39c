// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::env_lookup::{env_list, env_lookup};
use crate::utils::retry_policy::RetryPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 生成式AI密钥槽位上限
pub const MAX_KEY_SLOTS: usize = 3;

/// 密钥槽位对应的环境变量名（按槽位顺序）
const KEY_SLOT_VARS: [&str; MAX_KEY_SLOTS] =
    ["GEMINI_API_KEY", "GEMINI_API_KEY_2", "GEMINI_API_KEY_3"];

/// 会话密钥的占位默认值，启动校验会拒绝它
pub const DEFAULT_SESSION_SECRET: &str = "change-me";

/// 生成接口请求体上限默认值（25 MiB），容纳 base64 编码的图片与音频
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// 应用程序配置设置
///
/// 包含数据库、服务器、生成式AI、认证、支付、通知和会员等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 生成式AI配置
    pub ai: AiSettings,
    /// 认证配置
    pub auth: AuthSettings,
    /// 支付配置
    pub payment: PaymentSettings,
    /// 通知配置
    pub notification: NotificationSettings,
    /// 会员配置
    pub membership: MembershipSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// Prometheus 指标端口，为 0 时不启用
    pub metrics_port: u16,
    /// `/v1/generate/*` 请求体字节上限
    pub max_upload_bytes: usize,
}

/// 生成式AI配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    /// API基础URL
    pub base_url: String,
    /// 最多三个密钥槽位，允许为空字符串
    #[serde(default)]
    pub api_keys: Vec<String>,
    pub text_model: String,
    pub image_model: String,
    pub video_model: String,
    pub tts_model: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 包含首次调用在内的最大尝试次数
    pub max_attempts: u32,
    /// 首次重试前的等待（毫秒）
    pub initial_backoff_ms: u64,
    /// 是否启用退避抖动
    pub enable_jitter: bool,
    /// 视频任务轮询间隔（秒）
    pub video_poll_interval_secs: u64,
    /// 视频任务最长等待（秒）
    pub video_max_wait_secs: u64,
}

/// 认证配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// 会话令牌签名密钥
    pub session_secret: String,
    /// 会话有效期（小时）
    pub session_ttl_hours: i64,
    /// 管理员邮箱白名单
    #[serde(default)]
    pub admin_emails: Vec<String>,
    /// 管理员密码
    pub admin_password: String,
}

/// 支付配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSettings {
    /// 支付网关类型（目前仅支持 mock）
    pub gateway: String,
    /// 商户密钥，用于签发支付令牌
    pub merchant_key: String,
    /// 每个积分的价格（最小货币单位）
    pub price_per_credit: i64,
}

/// 通知配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    /// 机器人令牌，为空时禁用通知
    pub telegram_bot_token: String,
    /// 管理员会话ID
    pub telegram_chat_id: String,
    /// 机器人API基础URL
    pub api_base_url: String,
}

/// 会员配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipSettings {
    /// 注册赠送积分
    pub signup_credits: i64,
    /// 会员到期检查间隔（秒）
    pub expiry_check_interval_secs: u64,
}

impl AiSettings {
    /// 根据配置构建重试策略
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            enable_jitter: self.enable_jitter,
            ..RetryPolicy::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn video_poll_interval(&self) -> Duration {
        Duration::from_secs(self.video_poll_interval_secs)
    }

    pub fn video_max_wait(&self) -> Duration {
        Duration::from_secs(self.video_max_wait_secs)
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.metrics_port", 9000)?
            .set_default("server.max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES as u64)?
            .set_default("database.url", "sqlite://satmoko.db?mode=rwc")?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Generative AI
            .set_default(
                "ai.base_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("ai.text_model", "gemini-2.5-flash")?
            .set_default("ai.image_model", "gemini-2.5-flash-image")?
            .set_default("ai.video_model", "veo-3.0-fast-generate-001")?
            .set_default("ai.tts_model", "gemini-2.5-flash-preview-tts")?
            .set_default("ai.request_timeout_secs", 120)?
            .set_default("ai.max_attempts", 3)?
            .set_default("ai.initial_backoff_ms", 2000)?
            .set_default("ai.enable_jitter", false)?
            .set_default("ai.video_poll_interval_secs", 10)?
            .set_default("ai.video_max_wait_secs", 600)?
            // Auth
            .set_default("auth.session_secret", DEFAULT_SESSION_SECRET)?
            .set_default("auth.session_ttl_hours", 24)?
            .set_default("auth.admin_password", "")?
            // Payment
            .set_default("payment.gateway", "mock")?
            .set_default("payment.merchant_key", "mock-merchant-key")?
            .set_default("payment.price_per_credit", 1000)?
            // Notification
            .set_default("notification.telegram_bot_token", "")?
            .set_default("notification.telegram_chat_id", "")?
            .set_default("notification.api_base_url", "https://api.telegram.org")?
            // Membership
            .set_default("membership.signup_credits", 0)?
            .set_default("membership.expiry_check_interval_secs", 300)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("SATMOKO")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("ai.api_keys")
                    .with_list_parse_key("auth.admin_emails")
                    .try_parsing(true),
            );

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.apply_env_fallbacks();
        Ok(settings)
    }

    /// 启动前校验
    ///
    /// 会话密钥为空或仍为占位默认值时拒绝启动，
    /// 否则任何人都能伪造会话令牌
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secret = self.auth.session_secret.trim();
        if secret.is_empty() || secret == DEFAULT_SESSION_SECRET {
            return Err(ConfigError::Message(
                "auth.session_secret must be set to a non-default value".to_string(),
            ));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::Message(
                "server.max_upload_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// 分层配置未提供时，回退到跨环境变量查找
    fn apply_env_fallbacks(&mut self) {
        if self.ai.api_keys.iter().all(|k| k.trim().is_empty()) {
            self.ai.api_keys = KEY_SLOT_VARS
                .iter()
                .map(|name| env_lookup(name).unwrap_or_default())
                .collect();
        }
        self.ai.api_keys.truncate(MAX_KEY_SLOTS);

        if self.auth.admin_emails.is_empty() {
            self.auth.admin_emails = env_list("ADMIN_EMAILS");
        }
        if self.auth.admin_password.is_empty() {
            self.auth.admin_password = env_lookup("ADMIN_PASSWORD").unwrap_or_default();
        }
        if self.notification.telegram_bot_token.is_empty() {
            self.notification.telegram_bot_token =
                env_lookup("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        }
        if self.notification.telegram_chat_id.is_empty() {
            self.notification.telegram_chat_id =
                env_lookup("TELEGRAM_CHAT_ID").unwrap_or_default();
        }
    }
}
