// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::member::{Member, MemberStatus};
use crate::domain::repositories::member_repository::{MemberRepository, RepositoryError};
use crate::domain::services::notification_service::Notifier;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validators::{normalize_email, require_non_empty, validated_email, ValidationError};
use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const MIN_PASSWORD_LEN: usize = 8;

type HmacSha256 = Hmac<Sha256>;

/// 认证错误
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Account is awaiting admin approval")]
    PendingApproval,
    #[error("Account is inactive")]
    Inactive,
    #[error("Membership expired")]
    Expired,
    #[error("Invalid or expired session")]
    InvalidSession,
    #[error("Email already registered: {0}")]
    EmailTaken(String),
    #[error("Password must be at least 8 characters")]
    WeakPassword,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("Failed to issue session: {0}")]
    Token(String),
}

/// 会话角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

/// 已认证的会话身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    role: Role,
    exp: usize,
    iat: usize,
}

/// 登录成功后签发的令牌
#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    pub token: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
    pub member: Option<Member>,
}

/// 管理员目录
///
/// 管理员身份是对白名单的忽略大小写成员判断。
/// 管理员密码只保留进程内随机密钥下的摘要，校验走常量时间比较。
#[derive(Clone)]
pub struct AdminDirectory {
    emails: Vec<String>,
    key: [u8; 32],
    password_digest: Option<Vec<u8>>,
}

impl std::fmt::Debug for AdminDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminDirectory")
            .field("emails", &self.emails)
            .field("password_configured", &self.password_digest.is_some())
            .finish()
    }
}

impl AdminDirectory {
    pub fn new<I, S>(emails: I, password: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let password = password.into();
        let key: [u8; 32] = rand::random();
        let password_digest = (!password.is_empty())
            .then(|| password_mac(&key, &password))
            .flatten()
            .map(|mac| mac.finalize().into_bytes().to_vec());

        Self {
            emails: emails
                .into_iter()
                .map(|e| normalize_email(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
            key,
            password_digest,
        }
    }

    pub fn is_admin(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.emails.iter().any(|e| *e == email)
    }

    /// 管理员密码未配置时任何密码都不匹配
    fn verify(&self, email: &str, password: &str) -> bool {
        let Some(digest) = &self.password_digest else {
            return false;
        };
        // 先比较密码再判断白名单，耗时与邮箱是否命中无关
        let password_ok = password_mac(&self.key, password)
            .is_some_and(|mac| mac.verify_slice(digest).is_ok());
        password_ok && self.is_admin(email)
    }

    /// 会员私信的默认收件人
    pub fn primary(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }
}

fn password_mac(key: &[u8; 32], password: &str) -> Option<HmacSha256> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).ok()?;
    mac.update(password.as_bytes());
    Some(mac)
}

fn ensure_usable(member: &Member, now: DateTime<Utc>) -> Result<(), AuthError> {
    match member.status {
        MemberStatus::Pending => Err(AuthError::PendingApproval),
        MemberStatus::Inactive => Err(AuthError::Inactive),
        MemberStatus::Active if member.is_expired(now) => Err(AuthError::Expired),
        MemberStatus::Active => Ok(()),
    }
}

/// 认证服务
///
/// 负责注册、登录、会话签发与校验。
pub struct AuthService {
    members: Arc<dyn MemberRepository>,
    admins: Arc<AdminDirectory>,
    notifier: Arc<dyn Notifier>,
    secret: String,
    ttl: Duration,
    signup_credits: i64,
}

impl AuthService {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        admins: Arc<AdminDirectory>,
        notifier: Arc<dyn Notifier>,
        secret: String,
        ttl_hours: i64,
        signup_credits: i64,
    ) -> Self {
        Self {
            members,
            admins,
            notifier,
            secret,
            ttl: Duration::hours(ttl_hours.max(1)),
            signup_credits: signup_credits.max(0),
        }
    }

    pub fn admins(&self) -> &AdminDirectory {
        &self.admins
    }

    /// 注册新会员，状态为 pending，需管理员激活
    pub async fn signup(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> Result<Member, AuthError> {
        let email = validated_email(email)?;
        require_non_empty("full_name", full_name)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let hash = hash_password(password).map_err(|e| AuthError::Token(e.to_string()))?;
        let member = Member::new(
            email.clone(),
            full_name.trim().to_string(),
            hash,
            self.signup_credits,
        );

        let created = match self.members.create(&member).await {
            Ok(created) => created,
            Err(RepositoryError::AlreadyExists(_)) => return Err(AuthError::EmailTaken(email)),
            Err(e) => return Err(e.into()),
        };

        info!("New member signed up: {}", created.email);
        self.notifier
            .notify(&format!(
                "New member signup: {} <{}>",
                created.full_name, created.email
            ))
            .await;

        Ok(created)
    }

    /// 登录
    ///
    /// 白名单邮箱配合管理员密码获得管理员会话；其余情况按会员登录，
    /// 要求会员状态为 active 且未过期。
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let email = normalize_email(email);

        if self.admins.verify(&email, password) {
            info!("Admin signed in: {}", email);
            return self.issue(&email, Role::Admin, None);
        }

        let member = self
            .members
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &member.password_hash) {
            warn!("Failed sign-in for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        ensure_usable(&member, now)?;

        self.members.touch_last_seen(&email, now).await?;
        let role = if self.admins.is_admin(&email) {
            Role::Admin
        } else {
            Role::Member
        };
        self.issue(&email, role, Some(member))
    }

    fn issue(
        &self,
        email: &str,
        role: Role,
        member: Option<Member>,
    ) -> Result<IssuedSession, AuthError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = SessionClaims {
            sub: email.to_string(),
            role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Token(e.to_string()))?;

        Ok(IssuedSession {
            token,
            role,
            expires_at: Utc
                .timestamp_opt(claims.exp as i64, 0)
                .single()
                .unwrap_or(expires_at),
            member,
        })
    }

    /// 校验会话令牌
    pub fn verify_token(&self, token: &str) -> Result<Session, AuthError> {
        let data = jsonwebtoken::decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            debug!("Session validation failed: {}", e);
            AuthError::InvalidSession
        })?;

        // 管理员白名单变更后旧的管理员令牌立即失效
        if data.claims.role == Role::Admin && !self.admins.is_admin(&data.claims.sub) {
            return Err(AuthError::InvalidSession);
        }

        Ok(Session {
            email: data.claims.sub,
            role: data.claims.role,
        })
    }

    /// 校验令牌并按会员当前状态放行
    ///
    /// 会员令牌在有效期内仍需账户处于 active 且未过期，
    /// 管理员停用或会员到期后后续请求立即被拒。
    pub async fn authenticate(&self, token: &str) -> Result<Session, AuthError> {
        let session = self.verify_token(token)?;
        if session.is_admin() {
            return Ok(session);
        }

        let member = self
            .members
            .find_by_email(&session.email)
            .await?
            .ok_or(AuthError::InvalidSession)?;
        ensure_usable(&member, Utc::now()).inspect_err(|e| {
            debug!("Session for {} refused: {}", session.email, e);
        })?;
        Ok(session)
    }

    /// 当前会员资料
    pub async fn me(&self, session: &Session) -> Result<Option<Member>, AuthError> {
        Ok(self.members.find_by_email(&session.email).await?)
    }

    /// 心跳，更新最后在线时间
    pub async fn heartbeat(&self, session: &Session) -> Result<(), AuthError> {
        self.members
            .touch_last_seen(&session.email, Utc::now())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "auth_service_test.rs"]
mod tests;
