// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 领域服务单元测试用的内存实现

use crate::domain::models::generation::{ChatTurn, MediaPart, VideoJobStatus, VideoRequest};
use crate::domain::models::member::{Member, MemberFilter, MemberStatus, MemberUpdate};
use crate::domain::models::message::DirectMessage;
use crate::domain::models::setting::SystemSetting;
use crate::domain::models::topup::{TopupRequest, TopupStatus};
use crate::domain::repositories::member_repository::{MemberRepository, RepositoryError};
use crate::domain::repositories::message_repository::MessageRepository;
use crate::domain::repositories::settings_repository::SettingsRepository;
use crate::domain::repositories::topup_repository::{TopupRepository, TopupTransition};
use crate::domain::services::genai_service::{GenAiError, GenerativeClient};
use crate::domain::services::notification_service::Notifier;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryMembers {
    rows: Mutex<HashMap<String, Member>>,
}

impl InMemoryMembers {
    pub fn with(members: Vec<Member>) -> Arc<Self> {
        let repo = Self::default();
        {
            let mut rows = repo.rows.lock().unwrap();
            for m in members {
                rows.insert(m.email.clone(), m);
            }
        }
        Arc::new(repo)
    }

    pub fn credits_of(&self, email: &str) -> Option<i64> {
        self.rows.lock().unwrap().get(email).map(|m| m.credits)
    }

    pub fn get(&self, email: &str) -> Option<Member> {
        self.rows.lock().unwrap().get(email).cloned()
    }
}

pub fn active_member(email: &str, credits: i64) -> Member {
    let mut m = Member::new(
        email.to_string(),
        "Test Member".to_string(),
        crate::utils::password::hash_password("password123").unwrap(),
        credits,
    );
    m.status = MemberStatus::Active;
    m
}

#[async_trait]
impl MemberRepository for InMemoryMembers {
    async fn create(&self, member: &Member) -> Result<Member, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&member.email) {
            return Err(RepositoryError::AlreadyExists(member.email.clone()));
        }
        rows.insert(member.email.clone(), member.clone());
        Ok(member.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, RepositoryError> {
        Ok(self.get(email))
    }

    async fn list(&self, filter: &MemberFilter) -> Result<Vec<Member>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        let mut members: Vec<Member> = rows
            .values()
            .filter(|m| filter.status.is_none_or(|s| m.status == s))
            .filter(|m| {
                filter.search.as_ref().is_none_or(|q| {
                    let q = q.to_lowercase();
                    m.email.contains(&q) || m.full_name.to_lowercase().contains(&q)
                })
            })
            .cloned()
            .collect();
        members.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(members)
    }

    async fn update_profile(
        &self,
        email: &str,
        update: &MemberUpdate,
    ) -> Result<Member, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let member = rows.get_mut(email).ok_or(RepositoryError::NotFound)?;
        if let Some(name) = &update.full_name {
            member.full_name = name.clone();
        }
        if let Some(status) = update.status {
            member.status = status;
        }
        if let Some(valid_until) = update.valid_until {
            member.valid_until = valid_until;
        }
        Ok(member.clone())
    }

    async fn delete(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.rows.lock().unwrap().remove(email).is_some())
    }

    async fn touch_last_seen(
        &self,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        if let Some(m) = self.rows.lock().unwrap().get_mut(email) {
            m.last_seen = Some(at);
        }
        Ok(())
    }

    async fn try_deduct_credits(&self, email: &str, amount: i64) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(email) {
            Some(m) if m.credits >= amount => {
                m.credits -= amount;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn add_credits(&self, email: &str, amount: i64) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows
            .get_mut(email)
            .map(|m| m.credits += amount)
            .is_some())
    }

    async fn set_credits(&self, email: &str, credits: i64) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(email).map(|m| m.credits = credits).is_some())
    }

    async fn expire_memberships(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let mut count = 0;
        for m in rows.values_mut() {
            if m.status == MemberStatus::Active && m.is_expired(now) {
                m.status = MemberStatus::Inactive;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn count_by_status(&self) -> Result<Vec<(MemberStatus, u64)>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        let mut counts: HashMap<MemberStatus, u64> = HashMap::new();
        for m in rows.values() {
            *counts.entry(m.status).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

pub struct InMemoryTopups {
    rows: Mutex<Vec<TopupRequest>>,
    members: Arc<InMemoryMembers>,
}

impl InMemoryTopups {
    pub fn new(members: Arc<InMemoryMembers>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(Vec::new()),
            members,
        })
    }

    fn transition(
        &self,
        id: Uuid,
        to: TopupStatus,
    ) -> Result<TopupTransition, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if row.status != TopupStatus::Pending {
            return Ok(TopupTransition::AlreadyDecided(row.clone()));
        }
        if to == TopupStatus::Approved {
            let mut members = self.members.rows.lock().unwrap();
            let member = members
                .get_mut(&row.email)
                .ok_or(RepositoryError::NotFound)?;
            member.credits += row.amount;
        }
        row.status = to;
        Ok(TopupTransition::Applied(row.clone()))
    }
}

#[async_trait]
impl TopupRepository for InMemoryTopups {
    async fn create(&self, request: &TopupRequest) -> Result<TopupRequest, RepositoryError> {
        self.rows.lock().unwrap().push(request.clone());
        Ok(request.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TopupRequest>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_tid(&self, tid: &str) -> Result<Option<TopupRequest>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.tid == tid).cloned())
    }

    async fn list(
        &self,
        status: Option<TopupStatus>,
        email: Option<&str>,
    ) -> Result<Vec<TopupRequest>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .filter(|r| email.is_none_or(|e| r.email == e))
            .cloned()
            .collect())
    }

    async fn approve(&self, id: Uuid) -> Result<TopupTransition, RepositoryError> {
        self.transition(id, TopupStatus::Approved)
    }

    async fn reject(&self, id: Uuid) -> Result<TopupTransition, RepositoryError> {
        self.transition(id, TopupStatus::Rejected)
    }

    async fn count_pending(&self) -> Result<u64, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == TopupStatus::Pending)
            .count() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryMessages {
    rows: Mutex<Vec<DirectMessage>>,
}

#[async_trait]
impl MessageRepository for InMemoryMessages {
    async fn create(&self, message: &DirectMessage) -> Result<DirectMessage, RepositoryError> {
        self.rows.lock().unwrap().push(message.clone());
        Ok(message.clone())
    }

    async fn inbox(&self, receiver: &str) -> Result<Vec<DirectMessage>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|m| m.receiver_email == receiver)
            .cloned()
            .collect())
    }

    async fn conversation(&self, a: &str, b: &str) -> Result<Vec<DirectMessage>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| {
                (m.sender_email == a && m.receiver_email == b)
                    || (m.sender_email == b && m.receiver_email == a)
            })
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: Uuid, receiver: &str) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|m| m.id == id && m.receiver_email == receiver)
        {
            Some(m) => {
                m.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn unread_count(&self, receiver: &str) -> Result<u64, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.receiver_email == receiver && !m.is_read)
            .count() as u64)
    }
}

#[derive(Default)]
pub struct InMemorySettings {
    rows: Mutex<HashMap<String, String>>,
}

impl InMemorySettings {
    pub fn with(pairs: &[(&str, &str)]) -> Arc<Self> {
        let repo = Self::default();
        {
            let mut rows = repo.rows.lock().unwrap();
            for (k, v) in pairs {
                rows.insert(k.to_string(), v.to_string());
            }
        }
        Arc::new(repo)
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettings {
    async fn all(&self) -> Result<Vec<SystemSetting>, RepositoryError> {
        let mut all: Vec<SystemSetting> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| SystemSetting {
                key: k.clone(),
                value: v.clone(),
            })
            .collect();
        all.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(all)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.rows.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<SystemSetting, RepositoryError> {
        self.rows
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(SystemSetting {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// 记录所有通知内容
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) {
        self.sent.lock().unwrap().push(text.to_string());
    }
}

/// 按脚本返回结果的生成式AI客户端，并记录每次调用使用的密钥
#[derive(Default)]
pub struct ScriptedClient {
    pub text: Mutex<VecDeque<Result<String, GenAiError>>>,
    pub images: Mutex<VecDeque<Result<MediaPart, GenAiError>>>,
    pub video_submits: Mutex<VecDeque<Result<String, GenAiError>>>,
    pub video_polls: Mutex<VecDeque<Result<VideoJobStatus, GenAiError>>>,
    pub speech: Mutex<VecDeque<Result<MediaPart, GenAiError>>>,
    pub keys_used: Mutex<Vec<String>>,
}

pub fn png(data: &str) -> MediaPart {
    MediaPart {
        mime_type: "image/png".to_string(),
        data: data.to_string(),
    }
}

impl ScriptedClient {
    fn next<T>(&self, queue: &Mutex<VecDeque<Result<T, GenAiError>>>, key: &str) -> Result<T, GenAiError> {
        self.keys_used.lock().unwrap().push(key.to_string());
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenAiError::EmptyResponse("scripted result")))
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys_used.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeClient for ScriptedClient {
    async fn generate_text(
        &self,
        api_key: &str,
        _history: &[ChatTurn],
        _prompt: &str,
    ) -> Result<String, GenAiError> {
        self.next(&self.text, api_key)
    }

    async fn generate_image(
        &self,
        api_key: &str,
        _prompt: &str,
        _aspect_ratio: Option<&str>,
        _source: Option<&MediaPart>,
    ) -> Result<MediaPart, GenAiError> {
        self.next(&self.images, api_key)
    }

    async fn submit_video(
        &self,
        api_key: &str,
        _request: &VideoRequest,
    ) -> Result<String, GenAiError> {
        self.next(&self.video_submits, api_key)
    }

    async fn poll_video(
        &self,
        api_key: &str,
        _operation: &str,
    ) -> Result<VideoJobStatus, GenAiError> {
        self.next(&self.video_polls, api_key)
    }

    async fn synthesize_speech(
        &self,
        api_key: &str,
        _text: &str,
        _voice: &str,
        _reference: Option<&MediaPart>,
    ) -> Result<MediaPart, GenAiError> {
        self.next(&self.speech, api_key)
    }
}
