// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::generation::{
    Charged, ChatTurn, GeneratedVideo, MediaPart, StoryboardScene, VideoJobStatus, VideoRequest,
};
use crate::domain::models::setting::Feature;
use crate::domain::repositories::member_repository::RepositoryError;
use crate::domain::services::auth_service::Session;
use crate::domain::services::credit_ledger::{CreditLedger, LedgerError};
use crate::domain::services::genai_service::{GenAiError, GenerativeClient};
use crate::domain::services::key_rotation::ApiKeyRotator;
use crate::domain::services::settings_service::SettingsService;
use crate::utils::retry_policy::RetryPolicy;
use metrics::{counter, histogram};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{error, info, warn};

/// 对话历史最多保留的轮数
const MAX_HISTORY_TURNS: usize = 20;
/// 分镜场景数上限
pub const MAX_STORYBOARD_SCENES: usize = 8;
const DEFAULT_VOICE: &str = "Kore";
const DEFAULT_OUTPAINT_PROMPT: &str =
    "Extend the scene naturally beyond its current borders, keeping style and lighting consistent.";

/// 生成错误
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    GenAi(#[from] GenAiError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),
}

/// 视频轮询间隔下限
const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// 视频任务轮询参数
#[derive(Debug, Clone, Copy)]
pub struct VideoPolling {
    pub interval: Duration,
    pub max_wait: Duration,
}

/// 生成服务
///
/// 所有生成功能共用同一套流程：按功能单价扣费，
/// 调用生成式AI（瞬时错误时轮换密钥并按策略重试），失败则退回积分。
pub struct GenerationService {
    client: Arc<dyn GenerativeClient>,
    rotator: Arc<ApiKeyRotator>,
    policy: RetryPolicy,
    ledger: Arc<CreditLedger>,
    settings: Arc<SettingsService>,
    polling: VideoPolling,
}

impl GenerationService {
    pub fn new(
        client: Arc<dyn GenerativeClient>,
        rotator: Arc<ApiKeyRotator>,
        policy: RetryPolicy,
        ledger: Arc<CreditLedger>,
        settings: Arc<SettingsService>,
        polling: VideoPolling,
    ) -> Self {
        Self {
            client,
            rotator,
            policy,
            ledger,
            settings,
            polling: VideoPolling {
                interval: polling.interval.max(MIN_POLL_INTERVAL),
                max_wait: polling.max_wait,
            },
        }
    }

    /// 带密钥轮换的重试包装
    ///
    /// 使用轮换器当前密钥调用 `op`；瞬时错误时轮换密钥、退避后重试，
    /// 总尝试次数不超过策略上限；非瞬时错误立即返回。
    pub async fn with_rotation<T, F, Fut>(&self, operation: &str, op: F) -> Result<T, GenAiError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, GenAiError>>,
    {
        let mut key = self.rotator.current();
        let mut attempt = 0;

        loop {
            attempt += 1;
            counter!("genai_requests_total", "operation" => operation.to_string()).increment(1);

            match op(key).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && self.policy.should_retry(attempt) => {
                    let backoff = self.policy.calculate_backoff(attempt);
                    key = self.rotator.rotate();
                    warn!(
                        "{} attempt {} failed with transient error: {}. Retrying on key slot {} in {:?}",
                        operation,
                        attempt,
                        e,
                        self.rotator.current_slot() + 1,
                        backoff
                    );
                    counter!("genai_key_rotations_total").increment(1);
                    sleep(backoff).await;
                }
                Err(e) => {
                    counter!("genai_failures_total", "operation" => operation.to_string())
                        .increment(1);
                    error!("{} failed after {} attempt(s): {}", operation, attempt, e);
                    return Err(e);
                }
            }
        }
    }

    /// 扣费后执行生成，失败时退回积分；管理员会话不计费
    async fn charged<T, Fut>(
        &self,
        session: &Session,
        feature: Feature,
        units: i64,
        work: Fut,
    ) -> Result<Charged<T>, GenerationError>
    where
        Fut: Future<Output = Result<T, GenerationError>>,
    {
        let cost = self.settings.cost_of(feature).await? * units;
        let started = Instant::now();

        if session.is_admin() || cost == 0 {
            let result = work.await?;
            return Ok(Charged {
                result,
                cost: 0,
                balance: None,
            });
        }

        let balance = self.ledger.deduct(&session.email, cost).await?;

        match work.await {
            Ok(result) => {
                histogram!("generation_duration_seconds", "feature" => feature.to_string())
                    .record(started.elapsed().as_secs_f64());
                info!(
                    "{} generated {} for {} credits",
                    session.email, feature, cost
                );
                Ok(Charged {
                    result,
                    cost,
                    balance: Some(balance),
                })
            }
            Err(e) => {
                if let Err(refund_err) = self.ledger.refund(&session.email, cost).await {
                    error!(
                        "Failed to refund {} credits to {}: {}",
                        cost, session.email, refund_err
                    );
                }
                Err(e)
            }
        }
    }

    /// 文本对话
    pub async fn chat(
        &self,
        session: &Session,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<Charged<String>, GenerationError> {
        require_text("message", message)?;
        let history = &history[history.len().saturating_sub(MAX_HISTORY_TURNS)..];
        let client = &self.client;

        self.charged(session, Feature::Chat, 1, async {
            self.with_rotation("chat", |key| async move {
                client.generate_text(&key, history, message).await
            })
            .await
            .map_err(GenerationError::from)
        })
        .await
    }

    /// 文生图
    pub async fn generate_image(
        &self,
        session: &Session,
        prompt: &str,
        aspect_ratio: Option<&str>,
    ) -> Result<Charged<MediaPart>, GenerationError> {
        require_text("prompt", prompt)?;
        let client = &self.client;

        self.charged(session, Feature::Image, 1, async {
            self.with_rotation("image", |key| async move {
                client.generate_image(&key, prompt, aspect_ratio, None).await
            })
            .await
            .map_err(GenerationError::from)
        })
        .await
    }

    /// 扩图：在源图基础上向外延展
    pub async fn outpaint_image(
        &self,
        session: &Session,
        source: &MediaPart,
        prompt: Option<&str>,
        aspect_ratio: Option<&str>,
    ) -> Result<Charged<MediaPart>, GenerationError> {
        require_media("image", source, "image/")?;
        let prompt = prompt
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_OUTPAINT_PROMPT);
        let client = &self.client;

        self.charged(session, Feature::Outpaint, 1, async {
            self.with_rotation("outpaint", |key| async move {
                client
                    .generate_image(&key, prompt, aspect_ratio, Some(source))
                    .await
            })
            .await
            .map_err(GenerationError::from)
        })
        .await
    }

    /// 视频生成：提交任务后按固定间隔轮询直到完成
    pub async fn generate_video(
        &self,
        session: &Session,
        request: &VideoRequest,
    ) -> Result<Charged<GeneratedVideo>, GenerationError> {
        require_text("prompt", &request.prompt)?;
        if let Some(image) = &request.image {
            require_media("image", image, "image/")?;
        }
        let client = &self.client;

        self.charged(session, Feature::Video, 1, async {
            let (key, operation) = self
                .with_rotation("video_submit", |key| async move {
                    let operation = client.submit_video(&key, request).await?;
                    Ok((key, operation))
                })
                .await?;
            info!("Submitted video job {}", operation);

            let uri = self.wait_for_video(&key, &operation).await?;
            Ok::<_, GenerationError>(GeneratedVideo { operation, uri })
        })
        .await
    }

    /// 轮询视频任务；轮询使用提交任务时的密钥
    ///
    /// 每次等待不超过剩余时间，到达截止时刻时仍会最后轮询一次
    async fn wait_for_video(&self, key: &str, operation: &str) -> Result<String, GenAiError> {
        let deadline = Instant::now() + self.polling.max_wait;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            sleep(self.polling.interval.min(remaining)).await;

            match self.client.poll_video(key, operation).await {
                Ok(VideoJobStatus::Running) => {}
                Ok(VideoJobStatus::Done { uri }) => return Ok(uri),
                Ok(VideoJobStatus::Failed(message)) => {
                    return Err(GenAiError::OperationFailed(message))
                }
                Err(e) if e.is_transient() => {
                    warn!("Transient error polling {}: {}", operation, e);
                }
                Err(e) => return Err(e),
            }

            if Instant::now() >= deadline {
                warn!("Video job {} exceeded {:?}", operation, self.polling.max_wait);
                return Err(GenAiError::Timeout(self.polling.max_wait.as_secs()));
            }
        }
    }

    /// 文本转语音
    pub async fn text_to_speech(
        &self,
        session: &Session,
        text: &str,
        voice: Option<&str>,
    ) -> Result<Charged<MediaPart>, GenerationError> {
        require_text("text", text)?;
        let voice = voice.filter(|v| !v.trim().is_empty()).unwrap_or(DEFAULT_VOICE);
        let client = &self.client;

        self.charged(session, Feature::Tts, 1, async {
            self.with_rotation("tts", |key| async move {
                client.synthesize_speech(&key, text, voice, None).await
            })
            .await
            .map_err(GenerationError::from)
        })
        .await
    }

    /// 声音克隆：以参考音频的音色朗读文本
    pub async fn clone_voice(
        &self,
        session: &Session,
        sample: &MediaPart,
        text: &str,
    ) -> Result<Charged<MediaPart>, GenerationError> {
        require_text("text", text)?;
        require_media("sample", sample, "audio/")?;
        let client = &self.client;

        self.charged(session, Feature::VoiceClone, 1, async {
            self.with_rotation("voice_clone", |key| async move {
                client
                    .synthesize_speech(&key, text, DEFAULT_VOICE, Some(sample))
                    .await
            })
            .await
            .map_err(GenerationError::from)
        })
        .await
    }

    /// 分镜：先让文本模型拆分场景，再逐个场景生成图片
    pub async fn storyboard(
        &self,
        session: &Session,
        premise: &str,
        scenes: usize,
        aspect_ratio: Option<&str>,
    ) -> Result<Charged<Vec<StoryboardScene>>, GenerationError> {
        require_text("premise", premise)?;
        if scenes == 0 || scenes > MAX_STORYBOARD_SCENES {
            return Err(GenerationError::InvalidRequest(format!(
                "scenes must be between 1 and {}",
                MAX_STORYBOARD_SCENES
            )));
        }
        let client = &self.client;
        let plan_prompt = storyboard_prompt(premise, scenes);
        let plan_prompt = plan_prompt.as_str();

        self.charged(session, Feature::StoryboardScene, scenes as i64, async {
            let raw = self
                .with_rotation("storyboard_plan", |key| async move {
                    client.generate_text(&key, &[], plan_prompt).await
                })
                .await?;
            let descriptions = parse_scene_list(&raw, scenes)?;

            let mut board = Vec::with_capacity(descriptions.len());
            for (index, description) in descriptions.into_iter().enumerate() {
                let prompt = format!(
                    "{}. Scene {}: {}. Keep characters and art style consistent across scenes.",
                    premise.trim(),
                    index + 1,
                    description
                );
                let prompt = prompt.as_str();
                let image = self
                    .with_rotation("storyboard_scene", |key| async move {
                        client.generate_image(&key, prompt, aspect_ratio, None).await
                    })
                    .await?;
                board.push(StoryboardScene {
                    index: index + 1,
                    description,
                    image,
                });
            }
            Ok::<_, GenerationError>(board)
        })
        .await
    }
}

fn storyboard_prompt(premise: &str, scenes: usize) -> String {
    format!(
        "Split the following story premise into exactly {} short visual scene descriptions, \
        one sentence each. Respond with ONLY a JSON array of strings, no markdown. \
        Premise: {}",
        scenes,
        premise.trim()
    )
}

/// 解析文本模型返回的场景列表，允许带 markdown 代码块
pub fn parse_scene_list(raw: &str, expected: usize) -> Result<Vec<String>, GenAiError> {
    let clean = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let scenes: Vec<String> = serde_json::from_str::<Vec<String>>(clean)
        .map_err(|e| GenAiError::Decode(format!("scene list: {}", e)))?
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(expected)
        .collect();

    if scenes.len() < expected {
        return Err(GenAiError::Decode(format!(
            "expected {} scenes, got {}",
            expected,
            scenes.len()
        )));
    }
    Ok(scenes)
}

fn require_text(field: &str, value: &str) -> Result<(), GenerationError> {
    if value.trim().is_empty() {
        return Err(GenerationError::InvalidRequest(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(())
}

fn require_media(field: &str, media: &MediaPart, mime_prefix: &str) -> Result<(), GenerationError> {
    if !media.mime_type.starts_with(mime_prefix) {
        return Err(GenerationError::InvalidRequest(format!(
            "{} must be {}* but is {}",
            field, mime_prefix, media.mime_type
        )));
    }
    if media.data.trim().is_empty() {
        return Err(GenerationError::InvalidRequest(format!(
            "{} data cannot be empty",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "generation_service_test.rs"]
mod tests;
