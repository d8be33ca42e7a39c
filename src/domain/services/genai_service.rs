// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::generation::{ChatTurn, MediaPart, VideoJobStatus, VideoRequest};
use async_trait::async_trait;
use thiserror::Error;

/// 判定为瞬时故障的响应状态码
const TRANSIENT_STATUSES: [u16; 5] = [403, 429, 500, 502, 503];

/// 判定为瞬时故障的错误信息片段（忽略大小写）
const TRANSIENT_PATTERNS: [&str; 4] = ["quota", "rpc failed", "resource_exhausted", "unavailable"];

/// 生成式AI调用错误
#[derive(Error, Debug)]
pub enum GenAiError {
    /// 服务端返回非成功状态
    #[error("Generative API returned {status}: {message}")]
    Http { status: u16, message: String },
    /// 网络层错误
    #[error("Generative API request failed: {0}")]
    Transport(String),
    /// 响应中没有期望的内容片段
    #[error("Generative API returned no {0}")]
    EmptyResponse(&'static str),
    /// 长时间任务报告失败
    #[error("Generation job failed: {0}")]
    OperationFailed(String),
    /// 长时间任务超过等待上限
    #[error("Generation job timed out after {0} seconds")]
    Timeout(u64),
    /// 响应无法解析
    #[error("Failed to decode generative API response: {0}")]
    Decode(String),
}

impl GenAiError {
    /// 是否值得换密钥重试
    pub fn is_transient(&self) -> bool {
        match self {
            GenAiError::Http { status, message } => {
                TRANSIENT_STATUSES.contains(status) || matches_transient_pattern(message)
            }
            GenAiError::Transport(message) | GenAiError::OperationFailed(message) => {
                matches_transient_pattern(message)
            }
            GenAiError::EmptyResponse(_) | GenAiError::Timeout(_) | GenAiError::Decode(_) => false,
        }
    }
}

fn matches_transient_pattern(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_PATTERNS.iter().any(|p| lower.contains(p))
}

/// 生成式AI客户端特质
///
/// 每个方法都显式接收本次调用使用的密钥，密钥的选择与轮换由上层负责。
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// 多轮对话，返回模型的文本回复
    async fn generate_text(
        &self,
        api_key: &str,
        history: &[ChatTurn],
        prompt: &str,
    ) -> Result<String, GenAiError>;

    /// 生成图片；提供 `source` 时基于源图扩展或编辑
    async fn generate_image(
        &self,
        api_key: &str,
        prompt: &str,
        aspect_ratio: Option<&str>,
        source: Option<&MediaPart>,
    ) -> Result<MediaPart, GenAiError>;

    /// 提交视频任务，返回任务名
    async fn submit_video(&self, api_key: &str, request: &VideoRequest)
        -> Result<String, GenAiError>;

    /// 查询视频任务状态
    async fn poll_video(&self, api_key: &str, operation: &str)
        -> Result<VideoJobStatus, GenAiError>;

    /// 语音合成；提供 `reference` 时模仿参考音色
    async fn synthesize_speech(
        &self,
        api_key: &str,
        text: &str,
        voice: &str,
        reference: Option<&MediaPart>,
    ) -> Result<MediaPart, GenAiError>;
}
