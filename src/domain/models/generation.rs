// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 模型返回的媒体片段，数据为 base64 编码
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaPart {
    pub mime_type: String,
    pub data: String,
}

/// 对话角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// 一轮对话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// 视频生成请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoRequest {
    pub prompt: String,
    pub aspect_ratio: Option<String>,
    /// 可选的首帧图片
    pub image: Option<MediaPart>,
}

/// 长时间运行的视频任务状态
#[derive(Debug, Clone, PartialEq)]
pub enum VideoJobStatus {
    Running,
    Done { uri: String },
    Failed(String),
}

/// 分镜中的一个场景
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryboardScene {
    pub index: usize,
    pub description: String,
    pub image: MediaPart,
}

/// 一次计费生成的结果
#[derive(Debug, Clone, Serialize)]
pub struct Charged<T> {
    pub result: T,
    /// 本次扣除的积分
    pub cost: i64,
    /// 扣除后的余额，管理员会话为 None
    pub balance: Option<i64>,
}

/// 完成的视频任务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedVideo {
    pub operation: String,
    pub uri: String,
}
