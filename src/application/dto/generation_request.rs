// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::generation::{ChatTurn, MediaPart, VideoRequest};
use crate::domain::services::generation_service::MAX_STORYBOARD_SCENES;
use serde::Deserialize;
use validator::Validate;

/// 对话请求，历史由前端维护并随请求提交
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequestDto {
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ImageRequestDto {
    #[validate(length(min = 1, message = "Prompt cannot be empty"))]
    pub prompt: String,
    pub aspect_ratio: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OutpaintRequestDto {
    pub image: MediaPart,
    pub prompt: Option<String>,
    pub aspect_ratio: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VideoRequestDto {
    #[validate(length(min = 1, message = "Prompt cannot be empty"))]
    pub prompt: String,
    pub aspect_ratio: Option<String>,
    /// 可选的首帧图片
    pub image: Option<MediaPart>,
}

impl From<VideoRequestDto> for VideoRequest {
    fn from(dto: VideoRequestDto) -> Self {
        Self {
            prompt: dto.prompt,
            aspect_ratio: dto.aspect_ratio,
            image: dto.image,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SpeechRequestDto {
    #[validate(length(min = 1, max = 5000, message = "Text must be 1-5000 characters"))]
    pub text: String,
    pub voice: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VoiceCloneRequestDto {
    /// 参考音频
    pub sample: MediaPart,
    #[validate(length(min = 1, max = 5000, message = "Text must be 1-5000 characters"))]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StoryboardRequestDto {
    #[validate(length(min = 1, message = "Premise cannot be empty"))]
    pub premise: String,
    #[validate(range(min = 1, max = MAX_STORYBOARD_SCENES))]
    pub scenes: usize,
    pub aspect_ratio: Option<String>,
}
