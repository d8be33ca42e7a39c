// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::generation_request::{
    ChatRequestDto, ImageRequestDto, OutpaintRequestDto, SpeechRequestDto, StoryboardRequestDto,
    VideoRequestDto, VoiceCloneRequestDto,
};
use crate::domain::models::generation::VideoRequest;
use crate::domain::services::auth_service::Session;
use crate::domain::services::generation_service::GenerationService;
use crate::domain::services::settings_service::SettingsService;
use crate::presentation::errors::AppError;
use crate::presentation::handlers::success;
use axum::{Extension, Json};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub async fn chat(
    session: Session,
    Extension(generation): Extension<Arc<GenerationService>>,
    Json(request): Json<ChatRequestDto>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;
    let reply = generation
        .chat(&session, &request.history, &request.message)
        .await?;
    Ok(success(reply))
}

pub async fn image(
    session: Session,
    Extension(generation): Extension<Arc<GenerationService>>,
    Json(request): Json<ImageRequestDto>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;
    let image = generation
        .generate_image(&session, &request.prompt, request.aspect_ratio.as_deref())
        .await?;
    Ok(success(image))
}

pub async fn outpaint(
    session: Session,
    Extension(generation): Extension<Arc<GenerationService>>,
    Json(request): Json<OutpaintRequestDto>,
) -> Result<Json<Value>, AppError> {
    let image = generation
        .outpaint_image(
            &session,
            &request.image,
            request.prompt.as_deref(),
            request.aspect_ratio.as_deref(),
        )
        .await?;
    Ok(success(image))
}

/// 视频生成会一直等待任务完成，请求耗时可能达到数分钟
pub async fn video(
    session: Session,
    Extension(generation): Extension<Arc<GenerationService>>,
    Json(request): Json<VideoRequestDto>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;
    info!("Video generation requested by {}", session.email);
    let video = generation
        .generate_video(&session, &VideoRequest::from(request))
        .await?;
    Ok(success(video))
}

pub async fn speech(
    session: Session,
    Extension(generation): Extension<Arc<GenerationService>>,
    Json(request): Json<SpeechRequestDto>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;
    let audio = generation
        .text_to_speech(&session, &request.text, request.voice.as_deref())
        .await?;
    Ok(success(audio))
}

pub async fn voice_clone(
    session: Session,
    Extension(generation): Extension<Arc<GenerationService>>,
    Json(request): Json<VoiceCloneRequestDto>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;
    let audio = generation
        .clone_voice(&session, &request.sample, &request.text)
        .await?;
    Ok(success(audio))
}

pub async fn storyboard(
    session: Session,
    Extension(generation): Extension<Arc<GenerationService>>,
    Json(request): Json<StoryboardRequestDto>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;
    let board = generation
        .storyboard(
            &session,
            &request.premise,
            request.scenes,
            request.aspect_ratio.as_deref(),
        )
        .await?;
    Ok(success(board))
}

/// 各功能当前单价
pub async fn prices(
    _session: Session,
    Extension(settings): Extension<Arc<SettingsService>>,
) -> Result<Json<Value>, AppError> {
    Ok(success(settings.price_list().await?))
}
