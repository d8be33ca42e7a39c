// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::AiSettings;
use crate::domain::models::generation::{
    ChatTurn, MediaPart, VideoJobStatus, VideoRequest,
};
use crate::domain::services::genai_service::{GenAiError, GenerativeClient};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// 各功能使用的模型
#[derive(Debug, Clone)]
pub struct GeminiModels {
    pub text: String,
    pub image: String,
    pub video: String,
    pub tts: String,
}

/// 生成式AI REST 客户端
///
/// # 接口
///
/// - 文本、图片、语音：`POST {base}/models/{model}:generateContent`
/// - 视频：`POST {base}/models/{model}:predictLongRunning`，
///   之后 `GET {base}/{operation}` 查询任务状态
///
/// 密钥通过 `x-goog-api-key` 请求头传递，由调用方按次指定。
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    models: GeminiModels,
}

impl GeminiClient {
    pub fn new(settings: &AiSettings) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            models: GeminiModels {
                text: settings.text_model.clone(),
                image: settings.image_model.clone(),
                video: settings.video_model.clone(),
                tts: settings.tts_model.clone(),
            },
        })
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        api_key: &str,
        body: &Value,
    ) -> Result<T, GenAiError> {
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenAiError::Transport(e.to_string()))?;
        decode(response).await
    }

    async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        body: &Value,
    ) -> Result<GenerateContentResponse, GenAiError> {
        let url = self.model_url(model, "generateContent");
        debug!("POST {}", url);
        self.post(&url, api_key, body).await
    }
}

/// 非成功状态映射为 `Http` 错误，消息优先取响应体中的 `error.message`
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GenAiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| GenAiError::Transport(e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(&text)
            .map(|e| e.error.describe())
            .unwrap_or(text);
        return Err(GenAiError::Http {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&text).map_err(|e| GenAiError::Decode(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl ApiError {
    fn describe(&self) -> String {
        match &self.status {
            Some(status) if !self.message.contains(status.as_str()) => {
                format!("{} ({})", self.message, status)
            }
            _ => self.message.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

impl GenerateContentResponse {
    fn parts(self) -> impl Iterator<Item = Part> {
        self.candidates
            .into_iter()
            .take(1)
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
    }

    /// 拼接首个候选的全部文本片段
    fn into_text(self) -> Result<String, GenAiError> {
        let text: String = self.parts().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            return Err(GenAiError::EmptyResponse("text"));
        }
        Ok(text)
    }

    /// 首个候选中的第一个内联媒体片段
    fn into_media(self, kind: &'static str) -> Result<MediaPart, GenAiError> {
        self.parts()
            .find_map(|p| p.inline_data)
            .map(|d| MediaPart {
                mime_type: d.mime_type,
                data: d.data,
            })
            .ok_or(GenAiError::EmptyResponse(kind))
    }
}

#[derive(Debug, Deserialize)]
struct OperationHandle {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationState {
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    response: Option<Value>,
}

impl OperationState {
    fn into_status(self) -> VideoJobStatus {
        if let Some(error) = self.error {
            return VideoJobStatus::Failed(error.describe());
        }
        if !self.done {
            return VideoJobStatus::Running;
        }

        let uri = self
            .response
            .as_ref()
            .and_then(|r| {
                r.pointer("/generateVideoResponse/generatedSamples/0/video/uri")
                    .or_else(|| r.pointer("/generatedVideos/0/video/uri"))
            })
            .and_then(Value::as_str);

        match uri {
            Some(uri) => VideoJobStatus::Done {
                uri: uri.to_string(),
            },
            None => VideoJobStatus::Failed("operation finished without a video".to_string()),
        }
    }
}

fn inline_part(media: &MediaPart) -> Value {
    json!({
        "inlineData": {
            "mimeType": media.mime_type,
            "data": media.data,
        }
    })
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate_text(
        &self,
        api_key: &str,
        history: &[ChatTurn],
        prompt: &str,
    ) -> Result<String, GenAiError> {
        let mut contents: Vec<Value> = history
            .iter()
            .map(|turn| json!({ "role": turn.role.as_str(), "parts": [{ "text": turn.text }] }))
            .collect();
        contents.push(json!({ "role": "user", "parts": [{ "text": prompt }] }));

        let body = json!({ "contents": contents });
        self.generate_content(&self.models.text, api_key, &body)
            .await?
            .into_text()
    }

    async fn generate_image(
        &self,
        api_key: &str,
        prompt: &str,
        aspect_ratio: Option<&str>,
        source: Option<&MediaPart>,
    ) -> Result<MediaPart, GenAiError> {
        let mut parts = Vec::with_capacity(2);
        if let Some(source) = source {
            parts.push(inline_part(source));
        }
        parts.push(json!({ "text": prompt }));

        let mut generation_config = json!({ "responseModalities": ["IMAGE"] });
        if let Some(ratio) = aspect_ratio {
            generation_config["imageConfig"] = json!({ "aspectRatio": ratio });
        }

        let body = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": generation_config,
        });
        self.generate_content(&self.models.image, api_key, &body)
            .await?
            .into_media("image")
    }

    async fn submit_video(
        &self,
        api_key: &str,
        request: &VideoRequest,
    ) -> Result<String, GenAiError> {
        let mut instance = json!({ "prompt": request.prompt });
        if let Some(image) = &request.image {
            instance["image"] = json!({
                "bytesBase64Encoded": image.data,
                "mimeType": image.mime_type,
            });
        }
        let mut body = json!({ "instances": [instance] });
        if let Some(ratio) = &request.aspect_ratio {
            body["parameters"] = json!({ "aspectRatio": ratio });
        }

        let url = self.model_url(&self.models.video, "predictLongRunning");
        debug!("POST {}", url);
        let handle: OperationHandle = self.post(&url, api_key, &body).await?;
        Ok(handle.name)
    }

    async fn poll_video(
        &self,
        api_key: &str,
        operation: &str,
    ) -> Result<VideoJobStatus, GenAiError> {
        let url = format!("{}/{}", self.base_url, operation.trim_start_matches('/'));
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| GenAiError::Transport(e.to_string()))?;

        let state: OperationState = decode(response).await?;
        Ok(state.into_status())
    }

    async fn synthesize_speech(
        &self,
        api_key: &str,
        text: &str,
        voice: &str,
        reference: Option<&MediaPart>,
    ) -> Result<MediaPart, GenAiError> {
        let parts = match reference {
            Some(sample) => vec![
                inline_part(sample),
                json!({
                    "text": format!(
                        "Read the following text aloud, matching the voice and tone of the attached recording: {}",
                        text
                    )
                }),
            ],
            None => vec![json!({ "text": text })],
        };

        let body = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": voice } }
                }
            }
        });
        self.generate_content(&self.models.tts, api_key, &body)
            .await?
            .into_media("audio")
    }
}

#[cfg(test)]
#[path = "gemini_client_test.rs"]
mod tests;
