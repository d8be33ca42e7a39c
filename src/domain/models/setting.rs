// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 系统键值配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
}

/// 计费功能
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Chat,
    Image,
    Outpaint,
    Video,
    Tts,
    VoiceClone,
    StoryboardScene,
}

impl Feature {
    pub const ALL: [Feature; 7] = [
        Feature::Chat,
        Feature::Image,
        Feature::Outpaint,
        Feature::Video,
        Feature::Tts,
        Feature::VoiceClone,
        Feature::StoryboardScene,
    ];

    /// settings 表中保存单价的键
    pub fn cost_key(&self) -> &'static str {
        match self {
            Feature::Chat => "cost_chat",
            Feature::Image => "cost_image",
            Feature::Outpaint => "cost_outpaint",
            Feature::Video => "cost_video",
            Feature::Tts => "cost_tts",
            Feature::VoiceClone => "cost_voice_clone",
            Feature::StoryboardScene => "cost_storyboard_scene",
        }
    }

    /// 未配置时的默认单价
    pub fn default_cost(&self) -> i64 {
        match self {
            Feature::Chat => 1,
            Feature::Image => 5,
            Feature::Outpaint => 5,
            Feature::Video => 50,
            Feature::Tts => 3,
            Feature::VoiceClone => 10,
            Feature::StoryboardScene => 5,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::Chat => "chat",
            Feature::Image => "image",
            Feature::Outpaint => "outpaint",
            Feature::Video => "video",
            Feature::Tts => "tts",
            Feature::VoiceClone => "voice_clone",
            Feature::StoryboardScene => "storyboard_scene",
        };
        f.write_str(name)
    }
}
