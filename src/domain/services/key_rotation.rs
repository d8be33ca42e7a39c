// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MAX_KEY_SLOTS;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// API密钥轮换器
///
/// 持有最多三个密钥槽位和一个当前下标。遇到瞬时错误时由调用方触发
/// `rotate`，下标循环前进到下一个非空槽位。轮换器本身不做健康检查，
/// 只负责在已配置的槽位之间循环。
#[derive(Debug)]
pub struct ApiKeyRotator {
    slots: Vec<String>,
    index: AtomicUsize,
}

impl ApiKeyRotator {
    /// 创建轮换器，仅保留前三个槽位，下标从槽位 1 开始
    pub fn new<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots: Vec<String> = slots
            .into_iter()
            .take(MAX_KEY_SLOTS)
            .map(|s| s.into().trim().to_string())
            .collect();

        if slots.iter().all(|s| s.is_empty()) {
            warn!("No generative AI API key configured, every call will fail");
        }

        Self {
            slots,
            index: AtomicUsize::new(0),
        }
    }

    /// 当前下标对应的密钥，可能为空字符串
    pub fn current(&self) -> String {
        self.slots
            .get(self.index.load(Ordering::Acquire))
            .cloned()
            .unwrap_or_default()
    }

    /// 当前槽位下标（从 0 开始）
    pub fn current_slot(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }

    /// 非空槽位数量
    pub fn active_slots(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    /// 前进到下一个非空槽位并返回其密钥
    ///
    /// 在一个完整循环内找不到非空槽位时回退到槽位 1，
    /// 所有槽位都为空时返回空字符串。
    pub fn rotate(&self) -> String {
        let len = self.slots.len();
        if len == 0 {
            return String::new();
        }

        let current = self.index.load(Ordering::Acquire);
        for step in 1..=len {
            let candidate = (current + step) % len;
            if !self.slots[candidate].is_empty() {
                self.index.store(candidate, Ordering::Release);
                debug!("Rotated generative AI key to slot {}", candidate + 1);
                return self.slots[candidate].clone();
            }
        }

        self.index.store(0, Ordering::Release);
        self.slots[0].clone()
    }
}
