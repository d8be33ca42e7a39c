// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 跨环境变量查找
//!
//! 同一个配置项在不同部署环境下可能带有不同前缀（服务端 `SATMOKO_`、
//! 前端构建时的 `VITE_`，或者不带前缀），这里按固定顺序依次查找。

/// 查找时依次尝试的前缀
pub const LOOKUP_PREFIXES: [&str; 3] = ["SATMOKO_", "VITE_", ""];

/// 按前缀顺序查找环境变量，返回第一个非空值
pub fn env_lookup(name: &str) -> Option<String> {
    lookup_with(name, |key| std::env::var(key).ok())
}

/// 使用自定义取值函数查找，便于测试
pub fn lookup_with<F>(name: &str, get: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    LOOKUP_PREFIXES.iter().find_map(|prefix| {
        get(&format!("{}{}", prefix, name))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// 读取逗号分隔的列表变量
pub fn env_list(name: &str) -> Vec<String> {
    env_lookup(name)
        .map(|raw| split_list(&raw))
        .unwrap_or_default()
}

pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
