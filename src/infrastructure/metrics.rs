// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 启动 Prometheus 导出器并登记业务指标
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new();

    // 端口被占用时只告警（开发或测试环境常见）
    if let Err(e) = builder.with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return;
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
}

fn describe_metrics() {
    describe_counter!("credits_deducted_total", "Credits charged for generations");
    describe_counter!("credits_added_total", "Credits added by top-ups and admins");
    describe_counter!("credits_refunded_total", "Credits returned after failed generations");
    describe_counter!("topups_approved_total", "Top-up requests approved");
    describe_counter!("genai_requests_total", "Calls made to the generative API");
    describe_counter!("genai_failures_total", "Generative API calls that failed for good");
    describe_counter!("genai_key_rotations_total", "API key rotations after transient errors");
    describe_counter!("memberships_expired_total", "Memberships switched to inactive");
    describe_histogram!(
        "generation_duration_seconds",
        "Wall time of charged generations"
    );
}
