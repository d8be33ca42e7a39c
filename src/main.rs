// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use satmoko_studio::app::{AppServices, Collaborators};
use satmoko_studio::config::settings::Settings;
use satmoko_studio::infrastructure::ai::gemini_client::GeminiClient;
use satmoko_studio::infrastructure::database::connection;
use satmoko_studio::infrastructure::services::mock_payment_gateway::MockPaymentGateway;
use satmoko_studio::infrastructure::services::telegram_notifier::build_notifier;
use satmoko_studio::utils::telemetry;
use satmoko_studio::workers::MembershipExpiryWorker;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting satmoko-studio...");

    // 2. Load configuration
    let settings = Settings::new()?;
    settings.validate()?;
    let settings = Arc::new(settings);
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    if settings.server.metrics_port != 0 {
        let metrics_addr: SocketAddr =
            format!("{}:{}", settings.server.host, settings.server.metrics_port).parse()?;
        satmoko_studio::infrastructure::metrics::init_metrics(metrics_addr);
    }

    // 3. Connect to database and run migrations
    let db = Arc::new(connection::connect_and_migrate(&settings.database).await?);
    info!("Database connection established");

    // 4. External collaborators
    let client = Arc::new(GeminiClient::new(&settings.ai)?);
    let notifier = build_notifier(&settings.notification);
    if settings.payment.gateway != "mock" {
        warn!(
            "Unsupported payment gateway '{}', using the mock gateway",
            settings.payment.gateway
        );
    }
    let gateway = Arc::new(MockPaymentGateway::new(settings.payment.merchant_key.clone()));

    // 5. Assemble services
    let services = AppServices::build(
        &settings,
        db,
        Collaborators {
            client,
            notifier,
            gateway,
            retry_policy: None,
        },
    );
    info!(
        "Generative AI configured with {} active key slot(s)",
        services.rotator.active_slots()
    );

    // 6. Start Workers
    let expiry_worker = MembershipExpiryWorker::new(
        services.members.clone(),
        Duration::from_secs(settings.membership.expiry_check_interval_secs),
    );
    expiry_worker.start();

    // 7. Start HTTP server
    let app = services.router();
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
