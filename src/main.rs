//! Feedback Store — Entry Point
//!
//! Wiring sequence:
//! 1. Load config.toml (path from argv[1] or FEEDBACK_CONFIG) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Create Prometheus metrics registry
//! 4. Open the JSON feedback log (FeedbackRepository port)
//! 5. Create FeedbackService with the configured rule set
//! 6. Serve the axum router on server.bind_address
//! 7. Wait for SIGINT → mark not-ready → drain → exit

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use feedback_store::adapters::http::{self, AppState};
use feedback_store::adapters::metrics::{FeedbackMetrics, HealthState};
use feedback_store::adapters::persistence::JsonFileStore;
use feedback_store::config::{self, AppConfig};
use feedback_store::domain::RuleSet;
use feedback_store::ports::FeedbackRepository;
use feedback_store::usecases::FeedbackService;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("FEEDBACK_CONFIG").ok())
        .unwrap_or_else(|| "config.toml".to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured logging ────────────────────
    init_tracing(&config);

    info!(
        name = %config.server.name,
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        "Starting feedback store"
    );

    // ── 3. Metrics ──────────────────────────────────────────
    let metrics = if config.metrics.enabled {
        Some(Arc::new(FeedbackMetrics::new().context("Failed to register metrics")?))
    } else {
        None
    };

    // ── 4. Feedback log ─────────────────────────────────────
    let store = JsonFileStore::open(&config.storage, metrics.clone())
        .await
        .context("Failed to open feedback store")?;
    let repository: Arc<dyn FeedbackRepository> = Arc::new(store);

    // ── 5. Use case ─────────────────────────────────────────
    let rules = RuleSet::new(config.validation.min_comment_length);
    let mut service = FeedbackService::new(repository, rules);
    if let Some(m) = &metrics {
        service = service.with_metrics(Arc::clone(m));
    }

    // ── 6. HTTP server ──────────────────────────────────────
    let health = HealthState::new();
    let state = AppState::new(Arc::new(service), health.clone(), metrics, &config.rate_limit);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;

    // ── 7. Graceful shutdown on SIGINT ──────────────────────
    let shutdown = async move {
        let _ = signal::ctrl_c().await;
        info!("SIGINT received, draining in-flight submissions");
        health.mark_draining();
    };

    http::serve(listener, state, shutdown).await?;

    info!("Shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.server.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}
