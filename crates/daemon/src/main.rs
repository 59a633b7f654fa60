//! uneventful daemon - Main Entry Point
//!
//! Composition root: wires the SQLite repositories, Twilio sender, token
//! service and rate limiter into the JSON-RPC server and the daily
//! reminder job.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use uneventful_api_rpc::{RpcHandler, RpcServer, RpcServerConfig};
use uneventful_core::application::{ReminderScheduler, ReminderService, SmsRateLimiter, TokenService};
use uneventful_core::config::{AdminRoster, ConfigDir, SmsTemplates};
use uneventful_core::port::{SmsSender, SystemTimeProvider, UuidProvider};
use uneventful_infra_sms::{DisabledSmsSender, TwilioConfig, TwilioSmsSender};
use uneventful_infra_sqlite::{
    create_pool, run_migrations, SqliteEventRepository, SqliteSubscriptionRepository,
    SqliteUserRepository,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "~/.uneventful/uneventful.db";
const DEFAULT_APP_BASE_URL: &str = "http://localhost:3000";
const REMINDER_HOUR: u32 = 9;
const RATE_LIMIT_SWEEP_SECS: u64 = 300;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format =
        std::env::var("UNEVENTFUL_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("uneventful=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("uneventful daemon v{} starting...", VERSION);

    // 2. Load configuration
    let db_path = std::env::var("UNEVENTFUL_DB_PATH")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DB_PATH).into_owned());

    let rpc_port: u16 = std::env::var("UNEVENTFUL_RPC_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(2999);

    let jwt_secret = std::env::var("UNEVENTFUL_JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("UNEVENTFUL_JWT_SECRET must be set"))?;

    let app_base_url = std::env::var("UNEVENTFUL_APP_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_APP_BASE_URL.to_string());

    let config_dir = ConfigDir::from_env();
    info!(config_dir = %config_dir.root().display(), "Loading YAML config");

    let templates = Arc::new(
        SmsTemplates::load(&config_dir.sms_path())
            .map_err(|e| anyhow::anyhow!("SMS template load failed: {}", e))?,
    );
    let admins = Arc::new(AdminRoster::new(config_dir.admins_path()));

    // 3. Initialize database
    info!(db_path = %db_path, "Initializing database...");
    let pool = create_pool(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);
    let users = Arc::new(SqliteUserRepository::new(pool.clone()));
    let events = Arc::new(SqliteEventRepository::new(pool.clone()));
    let subscriptions = Arc::new(SqliteSubscriptionRepository::new(pool.clone()));

    let sms: Arc<dyn SmsSender> = match TwilioConfig::from_env() {
        Some(config) => {
            info!(from = %config.from_number, "Twilio SMS enabled");
            Arc::new(TwilioSmsSender::new(config))
        }
        None => {
            warn!("Twilio credentials missing; SMS delivery disabled");
            Arc::new(DisabledSmsSender)
        }
    };

    let tokens = Arc::new(TokenService::new(&jwt_secret, app_base_url));
    let limiter = Arc::new(SmsRateLimiter::new(time_provider.clone()));

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let handler = Arc::new(RpcHandler::new(
        users.clone(),
        events.clone(),
        subscriptions.clone(),
        sms.clone(),
        tokens,
        limiter.clone(),
        templates,
        admins,
        id_provider,
        time_provider,
        config_dir.tasks_path(),
    ));
    let rpc_config = RpcServerConfig {
        port: rpc_port,
        ..Default::default()
    };
    let rpc_handle = RpcServer::new(rpc_config, handler)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 6. Start daily reminder job
    info!("Starting reminder scheduler...");
    let reminder_service = Arc::new(ReminderService::new(
        events,
        subscriptions,
        sms,
        config_dir.tasks_path(),
    ));
    let scheduler = ReminderScheduler::new(reminder_service, REMINDER_HOUR);
    tokio::spawn(async move {
        scheduler.run().await;
    });

    // 7. Periodically drop expired rate-limit windows
    {
        let limiter = limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(RATE_LIMIT_SWEEP_SECS));
            loop {
                interval.tick().await;
                limiter.sweep();
            }
        });
    }

    info!("System ready. Waiting for requests...");
    info!("Press Ctrl+C to shutdown");

    // 8. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;

    info!("Shutdown complete.");
    Ok(())
}
