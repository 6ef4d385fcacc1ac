use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice_relay::controllers::voice::VoiceController;
use voice_relay::domain::relay::RelayService;
use voice_relay::infrastructure::config::{Config, LogFormat};
use voice_relay::infrastructure::http::{build_router, start_http_server};
use voice_relay::infrastructure::repositories::create_tts_repository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("invalid configuration")?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Voice Relay on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        tts_provider = ?config.tts_provider,
        allowed_users = config.allowed_user_ids.len(),
        preprocessing_enabled = config.preprocessing_enabled,
        salute = ?config.salute,
        "Configuration loaded"
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. TTS provider
    let tts_repo = create_tts_repository(&config).context("failed to create TTS provider")?;
    let tts_provider = tts_repo.provider_name();

    // 2. Services
    let relay_service = Arc::new(RelayService::new(tts_repo, config.preprocessing_enabled));

    // 3. Controllers
    let voice_controller = Arc::new(VoiceController::new(relay_service));

    let app = build_router(config.clone(), voice_controller, tts_provider);
    start_http_server(config, app).await
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "voice_relay=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
