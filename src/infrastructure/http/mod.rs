use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{
    controllers::{health, voice::VoiceController},
    infrastructure::{
        auth::{allowlist_middleware, request_id_middleware},
        config::Config,
    },
};

/// Assemble the application routes
pub fn build_router(
    config: Arc<Config>,
    voice_controller: Arc<VoiceController>,
    tts_provider: &'static str,
) -> Router {
    // Voice routes (allow-listed users only)
    let voice_routes = Router::new()
        .route("/api/messages/voice", post(VoiceController::synthesize))
        .route("/api/start", post(VoiceController::start))
        .with_state(voice_controller)
        .layer(middleware::from_fn_with_state(
            config.clone(),
            allowlist_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(tts_provider)
        .merge(voice_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(config: Arc<Config>, app: Router) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
