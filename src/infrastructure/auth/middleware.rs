use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::infrastructure::config::Config;

pub const X_USER_ID: &str = "x-user-id";

/// Caller identity injected into request extensions once the allow-list
/// check passes
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Allow-list middleware
pub async fn allowlist_middleware(
    State(config): State<Arc<Config>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = request
        .headers()
        .get(X_USER_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .ok_or_else(|| AppError::Forbidden("Missing or invalid user id".to_string()))?;

    if !config.is_user_allowed(user_id) {
        tracing::warn!(user_id, "Rejected request from user outside the allow-list");
        return Err(AppError::Forbidden(format!("User {} is not allowed", user_id)));
    }

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}
