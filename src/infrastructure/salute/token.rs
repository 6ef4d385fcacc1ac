use super::{redact_headers, truncate, MAX_LOGGED_BODY, SERVICE};
use crate::domain::tts::TtsError;
use crate::infrastructure::clock::Clock;
use crate::infrastructure::config::SaluteConfig;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Lifetime assumed when the token endpoint reports no expiry
const FALLBACK_TOKEN_TTL_MS: i64 = 25 * 60 * 1000;

#[derive(Debug, Deserialize)]
struct SaluteTokenResponse {
    access_token: Option<String>,
    /// Absolute expiry, epoch milliseconds
    expires_at: Option<f64>,
    /// Relative expiry, seconds
    expires_in: Option<f64>,
}

#[derive(Clone)]
struct Credential {
    token: String,
    expires_at_ms: Option<i64>,
}

/// Holds the SaluteSpeech bearer token and refreshes it before it expires.
///
/// The credential lock is held for the whole refresh, so callers that find
/// an expiring token queue behind a single token request.
pub struct SaluteTokenManager {
    http_client: reqwest::Client,
    token_url: String,
    auth_key: String,
    scope: String,
    refresh_margin_ms: i64,
    clock: Arc<dyn Clock>,
    credential: Mutex<Option<Credential>>,
}

impl fmt::Debug for SaluteTokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaluteTokenManager")
            .field("token_url", &self.token_url)
            .field("scope", &self.scope)
            .field("auth_key", &"<redacted>")
            .field("refresh_margin_ms", &self.refresh_margin_ms)
            .finish()
    }
}

impl SaluteTokenManager {
    pub fn new(http_client: reqwest::Client, config: &SaluteConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            http_client,
            token_url: config.token_url.clone(),
            auth_key: config.auth_key.clone(),
            scope: config.scope.clone(),
            refresh_margin_ms: config.token_refresh_margin_ms,
            clock,
            credential: Mutex::new(None),
        }
    }

    /// Return a token that stays valid for at least the refresh margin,
    /// requesting a new one when needed
    pub async fn ensure_token(&self, request_id: &str) -> Result<String, TtsError> {
        let mut credential = self.credential.lock().await;

        if let Some(cached) = credential.as_ref() {
            if !self.is_expiring_soon(cached) {
                return Ok(cached.token.clone());
            }
        }

        let response = self.request_token(request_id).await?;
        let token = response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                tracing::error!(
                    request_id = %request_id,
                    service = SERVICE,
                    status = "error",
                    "SaluteSpeech token response missing access_token"
                );
                TtsError::Authentication("token response missing access_token".to_string())
            })?;
        let expires_at_ms = self.resolve_expiry(response.expires_at, response.expires_in);

        tracing::info!(
            request_id = %request_id,
            service = SERVICE,
            expires_in_ms = expires_at_ms.saturating_sub(self.clock.now_ms()),
            "SaluteSpeech token refreshed"
        );

        *credential = Some(Credential {
            token: token.clone(),
            expires_at_ms: Some(expires_at_ms),
        });

        Ok(token)
    }

    /// Drop the cached token so the next `ensure_token` authenticates again
    pub async fn invalidate(&self) {
        *self.credential.lock().await = None;
    }

    fn is_expiring_soon(&self, credential: &Credential) -> bool {
        match credential.expires_at_ms {
            Some(expires_at_ms) => {
                expires_at_ms.saturating_sub(self.clock.now_ms()) <= self.refresh_margin_ms
            }
            None => true,
        }
    }

    /// Float to int casts saturate, so out-of-range values from the provider
    /// clamp to `i64::MIN`/`i64::MAX` and the arithmetic saturates with them
    fn resolve_expiry(&self, expires_at: Option<f64>, expires_in: Option<f64>) -> i64 {
        if let Some(expires_at) = expires_at {
            return expires_at as i64;
        }
        let now = self.clock.now_ms();
        match expires_in {
            Some(seconds) => now.saturating_add((seconds * 1000.0) as i64),
            None => now.saturating_add(FALLBACK_TOKEN_TTL_MS),
        }
    }

    async fn request_token(&self, request_id: &str) -> Result<SaluteTokenResponse, TtsError> {
        let request = self
            .http_client
            .post(&self.token_url)
            .header(AUTHORIZATION, format!("Basic {}", self.auth_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json")
            .header("RqUID", Uuid::new_v4().to_string())
            .body(format!("scope={}", urlencoding::encode(&self.scope)))
            .build()
            .map_err(|e| TtsError::Authentication(format!("invalid token request: {}", e)))?;

        tracing::info!(
            request_id = %request_id,
            service = SERVICE,
            url = %self.token_url,
            scope = %self.scope,
            headers = %redact_headers(request.headers()),
            "SaluteSpeech token request"
        );

        let response = self.http_client.execute(request).await.map_err(|e| {
            tracing::error!(
                request_id = %request_id,
                service = SERVICE,
                status = "error",
                url = %self.token_url,
                error = %e,
                "SaluteSpeech token request failed"
            );
            TtsError::Authentication(format!("token request to {} failed: {}", self.token_url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            let body = truncate(&body, MAX_LOGGED_BODY);
            tracing::error!(
                request_id = %request_id,
                service = SERVICE,
                status = "error",
                url = %self.token_url,
                http_status = status.as_u16(),
                response_body = %body,
                "SaluteSpeech token request rejected"
            );
            return Err(TtsError::Authentication(format!(
                "token endpoint {} returned {}: {}",
                self.token_url,
                status.as_u16(),
                body
            )));
        }

        response.json::<SaluteTokenResponse>().await.map_err(|e| {
            tracing::error!(
                request_id = %request_id,
                service = SERVICE,
                status = "error",
                error = %e,
                "SaluteSpeech token response is not valid JSON"
            );
            TtsError::Authentication(format!("malformed token response: {}", e))
        })
    }
}
