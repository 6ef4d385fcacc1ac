use super::tts_repository::TtsRepository;
use crate::domain::tts::format::file_extension;
use crate::domain::tts::{
    merge_chunks, split_text, SynthesisRequest, TtsError, SALUTE_MAX_CHUNK_SIZE,
};
use crate::infrastructure::clock::Clock;
use crate::infrastructure::config::{ConfigError, SaluteConfig};
use crate::infrastructure::salute::{
    redact_headers, truncate, SaluteTokenManager, MAX_LOGGED_BODY, SERVICE,
};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Build the HTTP client shared by token and synthesis calls, so a single
/// timeout bounds both
pub fn build_http_client(config: &SaluteConfig) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .danger_accept_invalid_certs(!config.verify_tls)
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}

/// SaluteSpeech implementation of TTS repository
pub struct SaluteTtsRepository {
    http_client: reqwest::Client,
    token_manager: Arc<SaluteTokenManager>,
    config: SaluteConfig,
}

impl SaluteTtsRepository {
    pub fn new(config: SaluteConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        let http_client = build_http_client(&config)?;
        let token_manager = Arc::new(SaluteTokenManager::new(
            http_client.clone(),
            &config,
            clock,
        ));
        Ok(Self::with_token_manager(http_client, token_manager, config))
    }

    fn with_token_manager(
        http_client: reqwest::Client,
        token_manager: Arc<SaluteTokenManager>,
        config: SaluteConfig,
    ) -> Self {
        Self {
            http_client,
            token_manager,
            config,
        }
    }

    async fn output_path(&self, request: &SynthesisRequest) -> Result<PathBuf, TtsError> {
        tokio::fs::create_dir_all(&self.config.tmp_dir).await?;
        let dir = tokio::fs::canonicalize(&self.config.tmp_dir).await?;
        Ok(dir.join(format!(
            "{}_{}.{}",
            request.chat_id,
            request.message_id,
            file_extension(&self.config.format)
        )))
    }

    /// Synthesize one chunk. An unauthorized response gets a single retry
    /// with a freshly issued token; every other failure is returned as is.
    async fn synthesize_chunk(
        &self,
        token: &mut String,
        chunk: &str,
        chunk_index: usize,
        request_id: &str,
    ) -> Result<Vec<u8>, TtsError> {
        let first_attempt = self
            .request_synthesis(token, chunk, chunk_index, request_id)
            .await;

        match first_attempt {
            Err(err) if err.is_unauthorized() => {
                tracing::warn!(
                    request_id = %request_id,
                    service = SERVICE,
                    chunk_index,
                    "SaluteSpeech rejected the token, re-authenticating once"
                );
                self.token_manager.invalidate().await;
                *token = self.token_manager.ensure_token(request_id).await?;
                self.request_synthesis(token, chunk, chunk_index, request_id)
                    .await
            }
            result => result,
        }
    }

    async fn request_synthesis(
        &self,
        token: &str,
        chunk: &str,
        chunk_index: usize,
        request_id: &str,
    ) -> Result<Vec<u8>, TtsError> {
        let content_type = if self.config.use_ssml {
            "application/ssml"
        } else {
            "application/text"
        };

        let request = self
            .http_client
            .post(&self.config.synth_url)
            .query(&[
                ("format", self.config.format.as_str()),
                ("voice", self.config.voice.as_str()),
            ])
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(CONTENT_TYPE, content_type)
            .body(chunk.to_string())
            .build()
            .map_err(|e| TtsError::Synthesis {
                status: None,
                url: self.config.synth_url.clone(),
                detail: format!("invalid synthesis request: {}", e),
            })?;
        let url = request.url().to_string();

        tracing::info!(
            request_id = %request_id,
            service = SERVICE,
            chunk_index,
            chunk_length = chunk.chars().count(),
            url = %url,
            headers = %redact_headers(request.headers()),
            "SaluteSpeech synthesis request"
        );

        let response = self.http_client.execute(request).await.map_err(|e| {
            tracing::error!(
                request_id = %request_id,
                service = SERVICE,
                status = "error",
                chunk_index,
                url = %url,
                error = %e,
                "SaluteSpeech synthesis request failed"
            );
            TtsError::Synthesis {
                status: None,
                url: url.clone(),
                detail: e.to_string(),
            }
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
                chunk_index,
                url = %url,
                http_status = status.as_u16(),
                response_body = %body,
                "SaluteSpeech synthesis rejected"
            );
            return Err(TtsError::Synthesis {
                status: Some(status.as_u16()),
                url,
                detail: body,
            });
        }

        let audio = response.bytes().await.map_err(|e| TtsError::Synthesis {
            status: Some(status.as_u16()),
            url: url.clone(),
            detail: format!("failed to read audio body: {}", e),
        })?;

        tracing::debug!(
            request_id = %request_id,
            service = SERVICE,
            chunk_index,
            audio_size = audio.len(),
            "SaluteSpeech chunk synthesized"
        );

        Ok(audio.to_vec())
    }
}

#[async_trait]
impl TtsRepository for SaluteTtsRepository {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<PathBuf, TtsError> {
        let start_time = std::time::Instant::now();
        let request_id = request.request_id.as_str();

        let mut token = self.token_manager.ensure_token(request_id).await?;
        let output_path = self.output_path(request).await?;

        let chunks = split_text(&request.text, SALUTE_MAX_CHUNK_SIZE);
        let characters_count = request.text.chars().count();
        tracing::info!(
            request_id = %request_id,
            service = SERVICE,
            chunk_count = chunks.len(),
            text_length = characters_count,
            "Text split into chunks"
        );

        let mut chunk_audio = Vec::with_capacity(chunks.len());
        for (chunk_index, chunk) in chunks.iter().enumerate() {
            let audio = self
                .synthesize_chunk(&mut token, chunk, chunk_index, request_id)
                .await?;
            chunk_audio.push(audio);
        }

        let merged_audio = merge_chunks(&self.config.format, chunk_audio)?;
        if !merged_audio.framing_intact {
            tracing::warn!(
                request_id = %request_id,
                service = SERVICE,
                format = %self.config.format,
                chunk_count = chunks.len(),
                "Concatenated chunks of a framed audio format, playback may break between chunks"
            );
        }

        tokio::fs::write(&output_path, &merged_audio.bytes).await?;

        let duration = start_time.elapsed();
        let throughput_chars_per_sec = if duration.as_secs_f64() > 0.0 {
            characters_count as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        tracing::info!(
            request_id = %request_id,
            provider = SERVICE,
            status = "ok",
            latency_ms = duration.as_millis(),
            characters_count,
            chunk_count = chunks.len(),
            audio_size_bytes = merged_audio.bytes.len(),
            throughput_chars_per_sec = format!("{:.2}", throughput_chars_per_sec),
            path = %output_path.display(),
            "TTS synthesis completed"
        );

        Ok(output_path)
    }

    fn provider_name(&self) -> &'static str {
        SERVICE
    }
}
