use anyhow::Result;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use voice_relay::{
    controllers::voice::VoiceController,
    domain::relay::RelayService,
    infrastructure::{
        config::{Config, LogFormat, SaluteConfig, TtsProvider},
        http::build_router,
        repositories::create_tts_repository,
    },
};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};


use api_client::TestClient;

/// User id present in the allow-list of every test context
pub const ALLOWED_USER_ID: i64 = 100;

pub struct TestContext {
    pub client: TestClient,
    pub salute: MockServer,
    pub tmp_dir: TempDir,
    #[allow(dead_code)]
    pub config: Config,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        Self::with_options(TtsProvider::Salute, false).await
    }

    pub async fn with_options(tts_provider: TtsProvider, preprocessing_enabled: bool) -> Result<Self> {
        let salute = MockServer::start().await;
        let tmp_dir = TempDir::new()?;

        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0, // Will be assigned by the OS
            log_format: LogFormat::Pretty,
            allowed_user_ids: HashSet::from([ALLOWED_USER_ID]),
            preprocessing_enabled,
            tts_provider,
            salute: SaluteConfig {
                auth_key: "dGVzdC1hdXRoLWtleQ==".to_string(),
                token_url: format!("{}/api/v2/oauth", salute.uri()),
                synth_url: format!("{}/rest/v1/text:synthesize", salute.uri()),
                tmp_dir: tmp_dir.path().join("audio"),
                timeout_ms: 5_000,
                ..SaluteConfig::default()
            },
        };

        let config_arc = Arc::new(config.clone());
        let tts_repo = create_tts_repository(&config_arc)?;
        let tts_provider = tts_repo.provider_name();
        let relay_service = Arc::new(RelayService::new(tts_repo, config.preprocessing_enabled));
        let voice_controller = Arc::new(VoiceController::new(relay_service));
        let app = build_router(config_arc, voice_controller, tts_provider);

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self {
            client: TestClient::new(&base_url),
            salute,
            tmp_dir,
            config,
        })
    }

    /// Token endpoint answering with `token`, valid for 30 minutes
    pub async fn mount_token(&self, token: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v2/oauth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": token,
                "expires_in": 1800,
            })))
            .mount(&self.salute)
            .await;
    }

    /// Synthesis endpoint answering every call with `audio`
    pub async fn mount_synthesis(&self, audio: &[u8]) {
        Mock::given(method("POST"))
            .and(path("/rest/v1/text:synthesize"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(audio.to_vec()))
            .mount(&self.salute)
            .await;
    }

    /// Mono 16 bit wav at 24 kHz, the shape SaluteSpeech returns for `wav16`
    pub fn wav_audio(samples: &[i16]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 24000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut output = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut output, spec).unwrap();
            for &sample in samples {
                writer.write_sample(sample).unwrap();
            }
            writer.finalize().unwrap();
        }
        output.into_inner()
    }

    /// Files left behind in the audio directory
    pub fn leftover_audio_files(&self) -> usize {
        std::fs::read_dir(self.tmp_dir.path().join("audio"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}
