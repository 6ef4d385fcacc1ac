use std::collections::HashSet;
use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_SALUTE_SCOPE: &str = "SALUTE_SPEECH_PERS";
pub const DEFAULT_SALUTE_TOKEN_URL: &str = "https://ngw.devices.sberbank.ru:9443/api/v2/oauth";
pub const DEFAULT_SALUTE_SYNTH_URL: &str = "https://smartspeech.sber.ru/rest/v1/text:synthesize";
pub const DEFAULT_SALUTE_VOICE: &str = "Nec_24000";
pub const DEFAULT_SALUTE_FORMAT: &str = "wav16";
pub const DEFAULT_SALUTE_TMP_DIR: &str = "tmp";
pub const DEFAULT_SALUTE_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_TOKEN_REFRESH_MARGIN_MS: i64 = 60_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required env var: {0}")]
    Missing(String),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub allowed_user_ids: HashSet<i64>,
    pub preprocessing_enabled: bool,
    pub tts_provider: TtsProvider,
    pub salute: SaluteConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TtsProvider {
    Mock,
    Salute,
    /// Unknown provider name; the factory falls back to the mock
    Unsupported(String),
}

/// SaluteSpeech client settings
#[derive(Clone)]
pub struct SaluteConfig {
    pub auth_key: String,
    pub scope: String,
    pub token_url: String,
    pub synth_url: String,
    pub voice: String,
    pub format: String,
    pub use_ssml: bool,
    pub tmp_dir: PathBuf,
    pub timeout_ms: u64,
    pub token_refresh_margin_ms: i64,
    /// SaluteSpeech certificates are issued by a CA missing from public
    /// trust stores, so verification is off unless asked for
    pub verify_tls: bool,
}

impl Default for SaluteConfig {
    fn default() -> Self {
        Self {
            auth_key: String::new(),
            scope: DEFAULT_SALUTE_SCOPE.to_string(),
            token_url: DEFAULT_SALUTE_TOKEN_URL.to_string(),
            synth_url: DEFAULT_SALUTE_SYNTH_URL.to_string(),
            voice: DEFAULT_SALUTE_VOICE.to_string(),
            format: DEFAULT_SALUTE_FORMAT.to_string(),
            use_ssml: false,
            tmp_dir: PathBuf::from(DEFAULT_SALUTE_TMP_DIR),
            timeout_ms: DEFAULT_SALUTE_TIMEOUT_MS,
            token_refresh_margin_ms: DEFAULT_TOKEN_REFRESH_MARGIN_MS,
            verify_tls: false,
        }
    }
}

impl fmt::Debug for SaluteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaluteConfig")
            .field("auth_key", &"<redacted>")
            .field("scope", &self.scope)
            .field("token_url", &self.token_url)
            .field("synth_url", &self.synth_url)
            .field("voice", &self.voice)
            .field("format", &self.format)
            .field("use_ssml", &self.use_ssml)
            .field("tmp_dir", &self.tmp_dir)
            .field("timeout_ms", &self.timeout_ms)
            .field("token_refresh_margin_ms", &self.token_refresh_margin_ms)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = EnvReader { lookup };

        let port = vars.optional("PORT", "8080");
        let port = port.parse().map_err(|_| ConfigError::Invalid {
            key: "PORT".to_string(),
            message: format!("'{}' is not a port number", port),
        })?;

        let tts_provider = match vars.optional("TTS_PROVIDER", "mock").to_lowercase().as_str() {
            "mock" => TtsProvider::Mock,
            "salute" => TtsProvider::Salute,
            other => TtsProvider::Unsupported(other.to_string()),
        };

        let auth_key = if tts_provider == TtsProvider::Salute {
            vars.required("SALUTE_AUTH_KEY")?
        } else {
            vars.optional("SALUTE_AUTH_KEY", "")
        };

        let salute = SaluteConfig {
            auth_key,
            scope: vars.optional("SALUTE_SCOPE", DEFAULT_SALUTE_SCOPE),
            token_url: vars.optional("SALUTE_TOKEN_URL", DEFAULT_SALUTE_TOKEN_URL),
            synth_url: vars.optional("SALUTE_SYNTH_URL", DEFAULT_SALUTE_SYNTH_URL),
            voice: vars.optional("SALUTE_VOICE", DEFAULT_SALUTE_VOICE),
            format: vars.optional("SALUTE_FORMAT", DEFAULT_SALUTE_FORMAT),
            use_ssml: vars.flag("SALUTE_USE_SSML", false),
            tmp_dir: PathBuf::from(vars.optional("SALUTE_TMP_DIR", DEFAULT_SALUTE_TMP_DIR)),
            timeout_ms: vars.number("SALUTE_TIMEOUT_MS", DEFAULT_SALUTE_TIMEOUT_MS),
            token_refresh_margin_ms: vars
                .number("SALUTE_TOKEN_REFRESH_MARGIN_MS", DEFAULT_TOKEN_REFRESH_MARGIN_MS),
            verify_tls: vars.flag("SALUTE_VERIFY_TLS", false),
        };

        let config = Config {
            host: vars.optional("HOST", "0.0.0.0"),
            port,
            log_format: match vars.optional("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            allowed_user_ids: parse_allowed_user_ids(&vars.required("ALLOWED_USER_IDS")?),
            preprocessing_enabled: vars.flag("PREPROCESSING_ENABLED", false),
            tts_provider,
            salute,
        };

        Ok(config)
    }

    pub fn is_user_allowed(&self, user_id: i64) -> bool {
        self.allowed_user_ids.contains(&user_id)
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    fn optional(&self, key: &str, fallback: &str) -> String {
        self.get(key).unwrap_or_else(|| fallback.to_string())
    }

    /// Unparseable numbers fall back to the default
    fn number<T: std::str::FromStr>(&self, key: &str, fallback: T) -> T {
        self.get(key)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(fallback)
    }

    fn flag(&self, key: &str, fallback: bool) -> bool {
        match self.get(key) {
            Some(value) => value.to_lowercase() == "true" || value == "1",
            None => fallback,
        }
    }
}

/// Comma separated ids; entries that are not integers are skipped
fn parse_allowed_user_ids(raw: &str) -> HashSet<i64> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter_map(|item| item.parse().ok())
        .collect()
}
