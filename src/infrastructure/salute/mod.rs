pub mod token;

pub use token::SaluteTokenManager;

use reqwest::header::{HeaderMap, AUTHORIZATION};

/// Value of the `service` field on every SaluteSpeech log line
pub const SERVICE: &str = "salute";

/// Longest response body kept in logs and error messages
pub const MAX_LOGGED_BODY: usize = 2000;

const REDACTED: &str = "<redacted>";

/// Render request headers for logging with credentials hidden
pub fn redact_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if *name == AUTHORIZATION {
                REDACTED
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            format!("{}={}", name, value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cut a string to `max_chars` characters, marking the cut
pub fn truncate(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((offset, _)) => format!("{}...<truncated>", &value[..offset]),
        None => value.to_string(),
    }
}
