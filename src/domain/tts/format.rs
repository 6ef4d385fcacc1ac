/// File extension for a SaluteSpeech format string such as `wav16` or `opus`
pub fn file_extension(format: &str) -> String {
    let normalized = format.to_lowercase();
    for known in ["wav", "opus", "pcm"] {
        if normalized.starts_with(known) {
            return known.to_string();
        }
    }
    normalized
}

/// MIME type served for a produced audio file
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension {
        "wav" => "audio/wav",
        "opus" => "audio/ogg",
        "pcm" => "audio/pcm",
        _ => "application/octet-stream",
    }
}

/// Whether byte-concatenating independently synthesized pieces yields a
/// playable stream. Only headerless raw PCM does: every wav piece carries
/// its own RIFF header and opus pieces are separate ogg streams.
pub fn concatenates_cleanly(format: &str) -> bool {
    file_extension(format) == "pcm"
}
