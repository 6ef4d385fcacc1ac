/// One text to voice, as handed to a TTS repository
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    /// Correlation id threaded through logs and provider calls
    pub request_id: String,
    pub chat_id: i64,
    pub message_id: i64,
}
