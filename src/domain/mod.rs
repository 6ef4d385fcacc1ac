pub mod message;
pub mod preprocessing;
pub mod relay;
pub mod tts;
