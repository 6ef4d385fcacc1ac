pub mod audio;
pub mod chunking;
pub mod dto;
pub mod error;
pub mod format;

pub use audio::{merge_chunks, MergedAudio};
pub use chunking::{split_text, SALUTE_MAX_CHUNK_SIZE};
pub use dto::SynthesisRequest;
pub use error::TtsError;
