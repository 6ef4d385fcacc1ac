pub mod error;
pub mod extractor;
pub mod model;

pub use error::MessageError;
pub use extractor::extract_text;
pub use model::{ForwardOrigin, ForwardedChat, ForwardedUser, InboundMessage};
