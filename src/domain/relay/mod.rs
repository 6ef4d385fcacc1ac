pub mod error;
pub mod service;

pub use error::RelayError;
pub use service::{RelayRequest, RelayResult, RelayService, RelayServiceApi, START_GREETING};
