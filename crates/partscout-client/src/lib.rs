pub mod client;
pub mod error;
mod rate_limit;
pub mod sse;
pub mod types;

pub use client::{HttpSearchSource, PartsClient};
pub use error::ClientError;
pub use sse::{SseDecoder, SseFrame};
pub use types::{AuthSession, Credentials};
