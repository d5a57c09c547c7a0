use thiserror::Error;

/// Error type returned by a [`crate::SearchSource`] that could not open a stream.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("search term is empty")]
    EmptyQuery,

    #[error("failed to open search stream: {0}")]
    Open(#[source] SourceError),
}
