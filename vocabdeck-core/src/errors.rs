use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("invalid input: {0}")]
    Invalid(&'static str),
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("storage error: {0}")]
    Storage(&'static str),
}

/// Failures from the external generation collaborator. The core never
/// retries these; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("empty response")]
    Empty,
}
