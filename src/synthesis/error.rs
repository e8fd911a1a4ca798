use thiserror::Error;

#[derive(Debug, Error)]
/// Text generation errors.
pub enum GenerationError {
    /// Provider call failed.
    #[error("generation provider error: {0}")]
    Provider(String),

    /// Provider answered without any text.
    #[error("generation provider returned no text")]
    EmptyResponse,
}

/// Convenience result type for generation.
pub type GenerationResult<T> = Result<T, GenerationError>;
