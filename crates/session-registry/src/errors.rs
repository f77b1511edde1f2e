use thiserror::Error;

/// Errors returned by session registry operations.
///
/// Both variants are recoverable caller errors; a failed operation never
/// leaves a session record partially mutated.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Operation addressed a channel with no live session.
    #[error("No live session for channel: {0}")]
    SessionNotFound(String),

    /// A required request field was missing or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RegistryError {
    /// Stable machine-readable error code, independent of any transport's
    /// status-code convention.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::SessionNotFound(_) => "NOT_FOUND",
            RegistryError::InvalidInput(_) => "INVALID_INPUT",
        }
    }
}
