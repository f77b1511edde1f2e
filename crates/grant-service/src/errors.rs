use thiserror::Error;

/// Errors returned by grant issuance.
///
/// Verification failures are not errors; they are reported through
/// [`crate::models::Verdict`] so callers can distinguish an expired grant
/// from a forged one without unwinding.
#[derive(Debug, Error)]
pub enum GrantError {
    /// A required request field was missing or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The signing secret was unavailable or unusable. This is fatal to the
    /// issue call, not to the process.
    #[error("Signing failure: {0}")]
    SigningFailure(String),
}

impl GrantError {
    /// Stable machine-readable error code, independent of any transport's
    /// status-code convention.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            GrantError::InvalidInput(_) => "INVALID_INPUT",
            GrantError::SigningFailure(_) => "SIGNING_FAILURE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            GrantError::InvalidInput("missing".to_string()).code(),
            "INVALID_INPUT"
        );
        assert_eq!(
            GrantError::SigningFailure("no secret".to_string()).code(),
            "SIGNING_FAILURE"
        );
    }

    #[test]
    fn test_error_display_includes_reason() {
        let err = GrantError::InvalidInput("channel_name is required".to_string());
        assert_eq!(err.to_string(), "Invalid input: channel_name is required");
    }
}
