//! Error types for lanewise
//!
//! Vector operations are total and never fail; these errors come from the
//! slice-checked entry points around them.

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Target name that no backend answers to
    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    /// Target that exists but was not compiled into this build
    #[error("Target not available: {0}")]
    TargetNotAvailable(String),

    /// Diagnostics serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for an unrecognized target name
    pub fn unknown_target(name: &str) -> Self {
        Self::UnknownTarget(format!("'{name}' (expected scalar, emu128 or sse2)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("slice too short".to_string());
        assert_eq!(err.to_string(), "Invalid input: slice too short");

        let err = Error::TargetNotAvailable("sse2".to_string());
        assert_eq!(err.to_string(), "Target not available: sse2");
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::size_mismatch(16, 3, "mask bits");
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in mask bits: expected 16, got 3"
        );

        let err = Error::unknown_target("neon");
        assert_eq!(
            err.to_string(),
            "Unknown target: 'neon' (expected scalar, emu128 or sse2)"
        );
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
