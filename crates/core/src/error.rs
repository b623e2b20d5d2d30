//! Error types for the DCL domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each stage of the pipeline has its own error type; [`Error`] aggregates them.
//!
//! Duplicate module ids and alias names are deliberately absent here: they are
//! resolved by first-wins registration and reported as a status, not an error.

use thiserror::Error;

/// The top-level error type for all DCL operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Parse errors ---
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    // --- Load-time integrity errors ---
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    // --- Generation service errors ---
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed instruction text. No partial instruction is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected {found} at position {position}: expected {expected}")]
pub struct SyntaxError {
    /// Byte offset of the offending token in the instruction text.
    pub position: usize,
    /// Human-readable description of the offending token.
    pub found: String,
    /// What the grammar allowed at this point.
    pub expected: String,
}

impl SyntaxError {
    pub fn new(position: usize, found: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            position,
            found: found.into(),
            expected: expected.into(),
        }
    }
}

/// Fatal registry integrity failure detected after all bundles are loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("alias '{alias}' points to missing target '{target}'")]
    InvalidAlias { alias: String, target: String },
}

/// Failures reported by a generation service adapter.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by generation service")]
    RateLimited,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Adapter not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_names_position_and_token() {
        let err = SyntaxError::new(14, "identifier 'HERE'", "FROM, USING, OPTIMIZING_FOR or end of input");
        let msg = err.to_string();
        assert!(msg.contains("14"));
        assert!(msg.contains("HERE"));
    }

    #[test]
    fn invalid_alias_names_alias_and_target() {
        let err = Error::Configuration(ConfigurationError::InvalidAlias {
            alias: "Bad".into(),
            target: "non_existent".into(),
        });
        assert!(err.to_string().contains("'Bad'"));
        assert!(err.to_string().contains("non_existent"));
    }

    #[test]
    fn adapter_error_displays_status() {
        let err = Error::Adapter(AdapterError::ApiError {
            status_code: 500,
            message: "upstream exploded".into(),
        });
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("upstream exploded"));
    }
}
