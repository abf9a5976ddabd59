//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes; anything else surfaces through
//! `anyhow` with exit code 1.

use std::fmt;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, image file)
    NotFound { message: String, hint: String },

    /// Authentication failed
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// Schema check failed
    CheckFailed(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::CheckFailed(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::CheckFailed(_) => exit_codes::CHECK_FAILED,
        }
    }
}

/// Exit code for an error returned from a command handler.
///
/// Core input-validation errors count as invalid input.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    if let Some(mindscan_core::MindscanError::InvalidInput(_)) =
        err.downcast_ref::<mindscan_core::MindscanError>()
    {
        return exit_codes::INVALID_INPUT;
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let not_found: anyhow::Error = CliError::not_found("missing", "Hint: look").into();
        assert_eq!(exit_code_for(&not_found), exit_codes::NOT_FOUND);

        let auth: anyhow::Error = CliError::auth_failed_with_hint("nope", "Hint: retry").into();
        assert_eq!(exit_code_for(&auth), exit_codes::AUTH_FAILED);

        let core: anyhow::Error =
            mindscan_core::MindscanError::InvalidInput("too short".to_string()).into();
        assert_eq!(exit_code_for(&core), exit_codes::INVALID_INPUT);

        let other = anyhow::anyhow!("boom");
        assert_eq!(exit_code_for(&other), 1);
    }

    #[test]
    fn test_display_includes_hint() {
        let err = CliError::not_found("Config not found", "Hint: create it");
        assert_eq!(err.to_string(), "Config not found\nHint: create it");
    }
}
