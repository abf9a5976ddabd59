//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config file, image file).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (unknown user or wrong password).
    pub const AUTH_FAILED: i32 = 5;

    /// Schema check failed.
    pub const CHECK_FAILED: i32 = 6;
}

/// Environment variable holding the account password.
pub const PASSWORD_ENV: &str = "MINDSCAN_PASSWORD";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "MINDSCAN_CONFIG";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "MINDSCAN_LOG";
