//! CLI-specific error types and mappings.
//!
//! Maps core, path and audio errors to exit codes and user-facing messages.

use tensu_core::{CoreError, PathError, RepositoryError};
use tensu_voice::VoiceError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Core domain error.
    #[error("{0}")]
    Core(String),

    /// Argument or input error (unknown score, bad settings value).
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error (data directory, base URL).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings file or clip cache could not be used.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Audio output could not be started.
    #[error("Audio error: {0}")]
    Audio(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Storage(_) => 73,  // EX_CANTCREAT
            Self::Audio(_) => 69,    // EX_UNAVAILABLE
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Repository(repo_err) => repo_err.into(),
            CoreError::Settings(settings_err) => Self::Arguments(settings_err.to_string()),
            CoreError::UnknownScore(id) => Self::Arguments(format!("unknown score '{id}'")),
            CoreError::Validation(msg) => Self::Arguments(msg),
        }
    }
}

impl From<RepositoryError> for CliError {
    fn from(err: RepositoryError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<VoiceError> for CliError {
    fn from(err: VoiceError) -> Self {
        Self::Audio(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_score_is_a_usage_error() {
        let err = CliError::from(CoreError::UnknownScore("9-90".into()));
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("9-90"));
    }

    #[test]
    fn repository_errors_map_to_storage() {
        let err = CliError::from(CoreError::Repository(RepositoryError::Storage(
            "read-only filesystem".into(),
        )));
        assert!(matches!(err, CliError::Storage(_)));
        assert_eq!(err.exit_code(), 73);
    }

    #[test]
    fn path_errors_are_config_errors() {
        assert_eq!(CliError::from(PathError::NoDataDir).exit_code(), 78);
    }
}
