//! Error types and result aliases for feu operations.
//!
//! Provides a unified error type that covers all possible error conditions
//! across the feu crates with actionable error messages.

use thiserror::Error;

/// Unified error type for all feu operations
#[derive(Error, Debug)]
pub enum FeuError {
    // Version errors
    #[error("Invalid version: '{input}'")]
    InvalidVersion { input: String },

    #[error("Invalid version specifier: '{input}'")]
    InvalidSpecifier { input: String },

    // Registry errors
    #[error("{kind} for '{key}' is already registered")]
    DuplicateConfig { kind: String, key: String },

    // Installer errors
    #[error(
        "'{package}' package is required but not installed. You can install '{package}' package with the command:\n\npip install {install_hint}\n"
    )]
    MissingDependency {
        package: String,
        install_hint: String,
    },

    #[error("Command '{command}' failed with {status}")]
    CommandExecution { command: String, status: String },

    #[error("Unknown installer '{name}'")]
    UnknownInstaller { name: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Config errors
    #[error("Failed to parse feu.toml: {message}")]
    TomlParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for feu operations
pub type FeuResult<T> = Result<T, FeuError>;

impl FeuError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create an invalid version error for the given input
    pub fn invalid_version(input: &str) -> Self {
        Self::InvalidVersion {
            input: input.to_string(),
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FeuError::Network { .. } | FeuError::Io { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            FeuError::InvalidVersion { .. } => {
                Some("Use a PEP 440 version such as '1.2.3', '2.0.0rc1' or '1!1.0.post2'")
            },
            FeuError::DuplicateConfig { .. } => {
                Some("Pass overwrite=true to replace the existing registration")
            },
            FeuError::UnknownInstaller { .. } => Some("Supported installers are: pip, pipx, uv"),
            FeuError::CommandExecution { .. } => {
                Some("Re-run the printed command manually to inspect the installer output")
            },
            FeuError::Network { .. } => Some("Check your internet connection and try again"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_message() {
        let err = FeuError::MissingDependency {
            package: "requests".to_string(),
            install_hint: "requests".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'requests' package is required but not installed. You can install 'requests' \
             package with the command:\n\npip install requests\n"
        );
    }

    #[test]
    fn test_recoverable_errors() {
        let io = FeuError::io(
            "read failed".to_string(),
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        );
        assert!(io.is_recoverable());
        assert!(!FeuError::invalid_version("abc").is_recoverable());
    }

    #[test]
    fn test_suggestions() {
        assert!(FeuError::invalid_version("abc").suggestion().is_some());
        assert!(FeuError::InvalidArgument {
            message: "n must be >= 1 but receive 0".to_string()
        }
        .suggestion()
        .is_none());
    }
}
