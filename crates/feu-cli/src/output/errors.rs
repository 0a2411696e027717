//! Error message formatting with actionable suggestions.

use super::colors::ColorSupport;
use feu_core::error::FeuError;
use std::error::Error;

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    /// Create a new error formatter
    pub fn new() -> Self {
        Self {
            colors: ColorSupport::detect(),
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            colors: ColorSupport::disabled(),
        }
    }

    /// Format an error with its suggestion and source chain
    pub fn format_error(&self, error: &FeuError) -> String {
        let mut output = String::new();

        output.push_str(&self.colors.red("error"));
        output.push_str(": ");
        output.push_str(&error.to_string());
        output.push('\n');

        if let Some(suggestion) = error.suggestion() {
            output.push('\n');
            output.push_str(&self.colors.dim("help"));
            output.push_str(": ");
            output.push_str(suggestion);
            output.push('\n');
        }

        let mut source = error.source();
        while let Some(err) = source {
            output.push('\n');
            output.push_str(&self.colors.dim("caused by"));
            output.push_str(": ");
            output.push_str(&err.to_string());
            source = err.source();
        }

        output
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_with_suggestion() {
        let formatted = ErrorFormatter::plain().format_error(&FeuError::UnknownInstaller {
            name: "conda".to_string(),
        });
        assert!(formatted.starts_with("error: "));
        assert!(formatted.contains("conda"));
        assert!(formatted.contains("help: Supported installers are: pip, pipx, uv"));
    }

    #[test]
    fn test_format_error_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let formatted = ErrorFormatter::plain().format_error(&FeuError::io("Failed to read feu.toml".to_string(), io));
        assert!(formatted.contains("caused by: no such file"));
    }
}
