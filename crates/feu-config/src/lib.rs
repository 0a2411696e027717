//! Configuration parsing for feu
//!
//! This crate parses `feu.toml` files, layers the global file, the project
//! file, `FEU_*` environment variables and CLI flags, and applies configured
//! constraints and resolvers onto the built-in registries.

pub mod merge;
pub mod toml;

// Re-export main types
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource};
pub use toml::{ConstraintSection, FeuToml, InstallerSection, PythonSection, ResolverSection};

use feu_core::error::FeuError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, FeuError>;

/// Project configuration file name
pub const CONFIG_FILE_NAME: &str = "feu.toml";
