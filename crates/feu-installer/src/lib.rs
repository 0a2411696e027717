//! Package installation for feu
//!
//! This crate renders pip/pipx/uv install commands from resolved
//! dependencies, runs them through a `CommandRunner` and probes a Python
//! interpreter for installed packages.

pub mod available;
pub mod command;
pub mod installer;
pub mod interpreter;
pub mod runner;

// Re-export main types
pub use available::{available_installers, is_pip_available, is_pipx_available, is_uv_available};
pub use command::{generate, InstallerKind};
pub use installer::{install_package_closest_version, InstallerRegistry, InstallerSpec, PackageInstaller};
pub use interpreter::PythonInterpreter;
pub use runner::{CommandRunner, DryRunRunner, ShellRunner};

use feu_core::error::FeuError;

/// Result type for installer operations
pub type InstallerResult<T> = Result<T, FeuError>;
