//! Install command rendering for the supported installers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use feu_core::error::FeuError;
use feu_core::PackageDependency;

/// Supported package installers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallerKind {
    Pip,
    Pipx,
    Uv,
}

impl InstallerKind {
    /// All installers in preference order
    pub const ALL: [InstallerKind; 3] = [InstallerKind::Pip, InstallerKind::Pipx, InstallerKind::Uv];

    pub fn name(&self) -> &'static str {
        match self {
            InstallerKind::Pip => "pip",
            InstallerKind::Pipx => "pipx",
            InstallerKind::Uv => "uv",
        }
    }

    /// Command prefix up to and including the install verb
    pub fn base_command(&self) -> &'static str {
        match self {
            InstallerKind::Pip => "pip install",
            InstallerKind::Pipx => "pipx install",
            InstallerKind::Uv => "uv pip install",
        }
    }

    /// Check if the installer executable can be found on `PATH`
    pub fn is_available(&self) -> bool {
        let found = which::which(self.name()).is_ok();
        debug!("Installer {} available: {}", self.name(), found);
        found
    }
}

impl fmt::Display for InstallerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InstallerKind {
    type Err = FeuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pip" => Ok(InstallerKind::Pip),
            "pipx" => Ok(InstallerKind::Pipx),
            "uv" => Ok(InstallerKind::Uv),
            _ => Err(FeuError::UnknownInstaller { name: s.to_string() }),
        }
    }
}

/// Render the install command for a list of dependencies.
///
/// The trimmed `extra_args` go right after the install verb when non-empty.
pub fn generate(kind: InstallerKind, dependencies: &[PackageDependency], extra_args: &str) -> String {
    let mut parts = vec![kind.base_command().to_string()];

    let extra_args = extra_args.trim();
    if !extra_args.is_empty() {
        parts.push(extra_args.to_string());
    }

    parts.extend(dependencies.iter().map(ToString::to_string));
    parts.join(" ")
}
