//! Core data types for feu.
//!
//! This module provides the fundamental types used throughout the feu crates:
//! - PEP 440 versions and version specifiers
//! - Install targets (`PackageSpec`) and resolved requirements (`PackageDependency`)

pub mod package;
pub mod specifier;
pub mod version;

// Re-export all public types
pub use package::{PackageDependency, PackageSpec};
pub use specifier::{Operator, VersionSpecifier};
pub use version::{parse_version, PreRelease, Version};
