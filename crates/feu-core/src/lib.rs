//! # feu-core
//!
//! Core types and utilities shared across all feu crates.
//!
//! This crate provides:
//! - A PEP 440 `Version` with total ordering and `VersionSpecifier` matching
//! - `PackageSpec` and `PackageDependency` for install targets
//! - `FeuError` enum for unified error handling
//! - Version list filtering helpers
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (Version, PackageSpec, etc.)
//! - `error`: Error types and result aliases
//! - `utils`: Version filtering and requirement string helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{FeuError, FeuResult};
pub use types::{Operator, PackageDependency, PackageSpec, PreRelease, Version, VersionSpecifier};
