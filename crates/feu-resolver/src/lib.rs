//! Version constraint resolution for feu
//!
//! This crate maps (package, Python version) pairs to known-good version
//! bounds, clamps requested versions into those bounds and expands install
//! targets into the dependency list an installer should receive.

pub mod constraints;
pub mod dependency;

// Re-export main types
pub use constraints::{ConstraintEntry, ConstraintRegistry};
pub use dependency::{DependencyResolver, DependencyResolverRegistry};

use feu_core::error::FeuError;

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, FeuError>;
