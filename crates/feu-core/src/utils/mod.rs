//! Utility functions and helpers.
//!
//! Common functionality used across multiple feu crates.

pub mod filter;
pub mod requirement;

// Re-export commonly used utilities
pub use filter::{
    filter_every_n_versions, filter_last_n_versions, filter_range_versions, filter_stable_versions,
    filter_valid_versions, latest_major_versions, latest_minor_versions, latest_version,
    sort_versions, unique_versions,
};
pub use requirement::{extract_package_extras, extract_package_name, generate_extras_string};
