//! feu benchmarking suite
//!
//! Benchmarks for version parsing and sorting, feu.toml parsing, clamping
//! and install command generation.

pub mod common;

pub use common::*;
