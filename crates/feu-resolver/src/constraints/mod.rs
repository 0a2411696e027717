//! Per-Python-version version bounds and the closest-version clamp.
//!
//! Lookups are exact on the Python version key: an entry registered for
//! `"3.11"` does not apply to `"3.11.2"`.

use indexmap::IndexMap;
use tracing::debug;

use feu_core::error::FeuError;
use feu_core::Version;

use crate::ResolverResult;

mod defaults;

/// Inclusive version bounds for one package on one Python version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintEntry {
    pub min: Option<Version>,
    pub max: Option<Version>,
}

impl ConstraintEntry {
    /// Create an entry from optional bounds
    pub fn new(min: Option<Version>, max: Option<Version>) -> Self {
        Self { min, max }
    }

    /// Parse optional bound strings into an entry
    pub fn parse(min: Option<&str>, max: Option<&str>) -> ResolverResult<Self> {
        Ok(Self {
            min: min.map(str::parse).transpose()?,
            max: max.map(str::parse).transpose()?,
        })
    }

    /// Check if neither bound is set
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Check if `min <= version <= max` for the bounds that are present
    pub fn contains(&self, version: &Version) -> bool {
        self.min.as_ref().map_or(true, |min| version >= min)
            && self.max.as_ref().map_or(true, |max| version <= max)
    }

    /// The bound a version falls outside of, if any
    pub fn violated_bound(&self, version: &Version) -> Option<&Version> {
        match (&self.min, &self.max) {
            (Some(min), _) if version < min => Some(min),
            (_, Some(max)) if version > max => Some(max),
            _ => None,
        }
    }
}

/// Two-level map `package -> python_version -> bounds`
#[derive(Debug, Clone, Default)]
pub struct ConstraintRegistry {
    entries: IndexMap<String, IndexMap<String, ConstraintEntry>>,
}

impl ConstraintRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in bounds
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (package, python_version, entry) in defaults::default_entries() {
            registry
                .entries
                .entry(package.to_string())
                .or_default()
                .insert(python_version.to_string(), entry);
        }
        registry
    }

    /// Register bounds given as strings
    pub fn add(
        &mut self,
        package: &str,
        python_version: &str,
        min: Option<&str>,
        max: Option<&str>,
        overwrite: bool,
    ) -> ResolverResult<()> {
        let entry = ConstraintEntry::parse(min, max)?;
        self.add_entry(package, python_version, entry, overwrite)
    }

    /// Register bounds; fails without touching the registry when the key
    /// exists and `overwrite` is false
    pub fn add_entry(
        &mut self,
        package: &str,
        python_version: &str,
        entry: ConstraintEntry,
        overwrite: bool,
    ) -> ResolverResult<()> {
        if !overwrite && self.has(package, python_version) {
            return Err(FeuError::DuplicateConfig {
                kind: "Version constraint".to_string(),
                key: format!("{} on Python {}", package, python_version),
            });
        }

        debug!(
            "Registering constraint for {} on Python {}: {:?}",
            package, python_version, entry
        );
        self.entries
            .entry(package.to_string())
            .or_default()
            .insert(python_version.to_string(), entry);
        Ok(())
    }

    /// Check if bounds exist for this exact pair
    pub fn has(&self, package: &str, python_version: &str) -> bool {
        self.lookup(package, python_version).is_some()
    }

    /// Bounds for this exact pair, or an empty entry
    pub fn get(&self, package: &str, python_version: &str) -> ConstraintEntry {
        self.lookup(package, python_version).cloned().unwrap_or_default()
    }

    fn lookup(&self, package: &str, python_version: &str) -> Option<&ConstraintEntry> {
        self.entries.get(package)?.get(python_version)
    }

    /// Registered package names in insertion order
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Registered `(python_version, bounds)` pairs for a package
    pub fn python_versions<'a>(
        &'a self,
        package: &str,
    ) -> impl Iterator<Item = (&'a str, &'a ConstraintEntry)> {
        self.entries
            .get(package)
            .into_iter()
            .flat_map(|by_python| by_python.iter().map(|(python, entry)| (python.as_str(), entry)))
    }

    /// Move a requested version into the registered bounds.
    ///
    /// Below `min` gives the base form of `min`, above `max` gives the base
    /// form of `max`, anything else (including unregistered pairs) gives the
    /// requested string back unchanged.
    pub fn clamp(&self, package: &str, requested: &str, python_version: &str) -> ResolverResult<String> {
        let version: Version = requested.parse()?;
        let Some(entry) = self.lookup(package, python_version) else {
            return Ok(requested.to_string());
        };

        match entry.violated_bound(&version) {
            Some(bound) => {
                debug!(
                    "Clamping {} {} to {} for Python {}",
                    package, requested, bound, python_version
                );
                Ok(bound.base_version())
            },
            None => Ok(requested.to_string()),
        }
    }

    /// Check if a requested version lies within the registered bounds
    pub fn is_valid(&self, package: &str, requested: &str, python_version: &str) -> ResolverResult<bool> {
        let version: Version = requested.parse()?;
        Ok(self
            .lookup(package, python_version)
            .map_or(true, |entry| entry.contains(&version)))
    }
}

#[cfg(test)]
mod tests;
