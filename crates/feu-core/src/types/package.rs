//! Install targets and the dependencies resolved from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Version, VersionSpecifier};
use crate::error::{FeuError, FeuResult};
use crate::utils::requirement::{extract_package_extras, extract_package_name, generate_extras_string};

/// A requested install target, e.g. `pandas[performance]==2.2.2`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageSpec {
    pub name: String,
    pub version: Option<String>,
    #[serde(default)]
    pub extras: Vec<String>,
}

/// A single requirement produced by a resolver, e.g. `numpy<2.0.0`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageDependency {
    pub name: String,
    #[serde(default)]
    pub version_specifiers: Vec<String>,
    #[serde(default)]
    pub extras: Vec<String>,
}

impl PackageSpec {
    /// Create a spec without version or extras
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            extras: Vec::new(),
        }
    }

    /// Create a spec pinned to a version
    pub fn pinned(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(name).with_version(version)
    }

    /// Return a copy of this spec targeting another version
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            version: Some(version.into()),
            extras: self.extras.clone(),
        }
    }

    /// Return a copy of this spec with the given extras
    pub fn with_extras<I, S>(&self, extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: self.name.clone(),
            version: self.version.clone(),
            extras: extras.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse the requested version, if any
    pub fn parsed_version(&self) -> FeuResult<Option<Version>> {
        self.version.as_deref().map(str::parse).transpose()
    }

    /// Convert verbatim into a dependency (`==version` when a version is set)
    pub fn to_dependency(&self) -> PackageDependency {
        PackageDependency {
            name: self.name.clone(),
            version_specifiers: self
                .version
                .iter()
                .map(|version| format!("=={}", version))
                .collect(),
            extras: self.extras.clone(),
        }
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, generate_extras_string(&self.extras))?;
        if let Some(ref version) = self.version {
            write!(f, "=={}", version)?;
        }
        Ok(())
    }
}

impl FromStr for PackageSpec {
    type Err = FeuError;

    /// Parse `name[extra1,extra2]==version`; only exact pins are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let name = extract_package_name(input).ok_or_else(|| FeuError::InvalidArgument {
            message: format!("'{}' does not start with a package name", s),
        })?;
        let extras = extract_package_extras(input);

        let rest = match input.find(']') {
            Some(end) if input[name.len()..].starts_with('[') => &input[end + 1..],
            _ => &input[name.len()..],
        };
        let rest = rest.trim();

        let version = if rest.is_empty() {
            None
        } else {
            let pin = rest.strip_prefix("==").ok_or_else(|| FeuError::InvalidSpecifier {
                input: rest.to_string(),
            })?;
            let pin = pin.trim();
            pin.parse::<Version>()?;
            Some(pin.to_string())
        };

        Ok(Self {
            name,
            version,
            extras,
        })
    }
}

impl PackageDependency {
    /// Create a dependency without specifiers or extras
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version_specifiers: Vec::new(),
            extras: Vec::new(),
        }
    }

    /// Add a version specifier such as `<2.0.0`
    pub fn with_specifier(mut self, specifier: impl Into<String>) -> Self {
        self.version_specifiers.push(specifier.into());
        self
    }

    /// Add an extra such as `security`
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extras.push(extra.into());
        self
    }

    /// Parse the raw specifier strings
    pub fn parsed_specifiers(&self) -> FeuResult<Vec<VersionSpecifier>> {
        self.version_specifiers.iter().map(|spec| spec.parse()).collect()
    }
}

impl fmt::Display for PackageDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.name,
            generate_extras_string(&self.extras),
            self.version_specifiers.join(",")
        )
    }
}
