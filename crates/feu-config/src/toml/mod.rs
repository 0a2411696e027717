//! feu.toml configuration parsing and serialization

use camino::Utf8Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use feu_core::error::FeuError;
use feu_core::Version;
use feu_installer::{InstallerKind, InstallerSpec};
use feu_resolver::{ConstraintEntry, ConstraintRegistry, DependencyResolver, DependencyResolverRegistry};

use crate::ConfigResult;

/// Complete feu.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeuToml {
    /// Installer selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer: Option<InstallerSection>,

    /// Interpreter selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<PythonSection>,

    /// `package -> python version -> bounds`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub constraints: IndexMap<String, IndexMap<String, ConstraintSection>>,

    /// `package -> resolver`
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub resolvers: IndexMap<String, ResolverSection>,
}

/// `[installer]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallerSection {
    /// pip, pipx or uv
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Extra installer arguments, e.g. `-U`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
}

/// `[python]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PythonSection {
    /// Interpreter name or path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,

    /// `major.minor` used instead of asking the interpreter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// `[constraints.<package>."<python>"]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

/// `[resolvers.<package>]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverSection {
    /// First release that works with numpy 2
    #[serde(rename = "numpy-compat", skip_serializing_if = "Option::is_none")]
    pub numpy_compat: Option<String>,

    /// Use the jax resolver
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub jax: bool,
}

impl ConstraintSection {
    pub fn to_entry(&self) -> ConfigResult<ConstraintEntry> {
        ConstraintEntry::parse(self.min.as_deref(), self.max.as_deref())
    }
}

impl ResolverSection {
    pub fn to_resolver(&self) -> ConfigResult<DependencyResolver> {
        match (&self.numpy_compat, self.jax) {
            (Some(_), true) => Err(FeuError::ConfigValidation {
                field: "resolvers".to_string(),
                reason: "'numpy-compat' and 'jax' cannot be combined".to_string(),
            }),
            (Some(min_version), false) => Ok(DependencyResolver::numpy_compat(min_version.parse()?)),
            (None, true) => Ok(DependencyResolver::Jax),
            (None, false) => Ok(DependencyResolver::Default),
        }
    }
}

impl FeuToml {
    /// Installer selection, defaulting to pip without arguments
    pub fn installer_spec(&self) -> InstallerSpec {
        let section = self.installer.clone().unwrap_or_default();
        let spec = InstallerSpec::new(section.name.unwrap_or_else(|| InstallerKind::Pip.name().to_string()));
        match section.args {
            Some(args) => spec.with_arguments(args),
            None => spec,
        }
    }

    pub fn python_executable(&self) -> Option<&str> {
        self.python.as_ref()?.executable.as_deref()
    }

    pub fn python_version(&self) -> Option<&str> {
        self.python.as_ref()?.version.as_deref()
    }

    /// Register configured constraints and resolvers, replacing built-ins
    pub fn apply_to_registries(
        &self,
        constraints: &mut ConstraintRegistry,
        resolvers: &mut DependencyResolverRegistry,
    ) -> ConfigResult<()> {
        for (package, by_python) in &self.constraints {
            for (python_version, section) in by_python {
                constraints.add_entry(package, python_version, section.to_entry()?, true)?;
            }
        }
        for (package, section) in &self.resolvers {
            resolvers.add(package, section.to_resolver()?, true)?;
        }
        debug!(
            "Applied {} constraint packages and {} resolvers from config",
            self.constraints.len(),
            self.resolvers.len()
        );
        Ok(())
    }
}

/// Parse TOML string to FeuToml configuration
pub fn parse_feu_toml(content: &str) -> ConfigResult<FeuToml> {
    // First try with toml_edit for better error reporting
    content.parse::<toml_edit::DocumentMut>().map_err(|e| FeuError::TomlParse {
        message: format!("TOML syntax error: {}", e),
    })?;

    // Then parse with serde for type safety
    let config: FeuToml = ::toml::from_str(content).map_err(|e| FeuError::TomlParse {
        message: format!("TOML parsing error: {}", e),
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Serialize FeuToml to TOML string
pub fn serialize_feu_toml(config: &FeuToml) -> ConfigResult<String> {
    ::toml::to_string_pretty(config).map_err(|e| FeuError::TomlParse {
        message: format!("TOML serialization error: {}", e),
    })
}

/// Validate installer names, version strings and Python version keys
pub fn validate_config(config: &FeuToml) -> ConfigResult<()> {
    if let Some(name) = config.installer.as_ref().and_then(|section| section.name.as_deref()) {
        name.parse::<InstallerKind>().map_err(|_| FeuError::ConfigValidation {
            field: "installer.name".to_string(),
            reason: format!("Unknown installer '{}'. Expected one of: pip, pipx, uv", name),
        })?;
    }

    if let Some(version) = config.python_version() {
        validate_python_version("python.version", version)?;
    }

    for (package, by_python) in &config.constraints {
        for (python_version, section) in by_python {
            let field = format!("constraints.{}.{}", package, python_version);
            validate_python_version(&field, python_version)?;
            for bound in [&section.min, &section.max].into_iter().flatten() {
                validate_version(&field, bound)?;
            }
        }
    }

    for (package, section) in &config.resolvers {
        let field = format!("resolvers.{}", package);
        if let Some(version) = &section.numpy_compat {
            validate_version(&field, version)?;
        }
        section.to_resolver().map_err(|e| match e {
            FeuError::ConfigValidation { reason, .. } => FeuError::ConfigValidation { field: field.clone(), reason },
            other => other,
        })?;
    }

    Ok(())
}

fn validate_version(field: &str, version: &str) -> ConfigResult<()> {
    version.parse::<Version>().map(|_| ()).map_err(|_| FeuError::ConfigValidation {
        field: field.to_string(),
        reason: format!("'{}' is not a valid version", version),
    })
}

/// Python versions are keyed as `major.minor`, e.g. `3.12`
fn validate_python_version(field: &str, version: &str) -> ConfigResult<()> {
    let parts: Vec<&str> = version.split('.').collect();
    let valid = parts.len() == 2
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
    if valid {
        Ok(())
    } else {
        Err(FeuError::ConfigValidation {
            field: field.to_string(),
            reason: format!("Python version '{}' must look like '3.12'", version),
        })
    }
}

/// Load and parse feu.toml from file path
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<FeuToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FeuError::io(format!("Failed to read {}", path), e))?;

    parse_feu_toml(&content).map_err(|e| match e {
        FeuError::TomlParse { message } => FeuError::TomlParse {
            message: format!("In file {}: {}", path, message),
        },
        FeuError::ConfigValidation { field, reason } => FeuError::ConfigValidation {
            field,
            reason: format!("In file {}: {}", path, reason),
        },
        other => other,
    })
}
