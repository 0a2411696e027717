//! Installers and the name-keyed installer registry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use feu_core::error::FeuError;
use feu_core::PackageSpec;
use feu_resolver::{ConstraintRegistry, DependencyResolverRegistry};

use crate::command::{generate, InstallerKind};
use crate::runner::CommandRunner;
use crate::InstallerResult;

/// Installer selection as given by the user, e.g. `pip` with `-U`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerSpec {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

impl InstallerSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: String::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = arguments.into();
        self
    }
}

impl Default for InstallerSpec {
    fn default() -> Self {
        Self::new(InstallerKind::Pip.name())
    }
}

impl fmt::Display for InstallerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arguments.trim().is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.name, self.arguments.trim())
        }
    }
}

/// An installer kind plus the arguments it always passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInstaller {
    pub kind: InstallerKind,
    pub arguments: String,
}

impl PackageInstaller {
    pub fn new(kind: InstallerKind) -> Self {
        Self {
            kind,
            arguments: String::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = arguments.into();
        self
    }

    /// Render the install command for a package without running it
    pub fn command(&self, package: &PackageSpec, resolvers: &DependencyResolverRegistry) -> InstallerResult<String> {
        let dependencies = resolvers.resolve(package)?;
        for dependency in &dependencies {
            // Malformed specifiers would only surface as an installer error
            dependency.parsed_specifiers()?;
        }
        Ok(generate(self.kind, &dependencies, &self.arguments))
    }

    /// Resolve, render and run the install command; returns the command line
    pub fn install<R: CommandRunner + ?Sized>(
        &self,
        package: &PackageSpec,
        resolvers: &DependencyResolverRegistry,
        runner: &R,
    ) -> InstallerResult<String> {
        let command = self.command(package, resolvers)?;
        info!("Installing {} with {}", package, self.kind);
        runner.run(&command)?;
        Ok(command)
    }
}

/// Map `installer name -> installer template`
#[derive(Debug, Clone, Default)]
pub struct InstallerRegistry {
    installers: IndexMap<String, PackageInstaller>,
}

impl InstallerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with pip, pipx and uv
    pub fn with_defaults() -> Self {
        let installers = InstallerKind::ALL
            .into_iter()
            .map(|kind| (kind.name().to_string(), PackageInstaller::new(kind)))
            .collect();
        Self { installers }
    }

    /// Register an installer; fails without touching the registry when the
    /// name exists and `overwrite` is false
    pub fn add(&mut self, name: &str, installer: PackageInstaller, overwrite: bool) -> InstallerResult<()> {
        if !overwrite && self.has(name) {
            return Err(FeuError::DuplicateConfig {
                kind: "Installer".to_string(),
                key: name.to_string(),
            });
        }
        debug!("Registering installer {}: {:?}", name, installer);
        self.installers.insert(name.to_string(), installer);
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.installers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&PackageInstaller> {
        self.installers.get(name)
    }

    /// Registered installer names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.installers.keys().map(String::as_str)
    }

    /// Installer for a selection, with the selection's arguments appended
    /// to the registered ones
    pub fn installer_for(&self, spec: &InstallerSpec) -> InstallerResult<PackageInstaller> {
        let template = self.get(&spec.name).ok_or_else(|| FeuError::UnknownInstaller {
            name: spec.name.clone(),
        })?;
        let arguments = [template.arguments.trim(), spec.arguments.trim()]
            .into_iter()
            .filter(|args| !args.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Ok(template.clone().with_arguments(arguments))
    }

    /// Install a package with a registered installer
    pub fn install<R: CommandRunner + ?Sized>(
        &self,
        installer: &InstallerSpec,
        package: &PackageSpec,
        resolvers: &DependencyResolverRegistry,
        runner: &R,
    ) -> InstallerResult<String> {
        self.installer_for(installer)?.install(package, resolvers, runner)
    }

    /// Install the closest valid version with a registered installer
    pub fn install_closest_version<R: CommandRunner + ?Sized>(
        &self,
        installer: &InstallerSpec,
        package: &PackageSpec,
        python_version: &str,
        constraints: &ConstraintRegistry,
        resolvers: &DependencyResolverRegistry,
        runner: &R,
    ) -> InstallerResult<String> {
        let installer = self.installer_for(installer)?;
        install_package_closest_version(&installer, package, python_version, constraints, resolvers, runner)
    }
}

/// Install the version closest to the requested one that the constraints
/// allow for `python_version`; unversioned specs are installed as given
pub fn install_package_closest_version<R: CommandRunner + ?Sized>(
    installer: &PackageInstaller,
    package: &PackageSpec,
    python_version: &str,
    constraints: &ConstraintRegistry,
    resolvers: &DependencyResolverRegistry,
    runner: &R,
) -> InstallerResult<String> {
    let target = match package.version.as_deref() {
        Some(requested) => {
            let closest = constraints.clamp(&package.name, requested, python_version)?;
            if closest != requested {
                info!(
                    "Using {} {} instead of {} for Python {}",
                    package.name, closest, requested, python_version
                );
            }
            package.with_version(closest)
        },
        None => package.clone(),
    };

    installer.install(&target, resolvers, runner)
}
