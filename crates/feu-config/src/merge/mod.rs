//! Configuration layering, discovery and environment overrides

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use tracing::debug;

use feu_core::error::FeuError;

use crate::toml::{load_from_file, FeuToml, InstallerSection, PythonSection};
use crate::{ConfigResult, CONFIG_FILE_NAME};

/// Environment variable selecting the installer
pub const ENV_INSTALLER: &str = "FEU_INSTALLER";
/// Environment variable with extra installer arguments
pub const ENV_INSTALLER_ARGS: &str = "FEU_INSTALLER_ARGS";
/// Environment variable selecting the interpreter
pub const ENV_PYTHON: &str = "FEU_PYTHON";
/// Environment variable overriding the detected Python version
pub const ENV_PYTHON_VERSION: &str = "FEU_PYTHON_VERSION";

/// CLI override keys understood by [`ConfigLayering::merge_configs`]
pub const CLI_INSTALLER: &str = "installer";
pub const CLI_INSTALLER_ARGS: &str = "installer-args";
pub const CLI_PYTHON: &str = "python";
pub const CLI_PYTHON_VERSION: &str = "python-version";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
    /// Global config file, `<config_dir>/feu/config.toml` unless overridden
    global_path: Option<Utf8PathBuf>,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Where a configuration layer came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Global config file
    Global(Utf8PathBuf),
    /// Project feu.toml file
    Project(Utf8PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

impl ConfigLoader {
    /// Create a loader using the platform config directory for the global file
    pub fn new(cwd: Utf8PathBuf) -> Self {
        let global_path = dirs::config_dir()
            .and_then(|dir| Utf8PathBuf::try_from(dir).ok())
            .map(|dir| dir.join("feu").join("config.toml"));
        Self { cwd, global_path }
    }

    /// Use an explicit global config path (or none at all)
    pub fn with_global_path(mut self, path: Option<Utf8PathBuf>) -> Self {
        self.global_path = path;
        self
    }

    pub fn cwd(&self) -> &Utf8Path {
        &self.cwd
    }

    /// Find a file in the cwd or its ancestors
    pub fn resolve_config_path(&self, filename: &str) -> Option<Utf8PathBuf> {
        self.cwd
            .ancestors()
            .map(|dir| dir.join(filename))
            .find(|candidate| candidate.is_file())
    }

    /// Load the nearest feu.toml, if any
    pub async fn load_project_config(&self) -> ConfigResult<Option<(FeuToml, ConfigSource)>> {
        let Some(path) = self.resolve_config_path(CONFIG_FILE_NAME) else {
            debug!("No {} found from {}", CONFIG_FILE_NAME, self.cwd);
            return Ok(None);
        };
        debug!("Loading project config {}", path);
        let config = load_from_file(&path).await?;
        Ok(Some((config, ConfigSource::Project(path))))
    }

    /// Load the global config file, if present
    pub async fn load_global_config(&self) -> ConfigResult<Option<(FeuToml, ConfigSource)>> {
        let Some(path) = self.global_path.as_ref().filter(|path| path.is_file()) else {
            return Ok(None);
        };
        debug!("Loading global config {}", path);
        let config = load_from_file(path).await?;
        Ok(Some((config, ConfigSource::Global(path.clone()))))
    }

    /// Load every layer and merge them, CLI overrides last
    pub async fn load(&self, cli_overrides: &HashMap<String, String>) -> ConfigResult<FeuToml> {
        let global = self.load_global_config().await?.map(|(config, _)| config);
        let project = self.load_project_config().await?.map(|(config, _)| config);
        ConfigLayering::merge_configs(
            global,
            project,
            &ConfigLayering::collect_env_overrides(),
            cli_overrides,
        )
    }
}

impl ConfigLayering {
    /// Merge configuration layers; later layers win field by field
    pub fn merge_configs(
        global_config: Option<FeuToml>,
        project_config: Option<FeuToml>,
        env_overrides: &HashMap<String, String>,
        cli_overrides: &HashMap<String, String>,
    ) -> ConfigResult<FeuToml> {
        let mut merged = global_config.unwrap_or_default();
        if let Some(project) = project_config {
            Self::overlay(&mut merged, project);
        }

        Self::apply_env_overrides(&mut merged, env_overrides)?;
        Self::apply_cli_overrides(&mut merged, cli_overrides)?;

        Ok(merged)
    }

    fn overlay(base: &mut FeuToml, top: FeuToml) {
        if let Some(installer) = top.installer {
            let section = base.installer.get_or_insert_with(InstallerSection::default);
            section.name = installer.name.or(section.name.take());
            section.args = installer.args.or(section.args.take());
        }
        if let Some(python) = top.python {
            let section = base.python.get_or_insert_with(PythonSection::default);
            section.executable = python.executable.or(section.executable.take());
            section.version = python.version.or(section.version.take());
        }
        for (package, by_python) in top.constraints {
            base.constraints.entry(package).or_default().extend(by_python);
        }
        base.resolvers.extend(top.resolvers);
    }

    fn set_field(config: &mut FeuToml, key: &str, value: &str) -> bool {
        let value = Some(value.to_string());
        match key {
            CLI_INSTALLER => config.installer.get_or_insert_with(Default::default).name = value,
            CLI_INSTALLER_ARGS => config.installer.get_or_insert_with(Default::default).args = value,
            CLI_PYTHON => config.python.get_or_insert_with(Default::default).executable = value,
            CLI_PYTHON_VERSION => config.python.get_or_insert_with(Default::default).version = value,
            _ => return false,
        }
        true
    }

    /// Apply `FEU_*` environment variable overrides
    pub fn apply_env_overrides(config: &mut FeuToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            let field = match key.as_str() {
                ENV_INSTALLER => CLI_INSTALLER,
                ENV_INSTALLER_ARGS => CLI_INSTALLER_ARGS,
                ENV_PYTHON => CLI_PYTHON,
                ENV_PYTHON_VERSION => CLI_PYTHON_VERSION,
                _ => continue,
            };
            debug!("Applying {} from {:?}", field, ConfigSource::Environment(key.clone()));
            Self::set_field(config, field, value);
        }
        crate::toml::validate_config(config).map_err(|e| Self::attribute(e, "environment"))
    }

    /// Apply CLI flag overrides (highest priority)
    pub fn apply_cli_overrides(config: &mut FeuToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            if !Self::set_field(config, key, value) {
                return Err(FeuError::ConfigValidation {
                    field: key.clone(),
                    reason: "Unknown command line override".to_string(),
                });
            }
        }
        crate::toml::validate_config(config).map_err(|e| Self::attribute(e, "command line"))
    }

    fn attribute(error: FeuError, origin: &str) -> FeuError {
        match error {
            FeuError::ConfigValidation { field, reason } => FeuError::ConfigValidation {
                field,
                reason: format!("{} (from {})", reason, origin),
            },
            other => other,
        }
    }

    /// Collect `FEU_*` environment variables
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars().filter(|(key, _)| key.starts_with("FEU_")).collect()
    }
}
