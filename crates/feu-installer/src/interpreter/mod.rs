//! Probing a Python interpreter for installed packages and modules.
//!
//! Every query runs the interpreter with a short `-c` script and reads the
//! exit code or stdout. Availability answers are memoized per interpreter.

use camino::Utf8PathBuf;
use dashmap::DashMap;
use std::process::{Command, Output};
use tracing::{debug, warn};

use feu_core::error::FeuError;
use feu_core::{Operator, Version, VersionSpecifier};

use crate::InstallerResult;

const MAJOR_MINOR_SCRIPT: &str = "import sys; print('%d.%d' % sys.version_info[:2])";

const FIND_SPEC_SCRIPT: &str = "\
import sys, importlib.util
try:
    found = importlib.util.find_spec(sys.argv[1]) is not None
except (ImportError, AttributeError, ValueError):
    found = False
sys.exit(0 if found else 1)
";

const IMPORT_MODULE_SCRIPT: &str = "\
import sys, importlib
try:
    importlib.import_module(sys.argv[1])
except ImportError:
    sys.exit(1)
";

const PACKAGE_VERSION_SCRIPT: &str = "\
import sys
from importlib.metadata import version, PackageNotFoundError
try:
    print(version(sys.argv[1]))
except PackageNotFoundError:
    sys.exit(1)
";

/// A Python executable used to answer environment queries
#[derive(Debug)]
pub struct PythonInterpreter {
    executable: Utf8PathBuf,
    packages: DashMap<String, bool>,
    modules: DashMap<String, bool>,
}

impl PythonInterpreter {
    /// Wrap an interpreter path without resolving it
    pub fn new(executable: impl Into<Utf8PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            packages: DashMap::new(),
            modules: DashMap::new(),
        }
    }

    /// Resolve an interpreter name or path.
    ///
    /// A bare name such as `python3.11` is looked up on `PATH`; anything with
    /// a path separator is used as given.
    pub fn find(python: &str) -> InstallerResult<Self> {
        let candidate = Utf8PathBuf::from(python);
        if candidate.components().count() > 1 {
            debug!("Assuming {} is a path", candidate);
            return Ok(Self::new(candidate));
        }

        let resolved = which::which(candidate.as_std_path()).map_err(|err| FeuError::InvalidArgument {
            message: format!("Can't find Python interpreter '{}' ({})", python, err),
        })?;
        let resolved = Utf8PathBuf::try_from(resolved).map_err(|err| {
            FeuError::io(
                format!("Interpreter path for '{}' is not UTF-8", python),
                err.into_io_error(),
            )
        })?;
        debug!("Resolved {} to {}", python, resolved);
        Ok(Self::new(resolved))
    }

    /// Resolve `python3` on `PATH`
    pub fn default_python() -> InstallerResult<Self> {
        Self::find("python3")
    }

    pub fn executable(&self) -> &Utf8PathBuf {
        &self.executable
    }

    fn run_script(&self, script: &str, arg: Option<&str>) -> InstallerResult<Output> {
        let mut command = Command::new(self.executable.as_std_path());
        command.arg("-c").arg(script);
        if let Some(arg) = arg {
            command.arg(arg);
        }
        command
            .output()
            .map_err(|e| FeuError::io(format!("Failed to run {}", self.executable), e))
    }

    fn script_succeeds(&self, script: &str, arg: &str) -> bool {
        match self.run_script(script, Some(arg)) {
            Ok(output) => output.status.success(),
            Err(err) => {
                warn!("{}", err);
                false
            },
        }
    }

    /// `major.minor` of the interpreter, e.g. `"3.11"`
    pub fn major_minor(&self) -> InstallerResult<String> {
        let output = self.run_script(MAJOR_MINOR_SCRIPT, None)?;
        if !output.status.success() {
            return Err(FeuError::CommandExecution {
                command: format!("{} -c <version query>", self.executable),
                status: output.status.to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Check if a top-level package can be found by the import system
    pub fn is_package_available(&self, package: &str) -> bool {
        if let Some(found) = self.packages.get(package) {
            return *found;
        }
        let found = self.script_succeeds(FIND_SPEC_SCRIPT, package);
        debug!("Package {} available in {}: {}", package, self.executable, found);
        self.packages.insert(package.to_string(), found);
        found
    }

    /// Check if a dotted module path can be imported
    pub fn is_module_available(&self, module: &str) -> bool {
        if let Some(found) = self.modules.get(module) {
            return *found;
        }
        let top_level = module.split('.').next().unwrap_or(module);
        let found = self.is_package_available(top_level) && self.script_succeeds(IMPORT_MODULE_SCRIPT, module);
        self.modules.insert(module.to_string(), found);
        found
    }

    /// Installed distribution version, `None` when not installed
    pub fn package_version(&self, package: &str) -> InstallerResult<Option<Version>> {
        let output = self.run_script(PACKAGE_VERSION_SCRIPT, Some(package))?;
        if !output.status.success() {
            return Ok(None);
        }
        let raw = String::from_utf8_lossy(&output.stdout);
        raw.trim().parse().map(Some)
    }

    /// Compare the installed version against a target; false when the
    /// package is missing or its version cannot be read
    pub fn compare_installed_version(&self, package: &str, operator: Operator, target: &Version) -> bool {
        match self.package_version(package) {
            Ok(Some(installed)) => VersionSpecifier::new(operator, target.clone()).contains(&installed),
            Ok(None) => false,
            Err(err) => {
                warn!("Could not read version of {}: {}", package, err);
                false
            },
        }
    }

    /// Fail with an install hint when a package is missing
    pub fn check_package(&self, package: &str, install_hint: &str) -> InstallerResult<()> {
        if self.is_package_available(package) {
            Ok(())
        } else {
            Err(FeuError::MissingDependency {
                package: package.to_string(),
                install_hint: install_hint.to_string(),
            })
        }
    }
}
