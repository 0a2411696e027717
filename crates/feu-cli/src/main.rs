//! # feu-cli
//!
//! Install Python packages at versions that work with the target interpreter.
//!
//! This is the main entry point for the feu CLI tool. It handles command parsing,
//! sets up logging and error handling, and dispatches to the appropriate command handlers.

use clap::{Args, Parser, Subcommand, ValueEnum};
use feu_core::error::{FeuError, FeuResult};
use std::collections::HashMap;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Install Python packages at versions that fit your interpreter
#[derive(Parser)]
#[command(name = "feu", version, about = "Install Python packages at versions that fit your interpreter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Python interpreter used to probe the environment
    #[arg(long, global = true, value_name = "EXE")]
    pub python: Option<String>,
}

/// Package name, requested version and target Python version
#[derive(Args, Debug, Clone)]
pub struct VersionQuery {
    /// Package name
    #[arg(short = 'n', long = "pkg-name", alias = "pkg_name")]
    pub pkg_name: String,

    /// Package version
    #[arg(short = 'v', long = "pkg-version", alias = "pkg_version")]
    pub pkg_version: String,

    /// Python version, e.g. 3.12
    #[arg(short = 'p', long = "python-version", alias = "python_version")]
    pub python_version: String,
}

#[derive(Args, Debug, Clone)]
pub struct InstallArgs {
    /// Package name
    #[arg(short = 'n', long = "pkg-name", alias = "pkg_name")]
    pub pkg_name: String,

    /// Package version; the closest valid version is installed
    #[arg(short = 'v', long = "pkg-version", alias = "pkg_version")]
    pub pkg_version: String,

    /// Installer to use: pip, pipx or uv
    #[arg(long = "installer-name", alias = "installer_name")]
    pub installer_name: Option<String>,

    /// Extra installer arguments, e.g. "-U"
    #[arg(long = "installer-args", alias = "installer_args", allow_hyphen_values = true)]
    pub installer_args: Option<String>,

    /// Package extras, repeatable
    #[arg(long = "pkg-extras", alias = "pkg_extras")]
    pub pkg_extras: Vec<String>,

    /// Python version; detected from the interpreter when omitted
    #[arg(short = 'p', long = "python-version", alias = "python_version")]
    pub python_version: Option<String>,

    /// Print the install command without running it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FetchVersionsArgs {
    /// Package name
    #[arg(short = 'n', long = "pkg-name", alias = "pkg_name")]
    pub pkg_name: String,

    /// Lowest version to keep (inclusive)
    #[arg(long)]
    pub lower: Option<String>,

    /// First version to drop (exclusive)
    #[arg(long)]
    pub upper: Option<String>,

    /// Only the latest stable release of each major version
    #[arg(long, conflicts_with_all = ["latest_minor", "latest"])]
    pub latest_major: bool,

    /// Only the latest stable release of each minor version
    #[arg(long, conflicts_with = "latest")]
    pub latest_minor: bool,

    /// Only the latest release
    #[arg(long)]
    pub latest: bool,

    /// Sort in descending order
    #[arg(long)]
    pub reverse: bool,
}

/// Repository sort key
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSort {
    Name,
    FullName,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install a package at the closest valid version
    Install(InstallArgs),
    /// Print the closest valid version for a Python version
    FindClosestVersion(VersionQuery),
    /// Print whether a version is valid for a Python version
    CheckValidVersion(VersionQuery),
    /// List the version bounds per package and Python version
    Constraints {
        /// Only show this package
        #[arg(short = 'n', long = "pkg-name", alias = "pkg_name")]
        pkg_name: Option<String>,
    },
    /// List installers found on PATH
    Installers,
    /// List release versions from PyPI
    FetchVersions(FetchVersionsArgs),
    /// Print GitHub metadata of a repository
    GithubMetadata {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        repo: String,
    },
    /// List the GitHub repositories of a user
    GithubRepos {
        #[arg(long)]
        owner: String,
        #[arg(long, value_enum)]
        sort: Option<RepoSort>,
        #[arg(long)]
        reverse: bool,
    },
    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting feu v{}", env!("CARGO_PKG_VERSION"));

    if let Err(error) = run_cli(cli) {
        eprintln!("{}", ErrorFormatter::new().format_error(&error));
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> FeuResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| FeuError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(cli_overrides(&cli)).await?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

/// Config values given on the command line
fn cli_overrides(cli: &Cli) -> HashMap<String, String> {
    let mut overrides = HashMap::new();
    if let Some(python) = &cli.python {
        overrides.insert(feu_config::merge::CLI_PYTHON.to_string(), python.clone());
    }
    if let Commands::Install(args) = &cli.command {
        if let Some(name) = &args.installer_name {
            overrides.insert(feu_config::merge::CLI_INSTALLER.to_string(), name.clone());
        }
        if let Some(installer_args) = &args.installer_args {
            overrides.insert(feu_config::merge::CLI_INSTALLER_ARGS.to_string(), installer_args.clone());
        }
        if let Some(version) = &args.python_version {
            overrides.insert(feu_config::merge::CLI_PYTHON_VERSION.to_string(), version.clone());
        }
    }
    overrides
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("feu={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("feu encountered an unexpected error: {}", panic_info);
        eprintln!("feu crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
