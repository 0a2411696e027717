//! Command implementations and dispatch logic.
//!
//! This module contains all command handlers and the central dispatch system.
//! Each command is implemented as an async function that takes a CommandContext.

use camino::Utf8PathBuf;
use feu_config::{ConfigLoader, FeuToml};
use feu_core::error::{FeuError, FeuResult};
use feu_installer::InstallerRegistry;
use feu_registry::RegistryClient;
use feu_resolver::{ConstraintRegistry, DependencyResolverRegistry};
use std::collections::HashMap;
use tracing::{debug, info};

pub mod check;
pub mod fetch;
pub mod install;


use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
    pub config: FeuToml,
    pub constraints: ConstraintRegistry,
    pub resolvers: DependencyResolverRegistry,
    pub installers: InstallerRegistry,
    pub registry: RegistryClient,
}

impl CommandContext {
    /// Create a new command context from the layered configuration
    pub async fn new(cli_overrides: HashMap<String, String>) -> FeuResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| FeuError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| FeuError::InvalidArgument {
            message: format!("Current directory is not valid UTF-8: {}", e),
        })?;

        let config = ConfigLoader::new(cwd.clone()).load(&cli_overrides).await?;
        Self::with_config(cwd, config, RegistryClient::new()?)
    }

    /// Create a context from an already merged configuration
    pub fn with_config(cwd: Utf8PathBuf, config: FeuToml, registry: RegistryClient) -> FeuResult<Self> {
        let mut constraints = ConstraintRegistry::with_defaults();
        let mut resolvers = DependencyResolverRegistry::with_defaults();
        config.apply_to_registries(&mut constraints, &mut resolvers)?;

        Ok(Self {
            cwd,
            output: OutputHandler::new(),
            config,
            constraints,
            resolvers,
            installers: InstallerRegistry::with_defaults(),
            registry,
        })
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> FeuResult<()> {
    debug!("Working directory: {}", ctx.cwd);
    match command {
        Commands::Install(args) => {
            info!("Installing {} {} (dry_run: {})", args.pkg_name, args.pkg_version, args.dry_run);
            install::execute(args, ctx).await
        },
        Commands::FindClosestVersion(query) => {
            info!("Finding closest version of {} {}", query.pkg_name, query.pkg_version);
            check::execute_find_closest(query, ctx).await
        },
        Commands::CheckValidVersion(query) => {
            info!("Checking {} {} against Python {}", query.pkg_name, query.pkg_version, query.python_version);
            check::execute_check_valid(query, ctx).await
        },
        Commands::Constraints { pkg_name } => {
            info!("Listing constraints (package: {:?})", pkg_name);
            check::execute_list_constraints(pkg_name.as_deref(), ctx).await
        },
        Commands::Installers => {
            info!("Listing available installers");
            list_installers(ctx).await
        },
        Commands::FetchVersions(args) => {
            info!("Fetching versions of {}", args.pkg_name);
            fetch::execute_versions(args, ctx).await
        },
        Commands::GithubMetadata { owner, repo } => {
            info!("Fetching GitHub metadata of {}/{}", owner, repo);
            fetch::execute_github_metadata(&owner, &repo, ctx).await
        },
        Commands::GithubRepos { owner, sort, reverse } => {
            info!("Fetching GitHub repositories of {} (sort: {:?})", owner, sort);
            fetch::execute_github_repos(&owner, sort, reverse, ctx).await
        },
        Commands::Version => {
            info!("Showing version information");
            show_version(ctx).await
        },
    }
}

async fn list_installers(ctx: &CommandContext) -> FeuResult<()> {
    let available = feu_installer::available_installers();
    if available.is_empty() {
        ctx.output.warn("No installer found on PATH (looked for pip, pipx and uv)");
        return Ok(());
    }
    for kind in available {
        ctx.output.print(&format!("{:<5} {}", kind.name(), kind.base_command()));
    }
    Ok(())
}

async fn show_version(ctx: &CommandContext) -> FeuResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build_date = env!("BUILD_DATE");
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    ctx.output.print(&format!("feu v{}", version));
    ctx.output.print(&format!("Built: {}", build_date));
    ctx.output.print(&format!("Target: {}", target));
    ctx.output.print(&format!("Rust: {}", env!("RUSTC_VERSION")));

    Ok(())
}
