//! Install command implementation.

use feu_core::error::FeuResult;
use feu_core::PackageSpec;
use feu_installer::{CommandRunner, DryRunRunner, PythonInterpreter, ShellRunner};
use tracing::debug;

use super::CommandContext;
use crate::InstallArgs;

/// Execute the install command
pub async fn execute(args: InstallArgs, ctx: &CommandContext) -> FeuResult<()> {
    let python_version = target_python_version(&args, ctx)?;
    ctx.output.info(&format!("Target Python {}", python_version));

    if args.dry_run {
        let runner = DryRunRunner::new();
        let command = run_install(&args, &python_version, ctx, &runner)?;
        ctx.output.print(&command);
        return Ok(());
    }

    let command = run_install(&args, &python_version, ctx, &ShellRunner::new())?;
    ctx.output.success(&format!("Installed with `{}`", command));
    Ok(())
}

/// Resolve and run the install command with the given runner
pub fn run_install(
    args: &InstallArgs,
    python_version: &str,
    ctx: &CommandContext,
    runner: &dyn CommandRunner,
) -> FeuResult<String> {
    let package = PackageSpec::pinned(&args.pkg_name, &args.pkg_version).with_extras(args.pkg_extras.iter().cloned());
    ctx.installers.install_closest_version(
        &ctx.config.installer_spec(),
        &package,
        python_version,
        &ctx.constraints,
        &ctx.resolvers,
        runner,
    )
}

/// Python version from the flag, then the config, then the interpreter
fn target_python_version(args: &InstallArgs, ctx: &CommandContext) -> FeuResult<String> {
    if let Some(version) = args.python_version.as_deref().or(ctx.config.python_version()) {
        return Ok(version.to_string());
    }

    let interpreter = match ctx.config.python_executable() {
        Some(executable) => PythonInterpreter::find(executable)?,
        None => PythonInterpreter::default_python()?,
    };
    let version = interpreter.major_minor()?;
    debug!("Detected Python {} at {}", version, interpreter.executable());
    Ok(version)
}
