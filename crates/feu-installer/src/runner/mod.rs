//! Execution of rendered install commands.

use std::process::Command;
use std::sync::Mutex;
use tracing::{debug, info};

use feu_core::error::FeuError;

use crate::InstallerResult;

/// Boundary between command rendering and process execution
pub trait CommandRunner {
    /// Run a rendered command line, failing on a non-zero exit
    fn run(&self, command: &str) -> InstallerResult<()>;
}

/// Runs commands as child processes, without an intermediate shell.
///
/// The command line is split on whitespace; the first token is the program.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> InstallerResult<()> {
        let mut tokens = command.split_whitespace();
        let Some(program) = tokens.next() else {
            return Err(FeuError::InvalidArgument {
                message: "cannot run an empty command".to_string(),
            });
        };

        info!("Running: {}", command);
        let status = Command::new(program)
            .args(tokens)
            .status()
            .map_err(|e| FeuError::io(format!("Failed to spawn '{}'", program), e))?;

        if status.success() {
            debug!("Command finished: {}", command);
            Ok(())
        } else {
            Err(FeuError::CommandExecution {
                command: command.to_string(),
                status: status.to_string(),
            })
        }
    }
}

/// Records commands instead of running them
#[derive(Debug, Default)]
pub struct DryRunRunner {
    commands: Mutex<Vec<String>>,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far, oldest first
    pub fn commands(&self) -> Vec<String> {
        match self.commands.lock() {
            Ok(commands) => commands.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&self, command: &str) -> InstallerResult<()> {
        info!("Dry run: {}", command);
        match self.commands.lock() {
            Ok(mut commands) => commands.push(command.to_string()),
            Err(poisoned) => poisoned.into_inner().push(command.to_string()),
        }
        Ok(())
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &str) -> InstallerResult<()> {
        (**self).run(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_records_commands() {
        let runner = DryRunRunner::new();
        runner.run("pip install numpy==2.0.0").unwrap();
        runner.run("uv pip install pandas").unwrap();
        assert_eq!(
            runner.commands(),
            vec!["pip install numpy==2.0.0", "uv pip install pandas"]
        );
    }

    #[test]
    fn test_shell_runner_rejects_empty_command() {
        let result = ShellRunner::new().run("   ");
        assert!(matches!(result, Err(FeuError::InvalidArgument { .. })));
    }

    #[test]
    fn test_shell_runner_spawn_failure() {
        let result = ShellRunner::new().run("feu-definitely-missing-program --flag");
        assert!(matches!(result, Err(FeuError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_runner_exit_status() {
        assert!(ShellRunner::new().run("true").is_ok());
        match ShellRunner::new().run("false") {
            Err(FeuError::CommandExecution { command, .. }) => assert_eq!(command, "false"),
            other => panic!("Expected CommandExecution error, got {other:?}"),
        }
    }
}
