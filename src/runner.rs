use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::error::{PalikkaError, Result};

/// A single external program invocation with structured arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
    pub description: String,
}

impl ExternalCommand {
    /// Create a new command for `program`, described for log output
    pub fn new<S1: Into<String>, S2: Into<String>>(program: S1, description: S2) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add a filesystem path as an argument
    pub fn path_arg<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {:?}", arg)?;
        }
        Ok(())
    }
}

/// Executes external commands on behalf of the pipeline
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion; a non-zero exit is an error
    async fn run(&self, command: &ExternalCommand) -> Result<()>;
}

/// Spawns real child processes that inherit the parent's stdio
#[derive(Debug, Default, Clone)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &ExternalCommand) -> Result<()> {
        info!("{}...", command.description);
        debug!("Executing: {}", command);

        let status = Command::new(&command.program)
            .args(&command.args)
            .status()
            .await
            .map_err(|source| {
                error!("Failed: {}", command.description);
                PalikkaError::CommandSpawn {
                    description: command.description.clone(),
                    source,
                }
            })?;

        if !status.success() {
            error!("Failed: {}", command.description);
            return Err(PalikkaError::CommandFailed {
                description: command.description.clone(),
                status,
            });
        }

        info!("{} done.", command.description);
        Ok(())
    }
}
