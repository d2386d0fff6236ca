//! Fortunes from the `fortune` program.

use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

use crate::error::{Error, Result};

use super::FortuneSource;

const SOURCE_NAME: &str = "Fortune";

/// Runs an external program and uses its standard output as the fortune.
#[derive(Debug, Clone)]
pub struct FortuneCommand {
    program: String,
    args: Vec<String>,
}

impl FortuneCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        FortuneCommand {
            program: program.into(),
            args,
        }
    }

    /// Builds a command from a program followed by its arguments.
    pub fn from_command_line(parts: &[String]) -> Result<Self> {
        match parts.split_first() {
            Some((program, args)) => Ok(FortuneCommand::new(program.clone(), args.to_vec())),
            None => Err(Error::Config("FORTUNE_COMMAND is empty".to_string())),
        }
    }
}

#[async_trait]
impl FortuneSource for FortuneCommand {
    async fn get_fortune(&self) -> Result<String> {
        debug!("Running {} {:?}", self.program, self.args);

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| Error::unavailable(SOURCE_NAME, format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(Error::unavailable(
                SOURCE_NAME,
                format!("{} exited with {}", self.program, output.status),
            ));
        }

        let fortune = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if fortune.is_empty() {
            return Err(Error::unavailable(SOURCE_NAME, "no output"));
        }
        Ok(fortune)
    }
}
