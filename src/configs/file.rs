use std::{fs, path::Path, path::PathBuf};

use serde::Deserialize;

use super::{ExecutionMode, LaunchConfig};
use crate::error::LaunchError;

/// Launch defaults loaded from a JSON file.
///
/// Every field is optional; whatever is present overrides the built-in
/// default, and command line flags override the file in turn.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub remotes: Option<String>,
    pub env_id: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub mode: Option<String>,
    pub session: Option<String>,
    pub shell: Option<String>,
    pub interpreter: Option<String>,
    pub worker_script: Option<String>,
    pub base_port: Option<u16>,
    pub tensorboard_port: Option<u16>,
}

impl ConfigFile {
    /// Loads a `ConfigFile` from a JSON file.
    ///
    /// # Errors
    /// Returns `LaunchError::Io` if the file cannot be read and
    /// `LaunchError::Configuration` if it is not valid JSON for this schema.
    pub fn load(path: &Path) -> Result<Self, LaunchError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| LaunchError::Configuration(format!("{}: {e}", path.display())))
    }

    /// Parses a `ConfigFile` from JSON text.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Writes every value present in the file over `config`.
    ///
    /// # Errors
    /// Returns `LaunchError::UnsupportedMode` if the file names an unknown mode.
    pub fn apply(self, config: &mut LaunchConfig) -> Result<(), LaunchError> {
        if let Some(mode) = self.mode {
            config.mode = mode.parse::<ExecutionMode>()?;
        }
        if self.remotes.is_some() {
            config.remotes = self.remotes;
        }
        if let Some(env_id) = self.env_id {
            config.env_id = env_id;
        }
        if let Some(log_dir) = self.log_dir {
            config.log_dir = log_dir;
        }
        if let Some(session) = self.session {
            config.session = session;
        }
        if let Some(shell) = self.shell {
            config.shell = shell;
        }
        if let Some(interpreter) = self.interpreter {
            config.interpreter = interpreter;
        }
        if let Some(worker_script) = self.worker_script {
            config.worker_script = worker_script;
        }
        if let Some(port) = self.base_port {
            config.base_port = port;
        }
        if let Some(port) = self.tensorboard_port {
            config.tensorboard_port = port;
        }
        Ok(())
    }
}
