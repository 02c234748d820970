use std::{fmt, str::FromStr};

use crate::error::LaunchError;

/// The process-supervision strategy used to run every task of a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One `tmux` window per task, commands typed in with `send-keys`.
    #[default]
    Multiplexed,
    /// Tasks run through `nohup` so they survive the terminal going away.
    Detached,
    /// Tasks run as background children of the launching shell.
    Foreground,
}

impl FromStr for ExecutionMode {
    type Err = LaunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tmux" | "multiplexed" => Ok(Self::Multiplexed),
            "nohup" | "detached" => Ok(Self::Detached),
            "child" | "foreground" => Ok(Self::Foreground),
            other => Err(LaunchError::UnsupportedMode(other.to_string())),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Multiplexed => "tmux",
            Self::Detached => "nohup",
            Self::Foreground => "child",
        };
        f.write_str(name)
    }
}
