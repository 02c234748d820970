use std::{fmt, io};

/// All errors that can occur while planning a launch.
///
/// Every variant is raised before a single command is rendered, so an error
/// never leaves a partially built plan behind.
#[derive(Debug)]
pub enum LaunchError {
    /// Invalid configuration: bad topology, malformed lists or config file.
    Configuration(String),
    /// The remote resource list does not have one entry per worker.
    TopologyMismatch { expected: usize, got: usize },
    /// The execution mode string is not one of the known modes.
    UnsupportedMode(String),
    /// An underlying I/O error (config file read, script spawn).
    Io(io::Error),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "invalid config: {msg}"),
            Self::TopologyMismatch { expected, got } => write!(
                f,
                "topology mismatch: got {got} remote(s), expected one per worker ({expected})"
            ),
            Self::UnsupportedMode(mode) => write!(
                f,
                "unsupported mode '{mode}': expected one of tmux, nohup, child \
                 (or multiplexed, detached, foreground)"
            ),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LaunchError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
