use std::{borrow::Cow, num::NonZeroUsize, path::PathBuf};

use super::ExecutionMode;

const DEFAULT_ENV_ID: &str = "PongDeterministic-v3";
const DEFAULT_LOG_DIR: &str = "/tmp/pong";
const DEFAULT_SESSION: &str = "a3c";
const DEFAULT_SHELL: &str = "bash";
const DEFAULT_INTERPRETER: &str = "python3";
const DEFAULT_WORKER_SCRIPT: &str = "worker.py";
const DEFAULT_BASE_PORT: u16 = 12222;
const DEFAULT_TENSORBOARD_PORT: u16 = 12345;

const DRY_RUN_LONG: &str = "--dry-run";
const DRY_RUN_SHORT: char = 'n';

/// How the cluster endpoints are obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    /// Generate loopback endpoints for the parameter server plus `workers` workers.
    /// `workers` never counts the parameter server.
    Local { workers: NonZeroUsize },
    /// Use these endpoints verbatim, parameter server first.
    Explicit { endpoints: Vec<String> },
}

/// Everything the planning pipeline needs, threaded explicitly through every stage.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub topology: Topology,
    pub remotes: Option<String>,
    pub env_id: String,
    pub log_dir: PathBuf,
    pub mode: ExecutionMode,
    pub session: String,
    pub shell: String,
    pub interpreter: String,
    pub worker_script: String,
    pub base_port: u16,
    pub tensorboard_port: u16,
}

impl LaunchConfig {
    /// Creates a new `LaunchConfig` with every optional setting at its default.
    ///
    /// # Arguments
    /// * `topology` - How the cluster endpoints are obtained.
    ///
    /// # Returns
    /// A new `LaunchConfig` instance.
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            remotes: None,
            env_id: DEFAULT_ENV_ID.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            mode: ExecutionMode::default(),
            session: DEFAULT_SESSION.to_string(),
            shell: DEFAULT_SHELL.to_string(),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            worker_script: DEFAULT_WORKER_SCRIPT.to_string(),
            base_port: DEFAULT_BASE_PORT,
            tensorboard_port: DEFAULT_TENSORBOARD_PORT,
        }
    }

    /// The log directory as it appears inside generated commands.
    pub fn log_dir_str(&self) -> Cow<'_, str> {
        self.log_dir.to_string_lossy()
    }

    /// Path of the per-task output file.
    pub fn task_log_path(&self, task_name: &str) -> String {
        format!("{}/{}.{}.out", self.log_dir_str(), self.session, task_name)
    }

    /// Path of the teardown script shared by every task of a detached or foreground launch.
    pub fn kill_script_path(&self) -> String {
        format!("{}/kill.sh", self.log_dir_str())
    }

    /// Path of the file where the original invocation is recorded.
    pub fn invocation_record_path(&self) -> String {
        format!("{}/cmd.sh", self.log_dir_str())
    }
}

/// The command line that produced a launch, recorded for reproducibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Builds an `Invocation` from a raw argument list, `argv[0]` first.
    ///
    /// Dry-run flags are dropped: re-running the recorded command should
    /// actually launch the job.
    pub fn from_args<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next().unwrap_or_default();
        let args = argv.filter_map(strip_dry_run).collect();

        Self { program, args }
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }
}

/// Removes the dry-run flag from one argument, including from clustered short
/// flags such as `-nm`. The flag is a plain switch, so it can only appear
/// ahead of a value-taking short flag in a cluster.
fn strip_dry_run(arg: String) -> Option<String> {
    if arg == DRY_RUN_LONG {
        return None;
    }

    let Some(cluster) = arg.strip_prefix('-') else {
        return Some(arg);
    };
    if cluster.starts_with('-') || !cluster.starts_with(DRY_RUN_SHORT) {
        return Some(arg);
    }

    let rest = cluster.trim_start_matches(DRY_RUN_SHORT);
    (!rest.is_empty()).then(|| format!("-{rest}"))
}
