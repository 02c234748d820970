use log::debug;

use crate::{
    configs::{ExecutionMode, LaunchConfig},
    topology::NUM_PS,
};

/// Name of the parameter server task, also the session anchor window.
pub const PS_TASK: &str = "ps";
/// Name of the metrics visualization task.
pub const TENSORBOARD_TASK: &str = "tb";
/// Name of the interactive system monitor task.
pub const MONITOR_TASK: &str = "htop";

/// What a task does in the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRole {
    ParameterServer,
    Worker { index: usize },
    Auxiliary,
}

/// A named process to launch, before any shell rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalTask {
    pub name: String,
    pub role: TaskRole,
    pub argv: Vec<String>,
}

impl LogicalTask {
    fn new(name: impl Into<String>, role: TaskRole, argv: Vec<String>) -> Self {
        Self {
            name: name.into(),
            role,
            argv,
        }
    }
}

/// Name of the `index`-th worker task.
pub fn worker_task_name(index: usize) -> String {
    format!("w-{index}")
}

/// Expands a topology into the ordered list of tasks to launch.
///
/// The parameter server comes first, then the workers in index order, then
/// the auxiliary tasks. The monitor is only planned under the multiplexed
/// mode, since it needs a terminal of its own.
///
/// # Arguments
/// * `endpoints` - Every cluster endpoint, parameter server first.
/// * `bindings` - One remote identifier per worker.
/// * `config` - The launch configuration.
///
/// # Returns
/// The planned tasks in launch order.
pub fn plan(endpoints: &[String], bindings: &[String], config: &LaunchConfig) -> Vec<LogicalTask> {
    let nworkers = endpoints.len().saturating_sub(NUM_PS);
    debug_assert_eq!(bindings.len(), nworkers);

    let base = base_argv(endpoints, config);
    let mut tasks = Vec::with_capacity(nworkers + 3);

    let mut ps_argv = base.clone();
    ps_argv.extend(["--job-name".into(), "ps".into()]);
    tasks.push(LogicalTask::new(PS_TASK, TaskRole::ParameterServer, ps_argv));

    for (index, remote) in bindings.iter().enumerate().take(nworkers) {
        let mut argv = base.clone();
        argv.extend([
            "--job-name".into(),
            "worker".into(),
            "--task".into(),
            index.to_string(),
            "--remotes".into(),
            remote.clone(),
        ]);
        tasks.push(LogicalTask::new(
            worker_task_name(index),
            TaskRole::Worker { index },
            argv,
        ));
    }

    tasks.push(LogicalTask::new(
        TENSORBOARD_TASK,
        TaskRole::Auxiliary,
        vec![
            "tensorboard".into(),
            "--logdir".into(),
            config.log_dir_str().into_owned(),
            "--port".into(),
            config.tensorboard_port.to_string(),
        ],
    ));

    if config.mode == ExecutionMode::Multiplexed {
        tasks.push(LogicalTask::new(
            MONITOR_TASK,
            TaskRole::Auxiliary,
            vec!["htop".into()],
        ));
    }

    debug!(tasks = tasks.len(), workers = nworkers; "planned tasks");
    tasks
}

/// Arguments shared by the parameter server and every worker.
fn base_argv(endpoints: &[String], config: &LaunchConfig) -> Vec<String> {
    vec![
        "CUDA_VISIBLE_DEVICES=".into(),
        config.interpreter.clone(),
        config.worker_script.clone(),
        "--log-dir".into(),
        config.log_dir_str().into_owned(),
        "--env-id".into(),
        config.env_id.clone(),
        "--workers".into(),
        endpoints.join(","),
    ]
}
