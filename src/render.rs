use log::debug;

use crate::{
    configs::{ExecutionMode, LaunchConfig},
    planner::LogicalTask,
    quote::{join, quote},
};

/// The shell text that launches one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCommand {
    pub task_name: String,
    pub shell_text: String,
}

/// Renders a single task into the shell command that launches it.
///
/// The task's argv is always quoted word by word before it is embedded, and
/// under the multiplexed and detached modes the whole command is quoted once
/// more as a single argument.
///
/// # Arguments
/// * `task` - The task to render.
/// * `config` - The launch configuration, mode included.
///
/// # Returns
/// The rendered command.
pub fn render(task: &LogicalTask, config: &LaunchConfig) -> RenderedCommand {
    let cmd = join(&task.argv);

    let shell_text = match config.mode {
        ExecutionMode::Multiplexed => format!(
            "tmux send-keys -t {}:{} {} Enter",
            quote(&config.session),
            quote(&task.name),
            quote(&cmd)
        ),
        ExecutionMode::Foreground => background(&cmd, task, config),
        ExecutionMode::Detached => {
            let nohup = format!("nohup {} -c {}", quote(&config.shell), quote(&cmd));
            background(&nohup, task, config)
        }
    };

    RenderedCommand {
        task_name: task.name.clone(),
        shell_text,
    }
}

/// Renders every task in planning order.
pub fn render_all(tasks: &[LogicalTask], config: &LaunchConfig) -> Vec<RenderedCommand> {
    let rendered: Vec<_> = tasks
        .iter()
        .map(|task| {
            let cmd = render(task, config);
            debug!(task = cmd.task_name.as_str(); "rendered task");
            cmd
        })
        .collect();

    debug_assert!(
        rendered
            .iter()
            .enumerate()
            .all(|(i, a)| rendered[..i].iter().all(|b| a.task_name != b.task_name)),
        "task names must be unique"
    );

    rendered
}

/// Sends `cmd` to the background with its output in the task log, and
/// appends a kill directive for it to the teardown script.
fn background(cmd: &str, task: &LogicalTask, config: &LaunchConfig) -> String {
    format!(
        "{cmd} >{} 2>&1 & echo kill $! >>{}",
        quote(&config.task_log_path(&task.name)),
        quote(&config.kill_script_path())
    )
}
