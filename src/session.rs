use log::info;
use serde::Serialize;

use crate::{
    configs::{ExecutionMode, Invocation, LaunchConfig},
    planner::LogicalTask,
    quote::{join, quote},
    render::RenderedCommand,
};

/// The final artifact of a launch: the commands to run and what to tell the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    pub commands: Vec<String>,
    pub notes: Vec<String>,
}

impl LaunchPlan {
    /// The commands joined into a single shell script.
    pub fn script(&self) -> String {
        self.commands.join("\n")
    }
}

/// Accumulates the ordered commands and notes of a `LaunchPlan`.
#[derive(Debug, Default)]
pub struct PlanBuilder {
    plan: LaunchPlan,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(&mut self, command: impl Into<String>) -> &mut Self {
        self.plan.commands.push(command.into());
        self
    }

    pub fn commands<I>(&mut self, commands: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.plan.commands.extend(commands.into_iter().map(Into::into));
        self
    }

    pub fn note(&mut self, note: impl Into<String>) -> &mut Self {
        self.plan.notes.push(note.into());
        self
    }

    pub fn build(self) -> LaunchPlan {
        self.plan
    }
}

/// Wraps the rendered task commands with the session lifecycle commands.
///
/// # Arguments
/// * `tasks` - The planned tasks, in launch order.
/// * `rendered` - One rendered command per task, in the same order.
/// * `config` - The launch configuration.
/// * `invocation` - The command line recorded under the log directory.
///
/// # Returns
/// The complete `LaunchPlan`. Nothing is executed here.
pub fn compose(
    tasks: &[LogicalTask],
    rendered: Vec<RenderedCommand>,
    config: &LaunchConfig,
    invocation: &Invocation,
) -> LaunchPlan {
    debug_assert_eq!(tasks.len(), rendered.len());

    let log_dir = config.log_dir_str();
    let mut builder = PlanBuilder::new();

    builder
        .command(format!("mkdir -p {}", quote(&log_dir)))
        .command(format!(
            "printf '%s\\n' {} > {}",
            quote(&join(invocation.argv())),
            quote(&config.invocation_record_path())
        ));

    match config.mode {
        ExecutionMode::Detached | ExecutionMode::Foreground => {
            let kill_script = config.kill_script_path();
            let quoted = quote(&kill_script);
            builder
                .command(format!("echo '#!/bin/sh' >{quoted} && chmod +x {quoted}"))
                .note(format!("Run `source {kill_script}` to kill the job"))
                .note(format!("Use `tail -f {log_dir}/*.out` to watch process output"));
        }
        ExecutionMode::Multiplexed => {
            let session = quote(&config.session);
            let shell = quote(&config.shell);

            builder.command(format!("tmux kill-session -t {session}"));
            if let Some((anchor, rest)) = tasks.split_first() {
                builder
                    .command(format!(
                        "tmux new-session -s {session} -n {} -d {shell}",
                        quote(&anchor.name)
                    ))
                    .commands(rest.iter().map(|task| {
                        format!("tmux new-window -t {session} -n {} {shell}", quote(&task.name))
                    }));
            }
            builder
                .command("sleep 1")
                .note(format!(
                    "Use `tmux attach -t {}` to watch process output",
                    config.session
                ))
                .note(format!(
                    "Use `tmux kill-session -t {}` to kill the job",
                    config.session
                ));
        }
    }

    builder
        .commands(rendered.into_iter().map(|cmd| cmd.shell_text))
        .note(format!(
            "Point your browser to http://localhost:{} to see Tensorboard",
            config.tensorboard_port
        ));

    let plan = builder.build();
    let mode = config.mode.to_string();
    info!(
        mode = mode.as_str(),
        tasks = tasks.len(),
        commands = plan.commands.len();
        "composed launch plan"
    );
    plan
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::{configs::Topology, planner::TaskRole, render::render_all};

    fn config(mode: ExecutionMode) -> LaunchConfig {
        let mut cfg = LaunchConfig::new(Topology::Local {
            workers: NonZeroUsize::new(1).unwrap(),
        });
        cfg.mode = mode;
        cfg
    }

    fn tasks(names: &[&str]) -> Vec<LogicalTask> {
        names
            .iter()
            .map(|name| LogicalTask {
                name: name.to_string(),
                role: TaskRole::Auxiliary,
                argv: vec!["echo".into(), name.to_string()],
            })
            .collect()
    }

    fn invocation() -> Invocation {
        Invocation::from_args(["a3c-launch", "-n", "-w", "1"])
    }

    #[test]
    fn test_builder_keeps_order() {
        let mut builder = PlanBuilder::new();
        builder.command("a").commands(["b", "c"]).note("x").command("d");
        let plan = builder.build();

        assert_eq!(plan.commands, ["a", "b", "c", "d"]);
        assert_eq!(plan.notes, ["x"]);
        assert_eq!(plan.script(), "a\nb\nc\nd");
    }

    #[test]
    fn test_multiplexed_session_lifecycle() {
        let cfg = config(ExecutionMode::Multiplexed);
        let tasks = tasks(&["ps", "w-0"]);
        let plan = compose(&tasks, render_all(&tasks, &cfg), &cfg, &invocation());

        assert_eq!(
            plan.commands[..6],
            [
                "mkdir -p /tmp/pong",
                "printf '%s\\n' 'a3c-launch -w 1' > /tmp/pong/cmd.sh",
                "tmux kill-session -t a3c",
                "tmux new-session -s a3c -n ps -d bash",
                "tmux new-window -t a3c -n w-0 bash",
                "sleep 1",
            ]
        );
        assert_eq!(plan.commands.len(), 8);
        assert!(plan.commands.iter().all(|c| !c.contains("kill.sh")));
        assert_eq!(
            plan.notes,
            [
                "Use `tmux attach -t a3c` to watch process output",
                "Use `tmux kill-session -t a3c` to kill the job",
                "Point your browser to http://localhost:12345 to see Tensorboard",
            ]
        );
    }

    #[test]
    fn test_background_modes_bootstrap_kill_script() {
        for mode in [ExecutionMode::Detached, ExecutionMode::Foreground] {
            let cfg = config(mode);
            let tasks = tasks(&["ps", "w-0", "tb"]);
            let plan = compose(&tasks, render_all(&tasks, &cfg), &cfg, &invocation());

            assert_eq!(
                plan.commands[2],
                "echo '#!/bin/sh' >/tmp/pong/kill.sh && chmod +x /tmp/pong/kill.sh"
            );
            assert_eq!(plan.commands.len(), 3 + tasks.len());
            assert!(plan.commands.iter().all(|c| !c.starts_with("tmux")));
            assert_eq!(
                plan.notes,
                [
                    "Run `source /tmp/pong/kill.sh` to kill the job",
                    "Use `tail -f /tmp/pong/*.out` to watch process output",
                    "Point your browser to http://localhost:12345 to see Tensorboard",
                ]
            );
        }
    }

    #[test]
    fn test_task_commands_follow_planning_order() {
        let cfg = config(ExecutionMode::Foreground);
        let tasks = tasks(&["ps", "w-0", "w-1", "tb"]);
        let plan = compose(&tasks, render_all(&tasks, &cfg), &cfg, &invocation());

        let names: Vec<_> = plan.commands[3..]
            .iter()
            .map(|c| c.split_whitespace().nth(1).unwrap())
            .collect();
        assert_eq!(names, ["ps", "w-0", "w-1", "tb"]);
    }

    #[test]
    fn test_invocation_is_quoted() {
        let cfg = config(ExecutionMode::Foreground);
        let inv = Invocation::from_args(["a3c-launch", "-e", "Pong v3", "--dry-run"]);
        let plan = compose(&[], Vec::new(), &cfg, &inv);
        assert_eq!(
            plan.commands[1],
            r#"printf '%s\n' 'a3c-launch -e '"'"'Pong v3'"'"'' > /tmp/pong/cmd.sh"#
        );
    }
}
