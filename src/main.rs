//! Launches a parameter server, its workers and TensorBoard for a training job.
//!
//! ```bash
//! # Two local workers in a tmux session, printing the commands only
//! a3c-launch -w 2 -n
//!
//! # Workers on other hosts bound to running VNC servers, as nohup processes
//! a3c-launch --dist-workers ps:2222,w0:2222 -r vnc://w0:5900+15900 -m nohup
//! ```

use std::{env, io, num::NonZeroUsize, path::PathBuf};

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};

use a3c_launch::{
    ConfigFile, ExecutionMode, Invocation, LaunchConfig, Topology, runner, topology::parse_list,
};

#[derive(Parser, Debug)]
#[command(name = "a3c-launch", version, about = "Run the training commands")]
#[command(group(ArgGroup::new("cluster").required(true).args(["num_workers", "dist_workers"])))]
struct Cli {
    /// Number of workers
    #[arg(short = 'w', long)]
    num_workers: Option<NonZeroUsize>,

    /// Execute on distributed workers, parameter server first (e.g. --dist-workers someaddr:2222,someaddr2:2222)
    #[arg(long)]
    dist_workers: Option<String>,

    /// The address of pre-existing VNC servers and rewarders to use, one per worker
    /// (e.g. -r vnc://localhost:5900+15900,vnc://localhost:5901+15901)
    #[arg(short, long)]
    remotes: Option<String>,

    /// Environment id
    #[arg(short, long)]
    env_id: Option<String>,

    /// Log directory path
    #[arg(short, long)]
    log_dir: Option<PathBuf>,

    /// Print out commands rather than executing them
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// tmux: run workers in a tmux session. nohup: run workers with nohup. child: run workers as child processes
    #[arg(short, long)]
    mode: Option<String>,

    /// Session name, also used to name the task log files
    #[arg(short, long)]
    session: Option<String>,

    /// Shell used for tmux windows and nohup'd tasks
    #[arg(long)]
    shell: Option<String>,

    /// Program that runs the worker script
    #[arg(long)]
    interpreter: Option<String>,

    /// Worker entry point
    #[arg(long)]
    worker_script: Option<String>,

    /// First port of the generated local cluster
    #[arg(long)]
    base_port: Option<u16>,

    /// Port TensorBoard listens on
    #[arg(long)]
    tensorboard_port: Option<u16>,

    /// JSON file with defaults for any of the optional settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the plan as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Resolves the final configuration: flags over config file over defaults.
    fn launch_config(&self) -> Result<LaunchConfig> {
        let topology = match (&self.dist_workers, self.num_workers) {
            (Some(list), _) => Topology::Explicit {
                endpoints: parse_list("dist-workers", list)?,
            },
            (None, Some(workers)) => Topology::Local { workers },
            (None, None) => anyhow::bail!("one of --num-workers or --dist-workers is required"),
        };

        let mut config = LaunchConfig::new(topology);
        if let Some(path) = &self.config {
            ConfigFile::load(path)
                .and_then(|file| file.apply(&mut config))
                .with_context(|| format!("loading {}", path.display()))?;
        }

        if let Some(mode) = &self.mode {
            config.mode = mode.parse::<ExecutionMode>()?;
        }
        if self.remotes.is_some() {
            config.remotes.clone_from(&self.remotes);
        }
        if let Some(env_id) = &self.env_id {
            config.env_id.clone_from(env_id);
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_dir.clone_from(log_dir);
        }
        if let Some(session) = &self.session {
            config.session.clone_from(session);
        }
        if let Some(shell) = &self.shell {
            config.shell.clone_from(shell);
        }
        if let Some(interpreter) = &self.interpreter {
            config.interpreter.clone_from(interpreter);
        }
        if let Some(worker_script) = &self.worker_script {
            config.worker_script.clone_from(worker_script);
        }
        if let Some(port) = self.base_port {
            config.base_port = port;
        }
        if let Some(port) = self.tensorboard_port {
            config.tensorboard_port = port;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.launch_config()?;
    let invocation = Invocation::from_args(env::args());
    let plan = a3c_launch::plan(&config, &invocation)?;

    if cli.json {
        serde_json::to_writer_pretty(io::stdout(), &plan)?;
        println!();
    } else {
        runner::announce(&mut io::stdout(), &plan, cli.dry_run)?;
    }

    if !cli.dry_run {
        runner::execute(&plan).await?;
    }

    if !cli.json {
        runner::print_notes(&mut io::stdout(), &plan)?;
    }

    Ok(())
}
