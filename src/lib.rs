pub mod configs;
pub mod error;
pub mod planner;
mod quote;
pub mod render;
pub mod runner;
pub mod session;
pub mod topology;

pub use configs::{ConfigFile, ExecutionMode, Invocation, LaunchConfig, Topology};
pub use error::LaunchError;
pub use session::LaunchPlan;

/// Plans a full launch: endpoints, remote bindings, tasks and the session around them.
///
/// # Arguments
/// * `config` - The launch configuration.
/// * `invocation` - The command line recorded next to the logs.
///
/// # Errors
/// Returns a `LaunchError` if the topology is invalid or the remotes do not
/// match the worker count. Nothing is rendered in that case.
pub fn plan(config: &LaunchConfig, invocation: &Invocation) -> Result<LaunchPlan, LaunchError> {
    let endpoints = topology::allocate(&config.topology, config.base_port)?;
    let nworkers = endpoints.len() - topology::NUM_PS;
    let bindings = topology::bind(nworkers, config.remotes.as_deref())?;

    log::info!("planning {nworkers} worker(s) in {} mode", config.mode);
    let tasks = planner::plan(&endpoints, &bindings, config);
    let rendered = render::render_all(&tasks, config);

    Ok(session::compose(&tasks, rendered, config, invocation))
}
