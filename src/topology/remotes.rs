use log::debug;

use super::parse_list;
use crate::error::LaunchError;

/// Remote identifier meaning "no pre-existing resource, start your own".
pub const NO_REMOTE: &str = "1";

/// Binds every worker to a remote resource identifier.
///
/// # Arguments
/// * `nworkers` - Number of worker tasks, the parameter server excluded.
/// * `remotes` - Optional comma separated list of remote identifiers.
///
/// # Returns
/// One identifier per worker in worker order, or a
/// `LaunchError::TopologyMismatch` if the list does not have exactly one
/// entry per worker.
pub fn bind(nworkers: usize, remotes: Option<&str>) -> Result<Vec<String>, LaunchError> {
    let Some(spec) = remotes else {
        return Ok(vec![NO_REMOTE.to_string(); nworkers]);
    };

    let bindings = parse_list("remotes", spec)?;
    if bindings.len() != nworkers {
        return Err(LaunchError::TopologyMismatch {
            expected: nworkers,
            got: bindings.len(),
        });
    }

    debug!(remotes = bindings.len(); "bound workers to remotes");
    Ok(bindings)
}
