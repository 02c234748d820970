use log::debug;

use super::NUM_PS;
use crate::{configs::Topology, error::LaunchError};

const LOOPBACK: &str = "127.0.0.1";

/// Derives the ordered cluster endpoints, parameter server first.
///
/// # Arguments
/// * `topology` - The requested topology.
/// * `base_port` - First port used when endpoints are generated.
///
/// # Returns
/// The endpoint list, or a `LaunchError::Configuration` if the explicit list
/// leaves no room for a worker or the generated ports overflow.
pub fn allocate(topology: &Topology, base_port: u16) -> Result<Vec<String>, LaunchError> {
    let endpoints = match topology {
        Topology::Local { workers } => loopback(workers.get() + NUM_PS, base_port)?,
        Topology::Explicit { endpoints } => {
            if let Some(i) = endpoints.iter().position(|e| e.trim().is_empty()) {
                return Err(LaunchError::Configuration(format!(
                    "dist-workers[{i}] is empty"
                )));
            }
            if endpoints.len() <= NUM_PS {
                return Err(LaunchError::Configuration(format!(
                    "dist-workers needs at least {} endpoints (parameter server first), got {}",
                    NUM_PS + 1,
                    endpoints.len()
                )));
            }
            endpoints.clone()
        }
    };

    debug!(endpoints = endpoints.len(); "allocated cluster endpoints");
    Ok(endpoints)
}

fn loopback(count: usize, base_port: u16) -> Result<Vec<String>, LaunchError> {
    (0..count)
        .map(|i| {
            u16::try_from(i)
                .ok()
                .and_then(|offset| base_port.checked_add(offset))
                .map(|port| format!("{LOOPBACK}:{port}"))
                .ok_or_else(|| {
                    LaunchError::Configuration(format!(
                        "{count} endpoints starting at port {base_port} exceed the port range"
                    ))
                })
        })
        .collect()
}
