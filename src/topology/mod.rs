mod addresses;
mod remotes;

pub use addresses::allocate;
pub use remotes::{NO_REMOTE, bind};

use crate::error::LaunchError;

/// Number of parameter server tasks in every cluster. The parameter server
/// always owns the first endpoint.
pub const NUM_PS: usize = 1;

/// Splits a comma separated list, trimming each element.
///
/// # Arguments
/// * `what` - Name of the list, used in error messages.
/// * `spec` - The raw comma separated text.
///
/// # Returns
/// The elements in their given order, or a `LaunchError::Configuration` if
/// any element is empty.
pub fn parse_list(what: &str, spec: &str) -> Result<Vec<String>, LaunchError> {
    spec.split(',')
        .enumerate()
        .map(|(i, item)| {
            let item = item.trim();
            if item.is_empty() {
                return Err(LaunchError::Configuration(format!(
                    "{what}[{i}] is empty in '{spec}'"
                )));
            }
            Ok(item.to_string())
        })
        .collect()
}
