use std::{io::Write, process::ExitStatus};

use log::{info, warn};
use tokio::process::Command;

use crate::{error::LaunchError, session::LaunchPlan};

/// Interpreter the launch script is handed to.
const SCRIPT_SHELL: &str = "sh";

/// Prints the commands of a plan, preceded by a header saying whether they will run.
pub fn announce<W: Write>(out: &mut W, plan: &LaunchPlan, dry_run: bool) -> std::io::Result<()> {
    if dry_run {
        writeln!(
            out,
            "Dry-run mode due to -n flag, otherwise the following commands would be executed:"
        )?;
    } else {
        writeln!(out, "Executing the following commands:")?;
    }

    for cmd in &plan.commands {
        writeln!(out, "{cmd}")?;
    }
    writeln!(out)
}

/// Prints the operator notes of a plan.
pub fn print_notes<W: Write>(out: &mut W, plan: &LaunchPlan) -> std::io::Result<()> {
    for note in &plan.notes {
        writeln!(out, "{note}")?;
    }
    Ok(())
}

/// Runs every command of the plan as a single script and waits for it.
///
/// The tasks themselves are left running in the background; only the script
/// that starts them is awaited. A non-zero exit is reported but is not an
/// error, since a failing `tmux kill-session` on a fresh machine is expected.
///
/// # Errors
/// Returns `LaunchError::Io` if the script interpreter cannot be spawned.
pub async fn execute(plan: &LaunchPlan) -> Result<ExitStatus, LaunchError> {
    info!(commands = plan.commands.len(); "executing launch script");

    let status = Command::new(SCRIPT_SHELL)
        .arg("-c")
        .arg(plan.script())
        .status()
        .await?;

    if !status.success() {
        warn!("launch script exited with {status}");
    }

    Ok(status)
}
