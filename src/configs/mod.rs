mod file;
mod launch;
mod mode;

pub use file::ConfigFile;
pub use launch::{Invocation, LaunchConfig, Topology};
pub use mode::ExecutionMode;
