//! Command-line configuration and dependency wiring.

mod args;
mod dependencies;

pub use args::{Cli, Command, ConnectionArgs, LogFormat};
pub use dependencies::Dependencies;
