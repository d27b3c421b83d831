/// CLI argument parsing and command handling - Gateway
mod args;
mod commands;

pub use args::{AccessCommand, Cli, Commands, OutputFormat, Theme};
pub use commands::{handle_command, show_version};
