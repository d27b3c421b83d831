use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "beebot-partner")]
#[command(version)]
#[command(about = "Beebot partner client: session, settings and owner-access statements", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for command results
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Log in to the partner backend
    Login {
        username: String,
        /// Password (prefer the environment variable)
        #[arg(long, env = "BEEBOT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and notify the backend
    Logout,
    /// Refresh and show the logged-in identity
    Whoami,
    /// Show session and owner-access state
    Status,
    /// Change the display language (e.g. en, id)
    Locale { tag: String },
    /// Change the theme
    Theme {
        #[arg(value_enum)]
        theme: Theme,
    },
    /// Change the account password
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    /// Owner-access PIN management
    Access {
        #[command(subcommand)]
        command: AccessCommand,
    },
    /// Show bills (owner access required)
    Bills,
    /// Show cashbacks (owner access required)
    Cashback {
        /// List available periods instead
        #[arg(long, conflicts_with = "month")]
        periods: bool,
        /// Period to show, as listed by --periods
        #[arg(long)]
        month: Option<String>,
    },
    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum AccessCommand {
    /// Check whether a PIN exists and the held unlock is still valid
    Status,
    /// Unlock with the owner PIN
    Enter { pin: String },
    /// Create the owner PIN
    Set { pin: String },
    /// Drop the unlock on this device
    Disable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
}
