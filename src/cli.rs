use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::demo::Scenario;

#[derive(Parser)]
#[command(name = "stacknav")]
#[command(about = "Stack and tab navigation controller playground")]
pub struct Cli {
    /// Log to stderr instead of stacknav.log
    #[arg(long, global = true)]
    pub log_stderr: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play a scripted navigation scenario on the demo application
    Demo(DemoCommands),
    /// Show the resolved configuration
    Config,
}

#[derive(Args)]
pub struct DemoCommands {
    /// Scenario to play
    #[arg(value_enum, default_value_t = Scenario::All)]
    pub scenario: Scenario,
}
