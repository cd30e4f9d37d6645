use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use log::info;
use std::path::Path;

mod cli;
mod demo;

use cli::{Cli, Commands};
use stacknav::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log_stderr {
        env_logger::Builder::from_default_env().init();
    } else {
        // Initialize logger to file (truncate on each run)
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open("stacknav.log")
            .context("Failed to open stacknav.log")?;
        env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .init();
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    info!("Starting stacknav");

    match cli.command {
        Commands::Demo(args) => demo::run(args.scenario, &config).await,
        Commands::Config => show_config(cli.config.as_deref(), &config),
    }
}

fn show_config(explicit: Option<&Path>, config: &Config) -> Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => Config::get_config_path()?,
    };
    let state = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("{} {}{}", "Config:".bright_white().bold(), path.display(), state.dimmed());

    let rendered = toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;
    println!("{}", rendered);
    Ok(())
}
