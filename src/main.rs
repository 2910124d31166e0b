mod commands;
mod config;
mod datacenter;
mod error;
mod output;
mod poll;
mod provider;
mod summary;
mod update;

use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use log::info;

use commands::{QueryStatusArgs, UpdateDatacenterArgs};
use provider::gtm::GtmClient;

#[derive(Parser, Debug)]
#[command(name = "gtm-datacenter")]
#[command(about = "Enable or disable GTM datacenters across the properties of a domain")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "gtm.toml")]
    config: String,

    /// Credential section to use
    #[arg(short, long, default_value = "default")]
    section: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Update datacenter enabled state in every property of a domain
    UpdateDatacenter(UpdateDatacenterArgs),
    /// Show the current propagation status of a domain
    QueryStatus(QueryStatusArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("{:#}", e).red());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    // Load configuration first (before logger init)
    let config = config::Config::load(&args.config)?;

    // Initialize logger with config log level (env var takes precedence)
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.settings.log_level),
    )
    .init();

    info!("Loaded configuration from: {}", args.config);
    let section = config.get_section(&args.section)?;
    info!("Using credential section {} for {}", section.name, section.host);

    let client = GtmClient::new(section)?;

    match args.command {
        Command::UpdateDatacenter(cmd) => {
            commands::update_datacenter(&client, cmd, &config.settings, print_update_help).await
        }
        Command::QueryStatus(cmd) => commands::query_status(&client, cmd).await,
    }
}

fn print_update_help() {
    let mut cli = Args::command();
    if let Some(sub) = cli.find_subcommand_mut("update-datacenter") {
        let _ = sub.print_help();
    }
}
