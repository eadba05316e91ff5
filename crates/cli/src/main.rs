//! inventory-relay binary

use clap::Parser;
use colored::Colorize;
use inventory_relay_cli::{logging::init_tracing, Cli, CliResult, Commands};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = cli.load_config()?;
    init_tracing(&config.observability);

    match &cli.command {
        Commands::Run(args) => args.execute(config).await,
        Commands::Config { command } => command.execute(&config),
    }
}
