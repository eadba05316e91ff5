//! Config command - inspect and validate the resolved configuration

use crate::CliResult;
use clap::Subcommand;
use colored::Colorize;
use inventory_relay_config::RelayConfig;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the resolved configuration as JSON
    #[command(name = "show", about = "Print the resolved configuration")]
    Show,

    /// Validate the resolved configuration
    #[command(name = "validate", about = "Validate the resolved configuration")]
    Validate,
}

impl ConfigCommand {
    /// Execute the config command
    pub fn execute(&self, config: &RelayConfig) -> CliResult<()> {
        match self {
            ConfigCommand::Show => {
                println!("{}", serde_json::to_string_pretty(config)?);
                Ok(())
            }
            ConfigCommand::Validate => {
                config.validate()?;
                println!("{} Configuration is valid", "✓".green());
                println!(
                    "  {} -> {} via {}",
                    config.pipeline.source_topic.bold(),
                    config.pipeline.destination_topic.bold(),
                    config.pipeline.bootstrap_servers()
                );
                Ok(())
            }
        }
    }
}
