//! Run command - relay records until interrupted

use crate::CliResult;
use clap::Args;
use colored::Colorize;
use inventory_relay_config::{MalformedPolicy, RelayConfig};
use processor::{PipelineReport, QuantityFloorTransformer};
use tracing::info;

/// Flags that override the loaded configuration
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Broker addresses
    #[arg(long, value_name = "HOST:PORT", value_delimiter = ',')]
    pub brokers: Option<Vec<String>>,

    /// Topic to consume from
    #[arg(long, value_name = "TOPIC")]
    pub source_topic: Option<String>,

    /// Topic to publish to
    #[arg(long, value_name = "TOPIC")]
    pub destination_topic: Option<String>,

    /// Consumer group
    #[arg(long, short, value_name = "GROUP")]
    pub group: Option<String>,

    /// Quantities below this are published as 0
    #[arg(long, short, value_name = "QTY", allow_negative_numbers = true)]
    pub threshold: Option<i64>,

    /// What to do with records that cannot be decoded (fail, skip)
    #[arg(long, value_name = "POLICY")]
    pub on_malformed: Option<MalformedPolicy>,
}

impl RunArgs {
    /// Apply the flags on top of `config`
    pub fn apply(&self, config: &mut RelayConfig) {
        let pipeline = &mut config.pipeline;

        if let Some(brokers) = &self.brokers {
            pipeline.brokers = brokers.clone();
        }
        if let Some(topic) = &self.source_topic {
            pipeline.source_topic = topic.clone();
        }
        if let Some(topic) = &self.destination_topic {
            pipeline.destination_topic = topic.clone();
        }
        if let Some(group) = &self.group {
            pipeline.consumer_group = group.clone();
        }
        if let Some(threshold) = self.threshold {
            pipeline.quantity_threshold = threshold;
        }
        if let Some(policy) = self.on_malformed {
            pipeline.on_malformed = policy;
        }
    }

    /// Execute the run command
    pub async fn execute(&self, mut config: RelayConfig) -> CliResult<()> {
        self.apply(&mut config);
        config.validate()?;

        let pipeline = &config.pipeline;
        info!(
            brokers = %pipeline.bootstrap_servers(),
            source_topic = %pipeline.source_topic,
            destination_topic = %pipeline.destination_topic,
            threshold = pipeline.quantity_threshold,
            "Relay starting. Press Ctrl+C to stop."
        );

        let transformer = QuantityFloorTransformer::new(pipeline.quantity_threshold);
        let report = processor::run(pipeline, transformer).await?;

        print_summary(&report);
        Ok(())
    }
}

fn print_summary(report: &PipelineReport) {
    println!();
    println!("{}", "Summary:".bold().cyan());
    println!("  Consumed:   {}", report.records_consumed);
    println!("  Published:  {}", report.records_published.to_string().green());
    if report.records_skipped > 0 {
        println!("  Skipped:    {}", report.records_skipped.to_string().yellow());
    }
}
