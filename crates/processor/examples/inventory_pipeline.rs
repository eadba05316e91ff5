//! Kafka-to-Kafka inventory relay example
//!
//! Consumes inventory records, zeroes quantities below the threshold, and
//! republishes them.
//!
//! # Setup
//!
//! 1. Start Kafka:
//!    ```bash
//!    docker-compose up -d kafka
//!    ```
//!
//! 2. Create topics:
//!    ```bash
//!    kafka-topics --create --topic libtest --bootstrap-server localhost:9092
//!    kafka-topics --create --topic producer --bootstrap-server localhost:9092
//!    ```
//!
//! 3. Run the example:
//!    ```bash
//!    cargo run --example inventory_pipeline
//!    ```
//!
//! 4. Produce test records:
//!    ```bash
//!    kafka-console-producer --topic libtest --bootstrap-server localhost:9092
//!    {"_comment":"a","item_number":"X1","actual_qty":5,"wh_id":"W1","location_id":"L1"}
//!    ```
//!
//! 5. Consume results:
//!    ```bash
//!    kafka-console-consumer --topic producer --bootstrap-server localhost:9092 --from-beginning
//!    ```

use inventory_relay_config::PipelineConfig;
use processor::QuantityFloorTransformer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set RUST_LOG to control verbosity, e.g. RUST_LOG=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = PipelineConfig {
        brokers: std::env::var("KAFKA_BROKERS")
            .unwrap_or_else(|_| "localhost:9092".to_string())
            .split(',')
            .map(str::to_string)
            .collect(),
        consumer_group: "inventory-relay-example".to_string(),
        ..Default::default()
    };

    info!("Pipeline running. Press Ctrl+C to stop.");

    let transformer = QuantityFloorTransformer::new(config.quantity_threshold);
    let report = processor::run(&config, transformer).await?;

    info!(
        consumed = report.records_consumed,
        published = report.records_published,
        "Pipeline stopped successfully"
    );
    Ok(())
}
