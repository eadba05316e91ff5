//! Common test utilities: in-memory broker doubles and record builders

#![allow(dead_code)]

use async_trait::async_trait;
use inventory_relay_config::PipelineConfig;
use inventory_relay_types::{encode, BrokerMessage, InventoryRecord};
use processor::kafka::error::Result;
use processor::{KafkaError, MessageSink, MessageSource};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub const SOURCE_TOPIC: &str = "libtest";
pub const DESTINATION_TOPIC: &str = "producer";

pub fn test_config() -> PipelineConfig {
    PipelineConfig {
        source_topic: SOURCE_TOPIC.to_string(),
        destination_topic: DESTINATION_TOPIC.to_string(),
        consumer_group: "test-group".to_string(),
        ..Default::default()
    }
}

/// Source message carrying an encoded inventory record
pub fn inventory_message(offset: i64, key: &str, record: &InventoryRecord) -> BrokerMessage {
    raw_message(offset, key, encode(record))
}

pub fn raw_message(offset: i64, key: &str, value: impl Into<Vec<u8>>) -> BrokerMessage {
    BrokerMessage {
        key: key.as_bytes().to_vec(),
        value: value.into(),
        topic: SOURCE_TOPIC.to_string(),
        partition: 0,
        offset,
        timestamp: None,
    }
}

pub fn record(item: &str, qty: i64) -> InventoryRecord {
    InventoryRecord::new("a", item, qty, "W1", "L1")
}

/// Source fed by the test through a channel
///
/// `fetch` waits for the next pushed message like a broker with no new data
/// would. Dropping the feeding sender makes the next fetch fail, standing in
/// for a lost broker connection.
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<BrokerMessage>,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl MessageSource for ChannelSource {
    async fn fetch(&mut self) -> Result<BrokerMessage> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| KafkaError::consumption("broker connection lost", SOURCE_TOPIC, None, None))
    }

    async fn close(&mut self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct SourceHandle {
    pub feed: mpsc::UnboundedSender<BrokerMessage>,
    pub closes: Arc<AtomicUsize>,
}

impl SourceHandle {
    pub fn push(&self, message: BrokerMessage) {
        self.feed.send(message).unwrap();
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

pub fn channel_source() -> (ChannelSource, SourceHandle) {
    let (feed, rx) = mpsc::unbounded_channel();
    let closes = Arc::new(AtomicUsize::new(0));
    (
        ChannelSource {
            rx,
            closes: Arc::clone(&closes),
        },
        SourceHandle { feed, closes },
    )
}

/// What a [`MemorySink`] has seen
#[derive(Clone, Default)]
pub struct SinkLog {
    batches: Arc<Mutex<Vec<Vec<BrokerMessage>>>>,
    closes: Arc<AtomicUsize>,
}

impl SinkLog {
    pub fn published(&self) -> Vec<BrokerMessage> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// Sink that records every published batch
pub struct MemorySink {
    log: SinkLog,
    delay: Option<Duration>,
    fail_on_publish: Option<usize>,
    attempts: usize,
}

impl MemorySink {
    pub fn new() -> (Self, SinkLog) {
        let log = SinkLog::default();
        (
            Self {
                log: log.clone(),
                delay: None,
                fail_on_publish: None,
                attempts: 0,
            },
            log,
        )
    }

    /// Sleep before each publish
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the nth publish (1-based)
    pub fn failing_on(mut self, attempt: usize) -> Self {
        self.fail_on_publish = Some(attempt);
        self
    }
}

#[async_trait]
impl MessageSink for MemorySink {
    async fn publish(&mut self, batch: &[BrokerMessage]) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.attempts += 1;
        if self.fail_on_publish == Some(self.attempts) {
            return Err(KafkaError::production("delivery timed out", DESTINATION_TOPIC, None));
        }

        self.log.batches.lock().unwrap().push(batch.to_vec());
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.log.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Poll `condition` until it holds, panicking after a few seconds
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(tokio::time::Instant::now() < deadline, "condition not met in time");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Bound a pipeline run so a hang fails the test instead of stalling it
pub async fn within<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(10), future)
        .await
        .expect("pipeline did not stop in time")
}
