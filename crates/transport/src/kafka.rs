//! Kafka backend built on `rdkafka`.
//!
//! Consumers are assigned a single partition directly. No consumer group
//! coordination happens and offsets are never committed, so every new
//! connection starts reading from the beginning of the partition.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use rdkafka::{Offset, TopicPartitionList};

use crate::{Connector, Result, SharedConnection, TopicConnection, TransportError};

/// Opens partition-bound connections against a Kafka cluster.
#[derive(Clone)]
pub struct KafkaConnector {
    brokers: String,
    timeout: Duration,
}

impl KafkaConnector {
    /// Creates a connector for a comma separated `bootstrap.servers` list.
    pub fn new(brokers: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Sets the timeout used for metadata probes and produce acknowledgements.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn connect_error(&self, topic: &str, reason: impl ToString) -> TransportError {
        TransportError::Connect {
            address: self.brokers.clone(),
            topic: topic.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl Connector for KafkaConnector {
    fn address(&self) -> &str {
        &self.brokers
    }

    async fn connect(&self, topic: &str, partition: i32) -> Result<SharedConnection> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .set("message.timeout.ms", self.timeout.as_millis().to_string())
            .create()
            .map_err(|e| self.connect_error(topic, e))?;

        // Creating a client never dials the broker, so probe metadata to
        // surface an unreachable cluster at connect time.
        let probe = producer.clone();
        let probe_topic = topic.to_string();
        let timeout = self.timeout;
        tokio::task::spawn_blocking(move || {
            probe
                .client()
                .fetch_metadata(Some(probe_topic.as_str()), Timeout::After(timeout))
                .map(|_| ())
        })
        .await
        .map_err(|e| self.connect_error(topic, e))?
        .map_err(|e| self.connect_error(topic, e))?;

        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .set("group.id", format!("{topic}-{partition}-reader"))
            .set("enable.auto.commit", "false")
            .set("enable.auto.offset.store", "false")
            .set("enable.partition.eof", "false")
            .create()
            .map_err(|e| self.connect_error(topic, e))?;

        let mut assignment = TopicPartitionList::new();
        assignment
            .add_partition_offset(topic, partition, Offset::Beginning)
            .map_err(|e| self.connect_error(topic, e))?;
        consumer
            .assign(&assignment)
            .map_err(|e| self.connect_error(topic, e))?;

        tracing::info!(brokers = %self.brokers, topic, partition, "connected to kafka partition");

        Ok(Arc::new(KafkaConnection {
            topic: topic.to_string(),
            partition,
            timeout: self.timeout,
            producer,
            consumer,
        }))
    }
}

struct KafkaConnection {
    topic: String,
    partition: i32,
    timeout: Duration,
    producer: FutureProducer,
    consumer: StreamConsumer,
}

#[async_trait]
impl TopicConnection for KafkaConnection {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn partition(&self) -> i32 {
        self.partition
    }

    async fn send(&self, payload: &[u8]) -> Result<()> {
        let record = FutureRecord::<(), [u8]>::to(&self.topic)
            .partition(self.partition)
            .payload(payload);

        self.producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map(|_| ())
            .map_err(|(e, _)| TransportError::io(&self.topic, e))
    }

    async fn receive(&self) -> Result<Vec<u8>> {
        let message = self
            .consumer
            .recv()
            .await
            .map_err(|e| TransportError::io(&self.topic, e))?;
        Ok(message.payload().map(<[u8]>::to_vec).unwrap_or_default())
    }
}
