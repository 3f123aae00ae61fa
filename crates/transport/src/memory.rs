use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock, watch};

use crate::{Connector, Result, SharedConnection, TopicConnection, TransportError};

/// Address reported by the in-memory broker.
pub const MEMORY_ADDRESS: &str = "memory://local";

type PartitionKey = (String, i32);

struct PartitionLog {
    messages: Vec<Vec<u8>>,
    len_tx: watch::Sender<usize>,
}

impl PartitionLog {
    fn new() -> Self {
        let (len_tx, _) = watch::channel(0);
        Self {
            messages: Vec::new(),
            len_tx,
        }
    }
}

#[derive(Default)]
struct BrokerState {
    partitions: HashMap<PartitionKey, PartitionLog>,
    failing_topics: HashSet<String>,
    unreachable: bool,
}

/// In-memory broker for tests and single-process deployments.
///
/// Each topic partition is an append-only log. Every connection keeps its own
/// read cursor starting at the beginning of the log, so two connections on the
/// same partition both see every payload.
#[derive(Clone, Default)]
pub struct InMemoryBroker {
    state: Arc<RwLock<BrokerState>>,
}

impl InMemoryBroker {
    /// Creates a new empty broker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every send to `topic` fail with an I/O error while `fail` is set.
    pub async fn set_fail_on_send(&self, topic: &str, fail: bool) {
        let mut state = self.state.write().await;
        if fail {
            state.failing_topics.insert(topic.to_string());
        } else {
            state.failing_topics.remove(topic);
        }
    }

    /// Makes new connections fail as if the broker were down.
    pub async fn set_unreachable(&self, unreachable: bool) {
        self.state.write().await.unreachable = unreachable;
    }

    /// Returns every payload published to a partition so far.
    pub async fn messages(&self, topic: &str, partition: i32) -> Vec<Vec<u8>> {
        self.state
            .read()
            .await
            .partitions
            .get(&(topic.to_string(), partition))
            .map(|log| log.messages.clone())
            .unwrap_or_default()
    }

    /// Returns the number of payloads published to a partition.
    pub async fn message_count(&self, topic: &str, partition: i32) -> usize {
        self.state
            .read()
            .await
            .partitions
            .get(&(topic.to_string(), partition))
            .map_or(0, |log| log.messages.len())
    }

    async fn publish(&self, key: &PartitionKey, payload: &[u8]) -> Result<()> {
        let mut state = self.state.write().await;
        if state.failing_topics.contains(&key.0) {
            return Err(TransportError::io(&key.0, "broker rejected write"));
        }
        let log = state
            .partitions
            .entry(key.clone())
            .or_insert_with(PartitionLog::new);
        log.messages.push(payload.to_vec());
        log.len_tx.send_replace(log.messages.len());
        Ok(())
    }
}

#[async_trait]
impl Connector for InMemoryBroker {
    fn address(&self) -> &str {
        MEMORY_ADDRESS
    }

    async fn connect(&self, topic: &str, partition: i32) -> Result<SharedConnection> {
        let mut state = self.state.write().await;
        if state.unreachable {
            return Err(TransportError::Connect {
                address: MEMORY_ADDRESS.to_string(),
                topic: topic.to_string(),
                reason: "broker unreachable".to_string(),
            });
        }

        let key = (topic.to_string(), partition);
        let len_rx = state
            .partitions
            .entry(key.clone())
            .or_insert_with(PartitionLog::new)
            .len_tx
            .subscribe();

        tracing::debug!(topic, partition, "opened in-memory connection");

        Ok(Arc::new(MemoryConnection {
            broker: self.clone(),
            key,
            reader: Mutex::new(Reader { cursor: 0, len_rx }),
        }))
    }
}

struct Reader {
    cursor: usize,
    len_rx: watch::Receiver<usize>,
}

struct MemoryConnection {
    broker: InMemoryBroker,
    key: PartitionKey,
    reader: Mutex<Reader>,
}

#[async_trait]
impl TopicConnection for MemoryConnection {
    fn topic(&self) -> &str {
        &self.key.0
    }

    fn partition(&self) -> i32 {
        self.key.1
    }

    async fn send(&self, payload: &[u8]) -> Result<()> {
        self.broker.publish(&self.key, payload).await
    }

    async fn receive(&self) -> Result<Vec<u8>> {
        let mut reader = self.reader.lock().await;
        let cursor = reader.cursor;
        reader
            .len_rx
            .wait_for(|len| *len > cursor)
            .await
            .map_err(|_| TransportError::Closed(self.key.0.clone()))?;

        let state = self.broker.state.read().await;
        let payload = state
            .partitions
            .get(&self.key)
            .and_then(|log| log.messages.get(cursor))
            .cloned()
            .ok_or_else(|| TransportError::io(&self.key.0, "read past end of log"))?;
        reader.cursor += 1;
        Ok(payload)
    }
}
