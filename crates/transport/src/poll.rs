//! Cancellable consumer loop.
//!
//! One loop owns one connection. Each iteration waits a bounded time for the
//! next payload, hands it to the handler and only then looks at the shutdown
//! signal again, so a payload is never abandoned half-processed and two
//! payloads are never processed concurrently.

use std::fmt::Display;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::{SharedConnection, TransportError};

/// Default bound on a single wait for the next payload.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Processes one raw payload taken from a topic.
///
/// Errors are reported back to the loop, which logs them and moves on to the
/// next payload. Nothing is retried.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Error produced when a payload cannot be processed.
    type Error: Display + Send;

    /// Short name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Handles a single payload.
    async fn handle(&self, payload: &[u8]) -> Result<(), Self::Error>;
}

/// Counters describing what a loop did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Payloads handed to the handler that completed successfully.
    pub handled: u64,
    /// Payloads the handler rejected.
    pub failed: u64,
    /// Receive attempts that ended in a transport error.
    pub transport_errors: u64,
}

enum Poll {
    Shutdown,
    Idle,
    Payload(Vec<u8>),
    Failed(TransportError),
}

/// Drives a [`MessageHandler`] from a single topic connection until shut down.
pub struct ConsumerLoop<H: MessageHandler> {
    connection: SharedConnection,
    handler: H,
    poll_interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl<H: MessageHandler> ConsumerLoop<H> {
    /// Creates a loop and the sender that stops it. Send `true` to stop.
    pub fn new(
        connection: SharedConnection,
        handler: H,
        poll_interval: Duration,
    ) -> (Self, watch::Sender<bool>) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        (
            Self::with_shutdown(connection, handler, poll_interval, shutdown_rx),
            shutdown_tx,
        )
    }

    /// Creates a loop that listens on an existing shutdown channel.
    pub fn with_shutdown(
        connection: SharedConnection,
        handler: H,
        poll_interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            connection,
            handler,
            poll_interval,
            shutdown,
        }
    }

    /// Returns the handler driven by this loop.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Runs until the shutdown signal is set or its sender is dropped.
    pub async fn run(mut self) -> LoopStats {
        let mut stats = LoopStats::default();
        let topic = self.connection.topic().to_string();
        let handler = self.handler.name();

        tracing::info!(%topic, handler, "consumer loop started");

        while !*self.shutdown.borrow() {
            match self.poll_once().await {
                Poll::Shutdown => break,
                Poll::Idle => continue,
                Poll::Payload(payload) => {
                    let started = Instant::now();
                    match self.handler.handle(&payload).await {
                        Ok(()) => stats.handled += 1,
                        Err(e) => {
                            stats.failed += 1;
                            tracing::warn!(%topic, handler, error = %e, "message dropped");
                        }
                    }
                    metrics::histogram!("consumer_iteration_duration_seconds", "handler" => handler)
                        .record(started.elapsed().as_secs_f64());
                }
                Poll::Failed(e) => {
                    stats.transport_errors += 1;
                    metrics::counter!("consumer_transport_errors_total", "handler" => handler)
                        .increment(1);
                    tracing::error!(%topic, handler, error = %e, "receive failed");
                    self.back_off().await;
                }
            }
        }

        tracing::info!(
            %topic,
            handler,
            handled = stats.handled,
            failed = stats.failed,
            "consumer loop stopped"
        );
        stats
    }

    async fn poll_once(&mut self) -> Poll {
        tokio::select! {
            biased;
            changed = self.shutdown.changed() => {
                if changed.is_err() || *self.shutdown.borrow() {
                    Poll::Shutdown
                } else {
                    Poll::Idle
                }
            }
            received = tokio::time::timeout(self.poll_interval, self.connection.receive()) => {
                match received {
                    Err(_) => Poll::Idle,
                    Ok(Ok(payload)) => Poll::Payload(payload),
                    Ok(Err(e)) => Poll::Failed(e),
                }
            }
        }
    }

    async fn back_off(&mut self) {
        tokio::select! {
            _ = self.shutdown.changed() => {}
            _ = tokio::time::sleep(self.poll_interval) => {}
        }
    }
}
