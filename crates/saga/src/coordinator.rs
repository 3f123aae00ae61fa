//! Trip saga coordinator.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::TripId;
use domain::{
    DecodeError, Envelope, MessageType, SOURCE_TRIP, Trip, TripCanceledData, TripMessage,
};
use transport::{MessageHandler, SharedConnection};

use crate::error::{Result, SagaError};
use crate::offers::OfferResolver;
use crate::routing::{self, FanOutTarget};

/// Connections the coordinator publishes events on.
#[derive(Clone)]
pub struct Outbound {
    pub to_driver: SharedConnection,
    pub to_client: SharedConnection,
}

impl Outbound {
    fn connection(&self, target: FanOutTarget) -> &SharedConnection {
        match target {
            FanOutTarget::Driver => &self.to_driver,
            FanOutTarget::Client => &self.to_client,
        }
    }
}

/// Consumes trip commands and publishes the resulting trip events.
///
/// For each inbound command the coordinator:
/// 1. Decodes the envelope, dropping it on a content type or schema mismatch
/// 2. Redeems the offer when the command creates a trip
/// 3. Builds a reply envelope that keeps the command's `id` and `time`
/// 4. Sends the reply to each fan-out target in order, stopping at the first failure
///
/// No trip state is kept between commands. Sends that succeeded before a
/// failing one are not rolled back.
pub struct TripSagaCoordinator<R: OfferResolver> {
    resolver: R,
    outbound: Outbound,
    redeem_timeout: Option<Duration>,
}

impl<R: OfferResolver> TripSagaCoordinator<R> {
    /// Creates a coordinator. Offer redemption has no timeout by default.
    pub fn new(resolver: R, outbound: Outbound) -> Self {
        Self {
            resolver,
            outbound,
            redeem_timeout: None,
        }
    }

    /// Bounds how long offer redemption may block a single command.
    pub fn with_redeem_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.redeem_timeout = timeout;
        self
    }

    /// Processes one raw inbound payload and returns the event that was published.
    #[tracing::instrument(skip_all)]
    pub async fn handle_payload(&self, payload: &[u8]) -> Result<Envelope> {
        let request = Envelope::from_slice(payload)?;
        let command = request.decode()?;
        let kind = command.message_type();

        metrics::counter!("saga_messages_total", "type" => kind.as_str()).increment(1);
        tracing::info!(id = %request.id, message_type = %kind, "message received");

        let event = self.apply(&request, command).await?;
        let reply = request.reply(SOURCE_TRIP, &event)?;
        self.fan_out(event.message_type(), &reply).await?;
        Ok(reply)
    }

    async fn apply(&self, request: &Envelope, command: TripMessage) -> Result<TripMessage> {
        let event = match command {
            TripMessage::Create(data) => {
                let order = self.redeem(&data).await?;
                let trip = Trip::from_offer(TripId::new(request.id.clone()), data.offer_id, order);
                TripMessage::Created(trip.into())
            }
            TripMessage::Accept(data) => TripMessage::Accepted(data),
            TripMessage::Start(data) => TripMessage::Started(data),
            TripMessage::End(data) => TripMessage::Ended(data),
            TripMessage::Cancel(data) => TripMessage::Canceled(TripCanceledData {
                trip_id: data.trip_id,
                reason: Some(data.reason),
            }),
            event => {
                return Err(DecodeError::UnexpectedKind {
                    expected: "trip command",
                    actual: event.message_type(),
                }
                .into());
            }
        };
        Ok(event)
    }

    async fn redeem(&self, data: &domain::CreateTripData) -> Result<domain::Order> {
        let redemption = self.resolver.redeem(&data.offer_id);
        match self.redeem_timeout {
            Some(limit) => tokio::time::timeout(limit, redemption)
                .await
                .map_err(|_| SagaError::UpstreamTimeout(limit))?,
            None => redemption.await,
        }
    }

    /// Sends `envelope` to every target of `event`, in order.
    ///
    /// Returns the number of topics the event was delivered to.
    pub async fn fan_out(&self, event: MessageType, envelope: &Envelope) -> Result<usize> {
        let payload = envelope.to_vec()?;
        let mut delivered = 0;

        for target in routing::targets(event) {
            let connection = self.outbound.connection(*target);
            if let Err(source) = connection.send(&payload).await {
                metrics::counter!("saga_fanout_failures_total").increment(1);
                tracing::error!(
                    id = %envelope.id,
                    target = target.as_str(),
                    topic = connection.topic(),
                    delivered,
                    error = %source,
                    "fan-out aborted"
                );
                return Err(SagaError::FanOut {
                    topic: connection.topic().to_string(),
                    delivered,
                    source,
                });
            }
            delivered += 1;
            metrics::counter!("saga_fanout_sends_total", "topic" => connection.topic().to_string())
                .increment(1);
        }

        tracing::info!(id = %envelope.id, message_type = %event, delivered, "event published");
        Ok(delivered)
    }
}

#[async_trait]
impl<R: OfferResolver> MessageHandler for TripSagaCoordinator<R> {
    type Error = SagaError;

    fn name(&self) -> &'static str {
        "trip_saga"
    }

    async fn handle(&self, payload: &[u8]) -> Result<()> {
        let started = Instant::now();
        let result = self.handle_payload(payload).await.map(|_| ());
        metrics::histogram!("saga_iteration_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        if let Err(e) = &result {
            metrics::counter!("saga_messages_dropped_total", "reason" => e.reason()).increment(1);
        }
        result
    }
}
