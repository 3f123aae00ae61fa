//! Applies trip events to the document store.

use async_trait::async_trait;
use domain::{Envelope, Trip, TripMessage, TripStatus};
use transport::MessageHandler;

use crate::document::StatusUpdate;
use crate::store::TripDocumentStore;
use crate::{ProjectionError, Result};

/// What applying a single event did to the read model.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// `trip.event.created` wrote the full trip record.
    Upserted,
    /// A lifecycle event changed a document's status.
    StatusChanged(StatusUpdate),
    /// The message is not a trip event and was skipped.
    Skipped,
}

/// Consumes trip events and keeps the trip documents in step.
///
/// `trip.event.created` is the only event that introduces a document. Every
/// other event is a status-only update that is ignored for unknown trips
/// and for transitions the stored status does not allow.
#[derive(Clone)]
pub struct ProjectionUpdater<S: TripDocumentStore> {
    store: S,
}

impl<S: TripDocumentStore> ProjectionUpdater<S> {
    /// Creates an updater writing to `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the store this updater writes to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decodes a raw payload and applies it.
    pub async fn apply_payload(&self, payload: &[u8]) -> Result<UpdateOutcome> {
        let envelope = Envelope::from_slice(payload)?;
        self.apply(&envelope).await
    }

    /// Applies one event envelope to the store.
    #[tracing::instrument(skip_all, fields(id = %envelope.id, message_type = %envelope.message_type))]
    pub async fn apply(&self, envelope: &Envelope) -> Result<UpdateOutcome> {
        let (trip_id, status) = match envelope.decode()? {
            TripMessage::Created(data) => {
                let trip: Trip = data.into();
                self.store.upsert_trip(&trip).await?;
                metrics::counter!("projection_updates_total", "status" => trip.status.as_str())
                    .increment(1);
                tracing::info!(trip_id = %trip.trip_id, "trip document written");
                return Ok(UpdateOutcome::Upserted);
            }
            TripMessage::Accepted(data) => (data.trip_id, TripStatus::Accepted),
            TripMessage::Started(data) => (data.trip_id, TripStatus::Started),
            TripMessage::Ended(data) => (data.trip_id, TripStatus::Ended),
            TripMessage::Canceled(data) => (data.trip_id, TripStatus::Canceled),
            command => {
                tracing::debug!(message_type = %command.message_type(), "not a trip event");
                return Ok(UpdateOutcome::Skipped);
            }
        };

        let update = self.store.update_status(&trip_id, status).await?;
        match update {
            StatusUpdate::Applied { from, to } => {
                metrics::counter!("projection_updates_total", "status" => to.as_str())
                    .increment(1);
                tracing::info!(%trip_id, %from, %to, "trip status updated");
            }
            StatusUpdate::UnknownTrip => {
                metrics::counter!("projection_events_ignored_total", "reason" => "unknown_trip")
                    .increment(1);
                tracing::debug!(%trip_id, "event for unknown trip ignored");
            }
            StatusUpdate::Rejected { current } => {
                metrics::counter!("projection_events_ignored_total", "reason" => "transition")
                    .increment(1);
                tracing::warn!(%trip_id, %current, next = %status, "out of order event ignored");
            }
        }
        Ok(UpdateOutcome::StatusChanged(update))
    }
}

#[async_trait]
impl<S: TripDocumentStore> MessageHandler for ProjectionUpdater<S> {
    type Error = ProjectionError;

    fn name(&self) -> &'static str {
        "trip_projection"
    }

    async fn handle(&self, payload: &[u8]) -> Result<()> {
        self.apply_payload(payload).await.map(|_| ())
    }
}
