//! Trip document store trait.

use async_trait::async_trait;
use common::{ClientId, TripId};
use domain::{Trip, TripStatus};

use crate::Result;
use crate::document::{StatusUpdate, TripDocument};

/// Storage for trip documents, keyed by trip id.
///
/// Implementations provide their own concurrency control: the HTTP layer
/// reads while the projection updater writes.
#[async_trait]
pub trait TripDocumentStore: Send + Sync {
    /// Inserts a document. A document already stored under the same trip id
    /// is merged with [`TripDocument::merge`], so its status never moves
    /// backwards.
    async fn insert(&self, document: TripDocument) -> Result<()>;

    /// Writes the full trip record. An existing document keeps its owner and
    /// its status never moves backwards.
    async fn upsert_trip(&self, trip: &Trip) -> Result<()>;

    /// Changes only the status of an existing document.
    ///
    /// Unknown trips are left alone and no document is created.
    async fn update_status(&self, trip_id: &TripId, status: TripStatus) -> Result<StatusUpdate>;

    /// Loads a single document.
    async fn get(&self, trip_id: &TripId) -> Result<Option<TripDocument>>;

    /// Lists the documents booked by `user_id`.
    async fn list_for_user(&self, user_id: &ClientId) -> Result<Vec<TripDocument>>;
}
