use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{ClientId, TripId};
use domain::{Trip, TripStatus};
use tokio::sync::RwLock;

use crate::Result;
use crate::document::{StatusUpdate, TripDocument};
use crate::store::TripDocumentStore;

/// In-memory trip document store.
#[derive(Clone, Default)]
pub struct InMemoryTripStore {
    documents: Arc<RwLock<HashMap<TripId, TripDocument>>>,
}

impl InMemoryTripStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored documents.
    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Returns a copy of every stored document.
    pub async fn snapshot(&self) -> HashMap<TripId, TripDocument> {
        self.documents.read().await.clone()
    }
}

#[async_trait]
impl TripDocumentStore for InMemoryTripStore {
    async fn insert(&self, document: TripDocument) -> Result<()> {
        let mut documents = self.documents.write().await;
        match documents.get_mut(&document.trip_id) {
            Some(existing) => existing.merge(document),
            None => {
                documents.insert(document.trip_id.clone(), document);
            }
        }
        Ok(())
    }

    async fn upsert_trip(&self, trip: &Trip) -> Result<()> {
        let mut documents = self.documents.write().await;
        match documents.get_mut(&trip.trip_id) {
            Some(existing) => existing.merge_trip(trip),
            None => {
                documents.insert(trip.trip_id.clone(), TripDocument::from_trip(trip.clone()));
            }
        }
        Ok(())
    }

    async fn update_status(&self, trip_id: &TripId, status: TripStatus) -> Result<StatusUpdate> {
        let mut documents = self.documents.write().await;
        let Some(document) = documents.get_mut(trip_id) else {
            return Ok(StatusUpdate::UnknownTrip);
        };

        let update = StatusUpdate::evaluate(document.status, status);
        if update.is_applied() {
            document.status = status;
        }
        Ok(update)
    }

    async fn get(&self, trip_id: &TripId) -> Result<Option<TripDocument>> {
        Ok(self.documents.read().await.get(trip_id).cloned())
    }

    async fn list_for_user(&self, user_id: &ClientId) -> Result<Vec<TripDocument>> {
        let mut trips: Vec<_> = self
            .documents
            .read()
            .await
            .values()
            .filter(|doc| doc.is_owned_by(user_id))
            .cloned()
            .collect();
        trips.sort_by(|a, b| a.trip_id.cmp(&b.trip_id));
        Ok(trips)
    }
}
