//! PostgreSQL integration tests
//!
//! These tests start a PostgreSQL container and are ignored by default.
//! Run with:
//!
//! ```bash
//! cargo test -p projections --test postgres_integration -- --ignored --test-threads=1
//! ```

use std::sync::Arc;

use common::{ClientId, OfferId, TripId};
use domain::{Location, Price, Trip, TripStatus};
use projections::{PostgresTripStore, StatusUpdate, TripDocument, TripDocumentStore};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();
            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();
            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let store = PostgresTripStore::connect(&connection_string).await.unwrap();
            store.run_migrations().await.unwrap();
            store.pool().close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn store() -> PostgresTripStore {
    let info = get_container_info().await;
    PostgresTripStore::connect(&info.connection_string)
        .await
        .unwrap()
}

fn trip(id: &str) -> Trip {
    Trip {
        trip_id: TripId::new(id),
        offer_id: OfferId::new("offer-token"),
        from: Location::new(55.75, 37.61),
        to: Location::new(55.80, 37.50),
        price: Price::new(12.34),
        status: TripStatus::DriverSearch,
    }
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_insert_and_get_round_trip() {
    let store = store().await;
    let id = unique("pg-get");
    let doc = TripDocument::owned_by(trip(&id), ClientId::new("u1"));

    store.insert(doc.clone()).await.unwrap();

    assert_eq!(store.get(&TripId::new(&id)).await.unwrap(), Some(doc));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_status_unknown_and_monotonic() {
    let store = store().await;
    let id = TripId::new(unique("pg-status"));

    assert_eq!(
        store.update_status(&id, TripStatus::Canceled).await.unwrap(),
        StatusUpdate::UnknownTrip
    );
    assert!(store.get(&id).await.unwrap().is_none());

    store.upsert_trip(&trip(id.as_str())).await.unwrap();
    assert!(
        store
            .update_status(&id, TripStatus::Accepted)
            .await
            .unwrap()
            .is_applied()
    );
    assert_eq!(
        store.update_status(&id, TripStatus::Ended).await.unwrap(),
        StatusUpdate::Rejected {
            current: TripStatus::Accepted
        }
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_upsert_keeps_owner_and_status() {
    let store = store().await;
    let id = unique("pg-upsert");
    let owner = ClientId::new(unique("owner"));
    let mut doc = TripDocument::owned_by(trip(&id), owner.clone());
    doc.status = TripStatus::Canceled;
    store.insert(doc).await.unwrap();

    store.upsert_trip(&trip(&id)).await.unwrap();

    let listed = store.list_for_user(&owner).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, TripStatus::Canceled);
    assert_eq!(listed[0].user_id, Some(owner));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_late_owned_insert_keeps_projected_status() {
    let store = store().await;
    let id = unique("pg-late-insert");
    let owner = ClientId::new(unique("owner"));
    store.upsert_trip(&trip(&id)).await.unwrap();
    store
        .update_status(&TripId::new(&id), TripStatus::Accepted)
        .await
        .unwrap();

    store
        .insert(TripDocument::owned_by(trip(&id), owner.clone()))
        .await
        .unwrap();

    let document = store.get(&TripId::new(&id)).await.unwrap().unwrap();
    assert_eq!(document.status, TripStatus::Accepted);
    assert_eq!(document.user_id, Some(owner));
}
