//! Integration tests: trip event envelopes → ProjectionUpdater → trip documents.

use std::time::Duration;

use common::{ClientId, OfferId, TripId};
use domain::{
    CreateTripData, Envelope, Location, Price, SOURCE_CLIENT, SOURCE_TRIP, Trip, TripCanceledData,
    TripMessage, TripRef, TripStatus,
};
use projections::{
    InMemoryTripStore, ProjectionUpdater, StatusUpdate, TripDocument, TripDocumentStore,
    UpdateOutcome,
};
use transport::{ConsumerLoop, Connector, InMemoryBroker};

fn trip(id: &str) -> Trip {
    Trip {
        trip_id: TripId::new(id),
        offer_id: OfferId::new("offer-token"),
        from: Location::new(0.0, 0.0),
        to: Location::new(3.0, 4.0),
        price: Price::new(297f64.sqrt()),
        status: TripStatus::DriverSearch,
    }
}

fn event(message: TripMessage) -> Envelope {
    Envelope::new("evt", SOURCE_TRIP, &message).unwrap()
}

fn created(id: &str) -> Envelope {
    event(TripMessage::Created(trip(id).into()))
}

fn lifecycle(id: &str, status: TripStatus) -> Envelope {
    let trip_ref = TripRef {
        trip_id: TripId::new(id),
    };
    event(match status {
        TripStatus::Accepted => TripMessage::Accepted(trip_ref),
        TripStatus::Started => TripMessage::Started(trip_ref),
        TripStatus::Ended => TripMessage::Ended(trip_ref),
        TripStatus::Canceled => TripMessage::Canceled(TripCanceledData {
            trip_id: trip_ref.trip_id,
            reason: None,
        }),
        TripStatus::DriverSearch => return created(id),
    })
}

#[tokio::test]
async fn test_cancel_for_unknown_trip_mutates_nothing() {
    let store = InMemoryTripStore::new();
    store.upsert_trip(&trip("known")).await.unwrap();
    let before = store.snapshot().await;
    let updater = ProjectionUpdater::new(store.clone());

    let outcome = updater
        .apply(&lifecycle("unknown", TripStatus::Canceled))
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::StatusChanged(StatusUpdate::UnknownTrip));
    assert_eq!(store.snapshot().await, before);
    assert!(store.get(&TripId::new("unknown")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_happy_path_is_monotonic() {
    let store = InMemoryTripStore::new();
    let updater = ProjectionUpdater::new(store.clone());
    let id = TripId::new("t-1");

    assert_eq!(updater.apply(&created("t-1")).await.unwrap(), UpdateOutcome::Upserted);
    let mut seen = vec![store.get(&id).await.unwrap().unwrap().status];

    for status in [TripStatus::Accepted, TripStatus::Started, TripStatus::Ended] {
        updater.apply(&lifecycle("t-1", status)).await.unwrap();
        seen.push(store.get(&id).await.unwrap().unwrap().status);
    }

    assert_eq!(
        seen,
        vec![
            TripStatus::DriverSearch,
            TripStatus::Accepted,
            TripStatus::Started,
            TripStatus::Ended
        ]
    );
}

#[tokio::test]
async fn test_cancel_from_any_non_terminal_status_is_final() {
    let paths: [&[TripStatus]; 3] = [
        &[],
        &[TripStatus::Accepted],
        &[TripStatus::Accepted, TripStatus::Started],
    ];

    for path in paths {
        let store = InMemoryTripStore::new();
        let updater = ProjectionUpdater::new(store.clone());
        updater.apply(&created("t")).await.unwrap();
        for status in path {
            updater.apply(&lifecycle("t", *status)).await.unwrap();
        }

        updater
            .apply(&lifecycle("t", TripStatus::Canceled))
            .await
            .unwrap();
        let late = updater
            .apply(&lifecycle("t", TripStatus::Ended))
            .await
            .unwrap();

        assert_eq!(
            late,
            UpdateOutcome::StatusChanged(StatusUpdate::Rejected {
                current: TripStatus::Canceled
            })
        );
        assert_eq!(
            store.get(&TripId::new("t")).await.unwrap().unwrap().status,
            TripStatus::Canceled
        );
    }
}

#[tokio::test]
async fn test_out_of_order_events_are_skipped() {
    let store = InMemoryTripStore::new();
    let updater = ProjectionUpdater::new(store.clone());
    updater.apply(&created("t")).await.unwrap();

    let outcome = updater
        .apply(&lifecycle("t", TripStatus::Ended))
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        UpdateOutcome::StatusChanged(StatusUpdate::Rejected {
            current: TripStatus::DriverSearch
        })
    ));
}

#[tokio::test]
async fn test_created_keeps_owner_written_by_client() {
    let store = InMemoryTripStore::new();
    let owner = ClientId::new("u1");
    store
        .insert(TripDocument::owned_by(trip("t"), owner.clone()))
        .await
        .unwrap();

    ProjectionUpdater::new(store.clone())
        .apply(&created("t"))
        .await
        .unwrap();

    let doc = store.get(&TripId::new("t")).await.unwrap().unwrap();
    assert_eq!(doc.user_id, Some(owner));
}

#[tokio::test]
async fn test_client_write_after_events_does_not_rewind_status() {
    let store = InMemoryTripStore::new();
    let updater = ProjectionUpdater::new(store.clone());
    updater.apply(&created("t")).await.unwrap();
    updater
        .apply(&lifecycle("t", TripStatus::Accepted))
        .await
        .unwrap();

    let owner = ClientId::new("u1");
    store
        .insert(TripDocument::owned_by(trip("t"), owner.clone()))
        .await
        .unwrap();

    let doc = store.get(&TripId::new("t")).await.unwrap().unwrap();
    assert_eq!(doc.status, TripStatus::Accepted);
    assert_eq!(doc.user_id, Some(owner));

    updater
        .apply(&lifecycle("t", TripStatus::Started))
        .await
        .unwrap();
    assert_eq!(
        store.get(&TripId::new("t")).await.unwrap().unwrap().status,
        TripStatus::Started
    );
}

#[tokio::test]
async fn test_commands_are_skipped() {
    let store = InMemoryTripStore::new();
    let updater = ProjectionUpdater::new(store.clone());
    let command = Envelope::new(
        "cmd",
        SOURCE_CLIENT,
        &TripMessage::Create(CreateTripData {
            offer_id: OfferId::new("x"),
        }),
    )
    .unwrap();

    assert_eq!(updater.apply(&command).await.unwrap(), UpdateOutcome::Skipped);
    assert_eq!(store.document_count().await, 0);
}

#[tokio::test]
async fn test_loop_keeps_going_after_bad_payload() {
    let broker = InMemoryBroker::new();
    let conn = broker.connect("trip-client-topic", 0).await.unwrap();
    conn.send(&created("t").to_vec().unwrap()).await.unwrap();
    conn.send(b"not an envelope").await.unwrap();
    conn.send(&lifecycle("t", TripStatus::Accepted).to_vec().unwrap())
        .await
        .unwrap();

    let store = InMemoryTripStore::new();
    let (consumer, shutdown) = ConsumerLoop::new(
        conn,
        ProjectionUpdater::new(store.clone()),
        Duration::from_millis(10),
    );
    let task = tokio::spawn(consumer.run());

    loop {
        if let Some(doc) = store.get(&TripId::new("t")).await.unwrap()
            && doc.status == TripStatus::Accepted
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    shutdown.send(true).unwrap();

    let stats = task.await.unwrap();
    assert_eq!(stats.handled, 2);
    assert_eq!(stats.failed, 1);
}
