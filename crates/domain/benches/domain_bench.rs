use common::{OfferId, TripId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    Envelope, Location, Price, SOURCE_CLIENT, SOURCE_TRIP, TripCreatedData, TripMessage, TripRef,
    TripStatus,
};

fn created_payload() -> Vec<u8> {
    let event = TripMessage::Created(TripCreatedData {
        trip_id: TripId::new("trip-bench"),
        offer_id: OfferId::new("offer-bench"),
        price: Price::new(17.23),
        status: TripStatus::DriverSearch,
        from: Location::new(55.75, 37.61),
        to: Location::new(55.80, 37.70),
    });
    Envelope::new("trip-bench", SOURCE_TRIP, &event)
        .unwrap()
        .to_vec()
        .unwrap()
}

fn bench_decode_created(c: &mut Criterion) {
    let payload = created_payload();

    c.bench_function("domain/decode_created_event", |b| {
        b.iter(|| {
            let envelope = Envelope::from_slice(&payload).unwrap();
            envelope.decode().unwrap()
        });
    });
}

fn bench_reply(c: &mut Criterion) {
    let request = Envelope::new(
        "cmd-bench",
        SOURCE_CLIENT,
        &TripMessage::Accept(TripRef {
            trip_id: TripId::new("trip-bench"),
        }),
    )
    .unwrap();
    let event = TripMessage::Accepted(TripRef {
        trip_id: TripId::new("trip-bench"),
    });

    c.bench_function("domain/reply_and_encode", |b| {
        b.iter(|| request.reply(SOURCE_TRIP, &event).unwrap().to_vec().unwrap());
    });
}

criterion_group!(benches, bench_decode_created, bench_reply);
criterion_main!(benches);
