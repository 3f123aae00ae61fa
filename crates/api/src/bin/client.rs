//! Client service: trip booking API plus the projection of client-bound trip events.

use std::sync::Arc;

use api::config::Settings;
use api::error::StartupError;
use api::routes::trips::ClientState;
use api::{runtime, telemetry};
use metrics_exporter_prometheus::PrometheusHandle;
use projections::{InMemoryTripStore, PostgresTripStore, ProjectionUpdater, TripDocumentStore};
use saga::HttpOfferResolver;
use transport::ConsumerLoop;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let settings = Settings::load()?;
    telemetry::init_tracing(settings.log_format)?;
    let metrics_handle = telemetry::install_metrics()?;

    match settings.document_store.url.clone() {
        Some(url) => {
            let store = PostgresTripStore::connect(&url).await?;
            store.run_migrations().await?;
            tracing::info!("using Postgres trip store");
            run(settings, store, metrics_handle).await
        }
        None => {
            tracing::info!("using in-memory trip store");
            run(settings, InMemoryTripStore::new(), metrics_handle).await
        }
    }
}

async fn run<S>(
    settings: Settings,
    store: S,
    metrics_handle: PrometheusHandle,
) -> Result<(), StartupError>
where
    S: TripDocumentStore + Clone + 'static,
{
    let connector = runtime::connector(&settings.broker)?;
    let partition = settings.broker.partition;
    let commands = connector.connect(&settings.topics.inbound, partition).await?;
    let events = connector.connect(&settings.topics.to_client, partition).await?;

    let offers = match settings.redeem_timeout() {
        Some(timeout) => HttpOfferResolver::with_timeout(settings.offering.base_url.clone(), timeout)?,
        None => HttpOfferResolver::new(settings.offering.base_url.clone()),
    };

    let updater = ProjectionUpdater::new(store.clone());
    let (consumer, stop) = ConsumerLoop::new(events, updater, settings.poll_interval());
    let consumer = tokio::spawn(consumer.run());
    tracing::info!(topic = %settings.topics.to_client, "trip projection started");

    let state = Arc::new(ClientState {
        store,
        offers,
        commands,
    });
    let served = runtime::serve(&settings.http, api::create_client_app(state, metrics_handle)).await;

    if stop.send(true).is_err() {
        tracing::debug!("trip projection loop already stopped");
    }
    let stats = consumer.await?;
    tracing::info!(
        handled = stats.handled,
        failed = stats.failed,
        transport_errors = stats.transport_errors,
        "trip projection stopped"
    );
    served
}
