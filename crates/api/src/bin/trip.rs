//! Trip service: runs the trip saga over the inbound command topic.

use api::config::Settings;
use api::error::StartupError;
use api::{runtime, telemetry};
use saga::{HttpOfferResolver, Outbound, TripSagaCoordinator};
use transport::ConsumerLoop;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let settings = Settings::load()?;
    telemetry::init_tracing(settings.log_format)?;
    let metrics_handle = telemetry::install_metrics()?;

    let connector = runtime::connector(&settings.broker)?;
    let partition = settings.broker.partition;
    let inbound = connector.connect(&settings.topics.inbound, partition).await?;
    let outbound = Outbound {
        to_driver: connector.connect(&settings.topics.to_driver, partition).await?,
        to_client: connector.connect(&settings.topics.to_client, partition).await?,
    };

    let resolver = HttpOfferResolver::new(settings.offering.base_url.clone());
    let coordinator =
        TripSagaCoordinator::new(resolver, outbound).with_redeem_timeout(settings.redeem_timeout());

    let (consumer, stop) = ConsumerLoop::new(inbound, coordinator, settings.poll_interval());
    let consumer = tokio::spawn(consumer.run());
    tracing::info!(topic = %settings.topics.inbound, "trip saga started");

    let served = runtime::serve(&settings.http, api::create_trip_app(metrics_handle)).await;

    if stop.send(true).is_err() {
        tracing::debug!("trip saga loop already stopped");
    }
    let stats = consumer.await?;
    tracing::info!(
        handled = stats.handled,
        failed = stats.failed,
        transport_errors = stats.transport_errors,
        "trip saga stopped"
    );
    served
}
