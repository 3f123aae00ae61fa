//! Offering service: prices routes and issues signed offer tokens.

use api::config::Settings;
use api::error::StartupError;
use api::{runtime, telemetry};
use offering::OfferService;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let settings = Settings::load()?;
    telemetry::init_tracing(settings.log_format)?;
    let metrics_handle = telemetry::install_metrics()?;

    let codec = settings.offer_codec()?;
    tracing::info!(
        algorithm = ?codec.algorithm(),
        validity_secs = codec.validity().num_seconds(),
        "offer codec ready"
    );

    let app = api::create_offering_app(OfferService::new(codec), metrics_handle);
    runtime::serve(&settings.http, app).await
}
