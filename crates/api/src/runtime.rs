//! Process plumbing shared by the service binaries.

use std::sync::Arc;

use axum::Router;
use tokio::signal;
use transport::{Connector, InMemoryBroker};

use crate::config::{BrokerKind, BrokerSettings, HttpSettings};
use crate::error::StartupError;

/// Builds the connector selected by `broker.kind`.
pub fn connector(broker: &BrokerSettings) -> Result<Arc<dyn Connector>, StartupError> {
    match broker.kind {
        BrokerKind::Memory => {
            tracing::warn!("using the in-process broker; messages never leave this process");
            Ok(Arc::new(InMemoryBroker::new()))
        }
        #[cfg(feature = "kafka")]
        BrokerKind::Kafka => Ok(Arc::new(transport::KafkaConnector::new(
            broker.address.clone(),
        ))),
        #[cfg(not(feature = "kafka"))]
        BrokerKind::Kafka => Err(StartupError::Invalid(
            "broker.kind = \"kafka\" requires building with the `kafka` feature".to_string(),
        )),
    }
}

/// Serves `app` until SIGINT or SIGTERM, then drains in-flight requests.
pub async fn serve(http: &HttpSettings, app: Router) -> Result<(), StartupError> {
    let addr = http.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server shut down gracefully");
    Ok(())
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}
