//! Service configuration loaded once at startup.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. `config/default`, `config/{RUN_MODE}` and `config/local` (any format the
//!    `config` crate understands, all optional)
//! 3. Environment variables prefixed `TRIP_`, nested with `__`, for example
//!    `TRIP_HTTP__PORT=8081` or `TRIP_OFFERING__TIMEOUT_MS=2000`

use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use offering::{DEFAULT_VALIDITY_SECS, OfferCodec};
use serde::Deserialize;

use crate::error::StartupError;

/// Bind address of a service's HTTP surface.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
}

impl HttpSettings {
    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which transport backend to connect through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokerKind {
    /// In-process broker. Only useful when every party runs in one process.
    Memory,
    /// Kafka, available when built with the `kafka` feature.
    Kafka,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrokerSettings {
    pub kind: BrokerKind,
    pub address: String,
    pub partition: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicSettings {
    pub inbound: String,
    pub to_client: String,
    pub to_driver: String,
}

/// Offer token and offering service settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OfferingSettings {
    /// Base URL of the offering service, used to redeem offers.
    pub base_url: String,
    /// Upper bound on a single redemption call. Absent means no bound.
    pub timeout_ms: Option<u64>,
    /// HS256 shared secret.
    pub signing_secret: Option<String>,
    /// Path to the PKCS#8 PEM private key for RS256 tokens.
    pub private_key_pem: Option<String>,
    /// Path to the PEM public key for RS256 tokens.
    pub public_key_pem: Option<String>,
    pub validity_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentStoreSettings {
    /// Postgres URL. Absent means an in-memory store.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollSettings {
    pub interval_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Settings shared by the three service binaries. Each binary reads only the
/// sections it needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub http: HttpSettings,
    pub broker: BrokerSettings,
    pub topics: TopicSettings,
    pub offering: OfferingSettings,
    pub document_store: DocumentStoreSettings,
    pub poll: PollSettings,
    pub log_format: LogFormat,
}

impl Settings {
    /// Loads settings from files under `config/` and `TRIP_` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Builder pre-populated with the defaults every deployment starts from.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("http.host", "0.0.0.0")?
            .set_default("http.port", 8080)?
            .set_default("broker.kind", "memory")?
            .set_default("broker.address", transport::MEMORY_ADDRESS)?
            .set_default("broker.partition", transport::topics::DEFAULT_PARTITION)?
            .set_default("topics.inbound", transport::topics::INBOUND)?
            .set_default("topics.to_client", transport::topics::TO_CLIENT)?
            .set_default("topics.to_driver", transport::topics::TO_DRIVER)?
            .set_default("offering.base_url", "http://localhost:8082")?
            .set_default("offering.validity_secs", DEFAULT_VALIDITY_SECS)?
            .set_default("poll.interval_ms", 1000)?
            .set_default("log_format", "text")
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll.interval_ms)
    }

    /// Bound on offer redemption, if one is configured.
    pub fn redeem_timeout(&self) -> Option<Duration> {
        self.offering.timeout_ms.map(Duration::from_millis)
    }

    /// Builds the offer token codec: RS256 when a key pair is configured,
    /// otherwise HS256 with the shared secret.
    pub fn offer_codec(&self) -> Result<OfferCodec, StartupError> {
        let offering = &self.offering;
        let codec = match (
            &offering.private_key_pem,
            &offering.public_key_pem,
            &offering.signing_secret,
        ) {
            (Some(private_path), Some(public_path), _) => {
                let private_pem = std::fs::read(private_path)?;
                let public_pem = std::fs::read(public_path)?;
                OfferCodec::rs256_pem(&private_pem, &public_pem)?
            }
            (None, None, Some(secret)) => OfferCodec::hs256(secret.as_bytes()),
            _ => {
                return Err(StartupError::Invalid(
                    "offering needs either signing_secret or both private_key_pem and public_key_pem"
                        .to_string(),
                ));
            }
        };

        Ok(codec.with_validity(chrono::Duration::seconds(offering.validity_secs)))
    }
}

fn environment() -> Environment {
    Environment::with_prefix("TRIP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
