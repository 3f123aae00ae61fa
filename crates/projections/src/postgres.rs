use async_trait::async_trait;
use common::{ClientId, OfferId, TripId};
use domain::{Location, Price, Trip, TripStatus};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::document::{StatusUpdate, TripDocument};
use crate::store::TripDocumentStore;
use crate::{ProjectionError, Result};

const SELECT_COLUMNS: &str = "trip_id, user_id, offer_id, from_lat, from_lng, to_lat, to_lng, \
                              price_amount, price_currency, status";

/// PostgreSQL-backed trip document store.
#[derive(Clone)]
pub struct PostgresTripStore {
    pool: PgPool,
}

impl PostgresTripStore {
    /// Creates a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `url` and returns a store.
    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(PgPool::connect(url).await?))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Locks the stored row, folds `incoming` into it and writes the result.
    async fn merge_document(&self, incoming: TripDocument) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM trips WHERE trip_id = $1 FOR UPDATE"
        ))
        .bind(incoming.trip_id.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let document = match existing {
            Some(row) => {
                let mut document = Self::row_to_document(row)?;
                document.merge(incoming);
                document
            }
            None => incoming,
        };

        sqlx::query(
            r#"
            INSERT INTO trips (trip_id, user_id, offer_id, from_lat, from_lng, to_lat, to_lng,
                               price_amount, price_currency, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (trip_id) DO UPDATE SET
                user_id = EXCLUDED.user_id,
                offer_id = EXCLUDED.offer_id,
                from_lat = EXCLUDED.from_lat,
                from_lng = EXCLUDED.from_lng,
                to_lat = EXCLUDED.to_lat,
                to_lng = EXCLUDED.to_lng,
                price_amount = EXCLUDED.price_amount,
                price_currency = EXCLUDED.price_currency,
                status = EXCLUDED.status,
                updated_at = NOW()
            "#,
        )
        .bind(document.trip_id.as_str())
        .bind(document.user_id.as_ref().map(ClientId::as_str))
        .bind(document.offer_id.as_str())
        .bind(document.from.lat)
        .bind(document.from.lng)
        .bind(document.to.lat)
        .bind(document.to.lng)
        .bind(document.price.amount)
        .bind(&document.price.currency)
        .bind(document.status.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    fn row_to_document(row: PgRow) -> Result<TripDocument> {
        let trip_id: String = row.try_get("trip_id")?;
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<TripStatus>()
            .map_err(|reason| ProjectionError::CorruptDocument {
                trip_id: trip_id.clone(),
                reason,
            })?;

        Ok(TripDocument {
            trip_id: TripId::new(trip_id),
            user_id: row.try_get::<Option<String>, _>("user_id")?.map(ClientId::new),
            offer_id: OfferId::new(row.try_get::<String, _>("offer_id")?),
            from: Location::new(row.try_get("from_lat")?, row.try_get("from_lng")?),
            to: Location::new(row.try_get("to_lat")?, row.try_get("to_lng")?),
            price: Price {
                amount: row.try_get("price_amount")?,
                currency: row.try_get("price_currency")?,
            },
            status,
        })
    }
}

#[async_trait]
impl TripDocumentStore for PostgresTripStore {
    async fn insert(&self, document: TripDocument) -> Result<()> {
        self.merge_document(document).await
    }

    async fn upsert_trip(&self, trip: &Trip) -> Result<()> {
        self.merge_document(TripDocument::from_trip(trip.clone()))
            .await
    }

    async fn update_status(&self, trip_id: &TripId, status: TripStatus) -> Result<StatusUpdate> {
        let mut tx = self.pool.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM trips WHERE trip_id = $1 FOR UPDATE")
                .bind(trip_id.as_str())
                .fetch_optional(&mut *tx)
                .await?;

        let Some(current) = current else {
            return Ok(StatusUpdate::UnknownTrip);
        };
        let current =
            current
                .parse::<TripStatus>()
                .map_err(|reason| ProjectionError::CorruptDocument {
                    trip_id: trip_id.to_string(),
                    reason,
                })?;

        let update = StatusUpdate::evaluate(current, status);
        if update.is_applied() {
            sqlx::query("UPDATE trips SET status = $2, updated_at = NOW() WHERE trip_id = $1")
                .bind(trip_id.as_str())
                .bind(status.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(update)
    }

    async fn get(&self, trip_id: &TripId) -> Result<Option<TripDocument>> {
        sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM trips WHERE trip_id = $1"
        ))
        .bind(trip_id.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(Self::row_to_document)
        .transpose()
    }

    async fn list_for_user(&self, user_id: &ClientId) -> Result<Vec<TripDocument>> {
        sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM trips WHERE user_id = $1 ORDER BY trip_id"
        ))
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Self::row_to_document)
        .collect()
    }
}
