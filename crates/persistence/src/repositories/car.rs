//! Car repository.
//!
//! The car aggregate belongs to the listing domain. The inspection
//! workflow only reads the owner and GPS device reference here; status
//! side effects are written inside the completion transaction.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CarEntity, CarStatusDb};
use crate::metrics::QueryTimer;

/// Repository for car lookups and status side effects.
#[derive(Clone)]
pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    /// Creates a new CarRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a car by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CarEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_car_by_id");
        let result = sqlx::query_as::<_, CarEntity>(
            r#"
            SELECT id, owner_id, license_plate, gps_device_id, status, created_at, updated_at
            FROM cars
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a car's status. Used for side effects outside the completion
    /// transaction (e.g. deactivation flows).
    pub async fn update_status(&self, id: Uuid, status: CarStatusDb) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_car_status");
        let result = sqlx::query(
            r#"
            UPDATE cars
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }
}
