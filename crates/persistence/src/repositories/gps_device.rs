//! GPS device repository: the device ledger.
//!
//! A GPS device may back at most one non-terminal contract. The ledger is
//! the `active_contract_id` column; every reservation is a single
//! conditional UPDATE, so two concurrent reservations for the same device
//! serialize on the row lock and at most one can win.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::{GpsDeviceEntity, GpsDeviceStatusDb};
use crate::metrics::QueryTimer;

/// Repository for GPS device operations.
#[derive(Clone)]
pub struct GpsDeviceRepository {
    pool: PgPool,
}

impl GpsDeviceRepository {
    /// Creates a new GpsDeviceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a device by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GpsDeviceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_gps_device_by_id");
        let result = sqlx::query_as::<_, GpsDeviceEntity>(
            r#"
            SELECT id, serial_number, status, active_contract_id, created_at, updated_at
            FROM gps_devices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Atomically bind a device to a contract.
    ///
    /// Returns `true` on success. Returns `false` if the device is already
    /// bound to a different contract (the caller surfaces this as a
    /// resource conflict). Re-reserving for the same contract succeeds.
    pub async fn reserve(&self, device_id: Uuid, contract_id: Uuid) -> Result<bool, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        Self::reserve_in(&mut *conn, device_id, contract_id).await
    }

    /// Reservation check-and-set, usable inside a larger transaction.
    pub async fn reserve_in(
        conn: &mut PgConnection,
        device_id: Uuid,
        contract_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("reserve_gps_device");
        let result = sqlx::query(
            r#"
            UPDATE gps_devices
            SET active_contract_id = $2, updated_at = NOW()
            WHERE id = $1
              AND (active_contract_id IS NULL OR active_contract_id = $2)
            "#,
        )
        .bind(device_id)
        .bind(contract_id)
        .execute(conn)
        .await
        .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Update a device's status (repair and removal flows).
    pub async fn set_status(
        &self,
        id: Uuid,
        status: GpsDeviceStatusDb,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("set_gps_device_status");
        let result = sqlx::query(
            r#"
            UPDATE gps_devices
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

    /// Clear a device's contract binding. Idempotent: a no-op when the
    /// device is already unbound.
    pub async fn release(&self, device_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("release_gps_device");
        let result = sqlx::query(
            r#"
            UPDATE gps_devices
            SET active_contract_id = NULL, updated_at = NOW()
            WHERE id = $1 AND active_contract_id IS NOT NULL
            "#,
        )
        .bind(device_id)
        .execute(&self.pool)
        .await
        .map(|_| ());
        timer.record();
        result
    }
}
