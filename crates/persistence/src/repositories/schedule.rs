//! Inspection schedule repository.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{NOT_STARTED_GRACE_MINUTES, UNRESOLVED_GRACE_MINUTES};

use crate::entities::{InspectionScheduleEntity, ScheduleStatusDb};
use crate::metrics::QueryTimer;

const SCHEDULE_COLUMNS: &str = r#"id, car_id, technician_id, created_by, inspection_date,
       inspection_address, note, status, photo_urls, is_deleted, created_at, updated_at"#;

/// Repository for inspection schedule operations.
#[derive(Clone)]
pub struct InspectionScheduleRepository {
    pool: PgPool,
}

/// Outcome of the completion transaction.
#[derive(Debug)]
pub enum CompletionOutcome {
    /// All four rows (schedule, contract, car, device) were updated.
    Completed,
    /// The schedule was not in a completable state.
    ScheduleNotCompletable,
    /// The contract had already reached a terminal state; nothing was
    /// written (the schedule update rolled back with the rest).
    ContractNotOpen,
}

impl InspectionScheduleRepository {
    /// Creates a new InspectionScheduleRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new schedule (Pending).
    pub async fn create(
        &self,
        car_id: Uuid,
        technician_id: Option<Uuid>,
        created_by: Uuid,
        inspection_date: chrono::DateTime<chrono::Utc>,
        inspection_address: &str,
        note: Option<&str>,
    ) -> Result<InspectionScheduleEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_schedule");
        let result = sqlx::query_as::<_, InspectionScheduleEntity>(&format!(
            r#"
            INSERT INTO inspection_schedules
                (id, car_id, technician_id, created_by, inspection_date, inspection_address, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SCHEDULE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(car_id)
        .bind(technician_id)
        .bind(created_by)
        .bind(inspection_date)
        .bind(inspection_address)
        .bind(note)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a schedule by ID. Soft-deleted schedules are not returned.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<InspectionScheduleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_schedule_by_id");
        let result = sqlx::query_as::<_, InspectionScheduleEntity>(&format!(
            r#"
            SELECT {SCHEDULE_COLUMNS}
            FROM inspection_schedules
            WHERE id = $1 AND is_deleted = FALSE
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the car's InProgress schedule, if any.
    pub async fn find_in_progress_by_car(
        &self,
        car_id: Uuid,
    ) -> Result<Option<InspectionScheduleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_in_progress_schedule_by_car");
        let result = sqlx::query_as::<_, InspectionScheduleEntity>(&format!(
            r#"
            SELECT {SCHEDULE_COLUMNS}
            FROM inspection_schedules
            WHERE car_id = $1 AND status = 'in_progress' AND is_deleted = FALSE
            "#
        ))
        .bind(car_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List schedules, newest first, optionally filtered by status and car.
    pub async fn list(
        &self,
        status: Option<ScheduleStatusDb>,
        car_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InspectionScheduleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_schedules");
        let result = sqlx::query_as::<_, InspectionScheduleEntity>(&format!(
            r#"
            SELECT {SCHEDULE_COLUMNS}
            FROM inspection_schedules
            WHERE is_deleted = FALSE
              AND ($1::inspection_schedule_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR car_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(status)
        .bind(car_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count schedules matching the same filters as [`list`](Self::list).
    pub async fn count(
        &self,
        status: Option<ScheduleStatusDb>,
        car_id: Option<Uuid>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_schedules");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM inspection_schedules
            WHERE is_deleted = FALSE
              AND ($1::inspection_schedule_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR car_id = $2)
            "#,
        )
        .bind(status)
        .bind(car_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Confirm the technician and appointment (Pending -> Scheduled).
    /// Returns None if the schedule is not Pending.
    pub async fn assign_technician(
        &self,
        id: Uuid,
        technician_id: Uuid,
        inspection_date: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<Option<InspectionScheduleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("assign_schedule_technician");
        let result = sqlx::query_as::<_, InspectionScheduleEntity>(&format!(
            r#"
            UPDATE inspection_schedules
            SET technician_id = $2,
                inspection_date = COALESCE($3, inspection_date),
                status = 'scheduled',
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending' AND is_deleted = FALSE
            RETURNING {SCHEDULE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(technician_id)
        .bind(inspection_date)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Soft-delete a schedule. The only mutation permitted on terminal
    /// schedules. Returns false if already deleted or absent.
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("soft_delete_schedule");
        let result = sqlx::query(
            r#"
            UPDATE inspection_schedules
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Force-expire stale schedules in one batch write and return the
    /// affected ids.
    ///
    /// Two windows apply, both measured from the appointment time: a
    /// schedule that never started (Pending/Scheduled) expires after the
    /// 15-minute grace; one that started but was never finalized
    /// (InProgress) expires after the 60-minute grace. Signed and terminal
    /// schedules are excluded, so an immediate re-run matches zero rows.
    pub async fn expire_stale(&self) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("expire_stale_schedules");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE inspection_schedules
            SET status = 'expired', updated_at = NOW()
            WHERE is_deleted = FALSE
              AND (
                (status IN ('pending', 'scheduled')
                 AND NOW() > inspection_date + make_interval(mins => $1))
                OR
                (status = 'in_progress'
                 AND NOW() > inspection_date + make_interval(mins => $2))
              )
            RETURNING id
            "#,
        )
        .bind(NOT_STARTED_GRACE_MINUTES as i32)
        .bind(UNRESOLVED_GRACE_MINUTES as i32)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finalize an inspection in one transaction.
    ///
    /// On approve: schedule -> Approved, contract -> Completed, car ->
    /// Available, device -> InUsed. On reject: schedule -> Rejected,
    /// contract -> Rejected, car -> Rejected, device stays Available. The
    /// device's ledger binding is released either way (the contract is
    /// terminal). A guard failure on any row rolls back every write.
    #[allow(clippy::too_many_arguments)]
    pub async fn complete_inspection(
        &self,
        schedule_id: Uuid,
        contract_id: Uuid,
        car_id: Uuid,
        device_id: Uuid,
        approved: bool,
        inspection_results: &str,
        photo_urls: &[String],
    ) -> Result<CompletionOutcome, sqlx::Error> {
        let timer = QueryTimer::new("complete_inspection");
        let mut tx = self.pool.begin().await?;

        let photo_urls = if photo_urls.is_empty() {
            None
        } else {
            Some(photo_urls.to_vec())
        };
        let schedule_status = if approved { "approved" } else { "rejected" };
        let flipped = sqlx::query(
            r#"
            UPDATE inspection_schedules
            SET status = $2::inspection_schedule_status,
                photo_urls = COALESCE($3, photo_urls),
                updated_at = NOW()
            WHERE id = $1 AND status IN ('in_progress', 'signed') AND is_deleted = FALSE
            "#,
        )
        .bind(schedule_id)
        .bind(schedule_status)
        .bind(photo_urls)
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            timer.record();
            return Ok(CompletionOutcome::ScheduleNotCompletable);
        }

        let contract_status = if approved { "completed" } else { "rejected" };
        let closed = sqlx::query(
            r#"
            UPDATE car_contracts
            SET status = $2::car_contract_status, inspection_results = $3, updated_at = NOW()
            WHERE id = $1 AND status IN ('pending', 'owner_signed', 'technician_signed')
            "#,
        )
        .bind(contract_id)
        .bind(contract_status)
        .bind(inspection_results)
        .execute(&mut *tx)
        .await?;

        if closed.rows_affected() == 0 {
            timer.record();
            return Ok(CompletionOutcome::ContractNotOpen);
        }

        let car_status = if approved { "available" } else { "rejected" };
        sqlx::query(
            r#"
            UPDATE cars
            SET status = $2::car_status, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(car_id)
        .bind(car_status)
        .execute(&mut *tx)
        .await?;

        let device_status = if approved { "in_used" } else { "available" };
        sqlx::query(
            r#"
            UPDATE gps_devices
            SET status = $2::gps_device_status, active_contract_id = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(device_id)
        .bind(device_status)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(CompletionOutcome::Completed)
    }
}
