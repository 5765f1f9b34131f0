//! Car contract repository.
//!
//! Owns the two transactions that tie contracts to the rest of the
//! workflow: starting an inspection (contract creation/reuse + device
//! reservation + schedule flip) and recording a signature (timestamp
//! write + schedule flip when both parties have signed).

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CarContractEntity;
use crate::metrics::QueryTimer;
use crate::repositories::GpsDeviceRepository;

/// Repository for car contract operations.
#[derive(Clone)]
pub struct CarContractRepository {
    pool: PgPool,
}

/// Outcome of the start-inspection transaction.
#[derive(Debug)]
pub enum StartInspectionOutcome {
    /// Schedule is InProgress and the contract holds the reserved device.
    Started { contract: CarContractEntity },
    /// The car has no GPS device reference to bind.
    DeviceNotAssigned,
    /// The car's device is bound to another non-terminal contract.
    DeviceConflict { device_id: Uuid },
    /// The schedule was not in a startable state (concurrent change,
    /// expiration, or wrong status).
    NotStartable,
}

/// Outcome of the record-signature transaction.
#[derive(Debug)]
pub enum SignatureOutcome {
    /// Signature recorded; `schedule_signed` is true when this was the
    /// second signature and the schedule moved to Signed.
    Recorded {
        contract: CarContractEntity,
        schedule_id: Uuid,
        schedule_signed: bool,
    },
    /// The contract does not accept this signature (terminal status or
    /// this party already signed).
    NotSignable,
    /// No InProgress schedule exists for the contract's car.
    ScheduleMissing,
}

impl CarContractRepository {
    /// Creates a new CarContractRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a contract by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CarContractEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_contract_by_id");
        let result = sqlx::query_as::<_, CarContractEntity>(
            r#"
            SELECT id, car_id, technician_id, gps_device_id, status,
                   owner_signed_at, technician_signed_at, inspection_results, terms,
                   created_at, updated_at
            FROM car_contracts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the car's non-terminal contract, if any. At most one exists
    /// (enforced by a partial unique index on car_id).
    pub async fn find_active_by_car(
        &self,
        car_id: Uuid,
    ) -> Result<Option<CarContractEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_contract_by_car");
        let result = sqlx::query_as::<_, CarContractEntity>(
            r#"
            SELECT id, car_id, technician_id, gps_device_id, status,
                   owner_signed_at, technician_signed_at, inspection_results, terms,
                   created_at, updated_at
            FROM car_contracts
            WHERE car_id = $1 AND status NOT IN ('completed', 'rejected')
            "#,
        )
        .bind(car_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Start (or restart) an inspection in one transaction:
    ///
    /// 1. lock the car row and read its GPS device reference
    /// 2. flip the schedule Scheduled -> InProgress (guarded)
    /// 3. locate the car's non-terminal contract, or create one
    /// 4. rebind technician and device, resetting a reused contract to
    ///    Pending (re-inspection flows)
    /// 5. reserve the device through the ledger check-and-set
    ///
    /// Any failed step rolls the whole transaction back.
    pub async fn start_inspection(
        &self,
        schedule_id: Uuid,
        car_id: Uuid,
        technician_id: Uuid,
    ) -> Result<StartInspectionOutcome, sqlx::Error> {
        let timer = QueryTimer::new("start_inspection");
        let mut tx = self.pool.begin().await?;

        let gps_device_id: Option<Option<Uuid>> = sqlx::query_scalar(
            r#"
            SELECT gps_device_id FROM cars WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(car_id)
        .fetch_optional(&mut *tx)
        .await?;

        let device_id = match gps_device_id.flatten() {
            Some(id) => id,
            None => {
                timer.record();
                return Ok(StartInspectionOutcome::DeviceNotAssigned);
            }
        };

        let flipped = sqlx::query(
            r#"
            UPDATE inspection_schedules
            SET status = 'in_progress', technician_id = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'scheduled' AND is_deleted = FALSE
            "#,
        )
        .bind(schedule_id)
        .bind(technician_id)
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            timer.record();
            return Ok(StartInspectionOutcome::NotStartable);
        }

        let existing = sqlx::query_as::<_, CarContractEntity>(
            r#"
            SELECT id, car_id, technician_id, gps_device_id, status,
                   owner_signed_at, technician_signed_at, inspection_results, terms,
                   created_at, updated_at
            FROM car_contracts
            WHERE car_id = $1 AND status NOT IN ('completed', 'rejected')
            FOR UPDATE
            "#,
        )
        .bind(car_id)
        .fetch_optional(&mut *tx)
        .await?;

        let contract = match existing {
            Some(contract) => {
                // Reused contract: rebind and reset signature progress.
                sqlx::query_as::<_, CarContractEntity>(
                    r#"
                    UPDATE car_contracts
                    SET technician_id = $2, gps_device_id = $3, status = 'pending',
                        owner_signed_at = NULL, technician_signed_at = NULL,
                        updated_at = NOW()
                    WHERE id = $1
                    RETURNING id, car_id, technician_id, gps_device_id, status,
                              owner_signed_at, technician_signed_at, inspection_results, terms,
                              created_at, updated_at
                    "#,
                )
                .bind(contract.id)
                .bind(technician_id)
                .bind(device_id)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, CarContractEntity>(
                    r#"
                    INSERT INTO car_contracts (id, car_id, technician_id, gps_device_id, status)
                    VALUES ($1, $2, $3, $4, 'pending')
                    RETURNING id, car_id, technician_id, gps_device_id, status,
                              owner_signed_at, technician_signed_at, inspection_results, terms,
                              created_at, updated_at
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(car_id)
                .bind(technician_id)
                .bind(device_id)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        let reserved = GpsDeviceRepository::reserve_in(&mut *tx, device_id, contract.id).await?;
        if !reserved {
            timer.record();
            return Ok(StartInspectionOutcome::DeviceConflict { device_id });
        }

        tx.commit().await?;
        timer.record();
        Ok(StartInspectionOutcome::Started { contract })
    }

    /// Record one party's signature in one transaction.
    ///
    /// The schedule row for the car is locked first so the two signature
    /// writers serialize; the last writer both names the contract status
    /// and flips the schedule InProgress -> Signed.
    pub async fn record_signature(
        &self,
        contract_id: Uuid,
        role: domain::models::SignerRole,
    ) -> Result<SignatureOutcome, sqlx::Error> {
        let timer = QueryTimer::new("record_contract_signature");
        let mut tx = self.pool.begin().await?;

        let schedule_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT s.id
            FROM inspection_schedules s
            JOIN car_contracts c ON c.car_id = s.car_id
            WHERE c.id = $1 AND s.status = 'in_progress' AND s.is_deleted = FALSE
            FOR UPDATE OF s
            "#,
        )
        .bind(contract_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(schedule_id) = schedule_id else {
            timer.record();
            return Ok(SignatureOutcome::ScheduleMissing);
        };

        // Guarded timestamp write: a party whose timestamp is already set
        // cannot sign again, and terminal contracts accept nothing. The
        // status label written is the signer's, per SignerRole::signed_status.
        let query = match role {
            domain::models::SignerRole::Owner => {
                r#"
                UPDATE car_contracts
                SET owner_signed_at = NOW(), status = $2::car_contract_status, updated_at = NOW()
                WHERE id = $1
                  AND status IN ('pending', 'owner_signed', 'technician_signed')
                  AND owner_signed_at IS NULL
                RETURNING id, car_id, technician_id, gps_device_id, status,
                          owner_signed_at, technician_signed_at, inspection_results, terms,
                          created_at, updated_at
                "#
            }
            domain::models::SignerRole::Technician => {
                r#"
                UPDATE car_contracts
                SET technician_signed_at = NOW(), status = $2::car_contract_status, updated_at = NOW()
                WHERE id = $1
                  AND status IN ('pending', 'owner_signed', 'technician_signed')
                  AND technician_signed_at IS NULL
                RETURNING id, car_id, technician_id, gps_device_id, status,
                          owner_signed_at, technician_signed_at, inspection_results, terms,
                          created_at, updated_at
                "#
            }
        };

        let contract = sqlx::query_as::<_, CarContractEntity>(query)
            .bind(contract_id)
            .bind(role.signed_status().to_string())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(contract) = contract else {
            timer.record();
            return Ok(SignatureOutcome::NotSignable);
        };

        let schedule_signed = contract.fully_signed();
        if schedule_signed {
            sqlx::query(
                r#"
                UPDATE inspection_schedules
                SET status = 'signed', updated_at = NOW()
                WHERE id = $1 AND status = 'in_progress'
                "#,
            )
            .bind(schedule_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(SignatureOutcome::Recorded {
            contract,
            schedule_id,
            schedule_signed,
        })
    }
}
