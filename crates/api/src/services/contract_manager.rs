//! Contract manager: starting an inspection and reusing open contracts.
//!
//! A technician arriving at the appointment starts the inspection. That
//! command flips the schedule to InProgress and produces the contract to be
//! dual-signed, reusing the car's open contract when one exists (a rejected
//! first inspection leaves no open contract behind, so a re-inspection gets
//! a fresh one). The heavy lifting happens inside one repository
//! transaction; this service owns the permission and window checks and the
//! outcome-to-error mapping.

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use domain::models::{should_expire, window_open, Actor, ScheduleStatus, StartInspectionResponse};
use persistence::repositories::{
    CarContractRepository, InspectionScheduleRepository, StartInspectionOutcome,
};

use crate::error::ApiError;

/// Coordinates the start-inspection command.
#[derive(Clone)]
pub struct ContractManager {
    schedules: InspectionScheduleRepository,
    contracts: CarContractRepository,
}

impl ContractManager {
    pub fn new(pool: PgPool) -> Self {
        Self {
            schedules: InspectionScheduleRepository::new(pool.clone()),
            contracts: CarContractRepository::new(pool),
        }
    }

    /// Start the inspection for a schedule, creating or reusing the car's
    /// open contract and reserving the car's GPS device.
    pub async fn start_or_reuse(
        &self,
        actor: Actor,
        schedule_id: Uuid,
    ) -> Result<StartInspectionResponse, ApiError> {
        if !actor.role.is_technician() {
            return Err(ApiError::Forbidden(
                "Only technicians may start an inspection".to_string(),
            ));
        }

        let schedule = self
            .schedules
            .find_by_id(schedule_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Schedule not found".to_string()))?;

        if let Some(assigned) = schedule.technician_id {
            if assigned != actor.id {
                return Err(ApiError::Forbidden(
                    "Schedule is assigned to another technician".to_string(),
                ));
            }
        }

        let status: ScheduleStatus = schedule.status.into();
        if !status.can_start() {
            return Err(ApiError::InvalidState(format!(
                "Schedule in status '{}' cannot be started",
                status
            )));
        }

        let now = Utc::now();
        if !window_open(schedule.inspection_date, now) {
            return Err(ApiError::InvalidState(
                "Inspection window has not opened yet".to_string(),
            ));
        }

        // An overdue schedule cannot be started even if the sweeper has not
        // expired it yet.
        if should_expire(status, schedule.inspection_date, now) {
            return Err(ApiError::InvalidState(
                "Inspection window has closed".to_string(),
            ));
        }

        let outcome = self
            .contracts
            .start_inspection(schedule_id, schedule.car_id, actor.id)
            .await?;

        match outcome {
            StartInspectionOutcome::Started { contract } => {
                let gps_device_id = contract.gps_device_id.ok_or_else(|| {
                    ApiError::Internal("Started contract lost its device binding".to_string())
                })?;

                info!(
                    schedule_id = %schedule_id,
                    contract_id = %contract.id,
                    gps_device_id = %gps_device_id,
                    technician_id = %actor.id,
                    "Inspection started"
                );

                Ok(StartInspectionResponse {
                    schedule_id,
                    status: ScheduleStatus::InProgress,
                    contract_id: contract.id,
                    gps_device_id,
                })
            }
            StartInspectionOutcome::DeviceNotAssigned => Err(ApiError::DeviceNotAssigned(
                "Car has no GPS device assigned".to_string(),
            )),
            StartInspectionOutcome::DeviceConflict { device_id } => Err(ApiError::ResourceConflict(
                format!("GPS device {} is reserved by another contract", device_id),
            )),
            StartInspectionOutcome::NotStartable => Err(ApiError::InvalidState(
                "Schedule was modified concurrently and is no longer startable".to_string(),
            )),
        }
    }
}
