//! Inspection completion handler.
//!
//! Finalizing an inspection writes four rows atomically: the schedule
//! (Approved/Rejected), the contract (Completed/Rejected with the results
//! text), the car's status, and the GPS device (status plus ledger
//! release). The repository owns that transaction; this service owns the
//! permission checks, the dual-signature requirement, and the
//! ScheduleCompleted broadcast.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use domain::models::{
    Actor, CompleteInspectionRequest, CompleteInspectionResponse, ScheduleStatus,
};
use domain::services::{
    BroadcastResult, NotificationGateway, ScheduleBroadcast, ScheduleEvent,
};
use persistence::repositories::{
    CarContractRepository, CompletionOutcome, InspectionScheduleRepository,
};

use crate::error::ApiError;
use crate::middleware::metrics::record_inspection_completed;

/// Coordinates the complete-inspection command.
#[derive(Clone)]
pub struct InspectionCompletionHandler {
    schedules: InspectionScheduleRepository,
    contracts: CarContractRepository,
    notifier: Arc<dyn NotificationGateway>,
}

impl InspectionCompletionHandler {
    pub fn new(pool: PgPool, notifier: Arc<dyn NotificationGateway>) -> Self {
        Self {
            schedules: InspectionScheduleRepository::new(pool.clone()),
            contracts: CarContractRepository::new(pool),
            notifier,
        }
    }

    /// Finalize an inspection as approved or rejected.
    pub async fn complete(
        &self,
        actor: Actor,
        schedule_id: Uuid,
        request: CompleteInspectionRequest,
    ) -> Result<CompleteInspectionResponse, ApiError> {
        let schedule = self
            .schedules
            .find_by_id(schedule_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Schedule not found".to_string()))?;

        if !actor.role.is_technician() || schedule.technician_id != Some(actor.id) {
            return Err(ApiError::Forbidden(
                "Only the assigned technician may complete the inspection".to_string(),
            ));
        }

        let status: ScheduleStatus = schedule.status.into();
        if !status.can_complete() {
            return Err(ApiError::InvalidState(format!(
                "Schedule in status '{}' cannot be completed",
                status
            )));
        }

        let contract = self
            .contracts
            .find_active_by_car(schedule.car_id)
            .await?
            .ok_or_else(|| {
                ApiError::InvalidState("No open contract exists for this inspection".to_string())
            })?;

        if !contract.fully_signed() {
            return Err(ApiError::InvalidState(
                "Contract must be signed by both parties before completion".to_string(),
            ));
        }

        if contract.gps_device_id != Some(request.gps_device_id) {
            return Err(ApiError::Validation(
                "gps_device_id does not match the contract's reserved device".to_string(),
            ));
        }

        let outcome = self
            .schedules
            .complete_inspection(
                schedule_id,
                contract.id,
                schedule.car_id,
                request.gps_device_id,
                request.approved,
                &request.inspection_results,
                &request.photo_urls,
            )
            .await?;

        match outcome {
            CompletionOutcome::Completed => {
                let new_status = if request.approved {
                    ScheduleStatus::Approved
                } else {
                    ScheduleStatus::Rejected
                };

                record_inspection_completed(request.approved);
                info!(
                    schedule_id = %schedule_id,
                    contract_id = %contract.id,
                    approved = request.approved,
                    "Inspection completed"
                );

                let result = self
                    .notifier
                    .broadcast(ScheduleBroadcast::single(
                        ScheduleEvent::ScheduleCompleted,
                        schedule_id,
                        new_status,
                    ))
                    .await;
                if let BroadcastResult::Failed(err) = result {
                    warn!(error = %err, "Completion broadcast delivery failed");
                }

                Ok(CompleteInspectionResponse {
                    schedule_id,
                    status: new_status,
                    contract_id: contract.id,
                })
            }
            CompletionOutcome::ScheduleNotCompletable => Err(ApiError::InvalidState(
                "Schedule was modified concurrently and is no longer completable".to_string(),
            )),
            CompletionOutcome::ContractNotOpen => Err(ApiError::InvalidState(
                "Contract has already been finalized".to_string(),
            )),
        }
    }
}
