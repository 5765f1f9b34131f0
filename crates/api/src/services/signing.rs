//! Signature coordinator for the dual-signature contract.
//!
//! Owner and technician sign independently, in any order, exactly once
//! each. The repository transaction serializes the two writers on the
//! schedule row; this service owns the identity checks and pushes the
//! ScheduleSigned broadcast once the second signature lands.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use domain::models::{
    can_sign, status_from_signatures, Actor, ContractStatus, ScheduleStatus, SignContractRequest,
    SignContractResponse, SignerRole,
};
use domain::services::{
    BroadcastResult, NotificationGateway, ScheduleBroadcast, ScheduleEvent,
};
use persistence::repositories::{CarContractRepository, CarRepository, SignatureOutcome};

use crate::error::ApiError;
use crate::middleware::metrics::record_signature_recorded;

/// Coordinates the sign-contract command.
#[derive(Clone)]
pub struct SignatureCoordinator {
    contracts: CarContractRepository,
    cars: CarRepository,
    notifier: Arc<dyn NotificationGateway>,
}

impl SignatureCoordinator {
    pub fn new(pool: PgPool, notifier: Arc<dyn NotificationGateway>) -> Self {
        Self {
            contracts: CarContractRepository::new(pool.clone()),
            cars: CarRepository::new(pool),
            notifier,
        }
    }

    /// Record one party's signature on a contract.
    pub async fn sign(
        &self,
        actor: Actor,
        contract_id: Uuid,
        request: SignContractRequest,
    ) -> Result<SignContractResponse, ApiError> {
        let contract = self
            .contracts
            .find_by_id(contract_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Contract not found".to_string()))?;

        match request.role {
            SignerRole::Owner => {
                let car = self
                    .cars
                    .find_by_id(contract.car_id)
                    .await?
                    .ok_or_else(|| ApiError::NotFound("Car not found".to_string()))?;

                if !actor.role.is_owner() || car.owner_id != actor.id {
                    return Err(ApiError::Forbidden(
                        "Only the car's owner may sign as owner".to_string(),
                    ));
                }
            }
            SignerRole::Technician => {
                if !actor.role.is_technician() || contract.technician_id != Some(actor.id) {
                    return Err(ApiError::Forbidden(
                        "Only the assigned technician may sign as technician".to_string(),
                    ));
                }
            }
        }

        // Pre-flight the signing rule for a precise error; the repository's
        // guarded UPDATE re-checks it under the row lock.
        let contract_status: ContractStatus = contract.status.into();
        if !can_sign(
            contract_status,
            request.role,
            contract.owner_signed_at,
            contract.technician_signed_at,
        ) {
            return Err(ApiError::InvalidState(format!(
                "Contract does not accept a {} signature in its current state",
                request.role
            )));
        }

        let outcome = self.contracts.record_signature(contract_id, request.role).await?;

        match outcome {
            SignatureOutcome::Recorded {
                contract,
                schedule_id,
                schedule_signed,
            } => {
                record_signature_recorded(&request.role.to_string());
                info!(
                    contract_id = %contract.id,
                    role = %request.role,
                    fully_signed = schedule_signed,
                    "Contract signature recorded"
                );

                if schedule_signed {
                    let result = self
                        .notifier
                        .broadcast(ScheduleBroadcast::single(
                            ScheduleEvent::ScheduleSigned,
                            schedule_id,
                            ScheduleStatus::Signed,
                        ))
                        .await;
                    if let BroadcastResult::Failed(err) = result {
                        warn!(error = %err, "Signed broadcast delivery failed");
                    }
                }

                let fully_signed = contract.fully_signed();
                Ok(SignContractResponse {
                    contract_id: contract.id,
                    status: status_from_signatures(
                        contract.owner_signed_at,
                        contract.technician_signed_at,
                        request.role,
                    ),
                    owner_signed_at: contract.owner_signed_at,
                    technician_signed_at: contract.technician_signed_at,
                    fully_signed,
                })
            }
            SignatureOutcome::NotSignable => Err(ApiError::InvalidState(format!(
                "Contract does not accept a {} signature in its current state",
                request.role
            ))),
            SignatureOutcome::ScheduleMissing => Err(ApiError::NotFound(
                "No in-progress inspection exists for this contract".to_string(),
            )),
        }
    }
}
