//! Car contract route handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use domain::models::{ContractItem, SignContractRequest, SignContractResponse};
use persistence::repositories::CarContractRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ActorIdentity;

/// GET /api/v1/contracts/:id
pub async fn get_contract(
    State(state): State<AppState>,
    ActorIdentity(_actor): ActorIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<ContractItem>, ApiError> {
    let repo = CarContractRepository::new(state.pool.clone());
    let contract = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Contract not found".to_string()))?;

    Ok(Json(contract.into_item()))
}

/// POST /api/v1/contracts/:id/sign
///
/// Record one party's signature. Owner and technician may sign in either
/// order; the second signature moves the schedule to Signed.
pub async fn sign_contract(
    State(state): State<AppState>,
    ActorIdentity(actor): ActorIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<SignContractRequest>,
) -> Result<Json<SignContractResponse>, ApiError> {
    let response = state.signature_coordinator.sign(actor, id, request).await?;
    Ok(Json(response))
}
