//! Inspection schedule route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    AssignTechnicianRequest, CompleteInspectionRequest, CompleteInspectionResponse,
    CreateScheduleRequest, CreateScheduleResponse, ListSchedulesQuery, ListSchedulesResponse,
    ScheduleItem, ScheduleStatus, StartInspectionResponse,
};
use persistence::repositories::{CarRepository, InspectionScheduleRepository};
use shared::pagination::PageInfo;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ActorIdentity;

/// POST /api/v1/schedules
///
/// Book an inspection appointment. Consultant (or admin) command; the
/// schedule starts Pending until a technician is confirmed.
pub async fn create_schedule(
    State(state): State<AppState>,
    ActorIdentity(actor): ActorIdentity,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<CreateScheduleResponse>), ApiError> {
    if !actor.role.can_create_schedule() {
        return Err(ApiError::Forbidden(
            "Only consultants may book inspections".to_string(),
        ));
    }

    request.validate()?;
    shared::validation::validate_inspection_date(request.inspection_date)
        .map_err(|e| ApiError::Validation(describe(&e)))?;

    let cars = CarRepository::new(state.pool.clone());
    cars.find_by_id(request.car_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Car not found".to_string()))?;

    let repo = InspectionScheduleRepository::new(state.pool.clone());
    let schedule = repo
        .create(
            request.car_id,
            request.technician_id,
            actor.id,
            request.inspection_date,
            &request.inspection_address,
            request.note.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateScheduleResponse {
            id: schedule.id,
            car_id: schedule.car_id,
            status: schedule.status.into(),
            inspection_date: schedule.inspection_date,
            created_at: schedule.created_at,
        }),
    ))
}

/// GET /api/v1/schedules
///
/// List schedules newest first, optionally filtered by status and car.
pub async fn list_schedules(
    State(state): State<AppState>,
    ActorIdentity(_actor): ActorIdentity,
    Query(query): Query<ListSchedulesQuery>,
) -> Result<Json<ListSchedulesResponse>, ApiError> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(
            ScheduleStatus::from_str(raw)
                .map_err(|_| ApiError::Validation(format!("Unknown status filter '{}'", raw)))?,
        ),
        None => None,
    };
    let status_db = status.map(Into::into);
    let page = query.page_params();

    let repo = InspectionScheduleRepository::new(state.pool.clone());
    let entities = repo
        .list(status_db, query.car_id, page.limit(), page.offset())
        .await?;
    let total = repo.count(status_db, query.car_id).await?;

    Ok(Json(ListSchedulesResponse {
        data: entities.into_iter().map(|e| e.into_item()).collect(),
        pagination: PageInfo::new(page, total),
    }))
}

/// GET /api/v1/schedules/:id
pub async fn get_schedule(
    State(state): State<AppState>,
    ActorIdentity(_actor): ActorIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<ScheduleItem>, ApiError> {
    let repo = InspectionScheduleRepository::new(state.pool.clone());
    let schedule = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Schedule not found".to_string()))?;

    Ok(Json(schedule.into_item()))
}

/// POST /api/v1/schedules/:id/assign
///
/// Confirm the technician (and optionally move the appointment):
/// Pending -> Scheduled.
pub async fn assign_technician(
    State(state): State<AppState>,
    ActorIdentity(actor): ActorIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignTechnicianRequest>,
) -> Result<Json<ScheduleItem>, ApiError> {
    if !actor.role.can_create_schedule() {
        return Err(ApiError::Forbidden(
            "Only consultants may assign technicians".to_string(),
        ));
    }

    if let Some(date) = request.inspection_date {
        shared::validation::validate_inspection_date(date)
            .map_err(|e| ApiError::Validation(describe(&e)))?;
    }

    let repo = InspectionScheduleRepository::new(state.pool.clone());
    let schedule = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Schedule not found".to_string()))?;

    let updated = repo
        .assign_technician(id, request.technician_id, request.inspection_date)
        .await?
        .ok_or_else(|| {
            let status: ScheduleStatus = schedule.status.into();
            ApiError::InvalidState(format!(
                "Schedule in status '{}' cannot be assigned",
                status
            ))
        })?;

    Ok(Json(updated.into_item()))
}

/// POST /api/v1/schedules/:id/start
///
/// Technician begins the inspection: Scheduled -> InProgress, contract
/// created or reused, GPS device reserved.
pub async fn start_inspection(
    State(state): State<AppState>,
    ActorIdentity(actor): ActorIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<StartInspectionResponse>, ApiError> {
    let response = state.contract_manager.start_or_reuse(actor, id).await?;
    Ok(Json(response))
}

/// POST /api/v1/schedules/:id/complete
///
/// Finalize the inspection as approved or rejected. Requires both contract
/// signatures.
pub async fn complete_inspection(
    State(state): State<AppState>,
    ActorIdentity(actor): ActorIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteInspectionRequest>,
) -> Result<Json<CompleteInspectionResponse>, ApiError> {
    request.validate()?;
    let response = state.completion_handler.complete(actor, id, request).await?;
    Ok(Json(response))
}

/// DELETE /api/v1/schedules/:id
///
/// Soft delete. The one mutation allowed on terminal schedules.
pub async fn delete_schedule(
    State(state): State<AppState>,
    ActorIdentity(actor): ActorIdentity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !actor.role.can_create_schedule() {
        return Err(ApiError::Forbidden(
            "Only consultants may delete schedules".to_string(),
        ));
    }

    let repo = InspectionScheduleRepository::new(state.pool.clone());
    let deleted = repo.soft_delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Schedule not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn describe(err: &validator::ValidationError) -> String {
    err.message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| err.code.to_string())
}
