//! Integration tests for the inspection scheduling and dual-signature
//! contract workflow, run against a real PostgreSQL database.
//!
//! Set `TEST_DATABASE_URL` to run these; without it every test skips.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;
use uuid::Uuid;

use domain::models::{
    Actor, ActorRole, CompleteInspectionRequest, SignContractRequest, SignerRole,
};
use domain::services::{MockNotificationGateway, ScheduleEvent};
use motorent_api::app::create_app;
use motorent_api::config::Config;
use motorent_api::error::ApiError;
use motorent_api::services::{ContractManager, InspectionCompletionHandler, SignatureCoordinator};
use persistence::entities::GpsDeviceStatusDb;
use persistence::repositories::{
    CarRepository, CompletionOutcome, GpsDeviceRepository, InspectionScheduleRepository,
};

fn technician(id: Uuid) -> Actor {
    Actor::new(id, ActorRole::Technician)
}

fn owner(id: Uuid) -> Actor {
    Actor::new(id, ActorRole::Owner)
}

/// Drive one car from Scheduled through a started inspection, returning
/// (schedule_id, contract_id, device_id, technician_id, owner_id).
async fn start_flow(pool: &sqlx::PgPool) -> (Uuid, Uuid, Uuid, Uuid, Uuid) {
    let owner_id = Uuid::new_v4();
    let technician_id = Uuid::new_v4();
    let device_id = common::insert_device(pool).await;
    let car_id = common::insert_car(pool, owner_id, Some(device_id)).await;
    let schedule_id = common::insert_schedule(
        pool,
        car_id,
        Some(technician_id),
        Uuid::new_v4(),
        "scheduled",
        -1,
    )
    .await;

    let manager = ContractManager::new(pool.clone());
    let started = manager
        .start_or_reuse(technician(technician_id), schedule_id)
        .await
        .expect("start_or_reuse failed");

    (
        schedule_id,
        started.contract_id,
        device_id,
        technician_id,
        owner_id,
    )
}

#[tokio::test]
async fn test_start_inspection_reserves_device_and_flips_schedule() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let (schedule_id, contract_id, device_id, _, _) = start_flow(&pool).await;

    assert_eq!(common::schedule_status(&pool, schedule_id).await, "in_progress");
    assert_eq!(common::contract_status(&pool, contract_id).await, "pending");

    let (_, active) = common::device_state(&pool, device_id).await;
    assert_eq!(active, Some(contract_id));
}

#[tokio::test]
async fn test_start_without_device_fails_and_leaves_schedule_untouched() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let technician_id = Uuid::new_v4();
    let car_id = common::insert_car(&pool, Uuid::new_v4(), None).await;
    let schedule_id = common::insert_schedule(
        &pool,
        car_id,
        Some(technician_id),
        Uuid::new_v4(),
        "scheduled",
        -1,
    )
    .await;

    let manager = ContractManager::new(pool.clone());
    let err = manager
        .start_or_reuse(technician(technician_id), schedule_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::DeviceNotAssigned(_)));

    // The guarded transaction rolled back the schedule flip.
    assert_eq!(common::schedule_status(&pool, schedule_id).await, "scheduled");
}

#[tokio::test]
async fn test_start_conflicts_when_device_reserved_elsewhere() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let technician_id = Uuid::new_v4();
    let device_id = common::insert_device(&pool).await;

    // Another car's contract already holds the device.
    let other_car = common::insert_car(&pool, Uuid::new_v4(), None).await;
    let other_contract =
        common::insert_contract(&pool, other_car, None, Some(device_id), "pending").await;
    let devices = GpsDeviceRepository::new(pool.clone());
    assert!(devices.reserve(device_id, other_contract).await.unwrap());

    let car_id = common::insert_car(&pool, Uuid::new_v4(), Some(device_id)).await;
    let schedule_id = common::insert_schedule(
        &pool,
        car_id,
        Some(technician_id),
        Uuid::new_v4(),
        "scheduled",
        -1,
    )
    .await;

    let manager = ContractManager::new(pool.clone());
    let err = manager
        .start_or_reuse(technician(technician_id), schedule_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ResourceConflict(_)));

    // Rollback: the schedule never moved and the device binding is intact.
    assert_eq!(common::schedule_status(&pool, schedule_id).await, "scheduled");
    let (_, active) = common::device_state(&pool, device_id).await;
    assert_eq!(active, Some(other_contract));
}

#[tokio::test]
async fn test_concurrent_device_reservations_admit_one_winner() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let device_id = common::insert_device(&pool).await;
    let car_a = common::insert_car(&pool, Uuid::new_v4(), None).await;
    let car_b = common::insert_car(&pool, Uuid::new_v4(), None).await;
    let contract_a = common::insert_contract(&pool, car_a, None, None, "pending").await;
    let contract_b = common::insert_contract(&pool, car_b, None, None, "pending").await;

    let devices = GpsDeviceRepository::new(pool.clone());
    let (a, b) = tokio::join!(
        devices.reserve(device_id, contract_a),
        devices.reserve(device_id, contract_b),
    );
    let a = a.unwrap();
    let b = b.unwrap();

    assert!(a ^ b, "exactly one reservation must win, got a={a} b={b}");

    // Re-reserving for the winner is idempotent.
    let winner = if a { contract_a } else { contract_b };
    assert!(devices.reserve(device_id, winner).await.unwrap());
}

#[tokio::test]
async fn test_dual_signature_either_order_signs_the_schedule() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    for owner_first in [true, false] {
        let (schedule_id, contract_id, _, technician_id, owner_id) = start_flow(&pool).await;

        let gateway = Arc::new(MockNotificationGateway::new());
        let coordinator = SignatureCoordinator::new(pool.clone(), gateway.clone());

        let signers: [(Actor, SignerRole); 2] = if owner_first {
            [
                (owner(owner_id), SignerRole::Owner),
                (technician(technician_id), SignerRole::Technician),
            ]
        } else {
            [
                (technician(technician_id), SignerRole::Technician),
                (owner(owner_id), SignerRole::Owner),
            ]
        };

        let first = coordinator
            .sign(signers[0].0, contract_id, SignContractRequest { role: signers[0].1 })
            .await
            .expect("first signature failed");
        assert!(!first.fully_signed);
        assert_eq!(common::schedule_status(&pool, schedule_id).await, "in_progress");

        let second = coordinator
            .sign(signers[1].0, contract_id, SignContractRequest { role: signers[1].1 })
            .await
            .expect("second signature failed");
        assert!(second.fully_signed);
        assert!(second.owner_signed_at.is_some());
        assert!(second.technician_signed_at.is_some());

        // Either order converges on the same schedule state and broadcast.
        assert_eq!(common::schedule_status(&pool, schedule_id).await, "signed");
        let recorded = gateway.recorded().await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].event, ScheduleEvent::ScheduleSigned);
        assert_eq!(recorded[0].schedule_ids, vec![schedule_id]);
    }
}

#[tokio::test]
async fn test_double_signing_is_rejected() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let (_, contract_id, _, _, owner_id) = start_flow(&pool).await;

    let gateway = Arc::new(MockNotificationGateway::new());
    let coordinator = SignatureCoordinator::new(pool.clone(), gateway);

    coordinator
        .sign(
            owner(owner_id),
            contract_id,
            SignContractRequest { role: SignerRole::Owner },
        )
        .await
        .expect("first owner signature failed");

    let err = coordinator
        .sign(
            owner(owner_id),
            contract_id,
            SignContractRequest { role: SignerRole::Owner },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidState(_)));
}

#[tokio::test]
async fn test_wrong_party_cannot_sign() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let (_, contract_id, _, technician_id, _) = start_flow(&pool).await;

    let gateway = Arc::new(MockNotificationGateway::new());
    let coordinator = SignatureCoordinator::new(pool.clone(), gateway);

    // A stranger claiming the owner role is rejected.
    let err = coordinator
        .sign(
            owner(Uuid::new_v4()),
            contract_id,
            SignContractRequest { role: SignerRole::Owner },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    // The technician cannot sign in the owner's place either.
    let err = coordinator
        .sign(
            technician(technician_id),
            contract_id,
            SignContractRequest { role: SignerRole::Owner },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn test_completion_requires_both_signatures() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let (schedule_id, contract_id, device_id, technician_id, owner_id) = start_flow(&pool).await;

    let gateway = Arc::new(MockNotificationGateway::new());
    let coordinator = SignatureCoordinator::new(pool.clone(), gateway.clone());
    coordinator
        .sign(
            owner(owner_id),
            contract_id,
            SignContractRequest { role: SignerRole::Owner },
        )
        .await
        .expect("owner signature failed");

    let handler = InspectionCompletionHandler::new(pool.clone(), gateway);
    let err = handler
        .complete(
            technician(technician_id),
            schedule_id,
            CompleteInspectionRequest {
                inspection_results: "engine ok".to_string(),
                gps_device_id: device_id,
                approved: true,
                photo_urls: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidState(_)));

    // Nothing moved.
    assert_eq!(common::schedule_status(&pool, schedule_id).await, "in_progress");
    assert_eq!(common::contract_status(&pool, contract_id).await, "owner_signed");
}

#[tokio::test]
async fn test_wrong_technician_cannot_complete() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let (schedule_id, _, device_id, _, _) = start_flow(&pool).await;

    let gateway = Arc::new(MockNotificationGateway::new());
    let handler = InspectionCompletionHandler::new(pool.clone(), gateway);
    let err = handler
        .complete(
            technician(Uuid::new_v4()),
            schedule_id,
            CompleteInspectionRequest {
                inspection_results: "engine ok".to_string(),
                gps_device_id: device_id,
                approved: true,
                photo_urls: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
    assert_eq!(common::schedule_status(&pool, schedule_id).await, "in_progress");
}

async fn sign_both(
    pool: &sqlx::PgPool,
    contract_id: Uuid,
    technician_id: Uuid,
    owner_id: Uuid,
) -> Arc<MockNotificationGateway> {
    let gateway = Arc::new(MockNotificationGateway::new());
    let coordinator = SignatureCoordinator::new(pool.clone(), gateway.clone());
    coordinator
        .sign(
            owner(owner_id),
            contract_id,
            SignContractRequest { role: SignerRole::Owner },
        )
        .await
        .expect("owner signature failed");
    coordinator
        .sign(
            technician(technician_id),
            contract_id,
            SignContractRequest { role: SignerRole::Technician },
        )
        .await
        .expect("technician signature failed");
    gateway
}

#[tokio::test]
async fn test_approval_updates_all_four_rows() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let (schedule_id, contract_id, device_id, technician_id, owner_id) = start_flow(&pool).await;
    let car_id: Uuid =
        sqlx::query_scalar("SELECT car_id FROM inspection_schedules WHERE id = $1")
            .bind(schedule_id)
            .fetch_one(&pool)
            .await
            .unwrap();

    let gateway = sign_both(&pool, contract_id, technician_id, owner_id).await;

    let handler = InspectionCompletionHandler::new(pool.clone(), gateway.clone());
    let response = handler
        .complete(
            technician(technician_id),
            schedule_id,
            CompleteInspectionRequest {
                inspection_results: "all checks passed".to_string(),
                gps_device_id: device_id,
                approved: true,
                photo_urls: vec!["https://cdn.motorent.vn/inspections/front.jpg".to_string()],
            },
        )
        .await
        .expect("completion failed");
    assert_eq!(response.contract_id, contract_id);

    assert_eq!(common::schedule_status(&pool, schedule_id).await, "approved");
    assert_eq!(common::contract_status(&pool, contract_id).await, "completed");
    assert_eq!(common::car_status(&pool, car_id).await, "available");

    let (device_status, active) = common::device_state(&pool, device_id).await;
    assert_eq!(device_status, "in_used");
    assert_eq!(active, None, "device ledger must be released");

    let photos: Vec<String> =
        sqlx::query_scalar("SELECT photo_urls FROM inspection_schedules WHERE id = $1")
            .bind(schedule_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(
        photos,
        vec!["https://cdn.motorent.vn/inspections/front.jpg".to_string()]
    );

    let events: Vec<_> = gateway
        .recorded()
        .await
        .into_iter()
        .map(|b| b.event)
        .collect();
    assert!(events.contains(&ScheduleEvent::ScheduleCompleted));
}

#[tokio::test]
async fn test_rejection_leaves_device_available() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let (schedule_id, contract_id, device_id, technician_id, owner_id) = start_flow(&pool).await;
    let gateway = sign_both(&pool, contract_id, technician_id, owner_id).await;

    let handler = InspectionCompletionHandler::new(pool.clone(), gateway);
    handler
        .complete(
            technician(technician_id),
            schedule_id,
            CompleteInspectionRequest {
                inspection_results: "frame damage".to_string(),
                gps_device_id: device_id,
                approved: false,
                photo_urls: vec![],
            },
        )
        .await
        .expect("rejection failed");

    assert_eq!(common::schedule_status(&pool, schedule_id).await, "rejected");
    assert_eq!(common::contract_status(&pool, contract_id).await, "rejected");

    let (device_status, active) = common::device_state(&pool, device_id).await;
    assert_eq!(device_status, "available");
    assert_eq!(active, None);
}

#[tokio::test]
async fn test_completion_rolls_back_when_contract_already_terminal() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let (schedule_id, contract_id, device_id, technician_id, owner_id) = start_flow(&pool).await;
    let car_id: Uuid =
        sqlx::query_scalar("SELECT car_id FROM inspection_schedules WHERE id = $1")
            .bind(schedule_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    sign_both(&pool, contract_id, technician_id, owner_id).await;

    // Force the contract terminal behind the transaction's back.
    sqlx::query("UPDATE car_contracts SET status = 'completed' WHERE id = $1")
        .bind(contract_id)
        .execute(&pool)
        .await
        .unwrap();

    let repo = InspectionScheduleRepository::new(pool.clone());
    let outcome = repo
        .complete_inspection(schedule_id, contract_id, car_id, device_id, true, "late", &[])
        .await
        .unwrap();
    assert!(matches!(outcome, CompletionOutcome::ContractNotOpen));

    // The schedule write in the same transaction rolled back.
    assert_eq!(common::schedule_status(&pool, schedule_id).await, "signed");
}

#[tokio::test]
async fn test_sweeper_expires_overdue_and_spares_signed() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let creator = Uuid::new_v4();
    let car_a = common::insert_car(&pool, Uuid::new_v4(), None).await;
    let car_b = common::insert_car(&pool, Uuid::new_v4(), None).await;
    let car_c = common::insert_car(&pool, Uuid::new_v4(), None).await;
    let car_d = common::insert_car(&pool, Uuid::new_v4(), None).await;

    let never_started =
        common::insert_schedule(&pool, car_a, None, creator, "pending", -20).await;
    let stalled =
        common::insert_schedule(&pool, car_b, Some(creator), creator, "in_progress", -70).await;
    let signed =
        common::insert_schedule(&pool, car_c, Some(creator), creator, "signed", -70).await;
    let fresh_in_progress =
        common::insert_schedule(&pool, car_d, Some(creator), creator, "in_progress", -20).await;

    let repo = InspectionScheduleRepository::new(pool.clone());
    let expired = repo.expire_stale().await.unwrap();

    assert!(expired.contains(&never_started));
    assert!(expired.contains(&stalled));
    assert!(!expired.contains(&signed));
    assert!(!expired.contains(&fresh_in_progress));

    assert_eq!(common::schedule_status(&pool, never_started).await, "expired");
    assert_eq!(common::schedule_status(&pool, stalled).await, "expired");
    assert_eq!(common::schedule_status(&pool, signed).await, "signed");

    // Idempotence: an immediate re-run matches none of these rows again.
    let second = repo.expire_stale().await.unwrap();
    assert!(!second.contains(&never_started));
    assert!(!second.contains(&stalled));
    assert!(!second.contains(&signed));
}

#[tokio::test]
async fn test_rejected_car_gets_fresh_contract_on_reinspection() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let (schedule_id, contract_id, device_id, technician_id, owner_id) = start_flow(&pool).await;
    let car_id: Uuid =
        sqlx::query_scalar("SELECT car_id FROM inspection_schedules WHERE id = $1")
            .bind(schedule_id)
            .fetch_one(&pool)
            .await
            .unwrap();

    let gateway = sign_both(&pool, contract_id, technician_id, owner_id).await;
    let handler = InspectionCompletionHandler::new(pool.clone(), gateway);
    handler
        .complete(
            technician(technician_id),
            schedule_id,
            CompleteInspectionRequest {
                inspection_results: "frame damage".to_string(),
                gps_device_id: device_id,
                approved: false,
                photo_urls: vec![],
            },
        )
        .await
        .expect("rejection failed");

    // Second inspection cycle on the same car.
    let schedule2 = common::insert_schedule(
        &pool,
        car_id,
        Some(technician_id),
        Uuid::new_v4(),
        "scheduled",
        -1,
    )
    .await;
    let manager = ContractManager::new(pool.clone());
    let started = manager
        .start_or_reuse(technician(technician_id), schedule2)
        .await
        .expect("re-inspection start failed");

    // The rejected contract is terminal, so a fresh one is created.
    assert_ne!(started.contract_id, contract_id);
    assert_eq!(
        common::contract_status(&pool, started.contract_id).await,
        "pending"
    );
}

#[tokio::test]
async fn test_signing_without_open_inspection_is_not_found() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    // A contract exists but no inspection is in progress for its car.
    let technician_id = Uuid::new_v4();
    let car_id = common::insert_car(&pool, Uuid::new_v4(), None).await;
    let contract_id =
        common::insert_contract(&pool, car_id, Some(technician_id), None, "pending").await;

    let gateway = Arc::new(MockNotificationGateway::new());
    let coordinator = SignatureCoordinator::new(pool.clone(), gateway);

    let err = coordinator
        .sign(
            technician(technician_id),
            contract_id,
            SignContractRequest {
                role: SignerRole::Technician,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // Nothing was recorded on the contract.
    assert_eq!(common::contract_status(&pool, contract_id).await, "pending");
}

#[tokio::test]
async fn test_start_past_grace_is_rejected() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    // Appointment 30 minutes ago: past the not-started grace, so the start
    // is refused even before the sweeper has expired the schedule.
    let technician_id = Uuid::new_v4();
    let device_id = common::insert_device(&pool).await;
    let car_id = common::insert_car(&pool, Uuid::new_v4(), Some(device_id)).await;
    let schedule_id = common::insert_schedule(
        &pool,
        car_id,
        Some(technician_id),
        Uuid::new_v4(),
        "scheduled",
        -30,
    )
    .await;

    let manager = ContractManager::new(pool.clone());
    let err = manager
        .start_or_reuse(technician(technician_id), schedule_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidState(_)));

    assert_eq!(common::schedule_status(&pool, schedule_id).await, "scheduled");
}

#[tokio::test]
async fn test_car_status_updates_round_trip() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let car_id = common::insert_car(&pool, Uuid::new_v4(), None).await;
    let cars = CarRepository::new(pool.clone());

    let updated = cars
        .update_status(car_id, domain::models::CarStatus::Inactive.into())
        .await
        .unwrap();
    assert!(updated);

    let car = cars.find_by_id(car_id).await.unwrap().unwrap();
    assert_eq!(common::car_status(&pool, car.id).await, "inactive");
}

#[tokio::test]
async fn test_device_status_updates_preserve_binding() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let device_id = common::insert_device(&pool).await;
    let car_id = common::insert_car(&pool, Uuid::new_v4(), None).await;
    let contract_id = common::insert_contract(&pool, car_id, None, Some(device_id), "pending").await;

    let devices = GpsDeviceRepository::new(pool.clone());
    assert!(devices.reserve(device_id, contract_id).await.unwrap());

    // A repair flag does not disturb the contract binding.
    assert!(devices
        .set_status(device_id, GpsDeviceStatusDb::Repairing)
        .await
        .unwrap());
    let (status, active) = common::device_state(&pool, device_id).await;
    assert_eq!(status, "repairing");
    assert_eq!(active, Some(contract_id));

    assert!(!devices
        .set_status(Uuid::new_v4(), GpsDeviceStatusDb::Repairing)
        .await
        .unwrap());

    // Releasing clears the ledger and is safe to repeat.
    devices.release(device_id).await.unwrap();
    devices.release(device_id).await.unwrap();
    let device = devices.find_by_id(device_id).await.unwrap().unwrap();
    assert!(matches!(device.status, GpsDeviceStatusDb::Repairing));
    assert_eq!(device.active_contract_id, None);
}

#[tokio::test]
async fn test_http_create_schedule_enforces_roles() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let database_url = std::env::var("TEST_DATABASE_URL").unwrap();
    let config = Config::load_for_test(&[("database.url", database_url.as_str())]).unwrap();
    let notifier = Arc::new(MockNotificationGateway::new());
    let app = create_app(config, pool.clone(), notifier);

    let car_id = common::insert_car(&pool, Uuid::new_v4(), None).await;
    let body = serde_json::json!({
        "car_id": car_id,
        "inspection_date": (chrono::Utc::now() + chrono::Duration::days(1)).to_rfc3339(),
        "inspection_address": "12 Nguyen Hue, District 1",
    });

    // Consultant may book.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/schedules")
                .header("Content-Type", "application/json")
                .header("X-Actor-Id", Uuid::new_v4().to_string())
                .header("X-Actor-Role", "consultant")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // A technician may not.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/schedules")
                .header("Content-Type", "application/json")
                .header("X-Actor-Id", Uuid::new_v4().to_string())
                .header("X-Actor-Role", "technician")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Missing actor headers are unauthorized.
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/schedules")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_http_list_schedules_with_pagination_params() {
    let Some(pool) = common::test_pool().await else {
        return;
    };

    let database_url = std::env::var("TEST_DATABASE_URL").unwrap();
    let config = Config::load_for_test(&[("database.url", database_url.as_str())]).unwrap();
    let notifier = Arc::new(MockNotificationGateway::new());
    let app = create_app(config, pool.clone(), notifier);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/schedules?page=2&per_page=5&status=pending")
                .header("X-Actor-Id", Uuid::new_v4().to_string())
                .header("X-Actor-Role", "consultant")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["pagination"]["page"], 2);
    assert_eq!(json["pagination"]["per_page"], 5);
    assert!(json["data"].is_array());
}
