use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::NotificationGateway;

use crate::config::Config;
use crate::middleware::metrics::{metrics_handler, metrics_middleware};
use crate::middleware::trace_id::trace_id;
use crate::routes::{contracts, health, schedules};
use crate::services::{ContractManager, InspectionCompletionHandler, SignatureCoordinator};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub contract_manager: ContractManager,
    pub signature_coordinator: SignatureCoordinator,
    pub completion_handler: InspectionCompletionHandler,
}

pub fn create_app(config: Config, pool: PgPool, notifier: Arc<dyn NotificationGateway>) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool: pool.clone(),
        config: config.clone(),
        contract_manager: ContractManager::new(pool.clone()),
        signature_coordinator: SignatureCoordinator::new(pool.clone(), notifier.clone()),
        completion_handler: InspectionCompletionHandler::new(pool, notifier),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Workflow routes (actor headers required by the extractor)
    let api_routes = Router::new()
        .route("/api/v1/schedules", post(schedules::create_schedule))
        .route("/api/v1/schedules", get(schedules::list_schedules))
        .route("/api/v1/schedules/:id", get(schedules::get_schedule))
        .route("/api/v1/schedules/:id", delete(schedules::delete_schedule))
        .route(
            "/api/v1/schedules/:id/assign",
            post(schedules::assign_technician),
        )
        .route(
            "/api/v1/schedules/:id/start",
            post(schedules::start_inspection),
        )
        .route(
            "/api/v1/schedules/:id/complete",
            post(schedules::complete_inspection),
        )
        .route("/api/v1/contracts/:id", get(contracts::get_contract))
        .route("/api/v1/contracts/:id/sign", post(contracts::sign_contract));

    // Public routes (no actor headers required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Global middleware (order matters: bottom layers run first)
    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
