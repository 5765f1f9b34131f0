//! Common test utilities for integration tests.
//!
//! Integration tests run against a real PostgreSQL database named by the
//! `TEST_DATABASE_URL` environment variable. When the variable is unset the
//! tests skip themselves, so the suite stays green on machines without a
//! database.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use fake::Fake;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

/// Connect to the test database, or None when `TEST_DATABASE_URL` is unset.
pub async fn test_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// Insert an available GPS device and return its id.
pub async fn insert_device(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO gps_devices (id, serial_number) VALUES ($1, $2)")
        .bind(id)
        .bind(format!("GPS-{}", id.simple()))
        .execute(pool)
        .await
        .expect("Failed to insert device");
    id
}

/// Insert a car, optionally with a GPS device reference, and return its id.
pub async fn insert_car(pool: &PgPool, owner_id: Uuid, gps_device_id: Option<Uuid>) -> Uuid {
    let id = Uuid::new_v4();
    let plate = format!(
        "{}G-{}",
        (10..99).fake::<u32>(),
        Uuid::new_v4().simple().to_string()[..8].to_uppercase()
    );
    sqlx::query(
        "INSERT INTO cars (id, owner_id, license_plate, gps_device_id, status)
         VALUES ($1, $2, $3, $4, 'pending')",
    )
    .bind(id)
    .bind(owner_id)
    .bind(plate)
    .bind(gps_device_id)
    .execute(pool)
    .await
    .expect("Failed to insert car");
    id
}

/// Insert an inspection schedule in the given status, with its appointment
/// shifted `date_offset_minutes` relative to now.
pub async fn insert_schedule(
    pool: &PgPool,
    car_id: Uuid,
    technician_id: Option<Uuid>,
    created_by: Uuid,
    status: &str,
    date_offset_minutes: i64,
) -> Uuid {
    let id = Uuid::new_v4();
    let inspection_date = Utc::now() + Duration::minutes(date_offset_minutes);
    sqlx::query(
        "INSERT INTO inspection_schedules
             (id, car_id, technician_id, created_by, inspection_date,
              inspection_address, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7::inspection_schedule_status)",
    )
    .bind(id)
    .bind(car_id)
    .bind(technician_id)
    .bind(created_by)
    .bind(inspection_date)
    .bind("12 Nguyen Hue, District 1")
    .bind(status)
    .execute(pool)
    .await
    .expect("Failed to insert schedule");
    id
}

/// Insert a contract in the given status and return its id.
pub async fn insert_contract(
    pool: &PgPool,
    car_id: Uuid,
    technician_id: Option<Uuid>,
    gps_device_id: Option<Uuid>,
    status: &str,
) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO car_contracts (id, car_id, technician_id, gps_device_id, status)
         VALUES ($1, $2, $3, $4, $5::car_contract_status)",
    )
    .bind(id)
    .bind(car_id)
    .bind(technician_id)
    .bind(gps_device_id)
    .bind(status)
    .execute(pool)
    .await
    .expect("Failed to insert contract");
    id
}

/// Read a schedule's status as text.
pub async fn schedule_status(pool: &PgPool, id: Uuid) -> String {
    sqlx::query_scalar("SELECT status::text FROM inspection_schedules WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to read schedule status")
}

/// Read a contract's status as text.
pub async fn contract_status(pool: &PgPool, id: Uuid) -> String {
    sqlx::query_scalar("SELECT status::text FROM car_contracts WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to read contract status")
}

/// Read a car's status as text.
pub async fn car_status(pool: &PgPool, id: Uuid) -> String {
    sqlx::query_scalar("SELECT status::text FROM cars WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to read car status")
}

/// Read a device's (status, active_contract_id).
pub async fn device_state(pool: &PgPool, id: Uuid) -> (String, Option<Uuid>) {
    sqlx::query_as("SELECT status::text, active_contract_id FROM gps_devices WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to read device state")
}
