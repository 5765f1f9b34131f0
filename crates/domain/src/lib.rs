//! Domain layer for the Motorent back office.
//!
//! This crate contains:
//! - Domain models (InspectionSchedule, CarContract, GpsDevice, Car)
//! - Pure workflow rules (status transitions, signature resolution, expiration)
//! - The notification gateway abstraction

pub mod models;
pub mod services;
