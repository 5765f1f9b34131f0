//! Persistence layer for the Motorent back office.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations, including the multi-row transactions the
//!   inspection workflow relies on (device reservation, signature recording,
//!   inspection completion)

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
