//! Shared utilities and common types for the Motorent back office.
//!
//! This crate provides common functionality used across all other crates:
//! - Request field validation (addresses, plates, appointment dates)
//! - Offset pagination helpers for list endpoints

pub mod pagination;
pub mod validation;
