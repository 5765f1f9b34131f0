//! Car status as seen by the inspection workflow.
//!
//! The car aggregate itself belongs to the listing domain; this core only
//! reads its GPS device reference and writes Available, Rejected, or
//! Inactive as inspection side effects.

use serde::{Deserialize, Serialize};

/// Status of a car in the rental catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarStatus {
    Available,
    Rented,
    Pending,
    Inactive,
    Rejected,
    // Booking-domain values, never written here.
    Ongoing,
    Completed,
    Cancelled,
}

impl std::fmt::Display for CarStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CarStatus::Available => write!(f, "available"),
            CarStatus::Rented => write!(f, "rented"),
            CarStatus::Pending => write!(f, "pending"),
            CarStatus::Inactive => write!(f, "inactive"),
            CarStatus::Rejected => write!(f, "rejected"),
            CarStatus::Ongoing => write!(f, "ongoing"),
            CarStatus::Completed => write!(f, "completed"),
            CarStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}
