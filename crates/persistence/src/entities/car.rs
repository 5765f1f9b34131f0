//! Car entity (database row mapping).
//!
//! Cars live in the listing domain; the inspection workflow reads the
//! owner and GPS device reference and writes status side effects only.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::CarStatus;

/// Database enum for car status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "car_status", rename_all = "snake_case")]
pub enum CarStatusDb {
    Available,
    Rented,
    Pending,
    Inactive,
    Rejected,
    Ongoing,
    Completed,
    Cancelled,
}

impl From<CarStatusDb> for CarStatus {
    fn from(status: CarStatusDb) -> Self {
        match status {
            CarStatusDb::Available => CarStatus::Available,
            CarStatusDb::Rented => CarStatus::Rented,
            CarStatusDb::Pending => CarStatus::Pending,
            CarStatusDb::Inactive => CarStatus::Inactive,
            CarStatusDb::Rejected => CarStatus::Rejected,
            CarStatusDb::Ongoing => CarStatus::Ongoing,
            CarStatusDb::Completed => CarStatus::Completed,
            CarStatusDb::Cancelled => CarStatus::Cancelled,
        }
    }
}

impl From<CarStatus> for CarStatusDb {
    fn from(status: CarStatus) -> Self {
        match status {
            CarStatus::Available => CarStatusDb::Available,
            CarStatus::Rented => CarStatusDb::Rented,
            CarStatus::Pending => CarStatusDb::Pending,
            CarStatus::Inactive => CarStatusDb::Inactive,
            CarStatus::Rejected => CarStatusDb::Rejected,
            CarStatus::Ongoing => CarStatusDb::Ongoing,
            CarStatus::Completed => CarStatusDb::Completed,
            CarStatus::Cancelled => CarStatusDb::Cancelled,
        }
    }
}

/// Database row mapping for the cars table.
#[derive(Debug, Clone, FromRow)]
pub struct CarEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub license_plate: String,
    pub gps_device_id: Option<Uuid>,
    pub status: CarStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            CarStatus::Available,
            CarStatus::Rented,
            CarStatus::Pending,
            CarStatus::Inactive,
            CarStatus::Rejected,
        ] {
            let db: CarStatusDb = status.into();
            let back: CarStatus = db.into();
            assert_eq!(status, back);
        }
    }
}
