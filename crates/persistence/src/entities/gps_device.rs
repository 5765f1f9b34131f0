//! GPS device entity (database row mapping).
//!
//! The `active_contract_id` column is the device ledger: a device may back
//! at most one non-terminal contract, and every reservation is a
//! check-and-set against this column.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::GpsDeviceStatus;

/// Database enum for GPS device status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "gps_device_status", rename_all = "snake_case")]
pub enum GpsDeviceStatusDb {
    Available,
    InUsed,
    Repairing,
    Broken,
    Removed,
}

impl From<GpsDeviceStatusDb> for GpsDeviceStatus {
    fn from(status: GpsDeviceStatusDb) -> Self {
        match status {
            GpsDeviceStatusDb::Available => GpsDeviceStatus::Available,
            GpsDeviceStatusDb::InUsed => GpsDeviceStatus::InUsed,
            GpsDeviceStatusDb::Repairing => GpsDeviceStatus::Repairing,
            GpsDeviceStatusDb::Broken => GpsDeviceStatus::Broken,
            GpsDeviceStatusDb::Removed => GpsDeviceStatus::Removed,
        }
    }
}

impl From<GpsDeviceStatus> for GpsDeviceStatusDb {
    fn from(status: GpsDeviceStatus) -> Self {
        match status {
            GpsDeviceStatus::Available => GpsDeviceStatusDb::Available,
            GpsDeviceStatus::InUsed => GpsDeviceStatusDb::InUsed,
            GpsDeviceStatus::Repairing => GpsDeviceStatusDb::Repairing,
            GpsDeviceStatus::Broken => GpsDeviceStatusDb::Broken,
            GpsDeviceStatus::Removed => GpsDeviceStatusDb::Removed,
        }
    }
}

/// Database row mapping for the gps_devices table.
#[derive(Debug, Clone, FromRow)]
pub struct GpsDeviceEntity {
    pub id: Uuid,
    pub serial_number: String,
    pub status: GpsDeviceStatusDb,
    pub active_contract_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            GpsDeviceStatus::Available,
            GpsDeviceStatus::InUsed,
            GpsDeviceStatus::Repairing,
            GpsDeviceStatus::Broken,
            GpsDeviceStatus::Removed,
        ] {
            let db: GpsDeviceStatusDb = status.into();
            let back: GpsDeviceStatus = db.into();
            assert_eq!(status, back);
        }
    }
}
