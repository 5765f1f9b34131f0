//! GPS tracking device status.
//!
//! A device is a scarce physical resource. Its operational status changes
//! only at inspection completion (Available -> InUsed on approval); its
//! contract binding is managed separately by the device ledger.

use serde::{Deserialize, Serialize};

/// Operational status of a GPS tracking device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpsDeviceStatus {
    Available,
    InUsed,
    Repairing,
    Broken,
    Removed,
}

impl GpsDeviceStatus {
    /// Whether the device can back a new contract at all.
    pub fn is_operational(&self) -> bool {
        matches!(self, GpsDeviceStatus::Available | GpsDeviceStatus::InUsed)
    }
}

impl std::fmt::Display for GpsDeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpsDeviceStatus::Available => write!(f, "available"),
            GpsDeviceStatus::InUsed => write!(f, "in_used"),
            GpsDeviceStatus::Repairing => write!(f, "repairing"),
            GpsDeviceStatus::Broken => write!(f, "broken"),
            GpsDeviceStatus::Removed => write!(f, "removed"),
        }
    }
}
