//! Inspection schedule domain model and lifecycle rules.
//!
//! A schedule is one appointment for inspecting a car. Its status machine:
//!
//! ```text
//! Pending -> Scheduled -> InProgress -> Signed -> Approved | Rejected
//!    \___________\____________\__________/
//!                 sweeper => Expired
//! ```
//!
//! Approved, Rejected, and Expired are terminal; the only mutation still
//! permitted on a terminal schedule is a soft delete.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::pagination::{PageInfo, PageParams};

/// Grace period after the appointment time before a schedule that never
/// started is force-expired.
pub const NOT_STARTED_GRACE_MINUTES: i64 = 15;

/// Grace period after the appointment time before an in-progress schedule
/// that was never approved or rejected is force-expired.
pub const UNRESOLVED_GRACE_MINUTES: i64 = 60;

/// Status of an inspection schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Pending,
    Scheduled,
    InProgress,
    Signed,
    Approved,
    Rejected,
    Expired,
}

impl ScheduleStatus {
    /// Terminal statuses permit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScheduleStatus::Approved | ScheduleStatus::Rejected | ScheduleStatus::Expired
        )
    }

    /// Whether a technician may start the inspection from this status.
    pub fn can_start(&self) -> bool {
        matches!(self, ScheduleStatus::Scheduled)
    }

    /// Whether the inspection can be finalized (approved/rejected) from
    /// this status. Finalization requires the dual signature, checked
    /// separately against the contract.
    pub fn can_complete(&self) -> bool {
        matches!(self, ScheduleStatus::InProgress | ScheduleStatus::Signed)
    }
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleStatus::Pending => write!(f, "pending"),
            ScheduleStatus::Scheduled => write!(f, "scheduled"),
            ScheduleStatus::InProgress => write!(f, "in_progress"),
            ScheduleStatus::Signed => write!(f, "signed"),
            ScheduleStatus::Approved => write!(f, "approved"),
            ScheduleStatus::Rejected => write!(f, "rejected"),
            ScheduleStatus::Expired => write!(f, "expired"),
        }
    }
}

impl std::str::FromStr for ScheduleStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ScheduleStatus::Pending),
            "scheduled" => Ok(ScheduleStatus::Scheduled),
            "in_progress" => Ok(ScheduleStatus::InProgress),
            "signed" => Ok(ScheduleStatus::Signed),
            "approved" => Ok(ScheduleStatus::Approved),
            "rejected" => Ok(ScheduleStatus::Rejected),
            "expired" => Ok(ScheduleStatus::Expired),
            _ => Err(()),
        }
    }
}

/// Whether the inspection window is open, i.e. the technician may begin.
pub fn window_open(inspection_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= inspection_date
}

/// The sweeper's expiration rule, as a pure function of status, appointment
/// time, and the current time.
///
/// A schedule is force-expired when either:
/// - it never started (Pending/Scheduled) and the 15-minute grace after the
///   appointment time has elapsed, or
/// - it started but stalled (InProgress, never approved or rejected) and the
///   60-minute grace has elapsed.
///
/// Signed schedules are exempt: both parties have already agreed, and the
/// remaining finalization step is not under the appointment's time pressure.
/// Terminal schedules are never re-expired.
pub fn should_expire(
    status: ScheduleStatus,
    inspection_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    match status {
        ScheduleStatus::Pending | ScheduleStatus::Scheduled => {
            now > inspection_date + Duration::minutes(NOT_STARTED_GRACE_MINUTES)
        }
        ScheduleStatus::InProgress => {
            now > inspection_date + Duration::minutes(UNRESOLVED_GRACE_MINUTES)
        }
        ScheduleStatus::Signed
        | ScheduleStatus::Approved
        | ScheduleStatus::Rejected
        | ScheduleStatus::Expired => false,
    }
}

/// Request to create an inspection schedule (consultant command).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateScheduleRequest {
    pub car_id: Uuid,
    /// May be assigned later via the assign command.
    pub technician_id: Option<Uuid>,
    pub inspection_date: DateTime<Utc>,
    #[validate(custom(function = "shared::validation::validate_inspection_address"))]
    pub inspection_address: String,
    #[validate(custom(function = "shared::validation::validate_note"))]
    #[serde(default)]
    pub note: Option<String>,
}

/// Response after creating a schedule.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateScheduleResponse {
    pub id: Uuid,
    pub car_id: Uuid,
    pub status: ScheduleStatus,
    pub inspection_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Request to confirm the technician and appointment date.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AssignTechnicianRequest {
    pub technician_id: Uuid,
    /// Optionally moves the appointment while confirming it.
    #[serde(default)]
    pub inspection_date: Option<DateTime<Utc>>,
}

/// Response after the technician starts the inspection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StartInspectionResponse {
    pub schedule_id: Uuid,
    pub status: ScheduleStatus,
    pub contract_id: Uuid,
    pub gps_device_id: Uuid,
}

/// Request to finalize an inspection.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CompleteInspectionRequest {
    #[validate(length(min = 1, max = 5000))]
    pub inspection_results: String,
    pub gps_device_id: Uuid,
    pub approved: bool,
    /// Inspection photos uploaded beforehand; stored on the schedule.
    #[validate(length(max = 20))]
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

/// Response after finalizing an inspection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CompleteInspectionResponse {
    pub schedule_id: Uuid,
    pub status: ScheduleStatus,
    pub contract_id: Uuid,
}

/// Schedule representation for reads and listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ScheduleItem {
    pub id: Uuid,
    pub car_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_id: Option<Uuid>,
    pub created_by: Uuid,
    pub inspection_date: DateTime<Utc>,
    pub inspection_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub status: ScheduleStatus,
    pub photo_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for listing schedules.
///
/// Pagination fields are inlined rather than flattened: query-string
/// deserializers hand flattened structs every value as a string, which
/// breaks integer fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListSchedulesQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub car_id: Option<Uuid>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
}

impl ListSchedulesQuery {
    /// Resolve the pagination parameters, falling back to the defaults.
    pub fn page_params(&self) -> PageParams {
        let defaults = PageParams::default();
        PageParams {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Response for listing schedules.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListSchedulesResponse {
    pub data: Vec<ScheduleItem>,
    pub pagination: PageInfo,
}
