//! Inspection schedule entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::ScheduleStatus;

/// Database enum for inspection schedule status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "inspection_schedule_status", rename_all = "snake_case")]
pub enum ScheduleStatusDb {
    Pending,
    Scheduled,
    InProgress,
    Signed,
    Approved,
    Rejected,
    Expired,
}

impl From<ScheduleStatusDb> for ScheduleStatus {
    fn from(status: ScheduleStatusDb) -> Self {
        match status {
            ScheduleStatusDb::Pending => ScheduleStatus::Pending,
            ScheduleStatusDb::Scheduled => ScheduleStatus::Scheduled,
            ScheduleStatusDb::InProgress => ScheduleStatus::InProgress,
            ScheduleStatusDb::Signed => ScheduleStatus::Signed,
            ScheduleStatusDb::Approved => ScheduleStatus::Approved,
            ScheduleStatusDb::Rejected => ScheduleStatus::Rejected,
            ScheduleStatusDb::Expired => ScheduleStatus::Expired,
        }
    }
}

impl From<ScheduleStatus> for ScheduleStatusDb {
    fn from(status: ScheduleStatus) -> Self {
        match status {
            ScheduleStatus::Pending => ScheduleStatusDb::Pending,
            ScheduleStatus::Scheduled => ScheduleStatusDb::Scheduled,
            ScheduleStatus::InProgress => ScheduleStatusDb::InProgress,
            ScheduleStatus::Signed => ScheduleStatusDb::Signed,
            ScheduleStatus::Approved => ScheduleStatusDb::Approved,
            ScheduleStatus::Rejected => ScheduleStatusDb::Rejected,
            ScheduleStatus::Expired => ScheduleStatusDb::Expired,
        }
    }
}

/// Database row mapping for the inspection_schedules table.
#[derive(Debug, Clone, FromRow)]
pub struct InspectionScheduleEntity {
    pub id: Uuid,
    pub car_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub created_by: Uuid,
    pub inspection_date: DateTime<Utc>,
    pub inspection_address: String,
    pub note: Option<String>,
    pub status: ScheduleStatusDb,
    pub photo_urls: Vec<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InspectionScheduleEntity {
    /// Convert to the domain read model.
    pub fn into_item(self) -> domain::models::ScheduleItem {
        domain::models::ScheduleItem {
            id: self.id,
            car_id: self.car_id,
            technician_id: self.technician_id,
            created_by: self.created_by,
            inspection_date: self.inspection_date,
            inspection_address: self.inspection_address,
            note: self.note,
            status: self.status.into(),
            photo_urls: self.photo_urls,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
