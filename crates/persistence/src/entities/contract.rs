//! Car contract entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::ContractStatus;

/// Database enum for car contract status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "car_contract_status", rename_all = "snake_case")]
pub enum ContractStatusDb {
    Pending,
    OwnerSigned,
    TechnicianSigned,
    Completed,
    Rejected,
}

impl From<ContractStatusDb> for ContractStatus {
    fn from(status: ContractStatusDb) -> Self {
        match status {
            ContractStatusDb::Pending => ContractStatus::Pending,
            ContractStatusDb::OwnerSigned => ContractStatus::OwnerSigned,
            ContractStatusDb::TechnicianSigned => ContractStatus::TechnicianSigned,
            ContractStatusDb::Completed => ContractStatus::Completed,
            ContractStatusDb::Rejected => ContractStatus::Rejected,
        }
    }
}

impl From<ContractStatus> for ContractStatusDb {
    fn from(status: ContractStatus) -> Self {
        match status {
            ContractStatus::Pending => ContractStatusDb::Pending,
            ContractStatus::OwnerSigned => ContractStatusDb::OwnerSigned,
            ContractStatus::TechnicianSigned => ContractStatusDb::TechnicianSigned,
            ContractStatus::Completed => ContractStatusDb::Completed,
            ContractStatus::Rejected => ContractStatusDb::Rejected,
        }
    }
}

/// Database row mapping for the car_contracts table.
#[derive(Debug, Clone, FromRow)]
pub struct CarContractEntity {
    pub id: Uuid,
    pub car_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub gps_device_id: Option<Uuid>,
    pub status: ContractStatusDb,
    pub owner_signed_at: Option<DateTime<Utc>>,
    pub technician_signed_at: Option<DateTime<Utc>>,
    pub inspection_results: Option<String>,
    pub terms: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CarContractEntity {
    /// Both parties have signed.
    pub fn fully_signed(&self) -> bool {
        self.owner_signed_at.is_some() && self.technician_signed_at.is_some()
    }

    /// Convert to the domain read model.
    pub fn into_item(self) -> domain::models::ContractItem {
        domain::models::ContractItem {
            id: self.id,
            car_id: self.car_id,
            technician_id: self.technician_id,
            gps_device_id: self.gps_device_id,
            status: self.status.into(),
            owner_signed_at: self.owner_signed_at,
            technician_signed_at: self.technician_signed_at,
            inspection_results: self.inspection_results,
            terms: self.terms,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            ContractStatus::Pending,
            ContractStatus::OwnerSigned,
            ContractStatus::TechnicianSigned,
            ContractStatus::Completed,
            ContractStatus::Rejected,
        ] {
            let db: ContractStatusDb = status.into();
            let back: ContractStatus = db.into();
            assert_eq!(status, back);
        }
    }
}
