//! Car contract domain model and the dual-signature rule.
//!
//! A contract is the dual-signed record tied to a car's current inspection
//! cycle. Owner and technician sign independently, in any order, exactly
//! once each. The contract's own status names the signer(s) seen so far;
//! the schedule's Signed state is the one true "both parties agreed" signal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a car contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Pending,
    OwnerSigned,
    TechnicianSigned,
    Completed,
    Rejected,
}

impl ContractStatus {
    /// Completed and Rejected permit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ContractStatus::Completed | ContractStatus::Rejected)
    }

    /// Whether the contract is still open for signatures.
    pub fn accepts_signatures(&self) -> bool {
        matches!(
            self,
            ContractStatus::Pending | ContractStatus::OwnerSigned | ContractStatus::TechnicianSigned
        )
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractStatus::Pending => write!(f, "pending"),
            ContractStatus::OwnerSigned => write!(f, "owner_signed"),
            ContractStatus::TechnicianSigned => write!(f, "technician_signed"),
            ContractStatus::Completed => write!(f, "completed"),
            ContractStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Which party is signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignerRole {
    Owner,
    Technician,
}

impl SignerRole {
    /// The contract status recorded after this party signs. The last writer
    /// names the status; the "both agreed" signal lives on the schedule.
    pub fn signed_status(&self) -> ContractStatus {
        match self {
            SignerRole::Owner => ContractStatus::OwnerSigned,
            SignerRole::Technician => ContractStatus::TechnicianSigned,
        }
    }
}

impl std::fmt::Display for SignerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignerRole::Owner => write!(f, "owner"),
            SignerRole::Technician => write!(f, "technician"),
        }
    }
}

/// Deterministic contract status from the two signature timestamps.
///
/// `last_writer` resolves the both-set case: the status names whoever
/// signed second, which also tells a reader which signature is no longer
/// outstanding.
pub fn status_from_signatures(
    owner_signed_at: Option<DateTime<Utc>>,
    technician_signed_at: Option<DateTime<Utc>>,
    last_writer: SignerRole,
) -> ContractStatus {
    match (owner_signed_at, technician_signed_at) {
        (None, None) => ContractStatus::Pending,
        (Some(_), None) => ContractStatus::OwnerSigned,
        (None, Some(_)) => ContractStatus::TechnicianSigned,
        (Some(_), Some(_)) => last_writer.signed_status(),
    }
}

/// Whether a given party may sign a contract in the given state.
///
/// Signing twice is rejected here: after the first signature the party's
/// timestamp is set, and a set timestamp bars that role from signing again.
pub fn can_sign(
    status: ContractStatus,
    role: SignerRole,
    owner_signed_at: Option<DateTime<Utc>>,
    technician_signed_at: Option<DateTime<Utc>>,
) -> bool {
    if !status.accepts_signatures() {
        return false;
    }
    match role {
        SignerRole::Owner => owner_signed_at.is_none(),
        SignerRole::Technician => technician_signed_at.is_none(),
    }
}

/// Request to sign a contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SignContractRequest {
    pub role: SignerRole,
}

/// Response after a signature is recorded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SignContractResponse {
    pub contract_id: Uuid,
    pub status: ContractStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_signed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_signed_at: Option<DateTime<Utc>>,
    /// True once both signatures are present and the schedule moved to Signed.
    pub fully_signed: bool,
}

/// Contract representation for reads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ContractItem {
    pub id: Uuid,
    pub car_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_device_id: Option<Uuid>,
    pub status: ContractStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_signed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_signed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspection_results: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
