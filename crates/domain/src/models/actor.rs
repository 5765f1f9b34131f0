//! Acting identity for workflow commands.
//!
//! The identity subsystem (authentication, account lookup) is external; every
//! command receives the already-resolved actor explicitly instead of reading
//! a request-scoped global.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role tag of the acting identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Consultant,
    Technician,
    Owner,
    Admin,
}

impl ActorRole {
    /// Consultants book inspections on behalf of owners; admins may too.
    pub fn can_create_schedule(&self) -> bool {
        matches!(self, ActorRole::Consultant | ActorRole::Admin)
    }

    /// Only technicians perform and finalize inspections.
    pub fn is_technician(&self) -> bool {
        matches!(self, ActorRole::Technician)
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, ActorRole::Owner)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, ActorRole::Admin)
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorRole::Consultant => write!(f, "consultant"),
            ActorRole::Technician => write!(f, "technician"),
            ActorRole::Owner => write!(f, "owner"),
            ActorRole::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for ActorRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consultant" => Ok(ActorRole::Consultant),
            "technician" => Ok(ActorRole::Technician),
            "owner" => Ok(ActorRole::Owner),
            "admin" => Ok(ActorRole::Admin),
            _ => Err(()),
        }
    }
}

/// The resolved current actor (id + role) passed into every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: Uuid, role: ActorRole) -> Self {
        Self { id, role }
    }
}
