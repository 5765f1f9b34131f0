//! Domain model definitions.

mod actor;
mod car;
mod contract;
mod device;
mod schedule;

pub use actor::{Actor, ActorRole};
pub use car::CarStatus;
pub use contract::{
    can_sign, status_from_signatures, ContractItem, ContractStatus, SignContractRequest,
    SignContractResponse, SignerRole,
};
pub use device::GpsDeviceStatus;
pub use schedule::{
    should_expire, window_open, AssignTechnicianRequest, CompleteInspectionRequest,
    CompleteInspectionResponse, CreateScheduleRequest, CreateScheduleResponse, ListSchedulesQuery,
    ListSchedulesResponse, ScheduleItem, ScheduleStatus, StartInspectionResponse,
    NOT_STARTED_GRACE_MINUTES, UNRESOLVED_GRACE_MINUTES,
};
