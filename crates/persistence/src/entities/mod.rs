//! Entity definitions (database row mappings).

mod car;
mod contract;
mod gps_device;
mod schedule;

pub use car::{CarEntity, CarStatusDb};
pub use contract::{CarContractEntity, ContractStatusDb};
pub use gps_device::{GpsDeviceEntity, GpsDeviceStatusDb};
pub use schedule::{InspectionScheduleEntity, ScheduleStatusDb};
