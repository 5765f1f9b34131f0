//! Repository implementations for database operations.

mod car;
mod contract;
mod gps_device;
mod schedule;

pub use car::CarRepository;
pub use contract::{CarContractRepository, SignatureOutcome, StartInspectionOutcome};
pub use gps_device::GpsDeviceRepository;
pub use schedule::{CompletionOutcome, InspectionScheduleRepository};
