//! Background jobs.

pub mod expire_schedules;
pub mod scheduler;

pub use expire_schedules::ExpireSchedulesJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
