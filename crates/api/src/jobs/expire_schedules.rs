//! Expiration sweeper background job.
//!
//! Force-expires inspection schedules whose appointment window has lapsed:
//! schedules never started within 15 minutes of the appointment, and
//! in-progress inspections left unresolved for 60 minutes. The sweep is a
//! single guarded UPDATE, so overlapping runs never double-expire a row.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};

use domain::models::ScheduleStatus;
use domain::services::{BroadcastResult, NotificationGateway, ScheduleBroadcast, ScheduleEvent};
use persistence::repositories::InspectionScheduleRepository;

use crate::middleware::metrics::record_schedules_expired;

use super::scheduler::{Job, JobFrequency};

/// Background job that expires overdue inspection schedules.
pub struct ExpireSchedulesJob {
    pool: PgPool,
    notifier: Arc<dyn NotificationGateway>,
    interval_secs: u64,
}

impl ExpireSchedulesJob {
    pub fn new(pool: PgPool, notifier: Arc<dyn NotificationGateway>, interval_secs: u64) -> Self {
        Self {
            pool,
            notifier,
            interval_secs,
        }
    }
}

#[async_trait::async_trait]
impl Job for ExpireSchedulesJob {
    fn name(&self) -> &'static str {
        "expire_schedules"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.interval_secs)
    }

    async fn execute(&self) -> Result<(), String> {
        let repo = InspectionScheduleRepository::new(self.pool.clone());

        let expired = repo
            .expire_stale()
            .await
            .map_err(|e| format!("Failed to expire stale schedules: {}", e))?;

        if expired.is_empty() {
            return Ok(());
        }

        info!(count = expired.len(), "Expired overdue inspection schedules");
        record_schedules_expired(expired.len());

        let result = self
            .notifier
            .broadcast(ScheduleBroadcast::new(
                ScheduleEvent::SchedulesExpired,
                expired,
                ScheduleStatus::Expired,
            ))
            .await;

        if let BroadcastResult::Failed(err) = result {
            warn!(error = %err, "Expiration broadcast delivery failed");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_frequency_follows_configured_interval() {
        let freq = JobFrequency::Seconds(45);
        assert_eq!(freq.duration(), Duration::from_secs(45));
    }
}
