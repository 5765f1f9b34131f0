//! Notification gateway for schedule status broadcasts.
//!
//! State transitions are pushed to external observers (consultant dashboards,
//! owner apps) as fire-and-forget events. Delivery failures never roll back
//! the underlying transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ScheduleStatus;

/// Event name for schedule status broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleEvent {
    ScheduleSigned,
    ScheduleCompleted,
    SchedulesExpired,
}

impl std::fmt::Display for ScheduleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleEvent::ScheduleSigned => write!(f, "schedule_signed"),
            ScheduleEvent::ScheduleCompleted => write!(f, "schedule_completed"),
            ScheduleEvent::SchedulesExpired => write!(f, "schedules_expired"),
        }
    }
}

/// Broadcast payload: one event may carry several schedule ids (the sweeper
/// expires in batches), all moving to the same status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScheduleBroadcast {
    pub event: ScheduleEvent,
    pub schedule_ids: Vec<Uuid>,
    pub new_status: ScheduleStatus,
    pub timestamp: DateTime<Utc>,
}

impl ScheduleBroadcast {
    pub fn new(event: ScheduleEvent, schedule_ids: Vec<Uuid>, new_status: ScheduleStatus) -> Self {
        Self {
            event,
            schedule_ids,
            new_status,
            timestamp: Utc::now(),
        }
    }

    /// Single-schedule convenience constructor.
    pub fn single(event: ScheduleEvent, schedule_id: Uuid, new_status: ScheduleStatus) -> Self {
        Self::new(event, vec![schedule_id], new_status)
    }
}

/// Result of a broadcast attempt.
#[derive(Debug, Clone)]
pub enum BroadcastResult {
    /// Delivered to at least one subscriber.
    Sent,
    /// No subscribers are configured.
    NoSubscribers,
    /// Delivery failed everywhere (logged, never propagated).
    Failed(String),
}

/// Gateway for pushing schedule status changes to subscribed observers.
#[async_trait::async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn broadcast(&self, payload: ScheduleBroadcast) -> BroadcastResult;
}

/// Recording gateway for development and tests.
#[derive(Debug, Default)]
pub struct MockNotificationGateway {
    broadcasts: tokio::sync::Mutex<Vec<ScheduleBroadcast>>,
}

impl MockNotificationGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcasts recorded so far, oldest first.
    pub async fn recorded(&self) -> Vec<ScheduleBroadcast> {
        self.broadcasts.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl NotificationGateway for MockNotificationGateway {
    async fn broadcast(&self, payload: ScheduleBroadcast) -> BroadcastResult {
        tracing::info!(
            event = %payload.event,
            schedules = payload.schedule_ids.len(),
            new_status = %payload.new_status,
            "Mock: would broadcast schedule status"
        );
        self.broadcasts.lock().await.push(payload);
        BroadcastResult::Sent
    }
}
