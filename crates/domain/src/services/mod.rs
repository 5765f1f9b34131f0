//! Domain service abstractions.

pub mod notification;

pub use notification::{
    BroadcastResult, MockNotificationGateway, NotificationGateway, ScheduleBroadcast,
    ScheduleEvent,
};
