//! Workflow services coordinating repositories and notifications.

pub mod completion;
pub mod contract_manager;
pub mod notification;
pub mod signing;

pub use completion::InspectionCompletionHandler;
pub use contract_manager::ContractManager;
pub use notification::WebhookNotificationGateway;
pub use signing::SignatureCoordinator;
