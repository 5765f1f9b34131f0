//! Webhook notification gateway.
//!
//! Pushes schedule status broadcasts to subscriber endpoints as signed JSON
//! POSTs. Delivery is fire-and-forget: failures are logged and reported in
//! the [`BroadcastResult`], never propagated into the workflow that
//! triggered the broadcast.

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;
use std::time::Duration;
use tracing::{info, warn};

use domain::services::{BroadcastResult, NotificationGateway, ScheduleBroadcast};

use crate::config::NotificationsConfig;

type HmacSha256 = Hmac<Sha256>;

/// Gateway delivering schedule broadcasts over HTTP webhooks.
pub struct WebhookNotificationGateway {
    client: Client,
    subscriber_urls: Vec<String>,
    signing_secret: String,
}

impl WebhookNotificationGateway {
    pub fn new(config: &NotificationsConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            subscriber_urls: config.subscriber_urls.clone(),
            signing_secret: config.signing_secret.clone(),
        })
    }

    /// HMAC-SHA256 signature over the serialized payload, hex-encoded with
    /// the scheme prefix subscribers verify against.
    fn sign_payload(&self, payload: &str) -> Result<String, String> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .map_err(|e| format!("Invalid signing key: {}", e))?;
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        Ok(format!("sha256={}", signature))
    }

    async fn deliver(&self, url: &str, payload_json: &str, signature: &str) -> Result<(), String> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("X-Webhook-Signature", signature)
            .body(payload_json.to_string())
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("Subscriber returned {}", response.status()))
        }
    }
}

#[async_trait::async_trait]
impl NotificationGateway for WebhookNotificationGateway {
    async fn broadcast(&self, payload: ScheduleBroadcast) -> BroadcastResult {
        if self.subscriber_urls.is_empty() {
            return BroadcastResult::NoSubscribers;
        }

        let payload_json = match serde_json::to_string(&payload) {
            Ok(json) => json,
            Err(e) => return BroadcastResult::Failed(format!("Serialization failed: {}", e)),
        };

        let signature = match self.sign_payload(&payload_json) {
            Ok(sig) => sig,
            Err(e) => return BroadcastResult::Failed(e),
        };

        let mut delivered = 0usize;
        let mut last_error = String::new();

        for url in &self.subscriber_urls {
            match self.deliver(url, &payload_json, &signature).await {
                Ok(()) => {
                    delivered += 1;
                    info!(
                        url = %url,
                        event = %payload.event,
                        schedules = payload.schedule_ids.len(),
                        "Broadcast delivered"
                    );
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Broadcast delivery failed");
                    last_error = e;
                }
            }
        }

        if delivered > 0 {
            BroadcastResult::Sent
        } else {
            BroadcastResult::Failed(last_error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(urls: Vec<String>) -> WebhookNotificationGateway {
        WebhookNotificationGateway::new(&NotificationsConfig {
            subscriber_urls: urls,
            signing_secret: "test-secret".to_string(),
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_sign_payload_format() {
        let gateway = gateway(vec![]);
        let signature = gateway.sign_payload(r#"{"event":"schedule_signed"}"#).unwrap();
        assert!(signature.starts_with("sha256="));
        // hex-encoded 32-byte digest
        assert_eq!(signature.len(), "sha256=".len() + 64);
    }

    #[test]
    fn test_sign_payload_is_deterministic() {
        let gateway = gateway(vec![]);
        let a = gateway.sign_payload("payload").unwrap();
        let b = gateway.sign_payload("payload").unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers() {
        use domain::models::ScheduleStatus;
        use domain::services::ScheduleEvent;

        let gateway = gateway(vec![]);
        let result = gateway
            .broadcast(ScheduleBroadcast::single(
                ScheduleEvent::ScheduleSigned,
                uuid::Uuid::new_v4(),
                ScheduleStatus::Signed,
            ))
            .await;
        assert!(matches!(result, BroadcastResult::NoSubscribers));
    }
}
