use async_trait::async_trait;
use reqwest::Client;
use restock_core::{MessageSink, OutboundMessage, WatchError};
use serde_json::json;

/// Delivers outbound messages to a Discord-compatible webhook.
pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }

    fn payload(message: &OutboundMessage) -> serde_json::Value {
        match message {
            OutboundMessage::StockUpdate { normal, mirage } => json!({
                "embeds": [{
                    "title": "Current Stock Update",
                    "fields": [
                        { "name": "Normal Stock", "value": normal, "inline": false },
                        { "name": "Mirage Stock", "value": mirage, "inline": false }
                    ]
                }]
            }),
            OutboundMessage::RestockAlert { fruit, role_id } => json!({
                "content": format!("<@&{role_id}> **{fruit}** is now in stock!")
            }),
        }
    }
}

#[async_trait]
impl MessageSink for WebhookSink {
    async fn send(&self, message: &OutboundMessage) -> Result<(), WatchError> {
        self.client
            .post(&self.url)
            .json(&Self::payload(message))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
