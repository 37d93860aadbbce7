use async_trait::async_trait;

use crate::error::WatchError;
use crate::registry::RoleRegistry;
use crate::stock::StockListing;

/// A message ready for the transmission adapter. Rendering to a concrete
/// chat payload happens at the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// Full picture of the current stock, sent once per detected change.
    StockUpdate { normal: String, mirage: String },
    /// Ping for one newly stocked item with a registered role.
    RestockAlert { fruit: String, role_id: String },
}

/// Render one category for display.
pub fn render_category(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_owned()
    } else {
        items.join(", ")
    }
}

/// Build the outbound messages for one detected change: the stock summary
/// first, then one alert per newly stocked item that has a role binding.
/// Items without a binding produce nothing.
pub async fn build_messages(
    curr: &StockListing,
    newly_stocked: &[String],
    registry: &RoleRegistry,
) -> Vec<OutboundMessage> {
    let mut messages = vec![OutboundMessage::StockUpdate {
        normal: render_category(&curr.normal),
        mirage: render_category(&curr.mirage),
    }];
    for fruit in newly_stocked {
        if let Some(role_id) = registry.get(fruit).await {
            messages.push(OutboundMessage::RestockAlert {
                fruit: fruit.clone(),
                role_id,
            });
        }
    }
    messages
}

/// Transmission adapter: delivers one message to wherever operators watch.
/// Delivery is best-effort; the watcher logs failures and moves on.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), WatchError>;
}
