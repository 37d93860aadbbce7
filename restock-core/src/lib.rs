pub mod config;
pub mod diff;
pub mod error;
pub mod notify;
pub mod registry;
pub mod stock;
pub mod watcher;

pub use config::WatchConfig;
pub use diff::{changed, newly_stocked, newly_stocked_all};
pub use error::WatchError;
pub use notify::{build_messages, render_category, MessageSink, OutboundMessage};
pub use registry::{RoleBinding, RoleRegistry};
pub use stock::{extract_listing, ExtractError, StockListing};
pub use watcher::{run_cycle, spawn_watcher, WatcherHandle};
