use thiserror::Error;

use crate::stock::ExtractError;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("stock extraction error: {0}")]
    Extract(#[from] ExtractError),
    #[error("registry persistence error: {0}")]
    Persist(#[from] std::io::Error),
    #[error("invalid role binding: {0}")]
    Binding(String),
    #[error("registry encoding error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("message delivery error: {0}")]
    Delivery(String),
    #[error("watcher task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
