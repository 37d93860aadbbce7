use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::WatchError;

/// One item-name to role binding, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleBinding {
    pub fruit: String,
    pub role_id: String,
}

/// Durable fruit to notification-role mapping.
///
/// The whole mapping lives in memory and is written back as a single JSON
/// object on every mutation. The watcher and the command surface share it
/// behind an `RwLock`; a mutation only becomes visible once it has been
/// durably written, and a failed write leaves memory on the last confirmed
/// state.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    inner: Arc<RwLock<Vec<RoleBinding>>>,
    path: Option<PathBuf>,
}

impl RoleRegistry {
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Vec::new())),
            path: None,
        }
    }

    /// Load the registry document from disk. An unreadable or corrupt file
    /// falls back to the temp sibling left by an interrupted write, then to
    /// an empty registry; startup never fails on registry state.
    pub async fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let bindings = match read_document(&path).await {
            Some(bindings) => bindings,
            None => {
                let tmp = path.with_extension("json.tmp");
                match read_document(&tmp).await {
                    Some(bindings) => {
                        warn!(path = %path.display(), "registry file unreadable, recovered from temp file");
                        bindings
                    }
                    None => Vec::new(),
                }
            }
        };
        Self {
            inner: Arc::new(RwLock::new(bindings)),
            path: Some(path),
        }
    }

    /// Upsert a binding. The updated document is persisted before the change
    /// becomes visible; an existing key keeps its position.
    pub async fn set(&self, fruit: &str, role_id: &str) -> Result<(), WatchError> {
        if role_id.is_empty() {
            return Err(WatchError::Binding(format!("empty role id for {fruit}")));
        }
        let mut guard = self.inner.write().await;
        let mut next = guard.clone();
        match next.iter_mut().find(|binding| binding.fruit == fruit) {
            Some(binding) => binding.role_id = role_id.to_owned(),
            None => next.push(RoleBinding {
                fruit: fruit.to_owned(),
                role_id: role_id.to_owned(),
            }),
        }
        self.persist(&next).await?;
        *guard = next;
        Ok(())
    }

    /// Remove a binding, reporting whether one existed.
    pub async fn remove(&self, fruit: &str) -> Result<bool, WatchError> {
        let mut guard = self.inner.write().await;
        if !guard.iter().any(|binding| binding.fruit == fruit) {
            return Ok(false);
        }
        let mut next = guard.clone();
        next.retain(|binding| binding.fruit != fruit);
        self.persist(&next).await?;
        *guard = next;
        Ok(true)
    }

    pub async fn get(&self, fruit: &str) -> Option<String> {
        let guard = self.inner.read().await;
        guard
            .iter()
            .find(|binding| binding.fruit == fruit)
            .map(|binding| binding.role_id.clone())
    }

    /// All bindings in registration order.
    pub async fn list(&self) -> Vec<RoleBinding> {
        self.inner.read().await.clone()
    }

    async fn persist(&self, bindings: &[RoleBinding]) -> Result<(), WatchError> {
        let Some(path) = &self.path else {
            debug!("registry is in-memory only, skipping persist");
            return Ok(());
        };
        let document: Map<String, Value> = bindings
            .iter()
            .map(|binding| (binding.fruit.clone(), Value::String(binding.role_id.clone())))
            .collect();
        let bytes = serde_json::to_vec_pretty(&document)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

/// Parse one registry document. Document key order is the registration
/// order; numeric role ids from older files are accepted. Entries with an
/// empty target are dropped.
async fn read_document(path: &Path) -> Option<Vec<RoleBinding>> {
    let bytes = tokio::fs::read(path).await.ok()?;
    match serde_json::from_slice::<Map<String, Value>>(&bytes) {
        Ok(map) => Some(
            map.into_iter()
                .filter_map(|(fruit, value)| {
                    let role_id = match value {
                        Value::String(role_id) => role_id,
                        Value::Number(role_id) => role_id.to_string(),
                        _ => return None,
                    };
                    (!role_id.is_empty()).then_some(RoleBinding { fruit, role_id })
                })
                .collect(),
        ),
        Err(err) => {
            warn!(error = %err, path = %path.display(), "failed to parse registry document");
            None
        }
    }
}
