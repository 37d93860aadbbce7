use std::sync::Arc;

use reqwest::Client;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::WatchConfig;
use crate::diff::{changed, newly_stocked_all};
use crate::error::WatchError;
use crate::notify::{build_messages, MessageSink};
use crate::registry::RoleRegistry;
use crate::stock::{extract_listing, StockListing};

pub struct WatcherHandle {
    cancel_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl WatcherHandle {
    pub async fn stop(self) -> Result<(), WatchError> {
        let _ = self.cancel_tx.send(());
        self.join.await.map_err(WatchError::from)
    }
}

/// Spawn the repeating stock check. The task owns the baseline listing
/// (empty at startup, so the first observation always reads as a change) and
/// keeps ticking until the handle is stopped; a failed cycle never kills it.
pub fn spawn_watcher(
    config: WatchConfig,
    client: Client,
    registry: RoleRegistry,
    sink: Arc<dyn MessageSink>,
) -> WatcherHandle {
    let (cancel_tx, mut cancel_rx) = broadcast::channel(1);
    let join = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut baseline = StockListing::default();

        loop {
            tokio::select! {
                _ = cancel_rx.recv() => {
                    info!("watcher shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    baseline = run_cycle(&client, &config, &registry, sink.as_ref(), baseline).await;
                }
            }
        }
    });

    WatcherHandle { cancel_tx, join }
}

/// One full check: fetch, extract, diff against `baseline`, notify, and
/// return the listing to diff against next time. Every failure path still
/// returns a baseline, so the schedule is never interrupted.
pub async fn run_cycle(
    client: &Client,
    config: &WatchConfig,
    registry: &RoleRegistry,
    sink: &dyn MessageSink,
    baseline: StockListing,
) -> StockListing {
    let body = match fetch_page(client, config).await {
        Ok(body) => body,
        Err(err) => {
            warn!(url = %config.stock_url, error = %err, "stock fetch failed, keeping previous listing");
            return baseline;
        }
    };

    let current = match extract_listing(&body) {
        Ok(listing) => listing,
        Err(err) => {
            warn!(url = %config.stock_url, error = %err, "stock page not recognized, treating as empty");
            StockListing::default()
        }
    };

    if !changed(&baseline, &current) {
        debug!("stock unchanged");
        return baseline;
    }

    let fresh = newly_stocked_all(&baseline, &current);
    for message in build_messages(&current, &fresh, registry).await {
        if let Err(err) = sink.send(&message).await {
            warn!(error = %err, "failed to deliver message");
        }
    }

    info!(
        normal = current.normal.len(),
        mirage = current.mirage.len(),
        fresh = fresh.len(),
        "stock updated"
    );
    current
}

async fn fetch_page(client: &Client, config: &WatchConfig) -> Result<String, WatchError> {
    let response = client
        .get(&config.stock_url)
        .timeout(config.request_timeout)
        .send()
        .await?
        .error_for_status()?;
    Ok(response.text().await?)
}
