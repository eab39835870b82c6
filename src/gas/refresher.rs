//! Background gas price refresh
//!
//! A cancellable periodic task that pre-warms the [`GasPriceCache`] on an
//! interval equal to the cache TTL. [`GasRefreshControl`] owns the task
//! and exposes start / stop / toggle. Refresh failures are logged and
//! never reach request handlers.

use super::cache::GasPriceCache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

struct RefreshTask {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

pub struct GasRefreshControl {
    cache: Arc<GasPriceCache>,
    task: Mutex<Option<RefreshTask>>,
}

impl GasRefreshControl {
    pub fn new(cache: Arc<GasPriceCache>) -> Self {
        Self {
            cache,
            task: Mutex::new(None),
        }
    }

    pub async fn is_running(&self) -> bool {
        is_live(&*self.task.lock().await)
    }

    /// Spawn the refresh task. Returns false if it was already running.
    pub async fn start(&self) -> bool {
        let mut task = self.task.lock().await;
        if is_live(&task) {
            return false;
        }
        *task = Some(self.spawn());
        true
    }

    /// Signal the task to stop and wait for it to exit.
    /// Returns false if it was not running.
    pub async fn stop(&self) -> bool {
        let Some(task) = self.task.lock().await.take() else {
            return false;
        };
        shutdown(task).await;
        true
    }

    /// Flip the task on or off; returns whether it is now running
    pub async fn toggle(&self) -> bool {
        let mut task = self.task.lock().await;
        if is_live(&task) {
            if let Some(running) = task.take() {
                shutdown(running).await;
            }
            false
        } else {
            *task = Some(self.spawn());
            true
        }
    }

    fn spawn(&self) -> RefreshTask {
        let (stop_tx, stop_rx) = watch::channel(false);
        let period = self.cache.ttl().max(Duration::from_millis(1));
        let handle = tokio::spawn(run_refresh_loop(Arc::clone(&self.cache), period, stop_rx));

        info!("Gas price auto-refresh started (every {:?})", period);
        RefreshTask { stop_tx, handle }
    }
}

fn is_live(task: &Option<RefreshTask>) -> bool {
    task.as_ref().is_some_and(|t| !t.handle.is_finished())
}

async fn shutdown(task: RefreshTask) {
    let _ = task.stop_tx.send(true);
    if let Err(e) = task.handle.await {
        warn!("Gas refresh task ended abnormally: {}", e);
    }
    info!("Gas price auto-refresh stopped");
}

async fn run_refresh_loop(
    cache: Arc<GasPriceCache>,
    period: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match cache.refresh().await {
                    Ok(Some(value)) => debug!("Auto-refreshed gas price: {} Gwei", value),
                    Ok(None) => {}
                    Err(e) => warn!("Interval error while fetching gas price: {}", e),
                }
            }
            changed = stop_rx.changed() => {
                // sender dropped or stop requested
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
        }
    }
}
