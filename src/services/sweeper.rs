//! Expiry sweeper
//!
//! One owned background task per process. Each tick is a single DELETE that
//! removes links which expired, or were soft-deleted, more than a grace period
//! ago. It runs as a trusted system actor and never consults the
//! authorization policy.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::SweeperConfig;
use crate::errors::Result;
use crate::storage::SeaOrmStorage;

#[derive(Debug, Clone, Copy)]
pub struct SweeperSettings {
    pub enabled: bool,
    pub interval: Duration,
    pub grace_period: chrono::Duration,
}

impl From<&SweeperConfig> for SweeperSettings {
    fn from(config: &SweeperConfig) -> Self {
        Self {
            enabled: config.enabled,
            interval: config.interval(),
            grace_period: config.grace_period(),
        }
    }
}

impl Default for SweeperSettings {
    fn default() -> Self {
        Self::from(&SweeperConfig::default())
    }
}

pub struct ExpirySweeper;

impl ExpirySweeper {
    /// Run one sweep against `now`; returns the number of purged rows
    pub async fn sweep_once(
        storage: &SeaOrmStorage,
        grace_period: chrono::Duration,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let cutoff = now
            .checked_sub_signed(grace_period)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        storage.purge_stale(cutoff).await
    }

    /// Start the background task. The first tick fires one interval after
    /// start; a disabled sweeper yields an idle handle.
    pub fn spawn(storage: Arc<SeaOrmStorage>, settings: SweeperSettings) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        if !settings.enabled {
            info!("Expiry sweeper disabled");
            return SweeperHandle {
                shutdown_tx,
                task: None,
            };
        }

        let task = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(Instant::now() + settings.interval, settings.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match Self::sweep_once(&storage, settings.grace_period, Utc::now()).await {
                            Ok(0) => debug!("Expiry sweep: nothing to purge"),
                            Ok(purged) => info!("Expiry sweep purged {} links", purged),
                            // 出错只记录，下一次照常执行
                            Err(e) => error!("Expiry sweep failed: {}", e),
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            debug!("Expiry sweeper loop exited");
        });

        info!(
            "Expiry sweeper started (interval: {}s, grace period: {}s)",
            settings.interval.as_secs(),
            settings.grace_period.num_seconds()
        );

        SweeperHandle {
            shutdown_tx,
            task: Some(task),
        }
    }
}

/// Owner of the sweeper task; dropping it without `shutdown` also stops the loop
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Signal the loop and wait for it to finish; a tick in flight completes first
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);

        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!("Expiry sweeper task ended abnormally: {}", e);
        }

        info!("Expiry sweeper stopped");
    }
}
