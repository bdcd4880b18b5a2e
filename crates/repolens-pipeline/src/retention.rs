use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::PipelineError;
use crate::traits::ProfileStore;

pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Deletes profiles older than the retention window.
pub struct RetentionSweeper {
    store: Arc<dyn ProfileStore>,
    retention: TimeDelta,
}

impl RetentionSweeper {
    /// Non-positive or out-of-range `retention_days` fall back to
    /// [`DEFAULT_RETENTION_DAYS`].
    #[must_use]
    pub fn new(store: Arc<dyn ProfileStore>, retention_days: i64) -> Self {
        let retention = Some(retention_days)
            .filter(|d| *d > 0)
            .and_then(TimeDelta::try_days)
            .unwrap_or(TimeDelta::days(DEFAULT_RETENTION_DAYS));
        Self { store, retention }
    }

    #[must_use]
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.retention
    }

    /// Deletes every profile created before `now - retention`.
    ///
    /// # Errors
    ///
    /// Returns the storage error unchanged.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> Result<u64, PipelineError> {
        self.store.delete_created_before(self.cutoff(now)).await
    }

    /// Scheduled entry point: sweeps relative to the current time and logs
    /// the outcome. Errors are logged, never returned.
    pub async fn run(&self) -> u64 {
        match self.sweep_at(Utc::now()).await {
            Ok(deleted) => {
                tracing::info!(deleted, "scheduler: retention sweep finished");
                deleted
            }
            Err(e) => {
                tracing::error!(error = %e, "scheduler: retention sweep failed");
                0
            }
        }
    }
}
