//! Background jobs run on a fixed interval for the lifetime of the
//! server.

use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::AppState;

mod expire_sessions;
pub use expire_sessions::ExpireSessions;

type SharedState = Arc<RwLock<AppState>>;

#[async_trait]
pub trait PeriodicJob: Debug + Send + Sync + 'static {
    fn interval(&self) -> Duration;

    async fn run_job(&self, state: &SharedState);
}

/// Run `job` in its own tokio task, once per interval. The first run
/// happens after one full interval has passed.
pub fn spawn_periodic_job<J: PeriodicJob>(state: SharedState, job: J) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(job.interval());
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            tracing::debug!("Running periodic job {:?}", job);
            job.run_job(&state).await;
        }
    });
}
