use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{PeriodicJob, SharedState};

#[derive(Debug)]
pub struct ExpireSessions;

impl ExpireSessions {
    /// Purge sessions that are idle as of `now`, returning how many
    /// were removed.
    fn expire(&self, state: &SharedState, now: Instant) -> usize {
        let (removed, ttl) = match state.write() {
            Ok(mut shared_state) => {
                let removed = shared_state.sessions.purge_expired(now);
                (removed, shared_state.sessions.ttl())
            }
            Err(e) => {
                tracing::error!("Unable to lock shared state to expire sessions: {}", e);
                return 0;
            }
        };
        if removed > 0 {
            tracing::info!("Expired {} chat sessions idle for over {:?}", removed, ttl);
        }
        removed
    }
}

#[async_trait]
impl PeriodicJob for ExpireSessions {
    fn interval(&self) -> Duration {
        // Run every minute
        Duration::from_secs(60)
    }

    async fn run_job(&self, state: &SharedState) {
        self.expire(state, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, RwLock};

    use super::*;
    use crate::api::AppState;
    use crate::api::test_support::{StubEngine, test_config};

    fn test_state(ttl_secs: u64) -> SharedState {
        let mut config = test_config();
        config.session_ttl_secs = ttl_secs;
        Arc::new(RwLock::new(AppState::new(
            Arc::new(StubEngine::default()),
            config,
        )))
    }

    #[test]
    fn it_purges_only_expired_sessions() {
        let state = test_state(30);
        let start = Instant::now();

        {
            let mut shared_state = state.write().unwrap();
            shared_state.sessions.get_or_create("stale", start);
            shared_state
                .sessions
                .get_or_create("fresh", start + Duration::from_secs(100));
        }

        let removed = ExpireSessions.expire(&state, start + Duration::from_secs(120));

        assert_eq!(removed, 1);
        let shared_state = state.read().unwrap();
        assert!(shared_state.sessions.get("stale").is_none());
        assert!(shared_state.sessions.get("fresh").is_some());
    }

    #[tokio::test]
    async fn it_keeps_recent_sessions_when_run() {
        let state = test_state(30);
        state
            .write()
            .unwrap()
            .sessions
            .get_or_create("recent", Instant::now());

        ExpireSessions.run_job(&state).await;

        assert!(state.read().unwrap().sessions.get("recent").is_some());
    }
}
