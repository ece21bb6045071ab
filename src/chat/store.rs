//! Conversations held in memory, one per session ID. A session is
//! created on its first interaction and torn down when it is ended
//! explicitly or has been idle for longer than the TTL.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::models::{SessionState, Turn};

struct SessionEntry {
    state: SessionState,
    last_seen: Instant,
}

pub struct SessionStore {
    sessions: HashMap<String, SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Snapshot of an existing session without touching it.
    pub fn get(&self, session_id: &str) -> Option<SessionState> {
        self.sessions.get(session_id).map(|e| e.state.clone())
    }

    /// Snapshot of the session, creating an empty one if needed.
    pub fn get_or_create(&mut self, session_id: &str, now: Instant) -> SessionState {
        let entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!("Creating session {}", session_id);
                SessionEntry {
                    state: SessionState::new(),
                    last_seen: now,
                }
            });
        entry.last_seen = now;
        entry.state.clone()
    }

    /// Append `turn` to the latest state of the session. Turns from
    /// overlapping requests are each applied whole, in commit order.
    /// Returns `None` when the session was ended or expired while the
    /// turn was being answered, in which case the turn is dropped.
    pub fn commit(&mut self, session_id: &str, turn: Turn, now: Instant) -> Option<SessionState> {
        let Some(entry) = self.sessions.get_mut(session_id) else {
            tracing::debug!("Session {} is gone, dropping turn", session_id);
            return None;
        };
        entry.state = entry.state.apply(turn);
        entry.last_seen = now;
        Some(entry.state.clone())
    }

    pub fn end(&mut self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Drop sessions idle for longer than the TTL, returning how many
    /// were removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= ttl);
        before - self.sessions.len()
    }
}
