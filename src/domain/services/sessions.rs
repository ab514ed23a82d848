#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time;
use uuid::Uuid;

use super::SessionState;
use crate::configuration::Settings;

pub type SessionRef = Arc<Mutex<SessionState>>;

struct SessionEntry {
    session: SessionRef,
    last_seen: Instant,
}

/// In-memory registry of live browser sessions. Sessions never share state;
/// each one is locked independently.
#[derive(Default)]
pub struct Sessions {
    sessions: DashMap<String, SessionEntry>,
}

impl Sessions {
    pub fn create_id() -> String {
        return Uuid::new_v4()
            .to_string()
            .split('-')
            .enumerate()
            .filter_map(|(idx, str)| {
                if idx > 1 {
                    return None;
                }
                return Some(str);
            })
            .collect::<Vec<&str>>()
            .join("-");
    }

    pub fn create(&self, settings: &Settings) -> (String, SessionRef) {
        let mut id = Sessions::create_id();
        while self.sessions.contains_key(&id) {
            id = Sessions::create_id();
        }

        let session = Arc::new(Mutex::new(SessionState::new(&id, settings)));
        self.sessions.insert(
            id.to_string(),
            SessionEntry {
                session: session.clone(),
                last_seen: Instant::now(),
            },
        );
        tracing::debug!(session_id = id, "Session created");

        return (id, session);
    }

    /// Looks up a session and marks it as seen.
    pub fn get(&self, id: &str) -> Option<SessionRef> {
        let mut entry = self.sessions.get_mut(id)?;
        entry.last_seen = Instant::now();

        return Some(entry.session.clone());
    }

    pub fn delete(&self, id: &str) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            tracing::debug!(session_id = id, "Session discarded");
        }

        return removed;
    }

    /// Drops sessions not seen for `idle_timeout`. Sessions that are locked or
    /// still streaming a reply are kept. Returns how many were dropped.
    pub fn evict_idle(&self, idle_timeout: Duration) -> usize {
        let before = self.sessions.len();

        self.sessions.retain(|id, entry| {
            if entry.last_seen.elapsed() < idle_timeout {
                return true;
            }

            let busy = match entry.session.try_lock() {
                Ok(state) => state.waiting_for_backend(),
                Err(_) => true,
            };
            if !busy {
                tracing::debug!(session_id = id, "Session expired");
            }

            return busy;
        });

        return before.saturating_sub(self.sessions.len());
    }

    /// Runs `evict_idle` on a fixed interval until the process exits.
    pub async fn reap_idle(sessions: Arc<Sessions>, idle_timeout: Duration) {
        let period = idle_timeout.min(Duration::from_secs(60)).max(Duration::from_secs(1));
        let mut interval = time::interval(period);

        loop {
            interval.tick().await;
            let evicted = sessions.evict_idle(idle_timeout);
            if evicted > 0 {
                tracing::info!(
                    evicted = evicted,
                    active_sessions = sessions.count(),
                    "Evicted idle sessions"
                );
            }
        }
    }

    pub fn count(&self) -> usize {
        return self.sessions.len();
    }
}
