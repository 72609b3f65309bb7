// src/services/session_registry.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::services::quiz_session::SessionState;

#[derive(Debug)]
struct Entry {
    session: SessionState,
    touched: DateTime<Utc>,
}

/// Per-player quiz sessions, keyed by the player id carried in the bearer token.
///
/// Process-local and in-memory: a restart drops every in-progress game.
/// Sessions idle for longer than the configured lifetime are pruned on the
/// next access to the registry.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
    idle_ttl: Duration,
}

impl SessionRegistry {
    pub fn new(idle_ttl_secs: u64) -> Self {
        let idle_ttl = i64::try_from(idle_ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);

        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Locks the map and drops every entry idle since before `now - idle_ttl`.
    fn lock_pruned(&self, now: DateTime<Utc>) -> MutexGuard<'_, HashMap<String, Entry>> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let before = map.len();
        map.retain(|_, entry| now.signed_duration_since(entry.touched) <= self.idle_ttl);
        if map.len() < before {
            tracing::debug!("Pruned {} idle quiz sessions", before - map.len());
        }
        map
    }

    /// Installs a fresh session, replacing any previous one ("Play Again").
    pub fn replace(&self, player_id: &str, session: SessionState, now: DateTime<Utc>) {
        self.lock_pruned(now).insert(
            player_id.to_string(),
            Entry {
                session,
                touched: now,
            },
        );
    }

    /// Abandons the player's session. Returns whether one existed.
    pub fn remove(&self, player_id: &str, now: DateTime<Utc>) -> bool {
        self.lock_pruned(now).remove(player_id).is_some()
    }

    /// Runs `f` against the player's session, if any, and marks it as used at `now`.
    /// The lock is held only for the duration of `f`, so `f` must not block.
    pub fn with_session<T>(
        &self,
        player_id: &str,
        now: DateTime<Utc>,
        f: impl FnOnce(&mut SessionState) -> T,
    ) -> Option<T> {
        let mut map = self.lock_pruned(now);
        let entry = map.get_mut(player_id)?;
        entry.touched = now;
        Some(f(&mut entry.session))
    }

    pub fn len(&self, now: DateTime<Utc>) -> usize {
        self.lock_pruned(now).len()
    }

    pub fn is_empty(&self, now: DateTime<Utc>) -> bool {
        self.len(now) == 0
    }
}
