//! In-process session registry.
//!
//! Each session sits behind its own mutex, so turns of one session run one
//! at a time while different sessions proceed in parallel.
//!
//! The registry is bounded: sessions idle for longer than the idle TTL are
//! swept when a new session is created, and when the store is full the least
//! recently used session is evicted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use doc_chat::SessionState;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::error_handler::{AppError, AppResult};

/// Default upper bound on live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Default idle time after which a session may be swept.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// One conversation: who is talking and the state of the chat.
#[derive(Debug)]
pub struct Session {
    /// Survives `reset`; stored with saved answers.
    pub user: String,
    pub state: SessionState,
}

pub type SharedSession = Arc<Mutex<Session>>;

struct Entry {
    session: SharedSession,
    last_used: Instant,
    /// Recency order; `Instant` values may tie.
    seq: u64,
}

#[derive(Default)]
struct Entries {
    map: HashMap<Uuid, Entry>,
    next_seq: u64,
}

impl Entries {
    fn touch(&mut self, id: Uuid) -> Option<SharedSession> {
        let seq = self.next_seq;
        let entry = self.map.get_mut(&id)?;
        entry.last_used = Instant::now();
        entry.seq = seq;
        self.next_seq += 1;
        Some(entry.session.clone())
    }
}

pub struct SessionStore {
    entries: RwLock<Entries>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS, DEFAULT_IDLE_TTL)
    }
}

impl SessionStore {
    /// `max_sessions` is clamped to at least one.
    pub fn new(max_sessions: usize, idle_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            max_sessions: max_sessions.max(1),
            idle_ttl,
        }
    }

    /// Registers a session with default state and returns its id.
    ///
    /// Sweeps idle sessions first, then evicts the least recently used one
    /// if the store is still full.
    pub async fn create(&self, user: String) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session {
            user,
            state: SessionState::default(),
        }));

        let mut entries = self.entries.write().await;
        let before = entries.map.len();
        let ttl = self.idle_ttl;
        entries.map.retain(|_, e| e.last_used.elapsed() < ttl);
        let expired = before - entries.map.len();
        if expired > 0 {
            debug!(expired, "idle sessions swept");
        }

        if entries.map.len() >= self.max_sessions {
            let oldest = entries
                .map
                .iter()
                .min_by_key(|(_, e)| e.seq)
                .map(|(k, _)| *k);
            if let Some(k) = oldest {
                entries.map.remove(&k);
                debug!(session = %k, "least recently used session evicted");
            }
        }

        let seq = entries.next_seq;
        entries.next_seq += 1;
        entries.map.insert(
            id,
            Entry {
                session: session.clone(),
                last_used: Instant::now(),
                seq,
            },
        );
        (id, session)
    }

    /// Looks up a session and marks it as used.
    ///
    /// # Errors
    /// [`AppError::SessionNotFound`] for an unknown, evicted or idle-expired id.
    pub async fn get(&self, id: Uuid) -> AppResult<SharedSession> {
        let mut entries = self.entries.write().await;
        let expired = entries
            .map
            .get(&id)
            .is_some_and(|e| e.last_used.elapsed() >= self.idle_ttl);
        if expired {
            entries.map.remove(&id);
            return Err(AppError::SessionNotFound(id));
        }
        entries.touch(id).ok_or(AppError::SessionNotFound(id))
    }

    /// Drops a session.
    ///
    /// # Errors
    /// [`AppError::SessionNotFound`] for an unknown id.
    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        self.entries
            .write()
            .await
            .map
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::SessionNotFound(id))
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.map.len()
    }
}
