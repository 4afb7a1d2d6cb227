//! Server state management
//!
//! Live game sessions, keyed by a numeric id handed out on creation.
//! Ids only grow, so the smallest live id is the oldest session.

use crate::error::ApiError;
use crate::ServerConfig;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use xiangqi_core::{Session, SessionConfig};

/// Live sessions kept before the oldest is dropped
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Server-wide shared state
pub struct ServerState {
    sessions: RwLock<FxHashMap<u64, Session>>,
    next_id: AtomicU64,
    session_defaults: SessionConfig,
    max_sessions: usize,
}

impl ServerState {
    pub fn new() -> Self {
        Self::with_limits(SessionConfig::default(), DEFAULT_MAX_SESSIONS)
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::with_limits(config.session_defaults, config.max_sessions)
    }

    /// `max_sessions` is clamped to at least one
    pub fn with_limits(session_defaults: SessionConfig, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(FxHashMap::default()),
            next_id: AtomicU64::new(1),
            session_defaults,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Config used when a client creates a game without one
    pub fn session_defaults(&self) -> SessionConfig {
        self.session_defaults
    }

    /// Store a session and return its id, evicting the oldest when full
    pub fn insert_session(&self, session: Session) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let config = session.config();
        tracing::info!(id, mode = ?config.mode, difficulty = %config.difficulty, "session created");

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        while sessions.len() >= self.max_sessions {
            let Some(&oldest) = sessions.keys().min() else {
                break;
            };
            sessions.remove(&oldest);
            tracing::info!(id = oldest, "session evicted");
        }
        sessions.insert(id, session);
        id
    }

    /// Drop a session
    pub fn remove_session(&self, id: u64) -> Result<(), ApiError> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .ok_or(ApiError::GameNotFound(id))?;
        tracing::info!(id, "session removed");
        Ok(())
    }

    /// Run `f` against a session without mutating it
    pub fn read_session<R>(&self, id: u64, f: impl FnOnce(&Session) -> R) -> Result<R, ApiError> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get(&id).ok_or(ApiError::GameNotFound(id))?;
        Ok(f(session))
    }

    /// Run `f` against a session with exclusive access
    pub fn with_session<R>(
        &self,
        id: u64,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, ApiError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get_mut(&id).ok_or(ApiError::GameNotFound(id))?;
        Ok(f(session))
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
