//! Session-scoped template selection storage.
//!
//! The selection is keyed by the caller's session id and always read and
//! written through explicit store calls. Two backends: an in-process map owned
//! by the app state (single instance deployments, tests) and Redis (shared
//! across replicas, with expiry).

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use redis::Client as RedisClient;
use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;

use crate::templates::registry::TemplateSelection;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Selection store lock poisoned")]
    Poisoned,
}

/// Selection lifetime when `SESSION_TTL_SECS` is unset.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

#[async_trait]
pub trait SelectionStore: Send + Sync {
    async fn load(&self, session_id: &str) -> Result<TemplateSelection, StoreError>;
    async fn save(&self, session_id: &str, selection: &TemplateSelection) -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-process store
// ────────────────────────────────────────────────────────────────────────────

/// Selections older than the TTL read as absent and are pruned on the next save.
#[derive(Debug)]
pub struct InMemorySelectionStore {
    sessions: RwLock<HashMap<String, (String, Instant)>>,
    ttl: Duration,
}

impl InMemorySelectionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_live(&self, saved_at: Instant, now: Instant) -> bool {
        now.duration_since(saved_at) < self.ttl
    }
}

#[async_trait]
impl SelectionStore for InMemorySelectionStore {
    async fn load(&self, session_id: &str) -> Result<TemplateSelection, StoreError> {
        let sessions = self.sessions.read().map_err(|_| StoreError::Poisoned)?;
        let now = Instant::now();
        let current = sessions
            .get(session_id)
            .filter(|(_, saved_at)| self.is_live(*saved_at, now))
            .map(|(id, _)| id.clone());
        Ok(TemplateSelection::new(current))
    }

    async fn save(&self, session_id: &str, selection: &TemplateSelection) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::Poisoned)?;
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, (_, saved_at)| self.is_live(*saved_at, now));
        if sessions.len() < before {
            debug!("Pruned {} expired in-memory selection(s)", before - sessions.len());
        }

        match selection.current() {
            Some(id) => {
                sessions.insert(session_id.to_string(), (id.to_string(), now));
            }
            None => {
                sessions.remove(session_id);
            }
        }
        debug!("Saved in-memory selection for session {session_id}");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis store
// ────────────────────────────────────────────────────────────────────────────

const KEY_PREFIX: &str = "cvforge:selection:";

pub struct RedisSelectionStore {
    client: RedisClient,
    ttl_secs: u64,
}

impl RedisSelectionStore {
    pub fn new(client: RedisClient, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    fn key(session_id: &str) -> String {
        format!("{KEY_PREFIX}{session_id}")
    }
}

#[async_trait]
impl SelectionStore for RedisSelectionStore {
    async fn load(&self, session_id: &str) -> Result<TemplateSelection, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let current: Option<String> = redis::cmd("GET")
            .arg(Self::key(session_id))
            .query_async(&mut conn)
            .await?;
        debug!("Loaded redis selection for session {session_id}: {current:?}");
        Ok(TemplateSelection::new(current))
    }

    async fn save(&self, session_id: &str, selection: &TemplateSelection) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = Self::key(session_id);
        match selection.current() {
            Some(id) => {
                redis::cmd("SET")
                    .arg(&key)
                    .arg(id)
                    .arg("EX")
                    .arg(self.ttl_secs)
                    .query_async::<_, ()>(&mut conn)
                    .await?;
            }
            None => {
                redis::cmd("DEL")
                    .arg(&key)
                    .query_async::<_, ()>(&mut conn)
                    .await?;
            }
        }
        debug!("Saved redis selection for session {session_id}");
        Ok(())
    }
}
