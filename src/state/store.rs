//! Session store implementation
//!
//! The store is the only component that knows where sessions live. Handlers
//! get/save/delete by user id and never see the backend: an in-process map
//! for single-instance deployments, or Redis with a key prefix and TTL when
//! sessions should survive restarts or be shared across instances.

use std::collections::HashMap;
use std::sync::Arc;

use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::SessionConfig;
use crate::utils::errors::Result;

use super::session::Session;

/// Session storage with pluggable backends
#[derive(Clone)]
pub struct SessionStore {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Memory(Arc<RwLock<HashMap<i64, Session>>>),
    Redis {
        manager: redis::aio::ConnectionManager,
        prefix: String,
        ttl_seconds: u64,
    },
}

impl SessionStore {
    /// Create an in-memory store; sessions live for the process lifetime
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(RwLock::new(HashMap::new()))),
        }
    }

    /// Create a Redis-backed store from the session configuration
    pub async fn redis(config: &SessionConfig) -> Result<Self> {
        let url = config.redis_url.as_deref().unwrap_or_default();
        let client = redis::Client::open(url)?;
        let manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            backend: Backend::Redis {
                manager,
                prefix: config.prefix.clone(),
                ttl_seconds: config.ttl_seconds,
            },
        })
    }

    /// Build the store selected by configuration
    pub async fn from_config(config: &SessionConfig) -> Result<Self> {
        match config.backend.as_str() {
            "redis" => Self::redis(config).await,
            _ => Ok(Self::in_memory()),
        }
    }

    /// Load a user's session, if one exists
    pub async fn load(&self, user_id: i64) -> Result<Option<Session>> {
        match &self.backend {
            Backend::Memory(map) => Ok(map.read().await.get(&user_id).cloned()),
            Backend::Redis { manager, .. } => {
                let key = self.session_key(user_id);
                let mut conn = manager.clone();
                let serialized: Option<String> = conn.get(&key).await?;

                match serialized {
                    Some(data) => {
                        let session: Session = serde_json::from_str(&data)?;
                        Ok(Some(session))
                    }
                    None => Ok(None),
                }
            }
        }
    }

    /// Save a user's session
    pub async fn save(&self, session: &Session) -> Result<()> {
        debug!(user_id = session.user_id, node = %session.node, "Saving session");

        match &self.backend {
            Backend::Memory(map) => {
                map.write().await.insert(session.user_id, session.clone());
                Ok(())
            }
            Backend::Redis {
                manager,
                ttl_seconds,
                ..
            } => {
                let key = self.session_key(session.user_id);
                let serialized = serde_json::to_string(session)?;
                let mut conn = manager.clone();
                conn.set_ex::<_, _, ()>(&key, serialized, *ttl_seconds).await?;
                Ok(())
            }
        }
    }

    /// Delete a user's session
    pub async fn delete(&self, user_id: i64) -> Result<()> {
        match &self.backend {
            Backend::Memory(map) => {
                map.write().await.remove(&user_id);
                Ok(())
            }
            Backend::Redis { manager, .. } => {
                let key = self.session_key(user_id);
                let mut conn = manager.clone();
                let deleted: u32 = conn.del(&key).await?;
                debug!(user_id = user_id, deleted = deleted, "Deleted session");
                Ok(())
            }
        }
    }

    /// Load a session or create a fresh one at the root menu
    pub async fn load_or_new(&self, user_id: i64) -> Result<Session> {
        Ok(self
            .load(user_id)
            .await?
            .unwrap_or_else(|| Session::new(user_id)))
    }

    fn session_key(&self, user_id: i64) -> String {
        let prefix = match &self.backend {
            Backend::Redis { prefix, .. } => prefix.as_str(),
            Backend::Memory(_) => "",
        };
        format!("{}session:{}", prefix, user_id)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match &self.backend {
            Backend::Memory(_) => "memory",
            Backend::Redis { .. } => "redis",
        };
        f.debug_struct("SessionStore")
            .field("backend", &backend)
            .finish()
    }
}
