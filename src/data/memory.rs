use crate::domain::repository::SessionStore;
use crate::domain::user::SessionUser;
use crate::infrastructure::security::generate_session_token;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone)]
struct SessionEntry {
    user: SessionUser,
    expires_at: DateTime<Utc>,
}

/// Process-local session store. Sessions expire a fixed `ttl` after login.
#[derive(Clone)]
pub struct InMemorySessionStore {
    storage: Arc<RwLock<HashMap<String, SessionEntry>>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drops every expired entry and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut storage = self.storage.write().await;
        let before = storage.len();
        storage.retain(|_, entry| entry.expires_at > now);
        before - storage.len()
    }

    pub async fn len(&self) -> usize {
        self.storage.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.storage.read().await.is_empty()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Duration::hours(24))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    #[instrument(skip(self, user), fields(user_id = user.id))]
    async fn create_session(&self, user: SessionUser) -> Result<String> {
        let purged = self.purge_expired().await;
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }

        let token = generate_session_token();
        let entry = SessionEntry {
            user,
            expires_at: Utc::now() + self.ttl,
        };
        self.storage.write().await.insert(token.clone(), entry);
        trace!("Session created");
        Ok(token)
    }

    #[instrument(skip_all)]
    async fn find_session(&self, token: &str) -> Result<Option<SessionUser>> {
        let entry = self.storage.read().await.get(token).cloned();
        match entry {
            Some(entry) if entry.expires_at > Utc::now() => Ok(Some(entry.user)),
            Some(_) => {
                debug!("Session expired");
                self.storage.write().await.remove(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    #[instrument(skip_all)]
    async fn destroy_session(&self, token: &str) -> Result<bool> {
        let removed = self.storage.write().await.remove(token);
        Ok(matches!(removed, Some(entry) if entry.expires_at > Utc::now()))
    }
}
