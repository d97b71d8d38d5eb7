// src/infrastructure/security/session_store.rs
use crate::application::ApplicationResult;
use crate::application::ports::{
    session::{Session, SessionStore, SessionUser},
    time::Clock,
};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Duration;
use rand::{RngCore, rngs::OsRng};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const SESSION_ID_BYTES: usize = 32;

/// Sessions kept in process memory; a restart logs everyone out.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    fn new_session_id() -> String {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, user: SessionUser) -> ApplicationResult<Session> {
        let now = self.clock.now();
        let session = Session {
            id: Self::new_session_id(),
            user,
            expires_at: now + self.ttl,
        };

        let mut guard = self.sessions.write().await;
        guard.retain(|_, existing| existing.expires_at > now);
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn get(&self, session_id: &str) -> ApplicationResult<Option<Session>> {
        let now = self.clock.now();
        let found = self.sessions.read().await.get(session_id).cloned();
        match found {
            Some(session) if session.expires_at > now => Ok(Some(session)),
            Some(_) => {
                self.sessions.write().await.remove(session_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn revoke(&self, session_id: &str) -> ApplicationResult<()> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}
