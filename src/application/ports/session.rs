// src/application/ports/session.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The identity a browser session is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: String,
    pub username: String,
    pub admin: bool,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a session for `user` and return it with a fresh id.
    async fn create(&self, user: SessionUser) -> ApplicationResult<Session>;

    /// Look up a live session. Expired sessions are treated as absent.
    async fn get(&self, session_id: &str) -> ApplicationResult<Option<Session>>;

    /// Revoke a session (e.g. on logout). Unknown ids are ignored.
    async fn revoke(&self, session_id: &str) -> ApplicationResult<()>;
}
