// src/application/services/mod.rs
pub mod audit_logger;

use std::sync::Arc;

use crate::{
    application::{
        ApplicationResult,
        commands::{api_keys::ApiKeyCommandService, users::UserCommandService},
        ports::{
            audit::AuditSink,
            security::{ApiKeyHasher, PasswordHasher},
            session::{Session, SessionStore},
            time::Clock,
        },
        queries::{
            api_keys::ApiKeyQueryService, audit::AuditQueryService, panel::PanelQueryService,
            users::UserQueryService,
        },
    },
    domain::store::{JsonStore, KeyValueStore},
    domain::user::UserRepository,
    infrastructure::repositories::KvUserRepository,
};
use tracing::info;

use audit_logger::AuditLogger;

pub struct ApplicationServices {
    pub audit: Arc<AuditLogger>,
    pub audit_queries: Arc<AuditQueryService>,
    pub api_key_commands: Arc<ApiKeyCommandService>,
    pub api_key_queries: Arc<ApiKeyQueryService>,
    pub user_commands: Arc<UserCommandService>,
    pub user_queries: Arc<UserQueryService>,
    pub panel_queries: Arc<PanelQueryService>,
    session_store: Arc<dyn SessionStore>,
    user_repo: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl ApplicationServices {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        audit_sink: Arc<dyn AuditSink>,
        password_hasher: Arc<dyn PasswordHasher>,
        api_key_hasher: Arc<dyn ApiKeyHasher>,
        session_store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = JsonStore::new(store);
        let user_repo: Arc<dyn UserRepository> = Arc::new(KvUserRepository::new(store.clone()));

        let audit = Arc::new(AuditLogger::new(
            store.clone(),
            audit_sink,
            Arc::clone(&clock),
        ));

        let api_key_commands = Arc::new(ApiKeyCommandService::new(
            store.clone(),
            api_key_hasher,
            Arc::clone(&audit),
            Arc::clone(&clock),
        ));

        let user_commands = Arc::new(UserCommandService::new(
            user_repo.clone(),
            password_hasher,
            Arc::clone(&session_store),
            Arc::clone(&audit),
            store.clone(),
        ));

        Self {
            audit_queries: Arc::new(AuditQueryService::new(store.clone())),
            api_key_queries: Arc::new(ApiKeyQueryService::new(store.clone())),
            user_queries: Arc::new(UserQueryService::new(user_repo.clone())),
            panel_queries: Arc::new(PanelQueryService::new(store, user_repo.clone())),
            audit,
            api_key_commands,
            user_commands,
            session_store,
            user_repo,
            clock,
        }
    }

    /// Look up the live session behind a cookie value. The user record is
    /// re-read on every call so role changes apply immediately; a session
    /// whose user was deleted is revoked.
    pub async fn resolve_session(&self, session_id: &str) -> ApplicationResult<Option<Session>> {
        let Some(mut session) = self.session_store.get(session_id).await? else {
            return Ok(None);
        };

        match self.user_repo.find_by_id(&session.user.user_id).await? {
            Some(user) => {
                session.user.admin = user.admin;
                session.user.username = user.username;
                Ok(Some(session))
            }
            None => {
                info!(user_id = %session.user.user_id, "revoking session of deleted user");
                self.session_store.revoke(session_id).await?;
                Ok(None)
            }
        }
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }
}
