use std::sync::Arc;

use crate::application::{
    ports::{security::PasswordHasher, session::SessionStore},
    services::audit_logger::AuditLogger,
};
use crate::domain::store::JsonStore;
use crate::domain::user::UserRepository;

pub struct UserCommandService {
    pub(super) user_repo: Arc<dyn UserRepository>,
    pub(super) password_hasher: Arc<dyn PasswordHasher>,
    pub(super) session_store: Arc<dyn SessionStore>,
    pub(super) audit: Arc<AuditLogger>,
    /// Instance and plan lookups for plan changes.
    pub(super) store: JsonStore,
}

impl UserCommandService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        session_store: Arc<dyn SessionStore>,
        audit: Arc<AuditLogger>,
        store: JsonStore,
    ) -> Self {
        Self {
            user_repo,
            password_hasher,
            session_store,
            audit,
            store,
        }
    }
}
