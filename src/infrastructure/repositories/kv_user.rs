// src/infrastructure/repositories/kv_user.rs
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::store::{JsonStore, keys};
use crate::domain::user::{PanelUser, UserRepository, Username};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Users live as one JSON list under the `users` key.
pub struct KvUserRepository {
    store: JsonStore,
    write_lock: Mutex<()>,
}

impl KvUserRepository {
    pub fn new(store: JsonStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> DomainResult<Vec<PanelUser>> {
        self.store.get_or_default(keys::USERS).await
    }
}

#[async_trait]
impl UserRepository for KvUserRepository {
    async fn list(&self) -> DomainResult<Vec<PanelUser>> {
        self.load().await
    }

    async fn find_by_id(&self, user_id: &str) -> DomainResult<Option<PanelUser>> {
        Ok(self.load().await?.into_iter().find(|u| u.user_id == user_id))
    }

    async fn find_by_username(&self, username: &Username) -> DomainResult<Option<PanelUser>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .find(|u| u.username == username.as_str()))
    }

    async fn insert(&self, user: PanelUser) -> DomainResult<PanelUser> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load().await?;
        if users.iter().any(|u| u.user_id == user.user_id) {
            return Err(DomainError::Conflict("user id already exists".into()));
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::Conflict("username already exists".into()));
        }
        users.push(user.clone());
        self.store.set(keys::USERS, &users).await?;
        Ok(user)
    }

    async fn update(&self, user: PanelUser) -> DomainResult<PanelUser> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load().await?;
        let slot = users
            .iter_mut()
            .find(|u| u.user_id == user.user_id)
            .ok_or_else(|| DomainError::NotFound(format!("user {}", user.user_id)))?;
        *slot = user.clone();
        self.store.set(keys::USERS, &users).await?;
        Ok(user)
    }
}
