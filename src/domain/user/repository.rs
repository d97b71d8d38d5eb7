// src/domain/user/repository.rs
use crate::domain::errors::DomainResult;
use crate::domain::user::{entity::PanelUser, value_objects::Username};
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> DomainResult<Vec<PanelUser>>;

    async fn find_by_id(&self, user_id: &str) -> DomainResult<Option<PanelUser>>;

    async fn find_by_username(&self, username: &Username) -> DomainResult<Option<PanelUser>>;

    async fn insert(&self, user: PanelUser) -> DomainResult<PanelUser>;

    /// Replace the record with the same `user_id`.
    async fn update(&self, user: PanelUser) -> DomainResult<PanelUser>;
}
