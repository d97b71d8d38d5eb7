use super::UserQueryService;
use crate::application::{
    dto::UserDto,
    error::{ApplicationError, ApplicationResult},
};

impl UserQueryService {
    pub async fn list_users(&self) -> ApplicationResult<Vec<UserDto>> {
        let users = self.user_repo.list().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn get_user(&self, user_id: &str) -> ApplicationResult<UserDto> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| ApplicationError::not_found(format!("user {user_id}")))
    }
}
