use super::UserCommandService;
use crate::application::{
    error::ApplicationResult, services::audit_logger::AuditActor,
};
use crate::domain::user::{PanelUser, UserId, Username};
use serde_json::json;
use tracing::info;

pub struct BootstrapAdminCommand {
    pub username: String,
    pub password: String,
}

impl UserCommandService {
    /// Create the configured administrator unless a user with that name
    /// already exists. Returns whether a user was created.
    pub async fn ensure_admin(&self, command: BootstrapAdminCommand) -> ApplicationResult<bool> {
        let username = Username::new(command.username)?;
        if self.user_repo.find_by_username(&username).await?.is_some() {
            return Ok(false);
        }

        let hash = self.password_hasher.hash(&command.password).await?;
        let user = PanelUser::new(
            UserId::generate().into(),
            username.to_string(),
            hash,
            true,
        );
        let user = self.user_repo.insert(user).await?;

        self.audit
            .log(
                &AuditActor::system("bootstrap"),
                "user:created",
                json!({ "targetUserId": user.user_id, "admin": true }),
            )
            .await;
        info!(username = %user.username, "bootstrap administrator created");
        Ok(true)
    }
}
