use super::UserCommandService;
use crate::{
    application::{
        error::{ApplicationError, ApplicationResult},
        ports::session::{Session, SessionUser},
        services::audit_logger::AuditActor,
    },
    domain::user::{PanelUser, Username},
};
use serde_json::json;

pub struct LoginUserCommand {
    pub username: String,
    pub password: String,
    pub ip: String,
}

impl UserCommandService {
    pub async fn login(&self, command: LoginUserCommand) -> ApplicationResult<Session> {
        let attempted = command.username.clone();
        match self
            .find_and_authenticate_user(&command.username, &command.password)
            .await
        {
            Ok(user) => {
                let session = self
                    .session_store
                    .create(SessionUser {
                        user_id: user.user_id.clone(),
                        username: user.username.clone(),
                        admin: user.admin,
                    })
                    .await?;
                self.audit
                    .log(
                        &AuditActor::new(&user.user_id, &user.username, &command.ip),
                        "login:success",
                        json!({}),
                    )
                    .await;
                Ok(session)
            }
            Err(err) => {
                self.audit
                    .log(
                        &AuditActor::new("anonymous", &attempted, &command.ip),
                        "login:failed",
                        json!({ "username": attempted, "reason": err.to_string() }),
                    )
                    .await;
                Err(err)
            }
        }
    }

    pub async fn logout(&self, session_id: &str) -> ApplicationResult<()> {
        self.session_store.revoke(session_id).await
    }

    async fn find_and_authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> ApplicationResult<PanelUser> {
        let username = Username::new(username)
            .map_err(|_| ApplicationError::unauthorized("invalid credentials"))?;
        let user = self
            .user_repo
            .find_by_username(&username)
            .await?
            .ok_or_else(|| ApplicationError::unauthorized("invalid credentials"))?;

        let hash = user
            .password
            .as_deref()
            .ok_or_else(|| ApplicationError::unauthorized("invalid credentials"))?;
        self.password_hasher.verify(password, hash).await?;

        Ok(user)
    }
}
