use super::UserCommandService;
use crate::application::{
    dto::UserDto,
    error::{ApplicationError, ApplicationResult},
    queries::panel::collect_user_instances,
    services::audit_logger::AuditActor,
};
use crate::domain::plan::{PlanCatalog, PlanTier, PlanUsage};
use crate::domain::store::keys;
use serde_json::json;

pub struct ChangePlanCommand {
    pub user_id: String,
    pub plan: PlanTier,
}

impl UserCommandService {
    /// Move a user to another tier. Downgrades that the user's current usage
    /// would not fit into are refused.
    pub async fn change_plan(
        &self,
        actor: &AuditActor,
        command: ChangePlanCommand,
    ) -> ApplicationResult<UserDto> {
        let mut user = self
            .user_repo
            .find_by_id(&command.user_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("user {}", command.user_id)))?;

        let catalog = PlanCatalog::with_overrides(self.store.get_or_default(keys::PLANS).await?);
        let instances = collect_user_instances(&self.store, &user).await?;
        let usage = PlanUsage::of(&instances);
        let limits = catalog.limits(command.plan);
        let previous = user.plan_tier();

        if !usage.fits_within(&limits) {
            self.audit
                .log(
                    actor,
                    "plan:change_blocked",
                    json!({
                        "targetUserId": user.user_id,
                        "from": previous,
                        "to": command.plan,
                        "usage": usage,
                        "limits": limits,
                    }),
                )
                .await;
            return Err(ApplicationError::conflict(format!(
                "current usage exceeds the limits of the {} plan",
                command.plan
            )));
        }

        user.set_plan(command.plan);
        let user = self.user_repo.update(user).await?;

        self.audit
            .log(
                actor,
                "plan:changed",
                json!({
                    "targetUserId": user.user_id,
                    "from": previous,
                    "to": command.plan,
                }),
            )
            .await;

        Ok(user.into())
    }
}
