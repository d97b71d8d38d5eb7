// src/application/dto/users.rs
use crate::domain::plan::PlanTier;
use crate::domain::user::PanelUser;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub user_id: String,
    pub username: String,
    pub admin: bool,
    pub plan: PlanTier,
    pub access_to: Vec<String>,
}

impl From<PanelUser> for UserDto {
    fn from(user: PanelUser) -> Self {
        let plan = user.plan_tier();
        Self {
            user_id: user.user_id,
            username: user.username,
            admin: user.admin,
            plan,
            access_to: user.access_to,
        }
    }
}
