use super::PanelQueryService;
use crate::application::{
    dto::DashboardData,
    error::{ApplicationError, ApplicationResult},
};
use crate::domain::instance::{Image, Instance, Node};
use crate::domain::plan::{PlanCatalog, PlanData};
use crate::domain::store::{JsonStore, keys};
use crate::domain::user::PanelUser;
use tracing::debug;

/// Instances a user can see: the ones they own plus the ones listed in
/// `accessTo`. Sub-user entries whose record is gone are skipped.
pub async fn collect_user_instances(
    store: &JsonStore,
    user: &PanelUser,
) -> ApplicationResult<Vec<Instance>> {
    let mut instances: Vec<Instance> = store
        .get_or_default(&keys::user_instances(&user.user_id))
        .await?;

    for instance_id in &user.access_to {
        if instances.iter().any(|i| &i.id == instance_id) {
            continue;
        }
        match store.get::<Instance>(&keys::instance(instance_id)).await? {
            Some(instance) => instances.push(instance),
            None => debug!(instance_id = %instance_id, "shared instance no longer exists"),
        }
    }

    Ok(instances)
}

impl PanelQueryService {
    /// Context for authenticated configured pages.
    pub async fn dashboard(&self, user_id: &str) -> ApplicationResult<DashboardData> {
        let user = self.user_repo.find_by_id(user_id).await?.ok_or_else(|| {
            ApplicationError::infrastructure(format!("session user {user_id} is missing from users"))
        })?;

        let branding = self.branding().await?;
        let instances = collect_user_instances(&self.store, &user).await?;

        let admin_instances = if user.admin {
            let all: Vec<Instance> = self.store.get_or_default(keys::INSTANCES).await?;
            all.into_iter()
                .filter(|instance| instance.is_owned_by(&user.user_id))
                .collect()
        } else {
            Vec::new()
        };

        let catalog = PlanCatalog::with_overrides(self.store.get_or_default(keys::PLANS).await?);
        let plan_data = PlanData::compute(user.plan_tier(), &catalog, &instances);

        let node_ids: Vec<String> = self.store.get_or_default(keys::NODES).await?;
        let mut nodes = Vec::with_capacity(node_ids.len());
        for node_id in &node_ids {
            if let Some(node) = self.store.get::<Node>(&keys::node(node_id)).await? {
                nodes.push(node);
            }
        }

        let images: Vec<Image> = self.store.get_or_default(keys::IMAGES).await?;

        Ok(DashboardData {
            branding,
            instances,
            admin_instances,
            plan_data,
            nodes,
            images,
        })
    }
}
