pub mod api_keys;
pub mod panel;
pub mod users;

pub use api_keys::{ApiKeyPrincipal, ApiKeySummary, CreatedApiKey, MigrationReport};
pub use panel::{DashboardData, InstancesPageData, PanelBranding};
pub use users::UserDto;
