mod dashboard;
mod service;

pub use dashboard::collect_user_instances;
pub use service::PanelQueryService;
