// src/application/commands/users/mod.rs
mod bootstrap;
mod change_plan;
mod login;
mod service;

pub use bootstrap::BootstrapAdminCommand;
pub use change_plan::ChangePlanCommand;
pub use login::LoginUserCommand;
pub use service::UserCommandService;
