// src/application/commands/api_keys/mod.rs
mod authenticate;
mod create;
mod disable;
mod migrate;
mod service;

pub use create::CreateApiKeyCommand;
pub use service::ApiKeyCommandService;
