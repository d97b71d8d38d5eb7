pub mod audit_file;
pub mod database;
pub mod repositories;
pub mod security;
pub mod store;
pub mod time;
