pub mod api_key;
pub mod audit;
pub mod errors;
pub mod instance;
pub mod plan;
pub mod serde_time;
pub mod store;
pub mod user;
