// src/domain/plan/mod.rs
pub mod usage;
pub mod value_objects;

pub use usage::{PlanData, PlanUsage};
pub use value_objects::{PlanCatalog, PlanLimits, PlanTier};
