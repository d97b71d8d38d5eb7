// src/domain/plan/usage.rs
use super::value_objects::{PlanCatalog, PlanLimits, PlanTier};
use crate::domain::instance::Instance;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanUsage {
    pub projects: u64,
    pub ram: u64,
    pub storage: u64,
}

impl PlanUsage {
    pub fn of(instances: &[Instance]) -> Self {
        instances.iter().fold(Self::default(), |acc, instance| Self {
            projects: acc.projects + 1,
            ram: acc.ram.saturating_add(instance.ram_usage),
            storage: acc.storage.saturating_add(instance.storage_usage),
        })
    }

    pub fn fits_within(&self, limits: &PlanLimits) -> bool {
        self.projects <= limits.projects && self.ram <= limits.ram && self.storage <= limits.storage
    }

    pub fn remaining(&self, limits: &PlanLimits) -> PlanLimits {
        PlanLimits::new(
            limits.projects.saturating_sub(self.projects),
            limits.ram.saturating_sub(self.ram),
            limits.storage.saturating_sub(self.storage),
        )
    }
}

/// Plan summary handed to the dashboard templates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanData {
    pub current: PlanTier,
    pub limits: PlanLimits,
    pub usage: PlanUsage,
    pub available: PlanLimits,
    pub all_plans: BTreeMap<PlanTier, PlanLimits>,
}

impl PlanData {
    pub fn compute(tier: PlanTier, catalog: &PlanCatalog, instances: &[Instance]) -> Self {
        let limits = catalog.limits(tier);
        let usage = PlanUsage::of(instances);
        Self {
            current: tier,
            limits,
            usage,
            available: usage.remaining(&limits),
            all_plans: catalog.tiers().clone(),
        }
    }
}
