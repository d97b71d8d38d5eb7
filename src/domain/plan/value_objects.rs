// src/domain/plan/value_objects.rs
use crate::domain::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};
use utoipa::ToSchema;

/// Plan tiers. Records written by the previous panel carry the Portuguese
/// names (`Gratuito`, `Iniciante`, `Intermediário`, `Super`), which are
/// accepted on input.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    #[serde(alias = "Gratuito", alias = "gratuito")]
    Free,
    #[serde(alias = "Iniciante", alias = "iniciante")]
    Starter,
    #[serde(alias = "Intermediário", alias = "intermediário", alias = "Intermediario")]
    Intermediate,
    #[serde(alias = "Super")]
    Super,
}

impl PlanTier {
    pub const ALL: [PlanTier; 4] = [
        PlanTier::Free,
        PlanTier::Starter,
        PlanTier::Intermediate,
        PlanTier::Super,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Starter => "starter",
            PlanTier::Intermediate => "intermediate",
            PlanTier::Super => "super",
        }
    }

    /// Stored plan names are free text; anything unrecognised is the free tier.
    pub fn resolve(name: Option<&str>) -> Self {
        name.and_then(|name| name.parse().ok())
            .unwrap_or(PlanTier::Free)
    }

    pub fn default_limits(&self) -> PlanLimits {
        match self {
            PlanTier::Free => PlanLimits::new(1, 512, 1),
            PlanTier::Starter => PlanLimits::new(5, 3072, 9),
            PlanTier::Intermediate => PlanLimits::new(15, 10240, 20),
            PlanTier::Super => PlanLimits::new(30, 20480, 30),
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" | "gratuito" => Ok(PlanTier::Free),
            "starter" | "iniciante" => Ok(PlanTier::Starter),
            "intermediate" | "intermediário" | "intermediario" => Ok(PlanTier::Intermediate),
            "super" => Ok(PlanTier::Super),
            other => Err(DomainError::Validation(format!("unknown plan '{other}'"))),
        }
    }
}

/// Resource ceilings of a tier. `ram` is in MB and `storage` in GB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlanLimits {
    pub projects: u64,
    pub ram: u64,
    pub storage: u64,
}

impl PlanLimits {
    pub const fn new(projects: u64, ram: u64, storage: u64) -> Self {
        Self {
            projects,
            ram,
            storage,
        }
    }
}

/// Limits per tier. Built-in values can be overridden through the `plans` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanCatalog(BTreeMap<PlanTier, PlanLimits>);

impl PlanCatalog {
    pub fn with_overrides(overrides: BTreeMap<PlanTier, PlanLimits>) -> Self {
        let mut catalog = Self::default();
        catalog.0.extend(overrides);
        catalog
    }

    pub fn limits(&self, tier: PlanTier) -> PlanLimits {
        self.0
            .get(&tier)
            .copied()
            .unwrap_or_else(|| tier.default_limits())
    }

    pub fn tiers(&self) -> &BTreeMap<PlanTier, PlanLimits> {
        &self.0
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self(
            PlanTier::ALL
                .iter()
                .map(|tier| (*tier, tier.default_limits()))
                .collect(),
        )
    }
}
