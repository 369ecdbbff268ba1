//! Storage boundary. Every read returns the canonical model; raw document
//! shapes never leave the store implementations.

mod memory;
mod mongo;

pub use memory::{MemoryStore, Snapshot};
pub use mongo::MongoStore;

use async_trait::async_trait;

use crate::{
    clean::display,
    error::Result,
    model::{DistributionOffice, DistributionVillageMapping, DistrictStat, Granularity, RegencyMeta, Village},
};

/// Which part of the village collection a request needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VillageScope {
    All,
    Regency(String),
    District(String, String),
}

impl VillageScope {
    /// True when `village` belongs to this scope under normalized comparison.
    /// Stores may over-fetch; the engine narrows with this afterwards.
    pub fn contains(&self, village: &Village) -> bool {
        use crate::clean::same_name;
        match self {
            VillageScope::All => true,
            VillageScope::Regency(r) => same_name(r, &village.regency),
            VillageScope::District(r, d) => same_name(r, &village.regency) && same_name(d, &village.district),
        }
    }
}

/// Hamlet names match ignoring case and whitespace runs.
pub(crate) fn same_hamlet(a: &str, b: &str) -> bool { display(a).to_lowercase() == display(b).to_lowercase() }

/// Collection names, one per source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
    pub villages: String,
    pub regency_meta: String,
    pub district_stats: String,
    pub up3_offices: String,
    pub ulp_offices: String,
    pub up3_villages: String,
    pub ulp_villages: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            villages: "villages".into(),
            regency_meta: "regency_meta".into(),
            district_stats: "district_stats".into(),
            up3_offices: "up3_offices".into(),
            ulp_offices: "ulp_offices".into(),
            up3_villages: "up3_villages".into(),
            ulp_villages: "ulp_villages".into(),
        }
    }
}

impl CollectionNames {
    #[inline]
    pub fn offices(&self, granularity: Granularity) -> &str {
        match granularity {
            Granularity::Up3 => &self.up3_offices,
            Granularity::Ulp => &self.ulp_offices,
        }
    }

    #[inline]
    pub fn mappings(&self, granularity: Granularity) -> &str {
        match granularity {
            Granularity::Up3 => &self.up3_villages,
            Granularity::Ulp => &self.ulp_villages,
        }
    }
}

/// Read access to every source collection plus the hamlet-status override.
///
/// Reads never fail on bad records; only an unavailable store is an error.
#[async_trait]
pub trait AtlasStore: Send + Sync {
    async fn villages(&self, scope: &VillageScope) -> Result<Vec<Village>>;

    async fn regency_meta(&self) -> Result<Vec<RegencyMeta>>;

    async fn district_stats(&self) -> Result<Vec<DistrictStat>>;

    async fn offices(&self, granularity: Granularity) -> Result<Vec<DistributionOffice>>;

    async fn village_mappings(&self, granularity: Granularity) -> Result<Vec<DistributionVillageMapping>>;

    /// Atomically set the status of hamlet `hamlet` on village `village_id`.
    /// Returns the updated village, or `None` when the pair does not resolve.
    async fn set_hamlet_status(&self, village_id: &str, hamlet: &str, status: &str) -> Result<Option<Village>>;
}
