use std::{
    path::Path,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{
    error::{AtlasError, Result},
    model::{
        docs::{DistrictStatDoc, MappingDoc, OfficeDoc, RegencyMetaDoc, VillageDoc},
        DistributionOffice, DistributionVillageMapping, DistrictStat, Granularity, RegencyMeta, Village,
    },
};
use super::{same_hamlet, AtlasStore, VillageScope};

/// Every collection, already in canonical form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub villages: Vec<Village>,
    pub regency_meta: Vec<RegencyMeta>,
    pub district_stats: Vec<DistrictStat>,
    pub up3_offices: Vec<DistributionOffice>,
    pub ulp_offices: Vec<DistributionOffice>,
    pub up3_villages: Vec<DistributionVillageMapping>,
    pub ulp_villages: Vec<DistributionVillageMapping>,
}

/// On-disk fixture: raw documents keyed by collection, as exported from storage.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSnapshot {
    villages: Vec<VillageDoc>,
    regency_meta: Vec<RegencyMetaDoc>,
    district_stats: Vec<DistrictStatDoc>,
    up3_offices: Vec<OfficeDoc>,
    ulp_offices: Vec<OfficeDoc>,
    up3_villages: Vec<MappingDoc>,
    ulp_villages: Vec<MappingDoc>,
}

fn convert<D, T: From<D>>(docs: Vec<D>) -> Vec<T> { docs.into_iter().map(T::from).collect() }

impl Snapshot {
    /// Parse a fixture of raw documents through the same boundary shapes the
    /// MongoDB store uses.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        Ok(Self {
            villages: convert(raw.villages),
            regency_meta: convert(raw.regency_meta),
            district_stats: convert(raw.district_stats),
            up3_offices: convert(raw.up3_offices),
            ulp_offices: convert(raw.ulp_offices),
            up3_villages: convert(raw.up3_villages),
            ulp_villages: convert(raw.ulp_villages),
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
            .map_err(|e| AtlasError::Config(format!("fixture {}: {}", path.display(), e)))
    }
}

/// In-memory store over a [`Snapshot`]. Serves fixtures and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Snapshot>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { data: RwLock::new(snapshot), offline: AtomicBool::new(false) }
    }

    /// Make every subsequent call fail as an unavailable store would.
    pub fn set_offline(&self, offline: bool) { self.offline.store(offline, Ordering::SeqCst) }

    /// Copy of the current contents.
    pub async fn snapshot(&self) -> Snapshot { self.data.read().await.clone() }

    fn check(&self) -> Result<()> {
        match self.offline.load(Ordering::SeqCst) {
            true => Err(AtlasError::Storage("memory store is offline".into())),
            false => Ok(()),
        }
    }
}

#[async_trait]
impl AtlasStore for MemoryStore {
    async fn villages(&self, scope: &VillageScope) -> Result<Vec<Village>> {
        self.check()?;
        let data = self.data.read().await;
        Ok(data.villages.iter().filter(|v| scope.contains(v)).cloned().collect())
    }

    async fn regency_meta(&self) -> Result<Vec<RegencyMeta>> {
        self.check()?;
        Ok(self.data.read().await.regency_meta.clone())
    }

    async fn district_stats(&self) -> Result<Vec<DistrictStat>> {
        self.check()?;
        Ok(self.data.read().await.district_stats.clone())
    }

    async fn offices(&self, granularity: Granularity) -> Result<Vec<DistributionOffice>> {
        self.check()?;
        let data = self.data.read().await;
        Ok(match granularity {
            Granularity::Up3 => data.up3_offices.clone(),
            Granularity::Ulp => data.ulp_offices.clone(),
        })
    }

    async fn village_mappings(&self, granularity: Granularity) -> Result<Vec<DistributionVillageMapping>> {
        self.check()?;
        let data = self.data.read().await;
        Ok(match granularity {
            Granularity::Up3 => data.up3_villages.clone(),
            Granularity::Ulp => data.ulp_villages.clone(),
        })
    }

    async fn set_hamlet_status(&self, village_id: &str, hamlet: &str, status: &str) -> Result<Option<Village>> {
        self.check()?;
        let mut data = self.data.write().await;
        let id = village_id.trim();
        let Some(village) = data.villages.iter_mut().find(|v| v.id.as_deref() == Some(id)) else {
            debug!("[store::memory] no village '{}'", id);
            return Ok(None)
        };
        let Some(target) = village.hamlets.iter_mut().find(|h| same_hamlet(&h.name, hamlet)) else {
            debug!("[store::memory] no hamlet '{}' on village '{}'", hamlet, id);
            return Ok(None)
        };
        target.status = status.to_string();
        info!("[store::memory] hamlet '{}' on village '{}' set to '{}'", hamlet, id, status);
        Ok(Some(village.clone()))
    }
}
