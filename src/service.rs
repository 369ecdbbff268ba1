//! Request-level operations. Each call fetches what it needs concurrently,
//! then builds its index and overlay in memory. Nothing is cached between
//! calls, so an override is visible to the next request.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    area::AreaTable,
    engine::{
        group_by_unit, search, AreaRow, DistrictDetail, Grouping, Hierarchy, HierarchyStats, Overlay, RegencyDetail,
        SearchHit, VillageDetail, View,
    },
    error::Result,
    model::{DistributionOffice, DistrictStat, Granularity, RegencyMeta, Village},
    store::{AtlasStore, VillageScope},
};

/// Everything one hierarchy request reads.
struct Fetched {
    villages: Vec<Village>,
    regency_meta: Vec<RegencyMeta>,
    district_stats: Vec<DistrictStat>,
}

/// The dashboard engine over a store and the service-area table.
#[derive(Clone)]
pub struct Dashboard {
    store: Arc<dyn AtlasStore>,
    areas: Arc<AreaTable>,
}

impl Dashboard {
    pub fn new(store: Arc<dyn AtlasStore>, areas: Arc<AreaTable>) -> Self { Self { store, areas } }

    /// Uses the process-wide area table.
    pub fn with_global_areas(store: Arc<dyn AtlasStore>) -> Self { Self::new(store, AreaTable::global()) }

    #[inline] pub fn areas(&self) -> &AreaTable { &self.areas }

    async fn fetch(&self, scope: VillageScope) -> Result<Fetched> {
        let (villages, regency_meta, district_stats) = tokio::try_join!(
            self.store.villages(&scope),
            self.store.regency_meta(),
            self.store.district_stats(),
        )?;
        // Stores may match loosely; keep only what normalizes into scope.
        let fetched = villages.len();
        let villages: Vec<Village> = villages.into_iter().filter(|v| scope.contains(v)).collect();
        debug!(
            "[service] {:?}: {} villages ({} fetched), {} regency records, {} district records",
            scope, villages.len(), fetched, regency_meta.len(), district_stats.len()
        );
        Ok(Fetched { villages, regency_meta, district_stats })
    }

    /// Province-wide `{ summary, details }` statistics.
    pub async fn statistics(&self) -> Result<HierarchyStats> {
        let data = self.fetch(VillageScope::All).await?;
        let hierarchy = Hierarchy::build(&data.villages);
        let overlay = Overlay::new(&data.regency_meta, &data.district_stats);
        Ok(View { hierarchy: &hierarchy, overlay: &overlay, areas: &self.areas }.statistics())
    }

    /// Regency tallies rolled up to service areas.
    pub async fn area_statistics(&self) -> Result<Vec<AreaRow>> {
        let data = self.fetch(VillageScope::All).await?;
        let hierarchy = Hierarchy::build(&data.villages);
        let overlay = Overlay::new(&data.regency_meta, &data.district_stats);
        Ok(View { hierarchy: &hierarchy, overlay: &overlay, areas: &self.areas }.area_statistics())
    }

    pub async fn regency_detail(&self, regency: &str) -> Result<RegencyDetail> {
        let data = self.fetch(VillageScope::Regency(regency.to_string())).await?;
        let hierarchy = Hierarchy::build(&data.villages);
        let overlay = Overlay::new(&data.regency_meta, &data.district_stats);
        Ok(View { hierarchy: &hierarchy, overlay: &overlay, areas: &self.areas }.regency_detail(regency))
    }

    pub async fn district_detail(&self, regency: &str, district: &str) -> Result<DistrictDetail> {
        let data = self.fetch(VillageScope::District(regency.to_string(), district.to_string())).await?;
        let hierarchy = Hierarchy::build(&data.villages);
        let overlay = Overlay::new(&data.regency_meta, &data.district_stats);
        Ok(View { hierarchy: &hierarchy, overlay: &overlay, areas: &self.areas }.district_detail(regency, district))
    }

    pub async fn village_detail(&self, regency: &str, district: &str, village: &str) -> Result<VillageDetail> {
        let data = self.fetch(VillageScope::District(regency.to_string(), district.to_string())).await?;
        let hierarchy = Hierarchy::build(&data.villages);
        let overlay = Overlay::new(&data.regency_meta, &data.district_stats);
        Ok(View { hierarchy: &hierarchy, overlay: &overlay, areas: &self.areas }.village_detail(regency, district, village))
    }

    /// Mapping records of one granularity bucketed by unit and joined
    /// against the same merged village index the rollups use.
    pub async fn distribution_grouping(&self, granularity: Granularity) -> Result<Grouping> {
        let (mappings, villages, offices) = tokio::try_join!(
            self.store.village_mappings(granularity),
            self.store.villages(&VillageScope::All),
            self.store.offices(granularity),
        )?;
        let hierarchy = Hierarchy::build(&villages);
        let overlay = Overlay::default().with_offices(&offices);
        let grouping = group_by_unit(&mappings, &hierarchy, &overlay);

        let stats = &grouping.join;
        debug!(
            "[service] {} grouping: {} units, {} records, join {:?}",
            granularity.to_str(), grouping.groups.len(), grouping.total(), stats
        );
        if stats.unmatched > 0 {
            warn!("[service] {} of {} {} mapping records matched no village", stats.unmatched, mappings.len(), granularity.to_str());
        }
        if stats.ambiguous > 0 {
            warn!("[service] {} {} mapping records matched villages in several regencies", stats.ambiguous, granularity.to_str());
        }
        Ok(grouping)
    }

    pub async fn offices(&self, granularity: Granularity) -> Result<Vec<DistributionOffice>> {
        self.store.offices(granularity).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() { return Ok(Vec::new()) }
        let villages = self.store.villages(&VillageScope::All).await?;
        let hits = search(&Hierarchy::build(&villages), &self.areas, query);
        debug!("[service] search {:?}: {} hits", query, hits.len());
        Ok(hits)
    }

    /// Operator correction of one hamlet's status. `None` when the
    /// (village id, hamlet name) pair does not resolve; storage is untouched
    /// in that case.
    pub async fn override_hamlet_status(&self, village_id: &str, hamlet: &str, status: &str) -> Result<Option<Village>> {
        let updated = self.store.set_hamlet_status(village_id, hamlet, status).await?;
        match &updated {
            Some(village) => info!("[service] status override applied to {}", village.key()),
            None => info!("[service] status override for '{}' / '{}' matched nothing", village_id, hamlet),
        }
        Ok(updated)
    }
}
