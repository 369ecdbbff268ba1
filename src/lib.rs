#![doc = "Listrik Desa: hierarchy rollups and cross-reference joins for the rural electrification dashboard"]
mod area;
mod clean;
mod engine;
mod error;
mod model;
mod report;
mod service;
mod store;
mod types;

#[doc(inline)]
pub use area::{AreaEntry, AreaTable, SERVICE_AREAS, UNKNOWN_AREA};

#[doc(inline)]
pub use clean::{filter_hamlets, is_garbage, is_sentinel, normalize, same_name, SENTINELS};

#[doc(inline)]
pub use engine::{
    group_by_unit, search, unit_key, AdminPath, AreaRow, ChildRow, DistrictDetail, DistrictNode, Figures, Grouping, Hierarchy,
    HierarchyStats, JoinStats, Joiner, MatchKind, Overlay, Provenance, RegencyDetail, RegencyNode, RegencyRow,
    SearchHit, Summary, Tally, UnitGroup, UnitVillage, VillageDetail, VillageNode, View, DEFAULT_POPULATION_SOURCE,
    UNASSIGNED_UNIT, UNSPECIFIED_SOURCE,
};

#[doc(inline)]
pub use error::{AtlasError, Result};

#[doc(inline)]
pub use model::{
    docs, Coordinates, DistributionOffice, DistributionVillageMapping, DistrictStat, Granularity, Hamlet, Loose,
    Population, RegencyMeta, StatusBucket, Village,
};

#[doc(inline)]
pub use report::{regency_frame, write_csv, write_csv_string};

#[doc(inline)]
pub use service::Dashboard;

#[doc(inline)]
pub use store::{AtlasStore, CollectionNames, MemoryStore, MongoStore, Snapshot, VillageScope};

#[doc(inline)]
pub use types::{AdminKey, AdminLevel};
