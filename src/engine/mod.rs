//! In-memory aggregation over one request's worth of fetched collections.

mod grouping;
mod join;
mod merge;
mod search;
mod tree;
mod views;

pub use grouping::{group_by_unit, Grouping, UnitGroup, UnitVillage, UNASSIGNED_UNIT};
pub use join::{AdminPath, JoinStats, Joined, Joiner, MatchKind};
pub use merge::{unit_key, Figures, Overlay, Provenance, DEFAULT_POPULATION_SOURCE, UNSPECIFIED_SOURCE};
pub use search::{search, SearchHit};
pub use tree::{DistrictNode, Hierarchy, RegencyNode, Tally, VillageNode};
pub use views::{
    AreaRow, ChildRow, DistrictDetail, HierarchyStats, RegencyDetail, RegencyRow, Summary, VillageDetail, View,
};
