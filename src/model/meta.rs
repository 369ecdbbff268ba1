use serde::{Deserialize, Serialize};

use super::village::{Coordinates, Population};

/// Curated regency-level metadata. Overlay only, never a count source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegencyMeta {
    pub regency: String,
    pub coordinates: Option<Coordinates>,
    pub population: Population,
}

/// Curated district-level population statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictStat {
    pub regency: String,
    pub district: String,
    pub population: Population,
}

/// The two parallel distribution-unit groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Implementation units (UP3), the coarser grouping.
    Up3,
    /// Customer service units (ULP), the finer grouping.
    Ulp,
}

impl Granularity {
    pub fn to_str(&self) -> &'static str {
        match self {
            Granularity::Up3 => "up3",
            Granularity::Ulp => "ulp",
        }
    }
}

/// A distribution-unit office with its curated customer count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionOffice {
    pub unit: String,
    pub coordinates: Option<Coordinates>,
    pub customer_count: Option<u64>,
    pub customer_count_as_of: Option<String>,
}

/// One village's membership in a distribution unit. Names come from a
/// different source than the village collection and need fuzzy joining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionVillageMapping {
    /// Unit name as written in the source; `None` when empty or absent.
    pub unit: Option<String>,
    pub regency: String,
    pub district: String,
    pub village: String,
    pub coordinates: Option<Coordinates>,
    pub electrified: bool,
}
