pub mod docs;
mod loose;
mod meta;
mod village;

pub use loose::Loose;
pub use meta::{DistributionOffice, DistributionVillageMapping, DistrictStat, Granularity, RegencyMeta};
pub use village::{Coordinates, Hamlet, Population, StatusBucket, Village};
