use std::path::PathBuf;

use lisdes::{CollectionNames, Granularity};

/// Rural electrification dashboard engine (prints JSON to stdout)
#[derive(clap::Parser, Debug)]
#[command(name = "lisdes", version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection, table and logging settings. Every flag can come from the
/// environment or a `.env` file.
#[derive(clap::Args, Debug)]
pub struct Config {
    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017", global = true)]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "lisdes", global = true)]
    pub mongodb_db: String,

    /// Serve a JSON snapshot from memory instead of MongoDB
    #[arg(long, env = "LISDES_FIXTURE", value_hint = clap::ValueHint::FilePath, global = true)]
    pub fixture: Option<PathBuf>,

    /// JSON file replacing the built-in service area table
    #[arg(long, env = "AREA_TABLE", value_hint = clap::ValueHint::FilePath, global = true)]
    pub area_table: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON", default_value_t = false, global = true)]
    pub log_json: bool,

    #[arg(long, env = "VILLAGES_COLLECTION", global = true, default_value = "villages", hide = true)]
    pub villages_collection: String,

    #[arg(long, env = "REGENCY_META_COLLECTION", global = true, default_value = "regency_meta", hide = true)]
    pub regency_meta_collection: String,

    #[arg(long, env = "DISTRICT_STATS_COLLECTION", global = true, default_value = "district_stats", hide = true)]
    pub district_stats_collection: String,

    #[arg(long, env = "UP3_OFFICES_COLLECTION", global = true, default_value = "up3_offices", hide = true)]
    pub up3_offices_collection: String,

    #[arg(long, env = "ULP_OFFICES_COLLECTION", global = true, default_value = "ulp_offices", hide = true)]
    pub ulp_offices_collection: String,

    #[arg(long, env = "UP3_VILLAGES_COLLECTION", global = true, default_value = "up3_villages", hide = true)]
    pub up3_villages_collection: String,

    #[arg(long, env = "ULP_VILLAGES_COLLECTION", global = true, default_value = "ulp_villages", hide = true)]
    pub ulp_villages_collection: String,
}

impl Config {
    pub fn collections(&self) -> CollectionNames {
        CollectionNames {
            villages: self.villages_collection.clone(),
            regency_meta: self.regency_meta_collection.clone(),
            district_stats: self.district_stats_collection.clone(),
            up3_offices: self.up3_offices_collection.clone(),
            ulp_offices: self.ulp_offices_collection.clone(),
            up3_villages: self.up3_villages_collection.clone(),
            ulp_villages: self.ulp_villages_collection.clone(),
        }
    }
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Province summary and one row per regency
    Stats,

    /// Regency tallies rolled up per service area
    Areas,

    /// Detail for one regency
    Regency(RegencyArgs),

    /// Detail for one district
    District(DistrictArgs),

    /// Detail for one village, with its hamlet list
    Village(VillageArgs),

    /// Mapping records grouped by distribution unit
    Units(UnitArgs),

    /// Distribution unit offices
    Offices(UnitArgs),

    /// Substring search over every level
    Search(SearchArgs),

    /// Correct one hamlet's electrification status
    SetStatus(SetStatusArgs),

    /// Regency statistics as CSV
    Report(ReportArgs),
}

#[derive(clap::Args, Debug)]
pub struct RegencyArgs {
    pub regency: String,
}

#[derive(clap::Args, Debug)]
pub struct DistrictArgs {
    pub regency: String,
    pub district: String,
}

#[derive(clap::Args, Debug)]
pub struct VillageArgs {
    pub regency: String,
    pub district: String,
    pub village: String,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Unit {
    Up3,
    Ulp,
}

impl From<Unit> for Granularity {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::Up3 => Granularity::Up3,
            Unit::Ulp => Granularity::Ulp,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct UnitArgs {
    /// Grouping granularity
    #[arg(value_enum)]
    pub unit: Unit,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    pub query: String,
}

#[derive(clap::Args, Debug)]
pub struct SetStatusArgs {
    /// Village document id
    pub village_id: String,

    /// Hamlet name as stored on the village
    pub hamlet: String,

    /// New status text, e.g. "Berlistrik PLN"
    pub status: String,
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Output CSV file; prints to stdout when omitted
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub out: Option<PathBuf>,
}
