use anyhow::{Context, Result};
use lisdes::{Dashboard, Granularity};

use crate::cli::UnitArgs;
use super::print_json;

pub async fn grouping(dashboard: &Dashboard, args: &UnitArgs) -> Result<()> {
    let granularity = Granularity::from(args.unit);
    let grouping = dashboard.distribution_grouping(granularity).await
        .with_context(|| format!("[units] Failed to group {} mappings", granularity.to_str()))?;
    print_json(&grouping)
}

pub async fn offices(dashboard: &Dashboard, args: &UnitArgs) -> Result<()> {
    let granularity = Granularity::from(args.unit);
    let offices = dashboard.offices(granularity).await
        .with_context(|| format!("[units] Failed to load {} offices", granularity.to_str()))?;
    print_json(&offices)
}
