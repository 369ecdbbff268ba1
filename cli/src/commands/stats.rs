use anyhow::{Context, Result};
use lisdes::Dashboard;

use super::print_json;

pub async fn statistics(dashboard: &Dashboard) -> Result<()> {
    let stats = dashboard.statistics().await.context("[stats] Failed to compute statistics")?;
    print_json(&stats)
}

pub async fn areas(dashboard: &Dashboard) -> Result<()> {
    let rows = dashboard.area_statistics().await.context("[stats] Failed to compute service area statistics")?;
    print_json(&rows)
}
