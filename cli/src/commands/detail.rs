use anyhow::{Context, Result};
use lisdes::Dashboard;

use crate::cli::{DistrictArgs, RegencyArgs, VillageArgs};
use super::print_json;

pub async fn regency(dashboard: &Dashboard, args: &RegencyArgs) -> Result<()> {
    let detail = dashboard.regency_detail(&args.regency).await
        .with_context(|| format!("[detail] Failed to load regency {}", args.regency))?;
    print_json(&detail)
}

pub async fn district(dashboard: &Dashboard, args: &DistrictArgs) -> Result<()> {
    let detail = dashboard.district_detail(&args.regency, &args.district).await
        .with_context(|| format!("[detail] Failed to load district {} / {}", args.regency, args.district))?;
    print_json(&detail)
}

pub async fn village(dashboard: &Dashboard, args: &VillageArgs) -> Result<()> {
    let detail = dashboard.village_detail(&args.regency, &args.district, &args.village).await
        .with_context(|| format!("[detail] Failed to load village {} / {} / {}", args.regency, args.district, args.village))?;
    print_json(&detail)
}
