use anyhow::{bail, Context, Result};
use lisdes::Dashboard;

use crate::cli::SetStatusArgs;
use super::print_json;

pub async fn run(dashboard: &Dashboard, args: &SetStatusArgs) -> Result<()> {
    let updated = dashboard.override_hamlet_status(&args.village_id, &args.hamlet, &args.status).await
        .with_context(|| format!("[status] Failed to update hamlet {} on village {}", args.hamlet, args.village_id))?;
    match updated {
        Some(village) => print_json(&village),
        None => bail!("[status] No hamlet {:?} on village {:?}; nothing changed", args.hamlet, args.village_id),
    }
}
