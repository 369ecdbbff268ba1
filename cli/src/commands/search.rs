use anyhow::{Context, Result};
use lisdes::Dashboard;

use crate::cli::SearchArgs;
use super::print_json;

pub async fn run(dashboard: &Dashboard, args: &SearchArgs) -> Result<()> {
    let hits = dashboard.search(&args.query).await
        .with_context(|| format!("[search] Failed to search for {:?}", args.query))?;
    print_json(&hits)
}
