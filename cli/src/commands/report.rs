use anyhow::{Context, Result};
use lisdes::{regency_frame, write_csv, write_csv_string, Dashboard};

use crate::cli::ReportArgs;

pub async fn run(dashboard: &Dashboard, args: &ReportArgs) -> Result<()> {
    let stats = dashboard.statistics().await.context("[report] Failed to compute statistics")?;
    let mut df = regency_frame(&stats)?;
    match &args.out {
        Some(path) => {
            write_csv(&mut df, path)?;
            eprintln!("[report] wrote {} regencies to {}", df.height(), path.display());
        }
        None => print!("{}", write_csv_string(&mut df)?),
    }
    Ok(())
}
