pub mod detail;
pub mod report;
pub mod search;
pub mod stats;
pub mod status;
pub mod units;

use anyhow::{Context, Result};
use serde::Serialize;

/// Pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("[commands] Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
