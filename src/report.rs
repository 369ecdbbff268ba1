//! Tabular export of the regency statistics.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{CsvWriter, NamedFrom}, series::Series};

use crate::engine::{HierarchyStats, Provenance};

/// One row per regency, in the order of `stats.details`.
pub fn regency_frame(stats: &HierarchyStats) -> Result<DataFrame> {
    let rows = &stats.details;
    let provenance = |p: Provenance| match p {
        Provenance::Curated => "curated",
        Provenance::Computed => "computed",
    };

    DataFrame::new(vec![
        Series::new("regency".into(), rows.iter().map(|r| r.regency_name.as_str()).collect::<Vec<_>>()).into(),
        Series::new("service_area".into(), rows.iter().map(|r| r.service_area.as_str()).collect::<Vec<_>>()).into(),
        Series::new("districts".into(), rows.iter().map(|r| r.district_count as u64).collect::<Vec<_>>()).into(),
        Series::new("villages".into(), rows.iter().map(|r| r.village_count as u64).collect::<Vec<_>>()).into(),
        Series::new("hamlets".into(), rows.iter().map(|r| r.hamlet_count as u64).collect::<Vec<_>>()).into(),
        Series::new("electrified_hamlets".into(), rows.iter().map(|r| r.electrified_hamlets as u64).collect::<Vec<_>>()).into(),
        Series::new("unelectrified_hamlets".into(), rows.iter().map(|r| r.unelectrified_hamlets as u64).collect::<Vec<_>>()).into(),
        Series::new("population".into(), rows.iter().map(|r| r.figures.population).collect::<Vec<_>>()).into(),
        Series::new("population_source".into(), rows.iter().map(|r| r.figures.population_source.as_str()).collect::<Vec<_>>()).into(),
        Series::new("population_year".into(), rows.iter().map(|r| r.figures.population_year).collect::<Vec<_>>()).into(),
        Series::new("population_provenance".into(), rows.iter().map(|r| provenance(r.figures.population_provenance)).collect::<Vec<_>>()).into(),
        Series::new("customers".into(), rows.iter().map(|r| r.figures.customer_count).collect::<Vec<_>>()).into(),
    ])
    .context("[report] Failed to build regency frame")
}

/// Write a DataFrame to a CSV file.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[report] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(df)
        .with_context(|| format!("[report] Failed to write CSV to {:?}", path))
}

/// Write a DataFrame to a CSV string.
pub fn write_csv_string(df: &mut DataFrame) -> Result<String> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .finish(df)
        .context("[report] Failed to write CSV to string")?;
    String::from_utf8(buffer).context("[report] CSV output is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        area::AreaTable,
        engine::{Hierarchy, Overlay, View},
        model::{Hamlet, Population, RegencyMeta, Village},
    };

    fn stats() -> HierarchyStats {
        let village = |regency: &str, district: &str, name: &str, status: &str| Village {
            id: None,
            regency: regency.into(),
            district: district.into(),
            village: name.into(),
            coordinates: None,
            hamlets: vec![Hamlet { name: "Dusun I".into(), status: status.into() }],
            population: Population { count: Some(500.0), source: None, year: None },
            customer_count: Some(120),
        };
        let villages = vec![
            village("Bireuen", "Jeumpa", "Blang Bladeh", "Berlistrik PLN"),
            village("Bireuen", "Peusangan", "Matang", "Belum Berlistrik"),
            village("Sabang", "Sukajaya", "Iboih", "Berlistrik PLN"),
        ];
        let meta = vec![RegencyMeta {
            regency: "Kota Sabang".into(),
            coordinates: None,
            population: Population { count: Some(43_000.0), source: Some("BPS".into()), year: Some(2023) },
        }];
        let hierarchy = Hierarchy::build(&villages);
        let overlay = Overlay::new(&meta, &[]);
        View { hierarchy: &hierarchy, overlay: &overlay, areas: &AreaTable::builtin() }.statistics()
    }

    #[test]
    fn frame_has_one_row_per_regency() {
        let df = regency_frame(&stats()).unwrap();
        assert_eq!(df.shape(), (2, 12));
        assert_eq!(df.get_column_names()[0].as_str(), "regency");
    }

    #[test]
    fn csv_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regencies.csv");
        let mut df = regency_frame(&stats()).unwrap();
        write_csv(&mut df, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("regency,service_area,districts,villages,hamlets"));
        assert!(lines[1].starts_with("Bireuen,UP3 Lhokseumawe,2,2,2,1,1,"));
        assert!(lines[2].starts_with("Sabang,UP3 Banda Aceh,1,1,1,1,0,"));
        assert!(lines[2].ends_with(",BPS,2023,curated,120"));
        assert_eq!(write_csv_string(&mut df).unwrap(), text);
    }
}
