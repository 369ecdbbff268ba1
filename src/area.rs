//! Service area <-> regency lookup.
//!
//! Only the forward table (area -> regencies) is ever written down; the
//! inverse is derived from it when the table is built, and the built table is
//! shared read-only for the life of the process.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, OnceLock},
};

use serde::{Deserialize, Serialize};

use crate::{clean::normalize, error::{AtlasError, Result}};

/// Label reported for regencies that no service area claims.
pub const UNKNOWN_AREA: &str = "Unknown";

/// Built-in service areas of the province and their member regencies.
pub const SERVICE_AREAS: &[(&str, &[&str])] = &[
    ("UP3 Banda Aceh", &["Banda Aceh", "Aceh Besar", "Sabang"]),
    ("UP3 Sigli", &["Pidie", "Pidie Jaya"]),
    ("UP3 Lhokseumawe", &["Lhokseumawe", "Aceh Utara", "Bireuen", "Bener Meriah", "Aceh Tengah"]),
    ("UP3 Langsa", &["Langsa", "Aceh Timur", "Aceh Tamiang"]),
    ("UP3 Meulaboh", &["Aceh Barat", "Nagan Raya", "Aceh Jaya", "Simeulue"]),
    (
        "UP3 Subulussalam",
        &["Subulussalam", "Aceh Singkil", "Aceh Selatan", "Aceh Barat Daya", "Aceh Tenggara", "Gayo Lues"],
    ),
];

/// One row of the declarative table, as written in a JSON override file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaEntry {
    pub area: String,
    pub regencies: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AreaTable {
    entries: Vec<AreaEntry>,
    by_area: HashMap<String, usize>,    // normalized area name -> entry
    by_regency: HashMap<String, usize>, // normalized regency name -> entry
}

impl AreaTable {
    /// Build the table and derive both lookups from the forward entries.
    /// Fails when a regency is claimed by more than one area or an area is
    /// listed twice.
    pub fn from_entries(entries: Vec<AreaEntry>) -> Result<Self> {
        let mut by_area = HashMap::with_capacity(entries.len());
        let mut by_regency = HashMap::new();

        for (i, entry) in entries.iter().enumerate() {
            let area = normalize(&entry.area);
            if area.is_empty() {
                return Err(AtlasError::Config(format!("area #{i} has an empty name")));
            }
            if by_area.insert(area, i).is_some() {
                return Err(AtlasError::Config(format!("area '{}' is listed twice", entry.area)));
            }
            for regency in &entry.regencies {
                if let Some(prev) = by_regency.insert(normalize(regency), i) {
                    return Err(AtlasError::Config(format!(
                        "regency '{}' appears in both '{}' and '{}'",
                        regency, entries[prev].area, entry.area
                    )));
                }
            }
        }

        Ok(Self { entries, by_area, by_regency })
    }

    /// The compiled-in table.
    pub fn builtin() -> Self {
        let entries = SERVICE_AREAS.iter()
            .map(|(area, regencies)| AreaEntry {
                area: area.to_string(),
                regencies: regencies.iter().map(|r| r.to_string()).collect(),
            })
            .collect();
        Self::from_entries(entries).expect("built-in service area table is consistent")
    }

    /// Load a table from a JSON array of `{ "area": ..., "regencies": [...] }`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_entries(serde_json::from_str(json)?)
    }

    /// Member regencies of `area` as written in the table; empty for unknown areas.
    pub fn regencies_of(&self, area: &str) -> &[String] {
        self.by_area.get(&normalize(area))
            .map_or(&[][..], |&i| self.entries[i].regencies.as_slice())
    }

    /// Service area owning `regency`, compared after normalization.
    pub fn area_of(&self, regency: &str) -> Option<&str> {
        self.by_regency.get(&normalize(regency)).map(|&i| self.entries[i].area.as_str())
    }

    /// Like [`Self::area_of`], reporting [`UNKNOWN_AREA`] on a miss.
    #[inline]
    pub fn area_label(&self, regency: &str) -> &str { self.area_of(regency).unwrap_or(UNKNOWN_AREA) }

    /// Area names in table order.
    pub fn areas(&self) -> impl Iterator<Item = &str> + '_ { self.entries.iter().map(|e| e.area.as_str()) }

    #[inline] pub fn entries(&self) -> &[AreaEntry] { &self.entries }

    /// Process-wide table. Falls back to [`Self::builtin`] unless
    /// [`Self::install`] ran first.
    pub fn global() -> Arc<AreaTable> {
        global_cell().get_or_init(|| Arc::new(Self::builtin())).clone()
    }

    /// Install `table` as the process-wide table. Only the first call wins.
    pub fn install(table: AreaTable) -> Result<Arc<AreaTable>> {
        let table = Arc::new(table);
        global_cell().set(table.clone())
            .map_err(|_| AtlasError::Config("service area table already initialized".into()))?;
        Ok(table)
    }
}

fn global_cell() -> &'static OnceLock<Arc<AreaTable>> {
    static TABLE: OnceLock<Arc<AreaTable>> = OnceLock::new();
    &TABLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_is_exact() {
        let table = AreaTable::builtin();
        let mut seen = 0;
        for area in table.areas() {
            for regency in table.regencies_of(area) {
                assert_eq!(table.area_of(regency), Some(area));
                seen += 1;
            }
        }
        assert_eq!(seen, table.by_regency.len());
    }

    #[test]
    fn every_regency_in_exactly_one_area() {
        let table = AreaTable::builtin();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for entry in table.entries() {
            for regency in &entry.regencies {
                *counts.entry(normalize(regency)).or_default() += 1;
            }
        }
        assert_eq!(counts.len(), 23);
        assert!(counts.values().all(|&c| c == 1));
    }

    #[test]
    fn lookups_normalize_names() {
        let table = AreaTable::builtin();
        assert_eq!(table.area_of("KABUPATEN ACEH TIMUR"), Some("UP3 Langsa"));
        assert_eq!(table.area_of("kota banda aceh"), Some("UP3 Banda Aceh"));
        assert_eq!(table.regencies_of("up3 sigli"), ["Pidie", "Pidie Jaya"]);
    }

    #[test]
    fn misses_are_explicit() {
        let table = AreaTable::builtin();
        assert_eq!(table.area_of("Deli Serdang"), None);
        assert_eq!(table.area_label("Deli Serdang"), UNKNOWN_AREA);
        assert!(table.regencies_of("UP3 Medan").is_empty());
    }

    #[test]
    fn rejects_duplicate_regency() {
        let json = r#"[
            {"area": "North", "regencies": ["Pidie"]},
            {"area": "South", "regencies": ["KAB. PIDIE"]}
        ]"#;
        let err = AreaTable::from_json_str(json).unwrap_err();
        assert!(matches!(err, AtlasError::Config(_)));
    }

    #[test]
    fn loads_json_override() {
        let json = r#"[{"area": "North", "regencies": ["Pidie", "Bireuen"]}]"#;
        let table = AreaTable::from_json_str(json).unwrap();
        assert_eq!(table.area_of("Bireuen"), Some("North"));
        assert_eq!(table.area_of("Aceh Timur"), None);
    }
}
