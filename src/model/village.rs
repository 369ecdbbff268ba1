use serde::{Deserialize, Serialize};

use crate::{clean, types::AdminKey};

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// A pair is usable when both components are finite, in range and not the
    /// `(0, 0)` placeholder imports write for missing values.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite() && lng.is_finite()
            && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
            && !(lat == 0.0 && lng == 0.0);
        valid.then_some(Self { lat, lng })
    }

    /// Parse a `"lat, lng"` string (also accepts `;` or whitespace separators).
    pub fn parse_pair(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw
            .split([',', ';', ' ', '\t'])
            .filter(|p| !p.is_empty())
            .collect();
        match parts.as_slice() {
            [lat, lng] => Self::new(lat.parse().ok()?, lng.parse().ok()?),
            _ => None,
        }
    }

    /// Prefer the primary pair; fall back to the legacy pair.
    #[inline]
    pub fn reconcile(primary: Option<Self>, legacy: Option<Self>) -> Option<Self> { primary.or(legacy) }
}

/// Coarse electrification bucket of a hamlet status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusBucket {
    Electrified,
    NotElectrified,
    Unclassified,
}

impl StatusBucket {
    pub fn of(status: &str) -> Self {
        let status = status.to_uppercase();
        if status.contains("BELUM") || status.contains("TIDAK") {
            StatusBucket::NotElectrified
        } else if status.contains("BERLISTRIK") || status.contains("PLN") {
            StatusBucket::Electrified
        } else {
            StatusBucket::Unclassified
        }
    }
}

/// Sub-village unit as embedded in a village document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hamlet {
    pub name: String,
    pub status: String,
}

impl Hamlet {
    #[inline] pub fn bucket(&self) -> StatusBucket { StatusBucket::of(&self.status) }
}

/// Population figure with its provenance, as curated on a source record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Population {
    pub count: Option<f64>,
    pub source: Option<String>,
    pub year: Option<i32>,
}

/// Canonical village shape every collection is normalized into after fetch.
/// Hamlets are kept raw here; read paths filter them through
/// [`clean::filter_hamlets`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Village {
    pub id: Option<String>,
    pub regency: String,
    pub district: String,
    pub village: String,
    pub coordinates: Option<Coordinates>,
    pub hamlets: Vec<Hamlet>,
    pub population: Population,
    pub customer_count: Option<u64>,
}

impl Village {
    #[inline] pub fn key(&self) -> AdminKey { AdminKey::village(&self.regency, &self.district, &self.village) }

    /// Hamlets that may be counted or listed.
    #[inline] pub fn clean_hamlets(&self) -> Vec<Hamlet> { clean::filter_hamlets(&self.hamlets) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_reject_placeholders() {
        assert_eq!(Coordinates::new(0.0, 0.0), None);
        assert_eq!(Coordinates::new(95.0, 4.0), None);
        assert!(Coordinates::new(4.9, 97.7).is_some());
    }

    #[test]
    fn parses_legacy_pair() {
        assert_eq!(Coordinates::parse_pair("4.91, 97.75"), Coordinates::new(4.91, 97.75));
        assert_eq!(Coordinates::parse_pair("4.91;97.75"), Coordinates::new(4.91, 97.75));
        assert_eq!(Coordinates::parse_pair("#REF!"), None);
        assert_eq!(Coordinates::parse_pair("4.91"), None);
    }

    #[test]
    fn primary_pair_wins() {
        let primary = Coordinates::new(4.0, 97.0);
        let legacy = Coordinates::new(5.0, 96.0);
        assert_eq!(Coordinates::reconcile(primary, legacy), primary);
        assert_eq!(Coordinates::reconcile(None, legacy), legacy);
    }

    #[test]
    fn buckets_statuses() {
        assert_eq!(StatusBucket::of("Berlistrik PLN"), StatusBucket::Electrified);
        assert_eq!(StatusBucket::of("berlistrik non pln"), StatusBucket::Electrified);
        assert_eq!(StatusBucket::of("Belum Berlistrik"), StatusBucket::NotElectrified);
        assert_eq!(StatusBucket::of("Tidak Berlistrik"), StatusBucket::NotElectrified);
        assert_eq!(StatusBucket::of("dalam survei"), StatusBucket::Unclassified);
    }
}
