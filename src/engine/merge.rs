use ahash::AHashMap;
use serde::Serialize;

use crate::{
    clean::{display, normalize},
    model::{Coordinates, DistributionOffice, DistrictStat, Population, RegencyMeta},
};

/// Provenance label for figures computed from village records.
pub const DEFAULT_POPULATION_SOURCE: &str = "Computed from village records";

/// Label for curated figures whose record names no source institution.
pub const UNSPECIFIED_SOURCE: &str = "Unspecified source";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Provenance {
    Curated,
    Computed,
}

/// Population and customer figures after the curated overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Figures {
    pub population: f64,
    pub population_source: String,
    pub population_year: Option<i32>,
    pub population_provenance: Provenance,
    pub customer_count: u64,
    pub customer_provenance: Provenance,
}

impl Figures {
    /// Curated population wins whenever the curated record carries a usable
    /// figure; otherwise the computed sum is reported with the default label.
    pub fn merge(curated: Option<&Population>, computed_population: f64, curated_customers: Option<u64>, computed_customers: u64) -> Self {
        let (population, population_source, population_year, population_provenance) =
            match curated.and_then(|p| p.count.map(|count| (count, p))) {
                Some((count, p)) => (
                    count,
                    p.source.clone().unwrap_or_else(|| UNSPECIFIED_SOURCE.to_string()),
                    p.year,
                    Provenance::Curated,
                ),
                None => (computed_population, DEFAULT_POPULATION_SOURCE.to_string(), None, Provenance::Computed),
            };
        let (customer_count, customer_provenance) = match curated_customers {
            Some(count) => (count, Provenance::Curated),
            None => (computed_customers, Provenance::Computed),
        };
        Self { population, population_source, population_year, population_provenance, customer_count, customer_provenance }
    }

    /// Figures with nothing curated and nothing computed.
    pub fn empty() -> Self { Self::merge(None, 0.0, None, 0) }
}

/// Curated metadata indexed by normalized name, built once per request.
#[derive(Debug, Default)]
pub struct Overlay<'a> {
    regencies: AHashMap<String, &'a RegencyMeta>,
    districts: AHashMap<(String, String), &'a DistrictStat>,
    offices: AHashMap<String, &'a DistributionOffice>,
}

impl<'a> Overlay<'a> {
    /// Later duplicates never replace the first record for a name.
    pub fn new(regencies: &'a [RegencyMeta], districts: &'a [DistrictStat]) -> Self {
        let mut overlay = Self::default();
        for meta in regencies {
            overlay.regencies.entry(normalize(&meta.regency)).or_insert(meta);
        }
        for stat in districts {
            overlay.districts.entry((normalize(&stat.regency), normalize(&stat.district))).or_insert(stat);
        }
        overlay
    }

    pub fn with_offices(mut self, offices: &'a [DistributionOffice]) -> Self {
        for office in offices {
            self.offices.entry(unit_key(&office.unit)).or_insert(office);
        }
        self
    }

    #[inline]
    pub fn regency(&self, regency: &str) -> Option<&'a RegencyMeta> { self.regencies.get(&normalize(regency)).copied() }

    /// District statistics are matched on (regency, district), falling back to
    /// the district name alone when the regency spelling differs.
    pub fn district(&self, regency: &str, district: &str) -> Option<&'a DistrictStat> {
        let (regency, district) = (normalize(regency), normalize(district));
        self.districts.get(&(regency, district.clone())).copied().or_else(|| {
            let mut hits = self.districts.iter().filter(|((_, d), _)| *d == district);
            match (hits.next(), hits.next()) {
                (Some((_, &stat)), None) => Some(stat),
                _ => None,
            }
        })
    }

    #[inline]
    pub fn office(&self, unit: &str) -> Option<&'a DistributionOffice> { self.offices.get(&unit_key(unit)).copied() }

    pub fn regency_figures(&self, regency: &str, computed_population: f64, computed_customers: u64) -> Figures {
        Figures::merge(self.regency(regency).map(|m| &m.population), computed_population, None, computed_customers)
    }

    pub fn district_figures(&self, regency: &str, district: &str, computed_population: f64, computed_customers: u64) -> Figures {
        Figures::merge(self.district(regency, district).map(|s| &s.population), computed_population, None, computed_customers)
    }

    pub fn office_figures(&self, unit: &str, computed_population: f64, computed_customers: u64) -> Figures {
        Figures::merge(None, computed_population, self.office(unit).and_then(|o| o.customer_count), computed_customers)
    }

    pub fn regency_coordinates(&self, regency: &str) -> Option<Coordinates> {
        self.regency(regency).and_then(|m| m.coordinates)
    }
}

/// Grouping key for a distribution unit name: the unit-type prefix is dropped
/// before normalizing, so `"ULP Idi"` meets `"idi"` and `"ULP Kota Sigli"`
/// meets `"Kota Sigli"`.
pub fn unit_key(unit: &str) -> String {
    let name = display(unit).to_uppercase();
    let bare = ["UP3 ", "ULP "].iter().find_map(|prefix| name.strip_prefix(prefix)).unwrap_or(name.as_str());
    normalize(bare)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population(count: Option<f64>, source: Option<&str>, year: Option<i32>) -> Population {
        Population { count, source: source.map(str::to_string), year }
    }

    #[test]
    fn curated_beats_computed_even_when_smaller() {
        let curated = population(Some(1200.0), Some("BPS"), Some(2023));
        let figures = Figures::merge(Some(&curated), 5000.0, None, 12);
        assert_eq!(figures.population, 1200.0);
        assert_eq!(figures.population_source, "BPS");
        assert_eq!(figures.population_year, Some(2023));
        assert_eq!(figures.population_provenance, Provenance::Curated);
        assert_eq!((figures.customer_count, figures.customer_provenance), (12, Provenance::Computed));
    }

    #[test]
    fn missing_curated_falls_back_with_default_label() {
        let figures = Figures::merge(None, 0.0, None, 0);
        assert_eq!(figures.population, 0.0);
        assert_eq!(figures.population_source, DEFAULT_POPULATION_SOURCE);
        assert_eq!(figures, Figures::empty());

        let unparsable = population(None, Some("BPS"), Some(2023));
        let figures = Figures::merge(Some(&unparsable), 340.0, None, 0);
        assert_eq!((figures.population, figures.population_provenance), (340.0, Provenance::Computed));
    }

    #[test]
    fn overlay_matches_normalized_names() {
        let regencies = vec![RegencyMeta {
            regency: "KABUPATEN ACEH TIMUR".into(),
            coordinates: Coordinates::new(4.6, 97.6),
            population: population(Some(422_401.0), None, Some(2022)),
        }];
        let districts = vec![DistrictStat {
            regency: "Aceh Timur".into(),
            district: "IDI RAYEUK".into(),
            population: population(Some(39_000.0), Some("BPS Aceh Timur"), Some(2023)),
        }];
        let overlay = Overlay::new(&regencies, &districts);

        let figures = overlay.regency_figures("Aceh Timur", 10.0, 0);
        assert_eq!(figures.population, 422_401.0);
        assert_eq!(figures.population_source, UNSPECIFIED_SOURCE);
        assert!(overlay.regency_coordinates("aceh timur").is_some());

        assert_eq!(overlay.district_figures("Kab. Aceh Timur", "Idi Rayeuk", 0.0, 0).population, 39_000.0);
        // Regency spelled differently, district unique: still found.
        assert_eq!(overlay.district_figures("Atim", "idi rayeuk", 0.0, 0).population, 39_000.0);
        assert_eq!(overlay.district_figures("Aceh Timur", "Peureulak", 7.0, 0).population, 7.0);
    }

    #[test]
    fn office_customers_take_precedence() {
        let offices = vec![DistributionOffice {
            unit: "ULP Idi".into(),
            coordinates: None,
            customer_count: Some(45_210),
            customer_count_as_of: Some("Desember 2023".into()),
        }];
        let overlay = Overlay::new(&[], &[]).with_offices(&offices);
        let figures = overlay.office_figures("Idi ", 0.0, 3_000);
        assert_eq!((figures.customer_count, figures.customer_provenance), (45_210, Provenance::Curated));
        assert_eq!(overlay.office_figures("Langsa", 0.0, 3_000).customer_count, 3_000);
    }

    #[test]
    fn unit_keys() {
        assert_eq!(unit_key("Idi "), "IDI");
        assert_eq!(unit_key("ULP Idi"), "IDI");
        assert_eq!(unit_key("up3 langsa"), "LANGSA");
    }

    #[test]
    fn unit_prefix_is_dropped_before_normalizing() {
        assert_eq!(unit_key("ULP Kota Sigli"), unit_key("Kota Sigli"));
        assert_eq!(unit_key("  up3   Idi "), "IDI");
        assert_eq!(unit_key("ULP"), "ULP");
        assert_eq!(unit_key("Kabupaten Pidie"), "PIDIE");
    }
}
