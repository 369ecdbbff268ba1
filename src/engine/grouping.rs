use ahash::AHashMap;
use serde::{
    ser::{SerializeMap, SerializeStruct},
    Serialize, Serializer,
};

use crate::{
    clean::display,
    model::{Coordinates, DistributionOffice, DistributionVillageMapping},
};
use super::{
    join::{JoinStats, Joiner, MatchKind},
    merge::{unit_key, Figures, Overlay},
    tree::{Hierarchy, VillageNode},
};

/// Bucket for mapping records with an empty or missing unit name.
pub const UNASSIGNED_UNIT: &str = "Unassigned";

/// A mapping record enriched with fields joined from the village collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitVillage {
    pub village_name: String,
    pub district_name: String,
    pub regency_name: String,
    pub coordinates: Option<Coordinates>,
    pub electrified: bool,
    pub hamlet_count: usize,
    pub population: f64,
    pub customer_count: u64,
    pub matched: MatchKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitGroup {
    pub unit: String,
    pub office: Option<DistributionOffice>,
    pub figures: Figures,
    pub villages: Vec<UnitVillage>,
}

/// Ordered unit buckets. Units appear in first-seen order with the catch-all
/// bucket last.
///
/// Serializes as `{ units, offices, join }`: `units` is the
/// `{ unitName: [villages...] }` map, `offices` carries each bucket's office
/// record and figures under the same unit names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    pub groups: Vec<UnitGroup>,
    pub join: JoinStats,
}

impl Grouping {
    pub fn get(&self, unit: &str) -> Option<&UnitGroup> {
        let key = unit_key(unit);
        self.groups.iter().find(|g| unit_key(&g.unit) == key)
    }

    #[inline] pub fn total(&self) -> usize { self.groups.iter().map(|g| g.villages.len()).sum() }
}

struct UnitMap<'a>(&'a [UnitGroup]);

impl Serialize for UnitMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for group in self.0 {
            map.serialize_entry(&group.unit, &group.villages)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct OfficeEntry<'a> {
    office: Option<&'a DistributionOffice>,
    figures: &'a Figures,
}

struct OfficeMap<'a>(&'a [UnitGroup]);

impl Serialize for OfficeMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for group in self.0 {
            map.serialize_entry(&group.unit, &OfficeEntry { office: group.office.as_ref(), figures: &group.figures })?;
        }
        map.end()
    }
}

impl Serialize for Grouping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut grouping = serializer.serialize_struct("Grouping", 3)?;
        grouping.serialize_field("units", &UnitMap(&self.groups))?;
        grouping.serialize_field("offices", &OfficeMap(&self.groups))?;
        grouping.serialize_field("join", &self.join)?;
        grouping.end()
    }
}

/// Partition `mappings` into unit buckets and enrich every record from the
/// merged villages of `hierarchy`, so hamlet counts agree with the rollup.
/// Every input record lands in exactly one bucket.
pub fn group_by_unit(mappings: &[DistributionVillageMapping], hierarchy: &Hierarchy, overlay: &Overlay<'_>) -> Grouping {
    let nodes: Vec<&VillageNode> = hierarchy.villages().collect();
    let joiner = Joiner::new(&nodes);
    let (joined, stats) = joiner.join(mappings);

    let mut order: AHashMap<String, usize> = AHashMap::new();
    let mut groups: Vec<UnitGroup> = Vec::new();
    let mut unassigned: Vec<UnitVillage> = Vec::new();

    for pair in joined {
        let record = enrich(pair.left, pair.right.copied(), pair.kind);
        let unit = pair.left.unit.as_deref().map(display).filter(|u| !u.is_empty());
        let Some(unit) = unit else {
            unassigned.push(record);
            continue
        };
        let i = *order.entry(unit_key(&unit)).or_insert_with(|| {
            groups.push(UnitGroup { unit: unit.clone(), office: None, figures: Figures::empty(), villages: Vec::new() });
            groups.len() - 1
        });
        groups[i].villages.push(record);
    }

    if !unassigned.is_empty() {
        groups.push(UnitGroup {
            unit: UNASSIGNED_UNIT.to_string(),
            office: None,
            figures: Figures::empty(),
            villages: unassigned,
        });
    }

    for group in &mut groups {
        let population = group.villages.iter().map(|v| v.population).sum();
        let customers = group.villages.iter().map(|v| v.customer_count).sum();
        if group.unit != UNASSIGNED_UNIT {
            group.office = overlay.office(&group.unit).cloned();
        }
        group.figures = overlay.office_figures(&group.unit, population, customers);
    }

    Grouping { groups, join: stats }
}

fn enrich(mapping: &DistributionVillageMapping, village: Option<&VillageNode>, kind: MatchKind) -> UnitVillage {
    let (hamlet_count, population, customer_count) = village.map_or((0, 0.0, 0), |v| {
        (v.hamlets.len(), v.population.count.unwrap_or(0.0), v.customer_count.unwrap_or(0))
    });
    UnitVillage {
        village_name: mapping.village.clone(),
        district_name: mapping.district.clone(),
        regency_name: mapping.regency.clone(),
        coordinates: mapping.coordinates.or_else(|| village.and_then(|v| v.coordinates)),
        electrified: mapping.electrified,
        hamlet_count,
        population,
        customer_count,
        matched: kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Hamlet, Population, Village};

    fn mapping(unit: Option<&str>, district: &str, village: &str) -> DistributionVillageMapping {
        DistributionVillageMapping {
            unit: unit.map(str::to_string),
            regency: "Aceh Timur".into(),
            district: district.into(),
            village: village.into(),
            coordinates: None,
            electrified: true,
        }
    }

    fn hierarchy() -> Hierarchy { Hierarchy::build(&villages()) }

    fn villages() -> Vec<Village> {
        vec![Village {
            id: Some("v1".into()),
            regency: "KABUPATEN ACEH TIMUR".into(),
            district: "IDI RAYEUK".into(),
            village: "GAMPONG JAWA".into(),
            coordinates: Coordinates::new(4.96, 97.76),
            hamlets: vec![
                Hamlet { name: "A".into(), status: "Berlistrik PLN".into() },
                Hamlet { name: "B".into(), status: "REFF!".into() },
            ],
            population: Population { count: Some(800.0), source: None, year: None },
            customer_count: Some(190),
        }]
    }

    #[test]
    fn trailing_space_lands_in_same_bucket() {
        let mappings = vec![mapping(Some("Idi "), "Idi Rayeuk", "Gampong Jawa"), mapping(Some("Idi"), "Idi Rayeuk", "Keude")];
        let grouping = group_by_unit(&mappings, &hierarchy(), &Overlay::default());
        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(grouping.groups[0].unit, "Idi");
        assert_eq!(grouping.groups[0].villages.len(), 2);
    }

    #[test]
    fn joined_fields_and_zeroed_misses() {
        let mappings = vec![mapping(Some("Idi"), "idi rayeuk", "gampong jawa"), mapping(Some("Idi"), "Idi Rayeuk", "Keude")];
        let grouping = group_by_unit(&mappings, &hierarchy(), &Overlay::default());
        let hit = &grouping.groups[0].villages[0];
        assert_eq!((hit.hamlet_count, hit.population, hit.customer_count), (1, 800.0, 190));
        assert_eq!(hit.coordinates, Coordinates::new(4.96, 97.76));
        let miss = &grouping.groups[0].villages[1];
        assert_eq!((miss.hamlet_count, miss.population, miss.customer_count), (0, 0.0, 0));
        assert_eq!(miss.matched, MatchKind::Unmatched);
        assert_eq!(grouping.groups[0].figures.customer_count, 190);
    }

    #[test]
    fn totals_are_preserved_with_catch_all_last() {
        let mappings = vec![
            mapping(None, "Idi Rayeuk", "Gampong Jawa"),
            mapping(Some("Peureulak"), "Peureulak", "Blang"),
            mapping(Some("   "), "Peureulak", "Bukit"),
            mapping(Some("Idi"), "Idi Rayeuk", "Keude"),
        ];
        let grouping = group_by_unit(&mappings, &hierarchy(), &Overlay::default());
        assert_eq!(grouping.total(), mappings.len());
        let units: Vec<&str> = grouping.groups.iter().map(|g| g.unit.as_str()).collect();
        assert_eq!(units, ["Peureulak", "Idi", UNASSIGNED_UNIT]);
        assert_eq!(grouping.get(UNASSIGNED_UNIT).unwrap().villages.len(), 2);
    }

    #[test]
    fn counts_agree_with_the_rollup_for_split_documents() {
        let mut villages = villages();
        let mut second = villages[0].clone();
        second.id = Some("v2".into());
        second.village = "Gampong  Jawa".into();
        second.hamlets = vec![
            Hamlet { name: "C".into(), status: "Belum Berlistrik".into() },
            Hamlet { name: "D".into(), status: "Berlistrik PLN".into() },
        ];
        villages.push(second);
        let tree = Hierarchy::build(&villages);

        let grouping = group_by_unit(&[mapping(Some("Idi"), "Idi Rayeuk", "Gampong Jawa")], &tree, &Overlay::default());
        let rolled_up = tree.village("Aceh Timur", "Idi Rayeuk", "Gampong Jawa").unwrap().tally().hamlet_count;
        assert_eq!(rolled_up, 3);
        assert_eq!(grouping.groups[0].villages[0].hamlet_count, rolled_up);
        assert_eq!(grouping.join, JoinStats { composite: 1, ..JoinStats::default() });
    }

    #[test]
    fn serializes_units_beside_offices() {
        let offices = vec![DistributionOffice {
            unit: "UP3 Idi".into(),
            coordinates: None,
            customer_count: Some(45_210),
            customer_count_as_of: Some("Desember 2023".into()),
        }];
        let overlay = Overlay::default().with_offices(&offices);
        let mappings = vec![mapping(Some("Peureulak"), "Peureulak", "Blang"), mapping(Some("Idi"), "Idi Rayeuk", "Gampong Jawa")];
        let grouping = group_by_unit(&mappings, &hierarchy(), &overlay);

        let json = serde_json::to_string(&grouping).unwrap();
        assert!(json.starts_with(r#"{"units":{"Peureulak":[{"villageName":"Blang""#));
        assert!(json.contains(r#""Idi":[{"villageName":"Gampong Jawa""#));

        let value = serde_json::to_value(&grouping).unwrap();
        assert_eq!(value["offices"]["Idi"]["office"]["customerCountAsOf"], "Desember 2023");
        assert_eq!(value["offices"]["Idi"]["figures"]["customerCount"], 45_210);
        assert_eq!(value["offices"]["Idi"]["figures"]["customerProvenance"], "curated");
        assert!(value["offices"]["Peureulak"]["office"].is_null());
        assert_eq!(value["offices"]["Peureulak"]["figures"]["customerCount"], 0);
        assert_eq!(value["join"]["unmatched"], 1);
    }
}
