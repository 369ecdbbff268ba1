use serde::Serialize;
use smallvec::SmallVec;

use crate::{area::AreaTable, types::AdminLevel};
use super::tree::Hierarchy;

/// A search result with its administrative parents, outermost first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub name: String,
    pub entity_type: AdminLevel,
    pub parent_chain: SmallVec<[String; 3]>,
    pub service_area: String,
}

/// Case-insensitive substring search over regency, district, village and
/// hamlet names. Results are grouped by entity type in that order; there is
/// no ranking within a group beyond name order.
pub fn search(hierarchy: &Hierarchy, areas: &AreaTable, query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() { return Vec::new() }
    let hit = |name: &str| name.to_lowercase().contains(&needle);

    let mut by_level: [Vec<SearchHit>; 4] = Default::default();
    for regency in hierarchy.regencies.values() {
        let area = areas.area_label(&regency.name).to_string();
        let result = |name: &str, entity_type, parents: &[&str]| SearchHit {
            name: name.to_string(),
            entity_type,
            parent_chain: parents.iter().map(|p| p.to_string()).collect(),
            service_area: area.clone(),
        };

        if hit(&regency.name) { by_level[0].push(result(&regency.name, AdminLevel::Regency, &[])) }
        for district in regency.districts.values() {
            if hit(&district.name) {
                by_level[1].push(result(&district.name, AdminLevel::District, &[regency.name.as_str()]));
            }
            for village in district.villages.values() {
                let chain = [regency.name.as_str(), district.name.as_str(), village.name.as_str()];
                if hit(&village.name) { by_level[2].push(result(&village.name, AdminLevel::Village, &chain[..2])) }
                for hamlet in village.hamlets.iter().filter(|h| hit(&h.name)) {
                    by_level[3].push(result(&hamlet.name, AdminLevel::Hamlet, &chain));
                }
            }
        }
    }
    by_level.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Hamlet, Population, Village};

    fn village(regency: &str, district: &str, name: &str, hamlets: &[&str]) -> Village {
        Village {
            id: None,
            regency: regency.into(),
            district: district.into(),
            village: name.into(),
            coordinates: None,
            hamlets: hamlets.iter().map(|n| Hamlet { name: n.to_string(), status: "Berlistrik PLN".into() }).collect(),
            population: Population::default(),
            customer_count: None,
        }
    }

    fn tree() -> Hierarchy {
        Hierarchy::build(&[
            village("Aceh Timur", "Idi Rayeuk", "Gampong Jawa", &["Dusun Idi", "0"]),
            village("Aceh Timur", "Idi Tunong", "Keude Blang", &["Lampoh"]),
            village("Simeulue", "Teupah Barat", "Angkeo", &["Idiot Bay"]),
        ])
    }

    #[test]
    fn matches_every_level_in_type_order() {
        let hits = search(&tree(), &AreaTable::builtin(), "  IDI ");
        let kinds: Vec<AdminLevel> = hits.iter().map(|h| h.entity_type).collect();
        assert_eq!(kinds, [AdminLevel::District, AdminLevel::District, AdminLevel::Hamlet, AdminLevel::Hamlet]);
        assert_eq!(hits[2].name, "Dusun Idi");
        assert_eq!(hits[2].parent_chain.as_slice(), ["Aceh Timur", "Idi Rayeuk", "Gampong Jawa"]);
        assert_eq!(hits[2].service_area, "UP3 Langsa");
        assert_eq!(hits[3].service_area, "UP3 Meulaboh");
    }

    #[test]
    fn sentinel_hamlets_are_not_searchable() {
        assert!(search(&tree(), &AreaTable::builtin(), "0").is_empty());
    }

    #[test]
    fn parents_and_unknown_area() {
        let tree = Hierarchy::build(&[village("Deli Serdang", "Lubuk Pakam", "Cemara", &[])]);
        let hits = search(&tree, &AreaTable::builtin(), "cemara");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity_type, AdminLevel::Village);
        assert_eq!(hits[0].parent_chain.as_slice(), ["Deli Serdang", "Lubuk Pakam"]);
        assert_eq!(hits[0].service_area, crate::area::UNKNOWN_AREA);
    }

    #[test]
    fn blank_query_returns_nothing() {
        assert!(search(&tree(), &AreaTable::builtin(), "   ").is_empty());
    }
}
