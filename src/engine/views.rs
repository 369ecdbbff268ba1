//! Response objects handed to the routing and map layers.

use serde::Serialize;

use crate::{
    area::{AreaTable, UNKNOWN_AREA},
    clean::display,
    model::{Coordinates, Hamlet},
};
use super::{
    merge::{Figures, Overlay},
    tree::{DistrictNode, Hierarchy, RegencyNode, Tally, VillageNode},
};

/// Province-wide totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub regency_count: usize,
    #[serde(flatten)]
    pub tally: Tally,
    /// Sum of the merged regency populations.
    pub population: f64,
    pub customer_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegencyRow {
    pub regency_name: String,
    pub service_area: String,
    pub district_count: usize,
    pub village_count: usize,
    pub hamlet_count: usize,
    pub electrified_hamlets: usize,
    pub unelectrified_hamlets: usize,
    #[serde(flatten)]
    pub figures: Figures,
}

/// `{ summary, details }` statistics object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyStats {
    pub summary: Summary,
    pub details: Vec<RegencyRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaRow {
    pub service_area: String,
    pub regency_count: usize,
    pub regency_names: Vec<String>,
    #[serde(flatten)]
    pub tally: Tally,
    pub population: f64,
    pub customer_count: u64,
}

/// Counts and figures for one child in a detail listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRow {
    pub name: String,
    #[serde(flatten)]
    pub tally: Tally,
    pub figures: Figures,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegencyDetail {
    pub name: String,
    pub found: bool,
    pub service_area: String,
    pub coordinates: Option<Coordinates>,
    #[serde(flatten)]
    pub tally: Tally,
    pub figures: Figures,
    pub district_names: Vec<String>,
    pub districts: Vec<ChildRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictDetail {
    pub regency_name: String,
    pub name: String,
    pub found: bool,
    pub service_area: String,
    #[serde(flatten)]
    pub tally: Tally,
    pub figures: Figures,
    pub village_names: Vec<String>,
    pub villages: Vec<ChildRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VillageDetail {
    pub regency_name: String,
    pub district_name: String,
    pub name: String,
    pub found: bool,
    pub service_area: String,
    pub ids: Vec<String>,
    pub coordinates: Option<Coordinates>,
    #[serde(flatten)]
    pub tally: Tally,
    pub figures: Figures,
    pub hamlet_names: Vec<String>,
    pub hamlets: Vec<Hamlet>,
}

/// Composes the per-request index with the curated overlay.
pub struct View<'a> {
    pub hierarchy: &'a Hierarchy,
    pub overlay: &'a Overlay<'a>,
    pub areas: &'a AreaTable,
}

impl<'a> View<'a> {
    fn regency_figures(&self, node: &RegencyNode, tally: &Tally) -> Figures {
        self.overlay.regency_figures(&node.name, tally.population, tally.customer_count)
    }

    fn district_figures(&self, regency: &str, node: &DistrictNode, tally: &Tally) -> Figures {
        self.overlay.district_figures(regency, &node.name, tally.population, tally.customer_count)
    }

    /// A village's own document fields are its curated figures.
    fn village_figures(&self, node: &VillageNode) -> Figures {
        Figures::merge(Some(&node.population), 0.0, node.customer_count, 0)
    }

    pub fn regency_row(&self, node: &RegencyNode) -> RegencyRow {
        let tally = node.tally();
        RegencyRow {
            regency_name: node.name.clone(),
            service_area: self.areas.area_label(&node.name).to_string(),
            district_count: tally.district_count,
            village_count: tally.village_count,
            hamlet_count: tally.hamlet_count,
            electrified_hamlets: tally.electrified_hamlets,
            unelectrified_hamlets: tally.unelectrified_hamlets,
            figures: self.regency_figures(node, &tally),
        }
    }

    pub fn statistics(&self) -> HierarchyStats {
        let details: Vec<RegencyRow> = self.hierarchy.regencies.values().map(|r| self.regency_row(r)).collect();
        let summary = Summary {
            regency_count: details.len(),
            tally: self.hierarchy.tally(),
            population: details.iter().map(|r| r.figures.population).sum(),
            customer_count: details.iter().map(|r| r.figures.customer_count).sum(),
        };
        HierarchyStats { summary, details }
    }

    /// One row per service area in table order, then an unknown-area row for
    /// regencies the table does not claim.
    pub fn area_statistics(&self) -> Vec<AreaRow> {
        let mut rows: Vec<AreaRow> = self.areas.areas()
            .map(|area| AreaRow {
                service_area: area.to_string(),
                regency_count: 0,
                regency_names: Vec::new(),
                tally: Tally::default(),
                population: 0.0,
                customer_count: 0,
            })
            .collect();
        let mut unknown = AreaRow {
            service_area: UNKNOWN_AREA.to_string(),
            regency_count: 0,
            regency_names: Vec::new(),
            tally: Tally::default(),
            population: 0.0,
            customer_count: 0,
        };

        for node in self.hierarchy.regencies.values() {
            let tally = node.tally();
            let figures = self.regency_figures(node, &tally);
            let row = match self.areas.area_of(&node.name) {
                Some(area) => rows.iter_mut().find(|r| r.service_area == area).unwrap_or(&mut unknown),
                None => &mut unknown,
            };
            row.regency_count += 1;
            row.regency_names.push(node.name.clone());
            row.tally += &tally;
            row.population += figures.population;
            row.customer_count += figures.customer_count;
        }

        if unknown.regency_count > 0 { rows.push(unknown) }
        rows
    }

    /// Missing regencies produce a zeroed object with `found: false`.
    pub fn regency_detail(&self, regency: &str) -> RegencyDetail {
        let Some(node) = self.hierarchy.regency(regency) else {
            return RegencyDetail {
                name: display(regency),
                found: false,
                service_area: self.areas.area_label(regency).to_string(),
                coordinates: self.overlay.regency_coordinates(regency),
                tally: Tally::default(),
                figures: self.overlay.regency_figures(regency, 0.0, 0),
                district_names: Vec::new(),
                districts: Vec::new(),
            };
        };
        let tally = node.tally();
        let districts: Vec<ChildRow> = node.districts.values()
            .map(|d| {
                let tally = d.tally();
                ChildRow { name: d.name.clone(), figures: self.district_figures(&node.name, d, &tally), tally }
            })
            .collect();
        RegencyDetail {
            name: node.name.clone(),
            found: true,
            service_area: self.areas.area_label(&node.name).to_string(),
            coordinates: self.overlay.regency_coordinates(&node.name),
            figures: self.regency_figures(node, &tally),
            tally,
            district_names: districts.iter().map(|d| d.name.clone()).collect(),
            districts,
        }
    }

    pub fn district_detail(&self, regency: &str, district: &str) -> DistrictDetail {
        let regency_name = self.hierarchy.regency(regency).map_or_else(|| display(regency), |r| r.name.clone());
        let service_area = self.areas.area_label(regency).to_string();
        let Some(node) = self.hierarchy.district(regency, district) else {
            return DistrictDetail {
                regency_name,
                name: display(district),
                found: false,
                service_area,
                tally: Tally::default(),
                figures: self.overlay.district_figures(regency, district, 0.0, 0),
                village_names: Vec::new(),
                villages: Vec::new(),
            };
        };
        let tally = node.tally();
        let villages: Vec<ChildRow> = node.villages.values()
            .map(|v| ChildRow { name: v.name.clone(), tally: v.tally(), figures: self.village_figures(v) })
            .collect();
        DistrictDetail {
            figures: self.district_figures(&regency_name, node, &tally),
            regency_name,
            name: node.name.clone(),
            found: true,
            service_area,
            tally,
            village_names: villages.iter().map(|v| v.name.clone()).collect(),
            villages,
        }
    }

    pub fn village_detail(&self, regency: &str, district: &str, village: &str) -> VillageDetail {
        let regency_name = self.hierarchy.regency(regency).map_or_else(|| display(regency), |r| r.name.clone());
        let district_name = self.hierarchy.district(regency, district).map_or_else(|| display(district), |d| d.name.clone());
        let service_area = self.areas.area_label(regency).to_string();
        let Some(node) = self.hierarchy.village(regency, district, village) else {
            return VillageDetail {
                regency_name,
                district_name,
                name: display(village),
                found: false,
                service_area,
                ids: Vec::new(),
                coordinates: None,
                tally: Tally::default(),
                figures: Figures::empty(),
                hamlet_names: Vec::new(),
                hamlets: Vec::new(),
            };
        };
        VillageDetail {
            regency_name,
            district_name,
            name: node.name.clone(),
            found: true,
            service_area,
            ids: node.ids.clone(),
            coordinates: node.coordinates,
            tally: node.tally(),
            figures: self.village_figures(node),
            hamlet_names: node.hamlets.iter().map(|h| h.name.clone()).collect(),
            hamlets: node.hamlets.clone(),
        }
    }
}
