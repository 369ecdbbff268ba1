use std::{collections::BTreeMap, ops::AddAssign};

use serde::Serialize;

use crate::{
    clean::{display, normalize},
    model::{Coordinates, Hamlet, Population, StatusBucket, Village},
    types::{AdminKey, AdminLevel},
};

/// Unique and summed counts at one level of the hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub district_count: usize,
    pub village_count: usize,
    pub hamlet_count: usize,
    pub electrified_hamlets: usize,
    pub unelectrified_hamlets: usize,
    /// Sum of population figures present on villages.
    #[serde(rename = "computedPopulation")]
    pub population: f64,
    /// Sum of customer counts present on villages.
    #[serde(rename = "computedCustomerCount")]
    pub customer_count: u64,
}

impl AddAssign<&Tally> for Tally {
    fn add_assign(&mut self, other: &Tally) {
        self.district_count += other.district_count;
        self.village_count += other.village_count;
        self.hamlet_count += other.hamlet_count;
        self.electrified_hamlets += other.electrified_hamlets;
        self.unelectrified_hamlets += other.unelectrified_hamlets;
        self.population += other.population;
        self.customer_count += other.customer_count;
    }
}

impl std::iter::Sum for Tally {
    fn sum<I: Iterator<Item = Tally>>(iter: I) -> Self {
        iter.fold(Tally::default(), |mut acc, t| { acc += &t; acc })
    }
}

/// Leaf of the index: one village, possibly merged from several documents
/// that normalize to the same key. Hamlets are already sentinel-filtered.
#[derive(Debug, Clone)]
pub struct VillageNode {
    pub key: AdminKey,
    pub name: String,
    pub ids: Vec<String>,
    pub hamlets: Vec<Hamlet>,
    pub coordinates: Option<Coordinates>,
    pub population: Population,
    pub customer_count: Option<u64>,
}

impl VillageNode {
    fn new(key: AdminKey, village: &Village) -> Self {
        Self {
            key,
            name: display(&village.village),
            ids: Vec::new(),
            hamlets: Vec::new(),
            coordinates: None,
            population: Population::default(),
            customer_count: None,
        }
    }

    /// Fold one more document into this node. Hamlet lists concatenate;
    /// scalar fields keep the first value present.
    fn absorb(&mut self, village: &Village) {
        self.ids.extend(village.id.iter().cloned());
        self.hamlets.extend(village.clean_hamlets());
        self.coordinates = self.coordinates.or(village.coordinates);
        if self.population.count.is_none() && village.population.count.is_some() {
            self.population = village.population.clone();
        }
        self.customer_count = self.customer_count.or(village.customer_count);
    }

    pub fn tally(&self) -> Tally {
        let count = |bucket| self.hamlets.iter().filter(|h| h.bucket() == bucket).count();
        Tally {
            district_count: 0,
            village_count: 1,
            hamlet_count: self.hamlets.len(),
            electrified_hamlets: count(StatusBucket::Electrified),
            unelectrified_hamlets: count(StatusBucket::NotElectrified),
            population: self.population.count.unwrap_or(0.0),
            customer_count: self.customer_count.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DistrictNode {
    pub key: AdminKey,
    pub name: String,
    pub villages: BTreeMap<String, VillageNode>,
}

impl DistrictNode {
    pub fn tally(&self) -> Tally {
        let mut tally: Tally = self.villages.values().map(|v| v.tally()).sum();
        tally.district_count = 1;
        tally
    }

    #[inline] pub fn village(&self, name: &str) -> Option<&VillageNode> { self.villages.get(&normalize(name)) }
}

#[derive(Debug, Clone)]
pub struct RegencyNode {
    pub key: AdminKey,
    pub name: String,
    pub districts: BTreeMap<String, DistrictNode>,
}

impl RegencyNode {
    pub fn tally(&self) -> Tally {
        self.districts.values().map(|d| d.tally()).sum()
    }

    #[inline] pub fn district(&self, name: &str) -> Option<&DistrictNode> { self.districts.get(&normalize(name)) }

    pub fn villages(&self) -> impl Iterator<Item = &VillageNode> + '_ {
        self.districts.values().flat_map(|d| d.villages.values())
    }
}

/// Regency -> district -> village index, built once per request from the
/// village collection. Children are keyed by normalized name so records that
/// differ only in case or prefix collapse into one entity.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    pub regencies: BTreeMap<String, RegencyNode>,
}

impl Hierarchy {
    pub fn build(villages: &[Village]) -> Self {
        let mut hierarchy = Hierarchy::default();
        for village in villages { hierarchy.insert(village) }
        hierarchy
    }

    fn insert(&mut self, village: &Village) {
        let key = village.key();
        let [regency, district, name] = match key.path() {
            [r, d, v] => [r.to_string(), d.to_string(), v.to_string()],
            _ => return,
        };

        let regency_node = self.regencies.entry(regency).or_insert_with(|| RegencyNode {
            key: key.to_parent(AdminLevel::Regency),
            name: display(&village.regency),
            districts: BTreeMap::new(),
        });
        let district_node = regency_node.districts.entry(district).or_insert_with(|| DistrictNode {
            key: key.to_parent(AdminLevel::District),
            name: display(&village.district),
            villages: BTreeMap::new(),
        });
        district_node.villages.entry(name)
            .or_insert_with(|| VillageNode::new(key.clone(), village))
            .absorb(village);
    }

    #[inline] pub fn regency(&self, name: &str) -> Option<&RegencyNode> { self.regencies.get(&normalize(name)) }

    pub fn district(&self, regency: &str, district: &str) -> Option<&DistrictNode> {
        self.regency(regency)?.district(district)
    }

    pub fn village(&self, regency: &str, district: &str, village: &str) -> Option<&VillageNode> {
        self.district(regency, district)?.village(village)
    }

    pub fn tally(&self) -> Tally {
        self.regencies.values().map(|r| r.tally()).sum()
    }

    /// Every merged village, in regency, district, village key order.
    pub fn villages(&self) -> impl Iterator<Item = &VillageNode> + '_ {
        self.regencies.values().flat_map(|r| r.villages())
    }
}
