use ahash::AHashMap;
use serde::Serialize;
use smallvec::SmallVec;

use crate::{
    clean::normalize,
    model::{DistributionVillageMapping, Village},
};
use super::tree::VillageNode;

/// Anything carrying a (regency, district, village) name triple.
pub trait AdminPath {
    fn regency(&self) -> &str;
    fn district(&self) -> &str;
    fn village(&self) -> &str;
}

impl AdminPath for Village {
    #[inline] fn regency(&self) -> &str { &self.regency }
    #[inline] fn district(&self) -> &str { &self.district }
    #[inline] fn village(&self) -> &str { &self.village }
}

impl AdminPath for DistributionVillageMapping {
    #[inline] fn regency(&self) -> &str { &self.regency }
    #[inline] fn district(&self) -> &str { &self.district }
    #[inline] fn village(&self) -> &str { &self.village }
}

impl AdminPath for VillageNode {
    #[inline] fn regency(&self) -> &str { self.key.path().first().map_or("", |s| s.as_ref()) }
    #[inline] fn district(&self) -> &str { self.key.path().get(1).map_or("", |s| s.as_ref()) }
    #[inline] fn village(&self) -> &str { self.key.name() }
}

impl<T: AdminPath + ?Sized> AdminPath for &T {
    #[inline] fn regency(&self) -> &str { (**self).regency() }
    #[inline] fn district(&self) -> &str { (**self).district() }
    #[inline] fn village(&self) -> &str { (**self).village() }
}

/// How a left record found its right-hand partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchKind {
    /// Normalized (district, village) hit.
    Composite,
    /// Fell back to the village name alone. May pick the wrong regency when
    /// two regencies share a village name.
    VillageOnly,
    Unmatched,
}

/// Per-join counters, logged by callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinStats {
    pub composite: usize,
    pub village_only: usize,
    pub unmatched: usize,
    /// Village-only matches that had several candidates in other regencies.
    pub ambiguous: usize,
}

type Candidates = SmallVec<[usize; 1]>;

/// Index over the right-hand collection, built once per request and reused
/// for every left record.
pub struct Joiner<'r, R> {
    right: &'r [R],
    regencies: Vec<String>, // normalized regency per right record
    by_district_village: AHashMap<(String, String), Candidates>,
    by_village: AHashMap<String, Candidates>,
}

impl<'r, R: AdminPath> Joiner<'r, R> {
    pub fn new(right: &'r [R]) -> Self {
        let mut regencies = Vec::with_capacity(right.len());
        let mut by_district_village: AHashMap<(String, String), Candidates> = AHashMap::with_capacity(right.len());
        let mut by_village: AHashMap<String, Candidates> = AHashMap::with_capacity(right.len());

        for (i, record) in right.iter().enumerate() {
            regencies.push(normalize(record.regency()));
            let village = normalize(record.village());
            if village.is_empty() { continue }
            by_district_village.entry((normalize(record.district()), village.clone())).or_default().push(i);
            by_village.entry(village).or_default().push(i);
        }

        Self { right, regencies, by_district_village, by_village }
    }

    /// Among candidates prefer the one in the same regency, else the first.
    fn pick(&self, candidates: &Candidates, regency: &str) -> (usize, bool) {
        match candidates.iter().find(|&&i| self.regencies[i] == regency) {
            Some(&i) => (i, false),
            None => (candidates[0], candidates.len() > 1),
        }
    }

    /// Find the partner of a single left record.
    pub fn lookup<L: AdminPath>(&self, left: &L) -> (Option<&'r R>, MatchKind) {
        self.lookup_inner(left).map_or((None, MatchKind::Unmatched), |(i, kind, _)| (Some(&self.right[i]), kind))
    }

    fn lookup_inner<L: AdminPath>(&self, left: &L) -> Option<(usize, MatchKind, bool)> {
        let village = normalize(left.village());
        if village.is_empty() { return None }
        let regency = normalize(left.regency());

        if let Some(candidates) = self.by_district_village.get(&(normalize(left.district()), village.clone())) {
            let (i, _) = self.pick(candidates, &regency);
            return Some((i, MatchKind::Composite, false));
        }
        self.by_village.get(&village).map(|candidates| {
            let (i, ambiguous) = self.pick(candidates, &regency);
            (i, MatchKind::VillageOnly, ambiguous)
        })
    }

    /// Pair every left record with at most one right record. Unmatched left
    /// records stay in the output with `right: None`.
    pub fn join<'l, L: AdminPath>(&self, left: &'l [L]) -> (Vec<Joined<'l, 'r, L, R>>, JoinStats) {
        let mut stats = JoinStats::default();
        let joined = left.iter()
            .map(|record| {
                let found = self.lookup_inner(record);
                let (right, kind) = match found {
                    Some((i, kind, ambiguous)) => {
                        if ambiguous { stats.ambiguous += 1 }
                        (Some(&self.right[i]), kind)
                    }
                    None => (None, MatchKind::Unmatched),
                };
                match kind {
                    MatchKind::Composite => stats.composite += 1,
                    MatchKind::VillageOnly => stats.village_only += 1,
                    MatchKind::Unmatched => stats.unmatched += 1,
                }
                Joined { left: record, right, kind }
            })
            .collect();
        (joined, stats)
    }
}

/// One left record and its partner, if any.
#[derive(Debug)]
pub struct Joined<'l, 'r, L, R> {
    pub left: &'l L,
    pub right: Option<&'r R>,
    pub kind: MatchKind,
}
