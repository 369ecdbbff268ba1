use std::{fmt, sync::Arc};

use serde::{Serialize, Serializer};
use smallvec::SmallVec;

use crate::clean::normalize;
use super::level::AdminLevel;

/// Stable join key for any administrative entity below the service area.
/// Holds the normalized name path from the regency down, e.g.
/// `["ACEH TIMUR", "IDI RAYEUK", "GAMPONG JAWA"]` for a village.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdminKey {
    level: AdminLevel,
    path: SmallVec<[Arc<str>; 3]>,
}

impl AdminKey {
    /// Depth of the name path for a level (regency = 1 ... village = 3).
    fn depth(level: AdminLevel) -> usize {
        match level {
            AdminLevel::Area => 0,
            AdminLevel::Regency => 1,
            AdminLevel::District => 2,
            AdminLevel::Village | AdminLevel::Hamlet => 3,
        }
    }

    pub fn regency(regency: &str) -> Self {
        Self { level: AdminLevel::Regency, path: SmallVec::from_iter([Arc::<str>::from(normalize(regency))]) }
    }

    pub fn district(regency: &str, district: &str) -> Self {
        Self {
            level: AdminLevel::District,
            path: SmallVec::from_iter([normalize(regency), normalize(district)].map(Arc::<str>::from)),
        }
    }

    pub fn village(regency: &str, district: &str, village: &str) -> Self {
        Self {
            level: AdminLevel::Village,
            path: SmallVec::from_iter([normalize(regency), normalize(district), normalize(village)].map(Arc::<str>::from)),
        }
    }

    #[inline] pub fn level(&self) -> AdminLevel { self.level }

    /// Normalized name of the entity itself (last path segment).
    #[inline] pub fn name(&self) -> &str { self.path.last().map_or("", |s| s.as_ref()) }

    #[inline] pub fn path(&self) -> &[Arc<str>] { &self.path }

    /// Returns the key of the enclosing entity at `parent_level` by truncating
    /// the name path. Asking for a deeper level returns the key unchanged.
    pub fn to_parent(&self, parent_level: AdminLevel) -> AdminKey {
        let len = Self::depth(parent_level).min(self.path.len());
        if len == self.path.len() { return self.clone() }
        AdminKey { level: parent_level, path: self.path[..len].iter().cloned().collect() }
    }
}

impl fmt::Display for AdminKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.level.to_str(), self.path.join("/"))
    }
}

impl Serialize for AdminKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_normalized() {
        assert_eq!(
            AdminKey::village("Kabupaten Aceh Timur", " idi rayeuk", "Gampong  Jawa"),
            AdminKey::village("ACEH TIMUR", "Idi Rayeuk", "gampong jawa"),
        );
    }

    #[test]
    fn to_parent_truncates_path() {
        let key = AdminKey::village("Aceh Timur", "Idi Rayeuk", "Gampong Jawa");
        assert_eq!(key.to_parent(AdminLevel::District), AdminKey::district("aceh timur", "idi rayeuk"));
        assert_eq!(key.to_parent(AdminLevel::Regency), AdminKey::regency("ACEH TIMUR"));
        assert_eq!(key.to_parent(AdminLevel::Regency).name(), "ACEH TIMUR");
        assert_eq!(key.to_parent(AdminLevel::Hamlet), key);
    }

    #[test]
    fn displays_level_and_path() {
        let key = AdminKey::district("Pidie", "Delima");
        assert_eq!(key.to_string(), "district:PIDIE/DELIMA");
    }
}
