use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminLevel {
    Area,       // Highest-level grouping (service area)
    Regency,    // Regency -> Area
    District,   // District -> Regency
    Village,    // Village -> District
    Hamlet,     // Lowest-level entity, embedded in villages
}

impl AdminLevel {
    pub fn to_str(&self) -> &'static str {
        match self {
            AdminLevel::Area => "area",
            AdminLevel::Regency => "regency",
            AdminLevel::District => "district",
            AdminLevel::Village => "village",
            AdminLevel::Hamlet => "hamlet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AdminLevel;

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&AdminLevel::District).unwrap();
        assert_eq!(json, "\"district\"");
        assert_eq!(AdminLevel::District.to_str(), "district");
    }
}
