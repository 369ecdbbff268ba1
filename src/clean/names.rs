use std::sync::OnceLock;

use regex::Regex;

/// Leading administrative tokens that different source tables may or may not carry.
fn prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:KABUPATEN\s+|KAB\.\s*|KOTA\s+)").expect("static prefix pattern")
    })
}

/// Canonical form used for join keys and name equality across collections:
/// trimmed, whitespace runs collapsed, uppercased, administrative prefix removed.
///
/// Stripping repeats until no prefix remains, so `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let mut name = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
    while let Some(found) = prefix_pattern().find(&name) {
        name = name[found.end()..].trim_start().to_string();
    }
    name
}

/// True when two raw names refer to the same entity after normalization.
#[inline]
pub fn same_name(a: &str, b: &str) -> bool { normalize(a) == normalize(b) }

/// Trimmed display form, kept as first seen in the data.
#[inline]
pub(crate) fn display(raw: &str) -> String { raw.split_whitespace().collect::<Vec<_>>().join(" ") }

#[cfg(test)]
mod tests {
    use super::{display, normalize, same_name};

    #[test]
    fn strips_known_prefixes() {
        assert_eq!(normalize("Kabupaten Aceh Besar"), "ACEH BESAR");
        assert_eq!(normalize("KAB. Pidie"), "PIDIE");
        assert_eq!(normalize("kab.Pidie Jaya"), "PIDIE JAYA");
        assert_eq!(normalize("Kota Banda Aceh"), "BANDA ACEH");
        assert_eq!(normalize("  aceh   timur "), "ACEH TIMUR");
    }

    #[test]
    fn keeps_bare_prefix_words() {
        // "KOTA" on its own is a name, not a prefix.
        assert_eq!(normalize("kota"), "KOTA");
        assert_eq!(normalize("Kotabaru"), "KOTABARU");
    }

    #[test]
    fn is_idempotent() {
        let inputs = [
            "", " ", "Kota Kota Baru", "KAB.  KOTA Langsa", "Kabupaten", "kab.",
            "Gampong Blang", "  Idi Rayeuk  ", "kota\tlhokseumawe", "ÜBER dorf",
        ];
        for raw in inputs {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn compares_across_sources() {
        assert!(same_name("KABUPATEN ACEH UTARA", "Aceh Utara"));
        assert!(!same_name("Aceh Utara", "Aceh Timur"));
        assert_eq!(display("  Idi   Rayeuk "), "Idi Rayeuk");
    }
}
