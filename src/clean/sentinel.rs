use crate::model::Hamlet;

/// Values left behind by spreadsheet imports: formula errors, literal zero and
/// placeholder markers. Compared against the trimmed, uppercased field.
pub const SENTINELS: &[&str] = &[
    "#REF!",
    "REFF!",
    "#REFF!",
    "#N/A",
    "N/A",
    "#VALUE!",
    "#DIV/0!",
    "#NAME?",
    "#NULL!",
    "#NUM!",
    "0",
    "-",
    "DUSUN TIDAK DIKETAHUI",
];

/// True when `value` is one of the import garbage markers.
pub fn is_sentinel(value: &str) -> bool {
    let value = value.trim().to_uppercase();
    SENTINELS.iter().any(|&s| s == value)
}

/// True when either the hamlet's name or its status is a garbage marker, or
/// the name is blank. A named hamlet with a blank status is kept and counts
/// as unclassified.
#[inline]
pub fn is_garbage(hamlet: &Hamlet) -> bool {
    hamlet.name.trim().is_empty() || is_sentinel(&hamlet.name) || is_sentinel(&hamlet.status)
}

/// The sublist of hamlets that may be counted or listed. Storage is never
/// touched; this runs on every read path.
pub fn filter_hamlets(hamlets: &[Hamlet]) -> Vec<Hamlet> {
    hamlets.iter().filter(|h| !is_garbage(h)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hamlet(name: &str, status: &str) -> Hamlet {
        Hamlet { name: name.into(), status: status.into() }
    }

    #[test]
    fn drops_formula_errors_in_either_field() {
        let raw = vec![hamlet("A", "Berlistrik PLN"), hamlet("B", "REFF!")];
        let kept = filter_hamlets(&raw);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "A");
    }

    #[test]
    fn drops_placeholders() {
        let raw = vec![
            hamlet("0", "Berlistrik PLN"),
            hamlet("Dusun Tidak Diketahui", "Belum Berlistrik"),
            hamlet("#N/A", "#N/A"),
            hamlet("  ", "Berlistrik PLN"),
            hamlet("Lampoh", " #ref! "),
            hamlet("Teungoh", "Belum Berlistrik"),
        ];
        let kept = filter_hamlets(&raw);
        assert_eq!(kept, vec![hamlet("Teungoh", "Belum Berlistrik")]);
    }

    #[test]
    fn never_grows_and_never_leaks_sentinels() {
        let raw: Vec<Hamlet> = SENTINELS.iter()
            .flat_map(|&s| [hamlet(s, "Berlistrik PLN"), hamlet("Meunasah", s)])
            .chain([hamlet("Meunasah", "Berlistrik PLN")])
            .collect();
        let kept = filter_hamlets(&raw);
        assert!(kept.len() <= raw.len());
        assert!(kept.iter().all(|h| !is_sentinel(&h.name) && !is_sentinel(&h.status)));
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn blank_status_is_kept_blank_name_is_not() {
        let raw = vec![hamlet("Lampoh", ""), hamlet("", "Berlistrik PLN"), hamlet("Teungoh", "  ")];
        let kept = filter_hamlets(&raw);
        assert_eq!(kept, vec![hamlet("Lampoh", ""), hamlet("Teungoh", "  ")]);
        assert!(!is_sentinel(""));
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(filter_hamlets(&[]).is_empty());
    }
}
