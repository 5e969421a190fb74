// Free-text normalization shared by every classifier.
//
// Spreadsheet authors mix "Réalisé", "realise", "REALISE " and so on, so all
// keyword checks run against a folded form: trimmed, accents stripped,
// lowercased.
use unicode_normalization::UnicodeNormalization;

use crate::types::Cell;

/// Combining diacritical marks block (U+0300..=U+036F).
fn is_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Trim, decompose (NFD), drop combining accents, lowercase.
pub fn normalize(s: &str) -> String {
    s.trim()
        .nfd()
        .filter(|c| !is_diacritic(*c))
        .collect::<String>()
        .to_lowercase()
}

pub fn normalize_cell(cell: &Cell) -> String {
    normalize(&cell.text())
}

/// `needle` must already be in normalized form.
pub fn contains(normalized: &str, needle: &str) -> bool {
    normalized.contains(needle)
}

pub fn equals_any(normalized: &str, candidates: &[&str]) -> bool {
    candidates.iter().any(|c| normalized == *c)
}

/// `true` only for a flag cell reading "oui" in any case or spacing.
pub fn is_yes(cell: &Cell) -> bool {
    normalize_cell(cell) == "oui"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_accents_and_case() {
        assert_eq!(normalize("  Réalisé "), "realise");
        assert_eq!(normalize("À PLANIFIER"), "a planifier");
        assert_eq!(normalize("Expiré"), "expire");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_accented_and_plain_compare_equal() {
        assert_eq!(normalize("réalisé"), normalize("Realise"));
        assert_eq!(normalize("annulé"), normalize("ANNULE"));
    }

    #[test]
    fn test_predicates() {
        let n = normalize("Chantier en cours");
        assert!(contains(&n, "en cours"));
        assert!(!contains(&n, "realis"));
        assert!(equals_any(&normalize(" N/A "), &["na", "n/a"]));
        assert!(!equals_any(&normalize("nav"), &["na", "n/a"]));
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes(&Cell::Text(" OUI ".to_string())));
        assert!(is_yes(&Cell::Text("Oui".to_string())));
        assert!(!is_yes(&Cell::Text("Non".to_string())));
        assert!(!is_yes(&Cell::Text("oui ?".to_string())));
        assert!(!is_yes(&Cell::Empty));
    }
}
