//! Author name cleaning.
//!
//! Zotero stores names exactly as they were typed or imported, so the same
//! person shows up as "Muñoz", "Munoz" and "Munoz " across records.

use unicode_normalization::UnicodeNormalization;

/// Canonicalize a free-text name.
///
/// NFKD-decompose and drop everything outside ASCII, trim, delete `.` and
/// `'`, then collapse whitespace runs to one space. The order matters: the
/// trim runs before punctuation removal, so `" J. "` becomes `"J"` while
/// `"A . B"` keeps its inner space. The final collapse also trims, so
/// `"A ."` gives `"A"` rather than `"A "` and cleaning twice changes nothing.
pub fn clean_name(name: &str) -> String {
    let ascii: String = name.nfkd().filter(char::is_ascii).collect();
    let stripped: String = ascii
        .trim()
        .chars()
        .filter(|c| *c != '.' && *c != '\'')
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Display form used as the join key against the prior CSV: "Last, First".
pub fn display_name(last: &str, first: &str) -> String {
    format!("{}, {}", last, first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name_folds_and_strips() {
        assert_eq!(clean_name("O'Brien-Muñoz."), "OBrien-Munoz");
        assert_eq!(clean_name("  Jean-Luc   Picard "), "Jean-Luc Picard");
        assert_eq!(clean_name("J. R. R."), "J R R");
        assert_eq!(clean_name("Ångström"), "Angstrom");
    }

    #[test]
    fn test_clean_name_drops_unrepresentable() {
        assert_eq!(clean_name("李 Wei"), "Wei");
        assert_eq!(clean_name("ß"), "");
    }

    #[test]
    fn test_clean_name_collapses_tabs_and_newlines() {
        assert_eq!(clean_name("Ada\t\n Lovelace"), "Ada Lovelace");
        assert_eq!(clean_name("A ."), "A");
    }

    #[test]
    fn test_clean_name_is_idempotent() {
        let samples = [
            "O'Brien-Muñoz.",
            " . ' ",
            "Zoë  d'Arc ",
            "  \u{00A0}Ng\u{2003}Andrew. ",
            "ﬁnn", // ligature decomposes under NFKD
            "",
        ];
        for s in samples {
            let once = clean_name(s);
            assert_eq!(clean_name(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Lovelace", "Ada"), "Lovelace, Ada");
        assert_eq!(display_name("CERN", ""), "CERN, ");
    }
}
