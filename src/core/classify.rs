// Unilog - core/classify.rs
//
// Level classifier: maps a level name or a free-text keyword to its
// presentation (icon id + visual style). Pure lookup against a fixed
// ordered table; total, never fails.

use crate::core::model::{Presentation, Style};

/// The classification table, in match order. First match wins, and the
/// order is part of the contract: when a message contains several keywords,
/// the one earliest in this table decides the presentation.
const TABLE: &[(&str, &str, Style)] = &[
    ("error", "times-circle", Style::Danger),
    ("warning", "exclamation-triangle", Style::Warning),
    ("info", "info-circle", Style::Info),
    ("success", "check-circle", Style::Success),
    ("system", "cogs", Style::Primary),
    ("user", "user", Style::Primary),
    ("debug", "bug", Style::Primary),
    ("network", "sitemap", Style::Primary),
    ("security", "shield-alt", Style::Primary),
];

/// Presentation for unrecognised input.
const DEFAULT: Presentation = Presentation {
    icon: "comment",
    style: Style::Primary,
};

/// Classify an explicit level or keyword. Case-insensitive exact match
/// against the table; unmatched input yields the default pair.
pub fn classify(keyword: &str) -> Presentation {
    let lower = keyword.to_lowercase();
    for &(key, icon, style) in TABLE {
        if lower == key {
            return Presentation { icon, style };
        }
    }
    DEFAULT
}

/// Classify a free-text message by scanning it for known keywords.
///
/// The scan walks the table in order and returns the first table keyword
/// contained in the message, even if keywords later in the table also
/// appear. Case-insensitive substring match.
pub fn classify_message(message: &str) -> Presentation {
    let lower = message.to_lowercase();
    for &(key, icon, style) in TABLE {
        if lower.contains(key) {
            return Presentation { icon, style };
        }
    }
    DEFAULT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_keyword_maps_to_its_documented_pair() {
        let expected = [
            ("error", "times-circle", Style::Danger),
            ("warning", "exclamation-triangle", Style::Warning),
            ("info", "info-circle", Style::Info),
            ("success", "check-circle", Style::Success),
            ("system", "cogs", Style::Primary),
            ("user", "user", Style::Primary),
            ("debug", "bug", Style::Primary),
            ("network", "sitemap", Style::Primary),
            ("security", "shield-alt", Style::Primary),
        ];
        for (keyword, icon, style) in expected {
            let p = classify(keyword);
            assert_eq!(p.icon, icon, "icon mismatch for '{keyword}'");
            assert_eq!(p.style, style, "style mismatch for '{keyword}'");
        }
    }

    #[test]
    fn unrecognised_input_yields_default_pair() {
        let p = classify("invalid_level");
        assert_eq!(p.icon, "comment");
        assert_eq!(p.style, Style::Primary);

        let p = classify("");
        assert_eq!(p.icon, "comment");
        assert_eq!(p.style, Style::Primary);
    }

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(classify("ERROR").icon, "times-circle");
        assert_eq!(classify("Warning").icon, "exclamation-triangle");
    }

    #[test]
    fn message_scan_picks_first_table_keyword() {
        // "warning" appears first in the text, but "error" is earlier in the
        // table, so the error presentation wins.
        let p = classify_message("warning: an error occurred");
        assert_eq!(p.icon, "times-circle");
        assert_eq!(p.style, Style::Danger);

        // No "error" present: "warning" is now the earliest table match.
        let p = classify_message("user saw a warning on the network");
        assert_eq!(p.icon, "exclamation-triangle");
    }

    #[test]
    fn message_without_keywords_yields_default() {
        let p = classify_message("all quiet");
        assert_eq!(p.icon, "comment");
        assert_eq!(p.style, Style::Primary);
    }
}
