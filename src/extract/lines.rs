//! Line-shape heuristics shared across the extractors.

use regex::Regex;
use std::sync::LazyLock;

use crate::lexicons;

static BULLET_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[\u{2022}\u{25CF}\u{25AA}\u{25E6}\u{25CB}\u{00B7}\u{2023}\u{2043}*]|[-\u{2013}\u{2014}])\s+")
        .expect("invalid bullet regex")
});

static LOCATION_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\p{Lu}[\p{L}.'\- ]{1,40},\s*\p{Lu}[\p{L}.'\- ]{1,40}(?:,\s*\p{Lu}[\p{L}.'\- ]{1,40})?$",
    )
    .expect("invalid location shape regex")
});

static PAGE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-\u{2013}\u{2014}_=]{1,}\s*(?:Page\s*)?\d+\s*(?:of|/)\s*\d+\s*[-\u{2013}\u{2014}_=]{1,}\s*$")
        .expect("invalid page separator regex")
});

static SUBORDINATING_PROSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:because|which|where|although|while|since|whereby|so that|in order to|such as|resulting in)\b")
        .expect("invalid prose regex")
});

/// Lines opening with a bullet glyph (or a dash used as one) carry
/// description text, never an entry anchor.
pub fn is_bullet_line(line: &str) -> bool {
    BULLET_PREFIX.is_match(line)
}

pub fn strip_bullet(line: &str) -> String {
    BULLET_PREFIX.replace(line, "").trim().to_string()
}

/// Strict `City, Region[, Country]` shape on the whole line.
pub fn matches_location_shape(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() < 80 && LOCATION_SHAPE.is_match(trimmed)
}

/// Looser location test: the strict shape, or a short line carrying a
/// known regional keyword.
pub fn looks_like_location(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.len() >= 80 {
        return false;
    }
    matches_location_shape(trimmed)
        || (trimmed.len() <= 60
            && word_count(trimmed) <= 6
            && lexicons::contains_region_keyword(trimmed))
}

/// Page-break artifacts of the form `-- 1 of 2 --`.
pub fn is_page_separator(line: &str) -> bool {
    PAGE_SEPARATOR.is_match(line)
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn has_subordinating_prose(text: &str) -> bool {
    SUBORDINATING_PROSE.is_match(text)
}

/// An "employer" that reads as a sentence is a description line that leaked
/// into the wrong slot: more than 8 whitespace tokens, subordinating
/// prose, or a trailing `.`/`!`.
pub fn looks_like_sentence(text: &str) -> bool {
    let trimmed = text.trim();
    word_count(trimmed) > 8
        || has_subordinating_prose(trimmed)
        || trimmed.ends_with('.')
        || trimmed.ends_with('!')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_detection_and_strip() {
        assert!(is_bullet_line("• Managed a 12-bed ICU"));
        assert!(is_bullet_line("- Assisted in triage"));
        assert!(is_bullet_line("  ▪ Charted vitals"));
        assert!(!is_bullet_line("Staff Nurse - Medical Oncology")); // dash mid-line
        assert_eq!(strip_bullet("• Managed a 12-bed ICU"), "Managed a 12-bed ICU");
    }

    #[test]
    fn test_location_shape() {
        assert!(matches_location_shape("Los Angeles, California"));
        assert!(matches_location_shape("Quezon City, Metro Manila, Philippines"));
        assert!(!matches_location_shape("Managed patients, charted vitals"));
        assert!(!matches_location_shape("cebu city, philippines")); // lowercase
    }

    #[test]
    fn test_looks_like_location_region_keyword() {
        assert!(looks_like_location("Makati City Philippines"));
        assert!(!looks_like_location(
            "Completed clinical rotation in Manila with over two hundred supervised hours of work"
        ));
    }

    #[test]
    fn test_page_separator() {
        assert!(is_page_separator("-- 1 of 2 --"));
        assert!(is_page_separator("— Page 2 of 3 —"));
        assert!(!is_page_separator("2 of the 3 wards"));
    }

    #[test]
    fn test_sentence_shaped_employer() {
        assert!(looks_like_sentence(
            "Provided direct patient care in a fast paced unit while supervising aides"
        ));
        assert!(looks_like_sentence("Cared for patients."));
        assert!(looks_like_sentence("Unit which handles oncology"));
        assert!(!looks_like_sentence("St. Luke's Medical Center, Quezon City")); // trailing period is part of abbreviation? no — plain name
    }
}
