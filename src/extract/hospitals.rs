//! Facility-name extraction: curated set membership first, then a
//! proper-noun facility phrase scan.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::lexicons::KNOWN_FACILITIES;

static FACILITY_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b((?:\p{Lu}[\p{L}'.\u{2019}-]+\s+){1,6}(?:Hospital|Medical Center|Medical Centre|Health Center))\b",
    )
    .expect("invalid facility phrase regex")
});

const PHRASE_MIN: usize = 10;
const PHRASE_MAX: usize = 80;

/// Ordered list of distinct facility names mentioned in the body. Known
/// facilities are canonicalised to the lexicon spelling; remaining
/// facility-shaped phrases are kept as written. De-duplication is
/// case-insensitive against the display form.
pub fn extract_hospitals(text: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<String> = Vec::new();
    let lower = text.to_lowercase();

    for facility in KNOWN_FACILITIES {
        if lower.contains(&facility.to_lowercase()) && seen.insert(facility.to_lowercase()) {
            out.push((*facility).to_string());
        }
    }

    for caps in FACILITY_PHRASE.captures_iter(text) {
        let phrase = caps[1].trim().to_string();
        if !(PHRASE_MIN..=PHRASE_MAX).contains(&phrase.len()) {
            continue;
        }
        // A phrase that is a substring of an already-canonicalised name is
        // the same mention, not a new facility.
        let phrase_lower = phrase.to_lowercase();
        if out.iter().any(|known| known.to_lowercase().contains(&phrase_lower)) {
            continue;
        }
        if seen.insert(phrase_lower) {
            out.push(phrase);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_facility_canonicalised() {
        let text = "Worked at ST. LUKE'S MEDICAL CENTER and later at the medical city.";
        let hospitals = extract_hospitals(text);
        assert!(hospitals.contains(&"St. Luke's Medical Center".to_string()));
        assert!(hospitals.contains(&"The Medical City".to_string()));
    }

    #[test]
    fn test_phrase_scan_captures_unknown_facility() {
        let text = "Rotated through Batanes Provincial Hospital in 2018.";
        let hospitals = extract_hospitals(text);
        assert_eq!(hospitals, vec!["Batanes Provincial Hospital".to_string()]);
    }

    #[test]
    fn test_phrase_length_band() {
        // Below 10 chars rejected
        let hospitals = extract_hospitals("At A Hospital yesterday");
        assert!(hospitals.is_empty());
    }

    #[test]
    fn test_dedup_against_canonical_form() {
        let text = "Cedars-Sinai Medical Center\nCEDARS-SINAI MEDICAL CENTER";
        let hospitals = extract_hospitals(text);
        assert_eq!(hospitals.len(), 1);
    }

    #[test]
    fn test_order_is_first_seen() {
        let text = "Makati Medical Center then Philippine General Hospital";
        let hospitals = extract_hospitals(text);
        // curated scan runs in lexicon order first
        assert!(hospitals.contains(&"Philippine General Hospital".to_string()));
        assert!(hospitals.contains(&"Makati Medical Center".to_string()));
        assert_eq!(hospitals.len(), 2);
    }
}
