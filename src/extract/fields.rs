//! Stateless field extractors: summary, graduation year, salary, address.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

use crate::extract::lines;
use crate::extract::sections::{find_section_lines, is_all_caps_header, HEADER_MIN_LEN};
use crate::lexicons;

static SUMMARY_HEADERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\s*PROFESSIONAL\s+SUMMARY",
        r"^\s*CAREER\s+SUMMARY",
        r"^\s*EXECUTIVE\s+SUMMARY",
        r"^\s*SUMMARY",
        r"^\s*CAREER\s+OBJECTIVES?",
        r"^\s*OBJECTIVES?",
        r"^\s*ABOUT\s+ME",
        r"^\s*PROFESSIONAL\s+PROFILE",
        r"^\s*PROFILE",
        r"^\s*PERSONAL\s+STATEMENT",
        r"^\s*OVERVIEW",
    ]
    .iter()
    .map(|p| Regex::new(&format!(r"(?i){p}")).expect("invalid summary header regex"))
    .collect()
});

static EDUCATION_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)graduat|Bachelor|Master|Doctorate|Ph\.?D|degree|diploma|university|college|B\.S|M\.S|MBA|B\.A|M\.A")
        .expect("invalid education keyword regex")
});

static GRADUATE_STEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)graduat").expect("invalid graduate stem regex"));

static FOUR_DIGIT_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("invalid year regex"));

static SALARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:(?:salary|compensation|pay|wage)s?\s*:?\s*)?(?:PHP|\u{20B1}|\$|USD)\s?\d[\d,]*(?:\.\d+)?",
    )
    .expect("invalid salary regex")
});

static EMAIL_OR_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)@|https?://|www\.").expect("invalid contact regex")
});

static PHONE_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d[\d\s().-]{6,})").expect("invalid phone regex")
});

static INSTITUTION_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:University|College|Institute|School|Academy|Polytechnic)\b")
        .expect("invalid institution regex")
});

const SUMMARY_WINDOW_CHARS: usize = 600;
const SUMMARY_MIN: usize = 20;
const SUMMARY_MAX: usize = 1500;
const ADDRESS_SCAN_CHARS: usize = 1500;

/// Extracts the professional summary: the text under the first summary-like
/// header, joined with single spaces, cut at the next ALL-CAPS header or
/// 600 characters. Accepted only in the 20–1500 character band.
pub fn extract_summary(text: &str) -> Option<String> {
    let header_refs: Vec<&Regex> = SUMMARY_HEADERS.iter().collect();
    let body = find_section_lines(text, &header_refs, HEADER_MIN_LEN)?;

    let mut joined = String::new();
    for line in body {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(trimmed);
        if joined.len() >= SUMMARY_WINDOW_CHARS {
            break;
        }
    }
    if joined.len() > SUMMARY_WINDOW_CHARS {
        let cut = joined
            .char_indices()
            .take_while(|(i, _)| *i <= SUMMARY_WINDOW_CHARS)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(joined.len());
        joined.truncate(cut);
        joined = joined.trim_end().to_string();
    }

    if (SUMMARY_MIN..=SUMMARY_MAX).contains(&joined.len()) {
        Some(joined)
    } else {
        None
    }
}

fn year_in_band(year: i32, now: NaiveDate) -> bool {
    (1960..=now.year() + 6).contains(&year)
}

/// Scans lines carrying education keywords for an in-band 4-digit year;
/// falls back to a 4-line window around any `graduat` stem.
pub fn extract_graduation_year(text: &str, now: NaiveDate) -> Option<i32> {
    let lines: Vec<&str> = text.lines().collect();

    for line in &lines {
        if !EDUCATION_KEYWORD.is_match(line) {
            continue;
        }
        for caps in FOUR_DIGIT_YEAR.captures_iter(line) {
            if let Ok(year) = caps[1].parse::<i32>() {
                if year_in_band(year, now) {
                    return Some(year);
                }
            }
        }
    }

    // Fallback: a short window around any "graduat" mention.
    for (i, line) in lines.iter().enumerate() {
        if !GRADUATE_STEM.is_match(line) {
            continue;
        }
        let lo = i.saturating_sub(2);
        let hi = (i + 2).min(lines.len().saturating_sub(1));
        for candidate in &lines[lo..=hi] {
            for caps in FOUR_DIGIT_YEAR.captures_iter(candidate) {
                if let Ok(year) = caps[1].parse::<i32>() {
                    if year_in_band(year, now) {
                        return Some(year);
                    }
                }
            }
        }
    }

    None
}

/// First currency-and-digits token, raw match returned.
pub fn extract_salary(text: &str) -> Option<String> {
    SALARY.find(text).map(|m| m.as_str().trim().to_string())
}

/// Picks the address line from the resume header: within the first ~1500
/// characters, the first 10–150 character line that is not contact info, a
/// section header, or an institution name, and that either matches a
/// `City, Region[, Country]` shape or carries a regional keyword.
pub fn extract_address(text: &str) -> Option<String> {
    let head: String = text.chars().take(ADDRESS_SCAN_CHARS).collect();

    for line in head.lines() {
        let trimmed = line.trim();
        if !(10..=150).contains(&trimmed.len()) {
            continue;
        }
        if EMAIL_OR_URL.is_match(trimmed) {
            continue;
        }
        if let Some(m) = PHONE_LIKE.find(trimmed) {
            // A phone number dominating the line disqualifies it; an address
            // may still contain a street number.
            if m.as_str().len() * 2 > trimmed.len() {
                continue;
            }
        }
        if is_all_caps_header(trimmed, HEADER_MIN_LEN) {
            continue;
        }
        if INSTITUTION_KEYWORD.is_match(trimmed) {
            continue;
        }
        if lines::matches_location_shape(trimmed) || lexicons::contains_region_keyword(trimmed) {
            return Some(trimmed.to_string());
        }
    }
    None
}
