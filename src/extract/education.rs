//! Degree-anchored education extraction, restricted to the EDUCATION
//! window.

use regex::Regex;
use std::sync::LazyLock;

use crate::extract::lines::word_count;
use crate::extract::sections::{
    find_section_lines, is_all_caps_header, EDUCATION_TERMINATOR_MIN_LEN, HEADER_MIN_LEN,
};
use crate::lexicons::contains_region_keyword;
use crate::models::record::EducationEntry;

// Longest header first: `EDUCATIONAL BACKGROUND` must not be clipped to
// a bare `EDUCATION` match.
static EDUCATION_HEADERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\s*EDUCATIONAL\s+BACKGROUND",
        r"^\s*EDUCATIONAL\s+ATTAINMENT",
        r"^\s*ACADEMIC\s+BACKGROUND",
        r"^\s*ACADEMIC\s+QUALIFICATIONS",
        r"^\s*EDUCATION\s*(?:&|AND)\s*CERTIFICATIONS",
        r"^\s*EDUCATION",
    ]
    .iter()
    .map(|p| Regex::new(&format!(r"(?i){p}")).expect("invalid education header regex"))
    .collect()
});

// Most specific first. Two-letter abbreviations require periods so that
// prose words ("as", "ms") cannot anchor an entry.
static DEGREE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(Bachelor of Science in [A-Za-z &-]+)",
        r"(?i)\b(Bachelor of Arts in [A-Za-z &-]+)",
        r"(?i)\b(Master of Science in [A-Za-z &-]+)",
        r"(?i)\b(Master of Arts in [A-Za-z &-]+)",
        r"(?i)\b(Doctor of [A-Za-z &-]+)",
        r"(?i)\b(Bachelor of [A-Za-z]+)",
        r"(?i)\b(Master of [A-Za-z]+)",
        r"\b(BSN)\b",
        r"(?i)\b((?:Chemical|Mechanical|Electrical|Civil) Engineering Technology)\b",
        r"\b(B\.S\.[A-Za-z]*|B\.A\.|M\.S\.|M\.A\.)",
        r"\b(MBA)\b",
        r"\b(Ph\.?D\.?)\b",
        r"(?i)\b(Associate(?:'s)? (?:Degree|of [A-Za-z ]+))\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid degree regex"))
    .collect()
});

static FIELD_OF_STUDY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:Focus on|Major in|Specialization(?:\s+in)?|Concentration(?:\s+in)?|Emphasis(?:\s+in)?|Specializing in)\s*:?\s*(.+)$")
        .expect("invalid field-of-study regex")
});

static STATUS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:(?:1st|2nd|3rd|4th|5th)\s+Year\s+Student|Freshman|Sophomore|Junior|Senior\s+Year|Graduated|Graduate|Undergraduate)\s*\.?\s*$")
        .expect("invalid status regex")
});

static INSTITUTION_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:University|College|Institute|School|Academy|Polytechnic)\b")
        .expect("invalid institution keyword regex")
});

static INSTITUTION_SUBLABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:Graduate Studies|Undergraduate Studies|Tertiary|Secondary|Vocational)\s*:\s*")
        .expect("invalid sublabel regex")
});

static TRAILING_YEARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s,|\u{2013}\u{2014}-]*\(?\b(?:19|20)\d{2}(?:\s*[\u{2013}\u{2014}-]\s*(?:(?:19|20)\d{2}|Present|Current))?\)?\s*$")
        .expect("invalid trailing years regex")
});

static GRADUATED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Graduat(?:ed|ion)\s*:?\s*(?:(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?\s+)?(\d{4})")
        .expect("invalid graduated regex")
});

static YEAR_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{4})\s*(?:[\u{2013}\u{2014}-]+|\bto\b)\s*(?:(Present|Current)\b|(\d{4}))")
        .expect("invalid year range regex")
});

static BARE_YEAR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(?:Class of|Batch)\s*:?\s*)?(\d{4})\s*$").expect("invalid bare year regex")
});

fn year_in_band(year: i32) -> bool {
    (1960..=2100).contains(&year)
}

fn clean_degree(raw: &str) -> String {
    raw.trim().trim_end_matches([',', ';']).trim().to_string()
}

/// Strips education sub-labels, trailing year spans, and a trailing
/// location from an institution line. A stripped location is returned
/// separately.
fn clean_institution(raw: &str) -> (String, Option<String>) {
    let mut name = INSTITUTION_SUBLABEL.replace(raw.trim(), "").to_string();
    let mut location = None;

    if let Some((head, tail)) = name.split_once('|') {
        let tail = tail.trim();
        if contains_region_keyword(tail) && tail.len() < 80 {
            location = Some(tail.to_string());
        }
        name = head.trim().to_string();
    }

    name = TRAILING_YEARS.replace(&name, "").trim().to_string();

    if location.is_none() {
        if let Some(pos) = name.rfind(',') {
            let tail = name[pos + 1..].trim();
            if !tail.is_empty() && tail.len() < 80 && contains_region_keyword(tail) {
                location = Some(tail.to_string());
                name = name[..pos].trim().to_string();
            }
        }
    }

    (name.trim_end_matches([',', ';']).trim().to_string(), location)
}

fn find_degree(line: &str) -> Option<String> {
    for re in DEGREE_PATTERNS.iter() {
        if let Some(caps) = re.captures(line) {
            return Some(clean_degree(&caps[1]));
        }
    }
    None
}

fn looks_like_education_location(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() < 80
        && word_count(trimmed) <= 6
        && contains_region_keyword(trimmed)
        && trimmed.chars().next().is_some_and(char::is_uppercase)
}

/// Extracts education entries from the EDUCATION window.
pub fn extract_education(text: &str) -> Vec<EducationEntry> {
    let header_refs: Vec<&Regex> = EDUCATION_HEADERS.iter().collect();
    let Some(window) = find_section_lines(text, &header_refs, EDUCATION_TERMINATOR_MIN_LEN) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for (i, line) in window.iter().enumerate() {
        let Some(degree) = find_degree(line) else {
            continue;
        };
        entries.push(build_entry(&window, i, degree, line));
    }
    entries
}

fn build_entry(
    window: &[&str],
    i: usize,
    degree: String,
    degree_line: &str,
) -> EducationEntry {
    let mut entry = EducationEntry {
        degree: Some(degree),
        ..Default::default()
    };

    // Field of study: the next 2 lines.
    for line in window.iter().skip(i + 1).take(2) {
        if let Some(caps) = FIELD_OF_STUDY.captures(line) {
            entry.field_of_study = Some(caps[1].trim().trim_end_matches('.').to_string());
            break;
        }
    }

    // Status: a whole-line marker in the next 3 lines.
    for line in window.iter().skip(i + 1).take(3) {
        if STATUS_LINE.is_match(line) {
            entry.status = Some(line.trim().trim_end_matches('.').to_string());
            break;
        }
    }

    // Institution: 3 lines before, then 3 after.
    let before = (1..=3usize).filter_map(|d| i.checked_sub(d)).collect::<Vec<_>>();
    let after = (i + 1..=i + 3).filter(|&j| j < window.len()).collect::<Vec<_>>();
    for j in before.into_iter().chain(after) {
        let cand = window[j].trim();
        if cand.len() >= 150
            || !INSTITUTION_KEYWORD.is_match(cand)
            || is_all_caps_header(cand, HEADER_MIN_LEN)
        {
            continue;
        }
        let (name, loc) = clean_institution(cand);
        if name.is_empty() {
            continue;
        }
        entry.institution = Some(name);
        if entry.institution_location.is_none() {
            entry.institution_location = loc;
        }
        break;
    }

    // Year: the degree line itself first, then a 5-line scan.
    if let Some(caps) = GRADUATED_DATE.captures(degree_line) {
        if let Ok(year) = caps[1].parse::<i32>() {
            if year_in_band(year) {
                entry.year = Some(year);
            }
        }
    }
    if entry.year.is_none() {
        for line in window.iter().skip(i + 1).take(5) {
            if let Some(caps) = GRADUATED_DATE.captures(line) {
                if let Ok(year) = caps[1].parse::<i32>() {
                    if year_in_band(year) {
                        entry.year = Some(year);
                        break;
                    }
                }
            }
            if let Some(caps) = YEAR_RANGE.captures(line) {
                let start: Option<i32> = caps[1].parse().ok().filter(|y| year_in_band(*y));
                if let Some(start_year) = start {
                    entry.start_date = Some(start_year.to_string());
                    if caps.get(2).is_some() {
                        // Present/Current: still enrolled, year stays unset.
                        entry.end_date = Some("Present".to_string());
                    } else if let Ok(end) = caps[3].parse::<i32>() {
                        if year_in_band(end) && end >= start_year {
                            entry.end_date = Some(end.to_string());
                            entry.year = Some(end);
                        }
                    }
                    break;
                }
            }
            if let Some(caps) = BARE_YEAR_LINE.captures(line) {
                if let Ok(year) = caps[1].parse::<i32>() {
                    if year_in_band(year) {
                        entry.year = Some(year);
                        break;
                    }
                }
            }
        }
    }

    // Location: a ±2 / +6 neighbourhood around the degree line.
    if entry.institution_location.is_none() {
        let lo = i.saturating_sub(2);
        let hi = (i + 6).min(window.len().saturating_sub(1));
        for line in window.iter().take(hi + 1).skip(lo) {
            if looks_like_education_location(line)
                && entry
                    .institution
                    .as_deref()
                    .is_none_or(|inst| !line.trim().eq_ignore_ascii_case(inst))
            {
                entry.institution_location = Some(line.trim().to_string());
                break;
            }
        }
    }

    entry
}
