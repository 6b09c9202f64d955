//! Section indexing: ALL-CAPS header detection, section windows for the
//! field extractors, and the exclusion mask that keeps the experience
//! extractor out of regions that must not yield entries.

use regex::Regex;
use std::sync::LazyLock;

/// Minimum length for a generic ALL-CAPS header to terminate a region.
pub const HEADER_MIN_LEN: usize = 8;
/// Education windows terminate on a longer header to survive short shouty
/// lines inside the section.
pub const EDUCATION_TERMINATOR_MIN_LEN: usize = 10;
/// Uppercase-letter ratio above which a line reads as a header.
pub const HEADER_UPPER_RATIO: f32 = 0.7;

/// Headers that open regions the experience extractor must not enter.
static EXCLUDED_SECTION_HEADERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\s*EDUCATION",
        r"^\s*HONORS?\s*(?:&|AND)\s*AWARDS",
        r"^\s*SEMINARS?\s*(?:/|&|AND)?\s*TRAININGS?\s+ATTENDED",
        r"^\s*TRAININGS?\s+(?:AND\s+SEMINARS?\s+)?ATTENDED",
        r"^\s*CLINICAL\s+INTERNSHIP",
        r"^\s*PERSONAL\s+INFORMATION",
        r"^\s*CHARACTER\s+REFERENCES?",
        r"^\s*MEMBERSHIPS?",
        r"^\s*LICENSES?\s*(?:&|AND)\s*CERTIFICATIONS?",
        r"^\s*CONTINUING\s+EDUCATION",
        r"^\s*ADDITIONAL\s+INFORMATION",
    ]
    .iter()
    .map(|p| Regex::new(&format!(r"(?i){p}")).expect("invalid section header regex"))
    .collect()
});

/// True when a trimmed line reads as an ALL-CAPS section header of at
/// least `min_len` characters: mostly uppercase letters, optionally
/// suffixed with `:`.
pub fn is_all_caps_header(line: &str, min_len: usize) -> bool {
    let trimmed = line.trim().trim_end_matches(':').trim();
    if trimmed.len() < min_len {
        return false;
    }
    let letters: Vec<char> = trimmed.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return false;
    }
    let upper = letters.iter().filter(|c| c.is_uppercase()).count();
    upper as f32 / letters.len() as f32 > HEADER_UPPER_RATIO
}

fn is_excluded_header(line: &str) -> bool {
    EXCLUDED_SECTION_HEADERS.iter().any(|re| re.is_match(line))
}

/// Blanks every line inside an excluded region, preserving line numbering
/// so anchor indices stay aligned with the original text. A region runs
/// from its header to the next ALL-CAPS header of at least
/// [`HEADER_MIN_LEN`] characters.
pub fn mask_excluded_regions(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut masked: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_excluded = false;

    for line in &lines {
        if is_excluded_header(line) {
            in_excluded = true;
            masked.push(String::new());
            continue;
        }
        if in_excluded && is_all_caps_header(line, HEADER_MIN_LEN) && !is_excluded_header(line) {
            in_excluded = false;
        }
        if in_excluded {
            masked.push(String::new());
        } else {
            masked.push((*line).to_string());
        }
    }

    masked.join("\n")
}

/// Locates the first section opened by any of `header_patterns` and
/// returns its body lines, up to the next ALL-CAPS header of at least
/// `terminator_min_len` characters. Patterns are tried in order, so
/// callers list the longest header first.
pub fn find_section_lines<'a>(
    text: &'a str,
    header_patterns: &[&Regex],
    terminator_min_len: usize,
) -> Option<Vec<&'a str>> {
    let lines: Vec<&str> = text.lines().collect();
    let start = header_patterns.iter().find_map(|re| {
        lines
            .iter()
            .position(|line| re.is_match(line) && is_all_caps_header(line, 4))
    })?;

    let mut body = Vec::new();
    for line in lines.iter().skip(start + 1) {
        if is_all_caps_header(line, terminator_min_len) {
            break;
        }
        body.push(*line);
    }
    Some(body)
}
