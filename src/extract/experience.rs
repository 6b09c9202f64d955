//! Date-anchored experience extraction with bidirectional, feature-scored
//! candidate ranking.
//!
//! Every line carrying a recognised date range is an entry anchor. The
//! position and employer are hunted in the anchor line itself, then in the
//! up-to-3 lines before and up-to-4 lines after, each candidate scored on
//! a weighted feature table; the best-scoring side wins. Description
//! bullets aggregate below the anchor until the block visibly ends.

use regex::Regex;
use std::sync::LazyLock;

use crate::extract::dates::{find_date_anchor, DateAnchor};
use crate::extract::lines::{
    has_subordinating_prose, is_bullet_line, is_page_separator, matches_location_shape,
    strip_bullet, word_count,
};
use crate::extract::sections::{is_all_caps_header, mask_excluded_regions, HEADER_MIN_LEN};
use crate::lexicons::{contains_company_keyword, contains_position_keyword, match_known_facility};
use crate::models::record::ExperienceEntry;

const BEFORE_WINDOW: usize = 3;
const AFTER_WINDOW: usize = 4;
const AFTER_WINDOW_TIEBREAK: i32 = 10;
const SAME_LINE_MIN: usize = 3;
const SAME_LINE_MAX: usize = 100;

static SEMESTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:1st|2nd|3rd|4th)\s+Semester\b").expect("invalid semester regex")
});

// Seminar/training rows read `<Date(s)> "Quoted Title"`.
static QUOTED_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[\"\u{201C}][^\"\u{201D}]{3,}[\"\u{201D}]\\s*$").expect("invalid quoted title regex")
});

static TRAILING_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s,|:;\u{2013}\u{2014}-]+$").expect("invalid trailing separator regex")
});

static LEADING_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s,|:;\u{2013}\u{2014}-]+").expect("invalid leading separator regex")
});

static PAREN_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.{3,80}?)\s*\(([^)]{3,80})\)\s*$").expect("invalid paren form regex")
});

static DASH_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+[\u{2013}\u{2014}-]\s+").expect("invalid dash split regex")
});

/// Extracts all experience entries from the body. The excluded-section
/// mask is applied first; entries can only anchor outside it.
pub fn extract_experience(text: &str) -> Vec<ExperienceEntry> {
    let masked = mask_excluded_regions(text);
    let lines: Vec<&str> = masked.lines().collect();
    let mut entries = Vec::new();

    for idx in 0..lines.len() {
        let line = lines[idx];
        if is_bullet_line(line) {
            continue;
        }
        let Some(anchor) = find_date_anchor(line) else {
            continue;
        };
        if SEMESTER.is_match(line) || QUOTED_TITLE.is_match(line) {
            continue;
        }
        entries.push(build_entry(&lines, idx, &anchor));
    }

    entries
}

fn clean_prefix(raw: &str) -> String {
    TRAILING_SEPARATORS.replace(raw.trim(), "").to_string()
}

fn clean_suffix(raw: &str) -> String {
    let stripped = LEADING_SEPARATORS.replace(raw.trim(), "");
    let stripped = stripped
        .strip_prefix("at ")
        .or_else(|| stripped.strip_prefix("At "))
        .unwrap_or(&stripped);
    TRAILING_SEPARATORS.replace(stripped.trim(), "").to_string()
}

fn same_line_band(text: &str) -> bool {
    (SAME_LINE_MIN..=SAME_LINE_MAX).contains(&text.len())
}

fn distance_bonus(distance: usize) -> i32 {
    match distance {
        1 => 25,
        2 => 15,
        3 => 5,
        _ => 0,
    }
}

fn score_position_candidate(candidate: &str, before: bool, distance: usize) -> i32 {
    let mut score = 0;
    if contains_position_keyword(candidate) {
        score += 40;
    }
    if before {
        score += 20;
    }
    score += distance_bonus(distance);
    if candidate.chars().next().is_some_and(char::is_uppercase) {
        score += 10;
    }
    let len = candidate.len();
    if len > 10 && len < 60 {
        score += 15;
    }
    if candidate.contains("Unknown") {
        score -= 50;
    }
    if contains_company_keyword(candidate) || match_known_facility(candidate).is_some() {
        score -= 30;
    }
    if matches_location_shape(candidate) {
        score -= 30;
    }
    if len < 5 || len > 80 {
        score -= 20;
    }
    if is_all_caps_header(candidate, 4) {
        score -= 15;
    }
    score
}

fn score_employer_candidate(candidate: &str, before: bool, distance: usize) -> i32 {
    let mut score = 0;
    if match_known_facility(candidate).is_some() {
        score += 50;
    }
    if contains_company_keyword(candidate) {
        score += 35;
    }
    if before {
        score += 20;
    }
    score += distance_bonus(distance);
    let len = candidate.len();
    if len > 10 && len < 60 {
        score += 15;
    }
    if candidate.contains("Unknown") {
        score -= 50;
    }
    if matches_location_shape(candidate) {
        score -= 30;
    }
    if contains_position_keyword(candidate) {
        score -= 25;
    }
    if word_count(candidate) > 8 {
        score -= 40;
    }
    if has_subordinating_prose(candidate) {
        score -= 50;
    }
    if candidate.ends_with('.') || candidate.ends_with('!') {
        score -= 30;
    }
    score
}

/// Candidate lines before the anchor, nearest first, paired with distance.
/// Bullet lines are description text of a prior entry, never candidates;
/// a section header or another date anchor closes the window entirely.
fn before_window<'a>(lines: &[&'a str], idx: usize) -> Vec<(usize, &'a str)> {
    let mut out = Vec::new();
    for distance in 1..=BEFORE_WINDOW {
        let Some(j) = idx.checked_sub(distance) else {
            break;
        };
        let line = lines[j];
        if is_all_caps_header(line, HEADER_MIN_LEN) || find_date_anchor(line).is_some() {
            break;
        }
        if is_bullet_line(line) {
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        out.push((distance, trimmed));
    }
    out
}

/// Candidate lines after the anchor, cut off on bullets, headers, or
/// another date anchor.
fn after_window<'a>(lines: &[&'a str], idx: usize) -> Vec<(usize, usize, &'a str)> {
    let mut out = Vec::new();
    for distance in 1..=AFTER_WINDOW {
        let j = idx + distance;
        let Some(line) = lines.get(j) else { break };
        if is_bullet_line(line) || is_all_caps_header(line, HEADER_MIN_LEN) {
            break;
        }
        if find_date_anchor(line).is_some() {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        out.push((j, distance, trimmed));
    }
    out
}

fn rank_position(
    before: &[(usize, &str)],
    after: &[(usize, usize, &str)],
    skip: Option<&str>,
) -> Option<String> {
    let not_skipped = |cand: &str| skip.is_none_or(|s| !cand.eq_ignore_ascii_case(s));

    let best_before = before
        .iter()
        .filter(|(_, cand)| not_skipped(cand))
        .map(|(distance, cand)| (score_position_candidate(cand, true, *distance), *cand))
        .max_by_key(|(score, _)| *score);
    let best_after = after
        .iter()
        .filter(|(_, _, cand)| not_skipped(cand))
        .map(|(_, distance, cand)| {
            (
                score_position_candidate(cand, false, *distance) + AFTER_WINDOW_TIEBREAK,
                *cand,
            )
        })
        .max_by_key(|(score, _)| *score);

    let winner = match (best_before, best_after) {
        (Some(b), Some(a)) => {
            if a.0 > b.0 {
                a
            } else {
                b
            }
        }
        (Some(b), None) => b,
        (None, Some(a)) => a,
        (None, None) => return None,
    };
    (winner.0 > 0).then(|| winner.1.to_string())
}

const EMPLOYER_ACCEPT: i32 = 40;

fn rank_employer_before(before: &[(usize, &str)], skip: Option<&str>) -> Option<String> {
    let best = before
        .iter()
        .filter(|(_, cand)| !is_all_caps_header(cand, HEADER_MIN_LEN))
        .filter(|(_, cand)| skip.is_none_or(|s| !cand.eq_ignore_ascii_case(s)))
        .map(|(distance, cand)| (score_employer_candidate(cand, true, *distance), *cand))
        .max_by_key(|(score, _)| *score)?;
    (best.0 >= EMPLOYER_ACCEPT).then(|| best.1.to_string())
}

/// Splits a facility line into employer and location on `|`, `•`, or a
/// comma followed by a location-shaped tail.
pub(crate) fn split_employer_location(line: &str) -> (String, Option<String>) {
    for sep in ['|', '\u{2022}'] {
        if let Some((head, tail)) = line.split_once(sep) {
            let head = head.trim();
            let tail = tail.trim();
            if !head.is_empty() && !tail.is_empty() && tail.len() < 80 {
                return (head.to_string(), Some(tail.to_string()));
            }
        }
    }
    // Comma-before-state: the shortest head whose tail reads as a location.
    let mut search_from = 0;
    while let Some(rel) = line[search_from..].find(',') {
        let pos = search_from + rel;
        let head = line[..pos].trim();
        let tail = line[pos + 1..].trim();
        if !head.is_empty() && matches_location_shape(tail) {
            return (head.to_string(), Some(tail.to_string()));
        }
        search_from = pos + 1;
    }
    (line.trim().to_string(), None)
}

/// Scans the after window for a facility-shaped line when the before
/// window produced no employer.
fn scan_after_for_employer(
    after: &[(usize, usize, &str)],
    skip: Option<&str>,
) -> Option<(usize, String, Option<String>)> {
    for (j, _, cand) in after {
        if skip.is_some_and(|s| cand.eq_ignore_ascii_case(s)) {
            continue;
        }
        if match_known_facility(cand).is_none() && !contains_company_keyword(cand) {
            continue;
        }
        let (employer, location) = split_employer_location(cand);
        if employer.is_empty() {
            continue;
        }
        return Some((*j, employer, location));
    }
    None
}

fn build_entry(lines: &[&str], idx: usize, anchor: &DateAnchor) -> ExperienceEntry {
    let mut position: Option<String> = None;
    let mut employer: Option<String> = None;
    let mut department: Option<String> = None;
    let mut location: Option<String> = None;
    let mut employer_line: Option<usize> = None;

    // 1. Same-line split. A keyworded prefix is final — later window
    // candidates never override it.
    let prefix = clean_prefix(&anchor.prefix);
    if same_line_band(&prefix) && contains_position_keyword(&prefix) {
        position = Some(prefix);
    }
    let suffix = clean_suffix(&anchor.suffix);
    if same_line_band(&suffix) {
        let (emp, loc) = split_employer_location(&suffix);
        if same_line_band(&emp) {
            employer = Some(emp);
            location = loc;
        }
    }

    // 2–4. Window ranking for whatever the anchor line left open.
    let before = before_window(lines, idx);
    let after = after_window(lines, idx);

    if position.is_none() {
        position = rank_position(&before, &after, employer.as_deref());
    }
    if employer.is_none() {
        employer = rank_employer_before(&before, position.as_deref());
        if employer.is_none() {
            if let Some((j, emp, loc)) = scan_after_for_employer(&after, position.as_deref()) {
                employer = Some(emp);
                employer_line = Some(j);
                if location.is_none() {
                    location = loc;
                }
            }
        }
    }

    // 5. Department: short free lines between the anchor and a below-anchor
    // employer line.
    if department.is_none() {
        if let Some(j) = employer_line {
            for k in idx + 1..j {
                let cand = lines[k].trim();
                if cand.is_empty()
                    || is_bullet_line(lines[k])
                    || find_date_anchor(cand).is_some()
                    || is_all_caps_header(cand, HEADER_MIN_LEN)
                {
                    continue;
                }
                if !(3..=60).contains(&cand.len()) {
                    continue;
                }
                let duplicates_chosen = position
                    .as_deref()
                    .is_some_and(|p| p.eq_ignore_ascii_case(cand))
                    || employer
                        .as_deref()
                        .is_some_and(|e| e.eq_ignore_ascii_case(cand));
                if duplicates_chosen {
                    continue;
                }
                department = Some(cand.to_string());
                break;
            }
        }
    }

    // 6. Embedded forms on the chosen position.
    if let Some(pos) = position.clone() {
        if let Some(caps) = PAREN_FORM.captures(&pos) {
            let inner = caps[2].trim().to_string();
            position = Some(caps[1].trim().to_string());
            if employer.is_none() {
                employer = Some(inner);
            }
        } else if let Some((left, right)) = pos.split_once(" at ") {
            if employer.is_none() && same_line_band(right.trim()) {
                position = Some(left.trim().to_string());
                employer = Some(right.trim().to_string());
            }
        } else if let Some(m) = DASH_SPLIT.find(&pos) {
            let left = pos[..m.start()].trim().to_string();
            let right = pos[m.end()..].trim().to_string();
            if !left.is_empty() && !right.is_empty() {
                let right_is_org =
                    match_known_facility(&right).is_some() || contains_company_keyword(&right);
                if right_is_org {
                    if employer.is_none() {
                        position = Some(left);
                        employer = Some(right);
                    }
                } else if department.is_none() {
                    position = Some(left);
                    department = Some(right);
                }
            }
        }
    }

    // 7. Location from the windows when no separator already yielded one.
    if location.is_none() {
        let employer_ref = employer.as_deref();
        location = before
            .iter()
            .map(|(_, cand)| *cand)
            .chain(after.iter().map(|(_, _, cand)| *cand))
            .find(|cand| {
                matches_location_shape(cand)
                    && cand.len() < 80
                    && employer_ref.is_none_or(|e| !cand.eq_ignore_ascii_case(e))
            })
            .map(str::to_string);
    }

    // 8. Description aggregation below the anchor.
    let description = collect_description(
        lines,
        idx,
        position.as_deref(),
        employer.as_deref(),
        location.as_deref(),
        department.as_deref(),
    );

    ExperienceEntry {
        employer,
        position,
        department,
        start_date: Some(anchor.start.clone()),
        end_date: Some(anchor.end.clone()),
        description,
        location,
        ..Default::default()
    }
}

fn collect_description(
    lines: &[&str],
    idx: usize,
    position: Option<&str>,
    employer: Option<&str>,
    location: Option<&str>,
    department: Option<&str>,
) -> Option<String> {
    let mut bullets: Vec<String> = Vec::new();
    let mut blank_run = 0;

    for line in lines.iter().skip(idx + 1) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run >= 2 {
                break;
            }
            continue;
        }
        blank_run = 0;

        let bullet = is_bullet_line(line);
        if !bullet && find_date_anchor(trimmed).is_some() {
            break;
        }
        if is_all_caps_header(trimmed, HEADER_MIN_LEN) {
            break;
        }
        if is_page_separator(trimmed) {
            break;
        }

        let equals_field = |field: Option<&str>| {
            field.is_some_and(|f| f.eq_ignore_ascii_case(trimmed))
        };
        if equals_field(position) || equals_field(location) || equals_field(department) {
            continue;
        }
        if let Some(emp) = employer {
            if trimmed.len() < 120
                && trimmed.to_lowercase().contains(&emp.to_lowercase())
            {
                continue;
            }
        }
        if matches_location_shape(trimmed) {
            continue;
        }

        if bullet {
            let stripped = strip_bullet(line);
            if !stripped.is_empty() {
                bullets.push(stripped);
            }
        } else if (10..=300).contains(&trimmed.len()) {
            bullets.push(trimmed.to_string());
        }
    }

    if bullets.is_empty() {
        None
    } else {
        Some(
            bullets
                .iter()
                .map(|b| format!("\u{2022} {b}"))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}
