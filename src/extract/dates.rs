//! Date grammar shared by the extractors, plus the tenure computer.
//!
//! A date range is the anchor of every experience entry. Three shapes are
//! recognised, most specific first: `Month Day, Year to Month Day, Year`,
//! `Month Year – Month Year`, and `Year – Year`, with `–`, `—`, `-`, `‑`,
//! or the literal `to` as separator and `Present`/`Current` permitted as
//! the end. Extraction normalises to `"Month Year"` / `"Year"` strings;
//! persistence normalises to `YYYY-MM-DD` via [`to_date_string`].

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

const MONTH: &str = "Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?";
const SEP: &str = r"\s*(?:[\u{2013}\u{2014}\u{2011}-]+|\bto\b)\s*";

static MDY_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTH})\.?\s+(\d{{1,2}}),?\s+(\d{{4}}){SEP}(?:(Present|Current)\b|({MONTH})\.?\s+(\d{{1,2}}),?\s+(\d{{4}}))"
    ))
    .expect("invalid month-day-year range regex")
});

static MONTH_YEAR_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTH})\.?,?\s+(\d{{4}}){SEP}(?:(Present|Current)\b|({MONTH})\.?,?\s+(\d{{4}}))"
    ))
    .expect("invalid month-year range regex")
});

static YEAR_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{4}}){SEP}(?:(Present|Current)\b|(\d{{4}}))\b"
    ))
    .expect("invalid year range regex")
});

static PRESENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(present|current)\s*$").expect("invalid present regex"));

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("invalid iso regex"));

static MONTH_YEAR_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^({MONTH})\.?,?\s+(?:\d{{1,2}},?\s+)?(\d{{4}})$"))
        .expect("invalid month-year regex")
});

/// A recognised date range within one line. `prefix`/`suffix` carry the
/// line text on either side of the match for the same-line split.
#[derive(Debug, Clone, PartialEq)]
pub struct DateAnchor {
    pub start: String,
    pub end: String,
    pub prefix: String,
    pub suffix: String,
}

impl DateAnchor {
    pub fn end_is_open(&self) -> bool {
        PRESENT.is_match(&self.end)
    }
}

fn title_case_month(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn year_in_band(year: i32) -> bool {
    (1900..=2100).contains(&year)
}

/// Scans a line for a date range. Stateless: a fresh scan per call, no
/// cursor carry-over between lines.
pub fn find_date_anchor(line: &str) -> Option<DateAnchor> {
    if let Some(caps) = MDY_RANGE.captures(line) {
        let start_year: i32 = caps[3].parse().ok()?;
        let start = format!("{} {}", title_case_month(&caps[1]), &caps[3]);
        let (end, end_year) = match caps.get(4) {
            Some(p) => (title_case_month(p.as_str()), None),
            None => {
                let y: i32 = caps[7].parse().ok()?;
                (format!("{} {}", title_case_month(&caps[5]), &caps[7]), Some(y))
            }
        };
        if !year_in_band(start_year) || end_year.is_some_and(|y| !year_in_band(y) || y < start_year)
        {
            return None;
        }
        let m = caps.get(0).unwrap();
        return Some(DateAnchor {
            start,
            end,
            prefix: line[..m.start()].to_string(),
            suffix: line[m.end()..].to_string(),
        });
    }

    if let Some(caps) = MONTH_YEAR_RANGE.captures(line) {
        let start_year: i32 = caps[2].parse().ok()?;
        let start = format!("{} {}", title_case_month(&caps[1]), &caps[2]);
        let (end, end_year) = match caps.get(3) {
            Some(p) => (title_case_month(p.as_str()), None),
            None => {
                let y: i32 = caps[5].parse().ok()?;
                (format!("{} {}", title_case_month(&caps[4]), &caps[5]), Some(y))
            }
        };
        if !year_in_band(start_year) || end_year.is_some_and(|y| !year_in_band(y) || y < start_year)
        {
            return None;
        }
        let m = caps.get(0).unwrap();
        return Some(DateAnchor {
            start,
            end,
            prefix: line[..m.start()].to_string(),
            suffix: line[m.end()..].to_string(),
        });
    }

    if let Some(caps) = YEAR_RANGE.captures(line) {
        let start_year: i32 = caps[1].parse().ok()?;
        let (end, end_year) = match caps.get(2) {
            Some(p) => (title_case_month(p.as_str()), None),
            None => {
                let y: i32 = caps[3].parse().ok()?;
                (caps[3].to_string(), Some(y))
            }
        };
        if !year_in_band(start_year) || end_year.is_some_and(|y| !year_in_band(y) || y < start_year)
        {
            return None;
        }
        let m = caps.get(0).unwrap();
        return Some(DateAnchor {
            start: caps[1].to_string(),
            end,
            prefix: line[..m.start()].to_string(),
            suffix: line[m.end()..].to_string(),
        });
    }

    None
}

pub fn is_present(raw: &str) -> bool {
    PRESENT.is_match(raw)
}

fn month_number(raw: &str) -> Option<u32> {
    let lower = raw.trim_end_matches('.').to_lowercase();
    let n = match lower.as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(n)
}

/// Parses an extraction-boundary date string (`"July 2009"`, `"2009"`,
/// `"March 15, 2018"`, or ISO) to a `NaiveDate` with missing components
/// pinned to 1.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if ISO_DATE.is_match(trimmed) {
        return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok();
    }
    if let Some(caps) = MONTH_YEAR_ONLY.captures(trimmed) {
        let month = month_number(&caps[1])?;
        let year: i32 = caps[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }
    if let Ok(year) = trimmed.parse::<i32>() {
        if year_in_band(year) {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }
    None
}

/// Whole months between two dates, clamped at zero.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let delta = (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
    delta.max(0) as u32
}

/// Sums tenure months over entries whose dates parse, `now` standing in
/// for missing or `Present`/`Current` ends.
///
/// Overlapping spans double-count: entries are summed independently with
/// no interval merging. Known limitation carried over from the upstream
/// behaviour this reproduces.
pub fn total_experience_months<'a, I>(spans: I, now: NaiveDate) -> u32
where
    I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    let mut total = 0u32;
    for (start_raw, end_raw) in spans {
        let Some(start) = start_raw.and_then(parse_flexible_date) else {
            continue;
        };
        let end = match end_raw {
            None => now,
            Some(e) if is_present(e) => now,
            Some(e) => match parse_flexible_date(e) {
                Some(d) => d,
                None => continue,
            },
        };
        total += months_between(start, end);
    }
    total
}

/// Derived years of experience: `floor(total_months / 12)`.
pub fn total_experience_years<'a, I>(spans: I, now: NaiveDate) -> u32
where
    I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    total_experience_months(spans, now) / 12
}

/// Normalises a date string for the persistence boundary.
///
/// Accepts `YYYY-MM-DD` unchanged (applying it twice is a no-op), maps
/// `Mon(th)? Year` to `YYYY-MM-01`, and returns `None` for everything
/// else — including bare years, which the store treats as missing.
pub fn to_date_string(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if ISO_DATE.is_match(trimmed) {
        return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .map(|d| d.format("%Y-%m-%d").to_string());
    }
    let caps = MONTH_YEAR_ONLY.captures(trimmed)?;
    let month = month_number(&caps[1])?;
    let year: i32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Sentinel stored when an experience row has no detected start date.
/// Storage-only; never appears in a parsed record.
pub fn missing_start_sentinel() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).expect("static date")
}
