//! Post-processing passes over the winning record: experience-type
//! inference, employer/department repair, and description sanitisation.
//! Each pass is no-op-on-failure — a partial record beats no record.

use regex::Regex;
use std::sync::LazyLock;

use crate::extract::experience::split_employer_location;
use crate::extract::sections::{is_all_caps_header, HEADER_MIN_LEN};
use crate::lexicons::{contains_company_keyword, match_known_facility};
use crate::models::record::{ExperienceEntry, ExperienceType, ParsedRecord};

static CLINICAL_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)clinical\s+placement|rotation|practicum|preceptorship")
        .expect("invalid clinical keyword regex")
});

static OJT_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bOJT\b|on the job|internship|intern\b|trainee|training")
        .expect("invalid ojt keyword regex")
});

static VOLUNTEER_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)volunteer|community service|pro bono|medical mission")
        .expect("invalid volunteer keyword regex")
});

static CLINICAL_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*CLINICAL\s+PLACEMENT").expect("invalid clinical header regex")
});

static VOLUNTEER_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*VOLUNTEER\s+EXPERIENCE").expect("invalid volunteer header regex")
});

/// Runs all post-processors in order.
pub fn run(record: &mut ParsedRecord, raw_text: &str) {
    infer_experience_types(record, raw_text);
    repair_employer_department(record);
    sanitize_descriptions(record);
}

fn section_body(text: &str, header: &Regex) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.iter().position(|l| header.is_match(l))?;
    let mut body = String::new();
    for line in lines.iter().skip(start + 1) {
        if is_all_caps_header(line, HEADER_MIN_LEN) {
            break;
        }
        body.push_str(&line.to_lowercase());
        body.push('\n');
    }
    Some(body)
}

/// Re-categorises entries still typed `employment` by keyword, then by
/// where the employer sits in the source text.
pub fn infer_experience_types(record: &mut ParsedRecord, raw_text: &str) {
    let clinical_body = section_body(raw_text, &CLINICAL_HEADER);
    let volunteer_body = section_body(raw_text, &VOLUNTEER_HEADER);

    for entry in &mut record.experience {
        if entry.kind != ExperienceType::Employment {
            continue;
        }

        let haystack = format!(
            "{} {}",
            entry.position.as_deref().unwrap_or(""),
            entry.employer.as_deref().unwrap_or("")
        );

        if CLINICAL_KEYWORDS.is_match(&haystack) {
            entry.kind = ExperienceType::ClinicalPlacement;
            continue;
        }
        if OJT_KEYWORDS.is_match(&haystack) {
            entry.kind = ExperienceType::Ojt;
            continue;
        }
        if VOLUNTEER_KEYWORDS.is_match(&haystack) {
            entry.kind = ExperienceType::Volunteer;
            continue;
        }

        // Employer appearing under a disqualifying section header upgrades
        // the type even when the entry text itself is neutral.
        if let Some(employer) = entry.employer.as_deref() {
            let needle = employer.to_lowercase();
            if clinical_body.as_deref().is_some_and(|b| b.contains(&needle)) {
                entry.kind = ExperienceType::ClinicalPlacement;
            } else if volunteer_body.as_deref().is_some_and(|b| b.contains(&needle)) {
                entry.kind = ExperienceType::Volunteer;
            }
        }
    }
}

fn employer_is_plausible(employer: &str) -> bool {
    contains_company_keyword(employer) || match_known_facility(employer).is_some()
}

fn description_bullets(entry: &ExperienceEntry) -> Vec<String> {
    entry
        .description
        .as_deref()
        .map(|d| {
            d.lines()
                .map(|l| l.trim_start_matches('\u{2022}').trim().to_string())
                .filter(|l| !l.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn rejoin_bullets(bullets: &[String]) -> Option<String> {
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

/// When the employer slot holds something that is clearly not an
/// organisation, hunt the description bullets for a line that is, promote
/// it, and demote the old value to `department`.
pub fn repair_employer_department(record: &mut ParsedRecord) {
    for entry in &mut record.experience {
        if entry
            .employer
            .as_deref()
            .is_some_and(employer_is_plausible)
        {
            continue;
        }

        let bullets = description_bullets(entry);
        let Some(pos) = bullets.iter().position(|b| employer_is_plausible(b)) else {
            continue;
        };

        let (new_employer, location) = split_employer_location(&bullets[pos]);
        if new_employer.is_empty() {
            continue;
        }

        let former = entry.employer.replace(new_employer);
        if entry.location.is_none() {
            entry.location = location;
        }
        if entry.department.is_none() {
            entry.department = former;
        }

        let remaining: Vec<String> = bullets
            .into_iter()
            .enumerate()
            .filter_map(|(i, b)| (i != pos).then_some(b))
            .collect();
        entry.description = rejoin_bullets(&remaining);
    }
}

/// Drops bullets that duplicate the entry's own fields: lines containing
/// the employer (under 120 chars), or equal to the location or
/// department. An emptied description is omitted.
pub fn sanitize_descriptions(record: &mut ParsedRecord) {
    for entry in &mut record.experience {
        let bullets = description_bullets(entry);
        if bullets.is_empty() {
            continue;
        }

        let employer = entry.employer.as_deref().map(str::to_lowercase);
        let location = entry.location.as_deref();
        let department = entry.department.as_deref();

        let kept: Vec<String> = bullets
            .into_iter()
            .filter(|b| {
                if let Some(emp) = employer.as_deref() {
                    if b.len() < 120 && b.to_lowercase().contains(emp) {
                        return false;
                    }
                }
                if location.is_some_and(|l| b.eq_ignore_ascii_case(l)) {
                    return false;
                }
                if department.is_some_and(|d| b.eq_ignore_ascii_case(d)) {
                    return false;
                }
                true
            })
            .collect();

        entry.description = rejoin_bullets(&kept);
    }
}
