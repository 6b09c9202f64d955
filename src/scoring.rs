//! Parse-confidence scoring.
//!
//! Judges a parsed record on a 0–100 scale. The hybrid orchestrator runs
//! this over the rule-based output (with the raw text, enabling the
//! missed-section penalties) and over the LLM output (without), and keeps
//! whichever record scores higher. Pure and deterministic.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::record::{ExperienceEntry, ExperienceType, ParsedRecord};

/// Rule-based records scoring at or above this skip the LLM entirely.
pub const RULE_CONFIDENCE_FLOOR: i32 = 55;

static WORK_SECTION_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bwork experience\b|\bprofessional experience\b|\bemployment history\b|\bwork history\b|\bemployed at\b|\bworked at\b")
        .expect("invalid work hint regex")
});

static CLINICAL_SECTION_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)clinical\s+(?:placement|rotation)|consolidation\s+hours")
        .expect("invalid clinical hint regex")
});

/// An entry's shape is sane when the position is short enough to be a
/// title and the employer is short enough to be a name.
fn has_sane_shape(entry: &ExperienceEntry) -> bool {
    let position_ok = entry.position.as_deref().is_some_and(|p| p.len() < 60);
    let employer_ok = entry.employer.as_deref().is_some_and(|e| {
        e.split_whitespace().count() <= 8 && !e.ends_with('.') && !e.ends_with('!')
    });
    position_ok && employer_ok
}

fn is_complete(entry: &ExperienceEntry) -> bool {
    entry.position.is_some() && entry.employer.is_some() && entry.start_date.is_some()
}

/// Scores `record`, optionally consulting the raw text for
/// missed-extraction penalties.
pub fn score(record: &ParsedRecord, raw_text: Option<&str>) -> i32 {
    let mut score = 0i32;

    if record
        .experience
        .iter()
        .any(|e| is_complete(e) && has_sane_shape(e))
    {
        score += 30;
    } else if !record.experience.is_empty() {
        score += 5;
    }

    if !record.experience.is_empty() {
        let incomplete = record
            .experience
            .iter()
            .filter(|e| e.position.is_none() || e.employer.is_none())
            .count();
        if incomplete * 2 > record.experience.len() {
            score -= 15;
        }
    }

    if record.education.iter().any(|e| {
        e.degree.is_some() && e.institution.as_deref().is_some_and(|i| i.len() < 80)
    }) {
        score += 25;
    } else if !record.education.is_empty() {
        score += 8;
    }

    if record.summary.as_deref().is_some_and(|s| s.len() > 30) {
        score += 10;
    }
    if !record.certifications.is_empty() {
        score += 10;
    }
    if record.skills.len() >= 3 {
        score += 10;
    }
    if record.address.is_some() {
        score += 5;
    }
    if record.experience.iter().any(|e| e.description.is_some()) {
        score += 10;
    }

    if let Some(text) = raw_text {
        if record.experience.is_empty() && WORK_SECTION_HINT.is_match(text) {
            score -= 15;
        }
        if CLINICAL_SECTION_HINT.is_match(text)
            && !record
                .experience
                .iter()
                .any(|e| e.kind == ExperienceType::ClinicalPlacement)
        {
            score -= 15;
        }
    }

    score.clamp(0, 100)
}
