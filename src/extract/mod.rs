//! The rule-based extractor: stateless scanners composed into one record.

pub mod certifications;
pub mod dates;
pub mod education;
pub mod experience;
pub mod fields;
pub mod hospitals;
pub mod lines;
pub mod sections;
pub mod skills;

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::models::record::ParsedRecord;

/// Runs every rule-based extractor over the decoded text.
pub fn extract_record(text: &str) -> ParsedRecord {
    extract_record_at(text, Utc::now().date_naive())
}

/// Deterministic variant taking an explicit `now` for tenure derivation
/// and year banding.
pub fn extract_record_at(text: &str, now: NaiveDate) -> ParsedRecord {
    let experience = experience::extract_experience(text);
    let education = education::extract_education(text);

    let spans = experience
        .iter()
        .map(|e| (e.start_date.as_deref(), e.end_date.as_deref()));
    let years = dates::total_experience_years(spans, now);
    let years_of_experience = experience
        .iter()
        .any(|e| {
            e.start_date
                .as_deref()
                .and_then(dates::parse_flexible_date)
                .is_some()
        })
        .then_some(years);

    let record = ParsedRecord {
        summary: fields::extract_summary(text),
        address: fields::extract_address(text),
        graduation_year: fields::extract_graduation_year(text, now),
        years_of_experience,
        salary: fields::extract_salary(text),
        hospitals: hospitals::extract_hospitals(text),
        skills: skills::extract_skills(text),
        certifications: certifications::extract_certifications(text),
        experience,
        education,
    };

    debug!(
        experience = record.experience.len(),
        education = record.education.len(),
        skills = record.skills.len(),
        certifications = record.certifications.len(),
        "rule-based extraction complete"
    );

    record
}
