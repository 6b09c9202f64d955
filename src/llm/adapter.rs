//! The LLM extractor adapter.
//!
//! The model's JSON is dynamic: every field possibly absent, numbers
//! sometimes strings, lists sometimes holding junk. It is deserialized
//! into a loose mirror first and translated into the strongly typed
//! record across this boundary — never reused directly.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::client::{LlmClient, LlmError};
use super::prompts::{RESUME_EXTRACT_PROMPT_TEMPLATE, RESUME_EXTRACT_SYSTEM};
use crate::models::record::{
    Certification, EducationEntry, ExperienceEntry, ExperienceType, ParsedRecord,
};

/// Deadline on one extraction. Deliberately tighter than the client's
/// own retry budget, so a retry storm cannot push the upload request
/// past it.
const EXTRACT_DEADLINE: Duration = Duration::from_secs(12);

/// Best-effort structured extraction. Implementations return an empty
/// record on any fault; the orchestrator then retains the rule-based
/// result.
#[async_trait]
pub trait LlmExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> ParsedRecord;
}

/// Production extractor backed by the Anthropic client.
pub struct AnthropicExtractor {
    client: LlmClient,
}

impl AnthropicExtractor {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LlmExtractor for AnthropicExtractor {
    async fn extract(&self, text: &str) -> ParsedRecord {
        let prompt = RESUME_EXTRACT_PROMPT_TEMPLATE.replace("{resume_text}", text);
        bounded_extract(self.client.request_json::<RawRecord>(&prompt, RESUME_EXTRACT_SYSTEM))
            .await
    }
}

/// Drives the extraction call under [`EXTRACT_DEADLINE`], degrading every
/// failure mode to an empty record.
async fn bounded_extract<F>(call: F) -> ParsedRecord
where
    F: Future<Output = Result<RawRecord, LlmError>> + Send,
{
    match tokio::time::timeout(EXTRACT_DEADLINE, call).await {
        Ok(Ok(raw)) => normalize(raw),
        Ok(Err(e)) => {
            warn!("LLM extraction failed, keeping rule-based result: {e}");
            ParsedRecord::default()
        }
        Err(_) => {
            warn!("LLM extraction passed its {EXTRACT_DEADLINE:?} deadline, keeping rule-based result");
            ParsedRecord::default()
        }
    }
}

// ── Loose response mirror ──────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    graduation_year: Option<Value>,
    #[serde(default)]
    years_of_experience: Option<Value>,
    #[serde(default)]
    salary: Option<String>,
    #[serde(default)]
    hospitals: Vec<Value>,
    #[serde(default)]
    skills: Vec<Value>,
    #[serde(default)]
    certifications: Vec<RawCertification>,
    #[serde(default)]
    experience: Vec<RawExperience>,
    #[serde(default)]
    education: Vec<RawEducation>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCertification {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    number: Option<Value>,
    #[serde(default)]
    score: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawExperience {
    #[serde(default)]
    employer: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEducation {
    #[serde(default)]
    institution: Option<String>,
    #[serde(default)]
    degree: Option<String>,
    #[serde(default)]
    field_of_study: Option<String>,
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    institution_location: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

// ── Translation layer ──────────────────────────────────────────────────

fn clean(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn coerce_string(raw: Option<Value>) -> Option<String> {
    match raw? {
        Value::String(s) => {
            let trimmed = s.trim().to_string();
            (!trimmed.is_empty()).then_some(trimmed)
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_int(raw: Option<Value>) -> Option<i64> {
    match raw? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn string_list(raw: Vec<Value>) -> Vec<String> {
    raw.into_iter()
        .filter_map(|v| match v {
            Value::String(s) => {
                let trimmed = s.trim().to_string();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        })
        .collect()
}

fn normalize(raw: RawRecord) -> ParsedRecord {
    ParsedRecord {
        summary: clean(raw.summary),
        address: clean(raw.address),
        graduation_year: coerce_int(raw.graduation_year).map(|y| y as i32),
        years_of_experience: coerce_int(raw.years_of_experience)
            .filter(|y| *y >= 0)
            .map(|y| y as u32),
        salary: clean(raw.salary),
        hospitals: string_list(raw.hospitals),
        skills: string_list(raw.skills),
        certifications: raw
            .certifications
            .into_iter()
            .filter_map(|c| {
                Some(Certification {
                    kind: clean(c.kind)?,
                    number: coerce_string(c.number),
                    score: coerce_string(c.score),
                })
            })
            .collect(),
        experience: raw
            .experience
            .into_iter()
            .map(|e| ExperienceEntry {
                employer: clean(e.employer),
                position: clean(e.position),
                kind: e
                    .kind
                    .as_deref()
                    .map(ExperienceType::parse)
                    .unwrap_or_default(),
                department: clean(e.department),
                start_date: clean(e.start_date),
                end_date: clean(e.end_date),
                description: clean(e.description),
                location: clean(e.location),
            })
            .collect(),
        education: raw
            .education
            .into_iter()
            .map(|e| EducationEntry {
                institution: clean(e.institution),
                degree: clean(e.degree),
                field_of_study: clean(e.field_of_study),
                year: coerce_int(e.year).map(|y| y as i32),
                institution_location: clean(e.institution_location),
                start_date: clean(e.start_date),
                end_date: clean(e.end_date),
                status: clean(e.status),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize_json(json: &str) -> ParsedRecord {
        normalize(serde_json::from_str::<RawRecord>(json).unwrap())
    }

    #[test]
    fn test_empty_object_normalizes_to_empty_record() {
        let record = normalize_json("{}");
        assert!(record.is_empty());
    }

    #[test]
    fn test_empty_strings_become_none() {
        let record = normalize_json(r#"{"summary": "  ", "address": ""}"#);
        assert_eq!(record.summary, None);
        assert_eq!(record.address, None);
    }

    #[test]
    fn test_skills_filtered_to_nonempty_strings() {
        let record = normalize_json(r#"{"skills": ["Triage", "", 42, null, " IV Therapy "]}"#);
        assert_eq!(record.skills, vec!["Triage", "IV Therapy"]);
    }

    #[test]
    fn test_experience_type_defaults_to_employment() {
        let record = normalize_json(
            r#"{"experience": [{"employer": "Makati Medical Center"},
                              {"employer": "PGH", "type": "clinical_placement"}]}"#,
        );
        assert_eq!(record.experience[0].kind, ExperienceType::Employment);
        assert_eq!(record.experience[1].kind, ExperienceType::ClinicalPlacement);
    }

    #[test]
    fn test_department_hint_preserved() {
        let record = normalize_json(
            r#"{"experience": [{"position": "Staff Nurse", "department": "Medical Oncology"}]}"#,
        );
        assert_eq!(
            record.experience[0].department.as_deref(),
            Some("Medical Oncology")
        );
    }

    #[test]
    fn test_numeric_fields_coerced_from_strings() {
        let record = normalize_json(
            r#"{"graduation_year": "2016", "years_of_experience": 5,
                "education": [{"degree": "BSN", "year": "2016"}],
                "certifications": [{"type": "IELTS", "score": 7.5}]}"#,
        );
        assert_eq!(record.graduation_year, Some(2016));
        assert_eq!(record.years_of_experience, Some(5));
        assert_eq!(record.education[0].year, Some(2016));
        assert_eq!(record.certifications[0].score.as_deref(), Some("7.5"));
    }

    #[test]
    fn test_certification_without_type_dropped() {
        let record = normalize_json(r#"{"certifications": [{"number": "12345"}]}"#);
        assert!(record.certifications.is_empty());
    }

    #[test]
    fn test_negative_years_rejected() {
        let record = normalize_json(r#"{"years_of_experience": -3}"#);
        assert_eq!(record.years_of_experience, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expiry_degrades_to_empty_record() {
        // A call that would outlive the deadline; paused time makes the
        // race deterministic and instant.
        let record = bounded_extract(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(RawRecord {
                summary: Some("too late to matter".to_string()),
                ..Default::default()
            })
        })
        .await;
        assert!(record.is_empty());
    }

    #[tokio::test]
    async fn test_call_failure_degrades_to_empty_record() {
        let record =
            bounded_extract(async { Err::<RawRecord, _>(LlmError::EmptyResponse) }).await;
        assert!(record.is_empty());
    }

    #[tokio::test]
    async fn test_successful_call_normalizes_within_deadline() {
        let record = bounded_extract(async {
            Ok(RawRecord {
                skills: vec![Value::String("IV Therapy".to_string())],
                ..Default::default()
            })
        })
        .await;
        assert_eq!(record.skills, vec!["IV Therapy"]);
    }
}
