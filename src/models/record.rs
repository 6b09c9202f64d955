//! The Parsed Record — the single in-memory result of one resume parse.
//!
//! Field names and nested shapes are a stable contract: the LLM adapter
//! deserializes into this shape and the persistence layer consumes it.
//! Optional fields throughout; absence distinguishes "not found" from an
//! empty string.

use serde::{Deserialize, Serialize};

/// Category of an experience entry. Defaults to `employment`; the
/// post-processing pass re-categorises entries by keyword and by the
/// section of the source text the employer appeared in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceType {
    #[default]
    Employment,
    ClinicalPlacement,
    Ojt,
    Volunteer,
}

impl ExperienceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceType::Employment => "employment",
            ExperienceType::ClinicalPlacement => "clinical_placement",
            ExperienceType::Ojt => "ojt",
            ExperienceType::Volunteer => "volunteer",
        }
    }

    /// Tolerant parse for values arriving from the LLM or the store.
    /// Unknown strings fall back to `employment`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "clinical_placement" | "clinical placement" => ExperienceType::ClinicalPlacement,
            "ojt" => ExperienceType::Ojt,
            "volunteer" => ExperienceType::Volunteer,
            _ => ExperienceType::Employment,
        }
    }
}

/// One work-history entry. `start_date` and `end_date` are normalised to
/// `"Month Year"` or `"Year"` strings at this boundary; an `end_date` of
/// `"Present"` is preserved here and translated to NULL at persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ExperienceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// `"• "`-prefixed, newline-joined bullet block. Omitted when no
    /// bullet survives sanitisation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A license or certification. `number` and `score` are captured only from
/// contexts anchored to the credential, never from a global scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
}

/// The full parse result for one resume. Lives for the duration of a single
/// upload call; consumed by persistence and then dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hospitals: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<Certification>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub education: Vec<EducationEntry>,
}

impl ParsedRecord {
    /// True when nothing at all was recovered. An empty record is what the
    /// LLM adapter returns on any fault, and scores 0.
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.address.is_none()
            && self.graduation_year.is_none()
            && self.salary.is_none()
            && self.hospitals.is_empty()
            && self.skills.is_empty()
            && self.certifications.is_empty()
            && self.experience.is_empty()
            && self.education.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_type_serde_snake_case() {
        let t: ExperienceType = serde_json::from_str(r#""clinical_placement""#).unwrap();
        assert_eq!(t, ExperienceType::ClinicalPlacement);
        assert_eq!(
            serde_json::to_string(&ExperienceType::Ojt).unwrap(),
            r#""ojt""#
        );
    }

    #[test]
    fn test_experience_type_parse_tolerant() {
        assert_eq!(ExperienceType::parse("Volunteer"), ExperienceType::Volunteer);
        assert_eq!(
            ExperienceType::parse("clinical placement"),
            ExperienceType::ClinicalPlacement
        );
        assert_eq!(ExperienceType::parse("garbage"), ExperienceType::Employment);
    }

    #[test]
    fn test_experience_entry_type_key_is_type() {
        let entry = ExperienceEntry {
            employer: Some("Makati Medical Center".to_string()),
            kind: ExperienceType::Volunteer,
            ..Default::default()
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "volunteer");
        assert!(json.get("position").is_none());
    }

    #[test]
    fn test_certification_type_key_is_type() {
        let cert = Certification {
            kind: "NCLEX".to_string(),
            number: Some("RN1234567".to_string()),
            score: None,
        };
        let json = serde_json::to_value(&cert).unwrap();
        assert_eq!(json["type"], "NCLEX");
        assert!(json.get("score").is_none());
    }

    #[test]
    fn test_empty_record_is_empty() {
        assert!(ParsedRecord::default().is_empty());
        let r = ParsedRecord {
            skills: vec!["IV Therapy".to_string()],
            ..Default::default()
        };
        assert!(!r.is_empty());
    }

    #[test]
    fn test_record_round_trips_stable_shape() {
        let json = r#"{
            "summary": "Dedicated ICU nurse with 8 years of experience.",
            "graduation_year": 2014,
            "experience": [
                {"employer": "St. Luke's Medical Center", "position": "Staff Nurse",
                 "type": "employment", "start_date": "June 2015", "end_date": "Present"}
            ],
            "education": [
                {"degree": "Bachelor of Science in Nursing", "institution": "University of Santo Tomas", "year": 2014}
            ]
        }"#;
        let record: ParsedRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.experience[0].kind, ExperienceType::Employment);
        assert_eq!(record.education[0].year, Some(2014));
        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["experience"][0]["end_date"], "Present");
    }
}
