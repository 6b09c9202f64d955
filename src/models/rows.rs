//! Row types for the metadata store entities.
//!
//! Dates cross this boundary as `NaiveDate` (`YYYY-MM-DD`, day pinned to
//! 01 by the normaliser); a missing experience start date is stored as the
//! `1900-01-01` sentinel and an open-ended entry stores a NULL end date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub graduation_year: Option<i32>,
    pub years_of_experience: Option<i32>,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub file_path: String,
    pub original_filename: String,
    pub file_type: String,
    pub extracted_text: Option<String>,
    pub parsed_data: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a resume metadata row.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub profile_id: Uuid,
    pub file_path: String,
    pub original_filename: String,
    pub file_type: String,
    pub extracted_text: Option<String>,
    pub parsed_data: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExperienceRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub employer: Option<String>,
    pub position: Option<String>,
    pub experience_type: String,
    pub department: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewExperience {
    pub employer: Option<String>,
    pub position: Option<String>,
    pub experience_type: String,
    pub department: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EducationRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub graduation_year: Option<i32>,
    pub institution_location: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEducation {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub graduation_year: Option<i32>,
    pub institution_location: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCertification {
    pub certification_type: String,
    pub number: Option<String>,
    pub score: Option<String>,
}

/// Patch applied to a profile after a successful parse. Only empty profile
/// fields are populated; a `None` here means "leave the column alone".
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub bio: Option<String>,
    pub address: Option<String>,
    pub graduation_year: Option<i32>,
    pub years_of_experience: Option<i32>,
}

impl ProfilePatch {
    pub fn is_noop(&self) -> bool {
        self.bio.is_none()
            && self.address.is_none()
            && self.graduation_year.is_none()
            && self.years_of_experience.is_none()
    }
}
