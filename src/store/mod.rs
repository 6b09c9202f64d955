//! Consumed storage interfaces. The pipeline talks to these traits only;
//! the production backends live in [`postgres`] and [`s3`].

pub mod postgres;
pub mod s3;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::rows::{
    NewCertification, NewEducation, NewExperience, NewResume, ProfilePatch, ProfileRow, ResumeRow,
};

/// Bucket holding uploaded resumes.
pub const RESUME_BUCKET: &str = "resumes";
/// Bucket holding profile pictures.
pub const PROFILE_PICTURE_BUCKET: &str = "profile-pictures";
/// Legacy prefix inside the resume bucket, kept as an upload fallback.
pub const LEGACY_PROFILE_IMAGE_PREFIX: &str = "profile-images";

/// Postgres unique-violation SQLSTATE, surfaced as [`StoreError::Conflict`].
pub const UNIQUE_VIOLATION_CODE: &str = "23505";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.code().as_deref() == Some(UNIQUE_VIOLATION_CODE) {
                return StoreError::Conflict(db.message().to_string());
            }
        }
        StoreError::Backend(err.to_string())
    }
}

/// Object storage for resume blobs and profile pictures.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StoreError>;

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StoreError>;

    async fn signed_url(
        &self,
        bucket: &str,
        path: &str,
        ttl_secs: u64,
    ) -> Result<String, StoreError>;

    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// Typed per-entity operations over the relational entities.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn find_profile_by_user(&self, user_id: Uuid) -> Result<Option<ProfileRow>, StoreError>;

    async fn update_profile(
        &self,
        profile_id: Uuid,
        patch: ProfilePatch,
    ) -> Result<(), StoreError>;

    async fn update_profile_picture_url(
        &self,
        profile_id: Uuid,
        url: &str,
    ) -> Result<(), StoreError>;

    async fn list_resumes(&self, profile_id: Uuid) -> Result<Vec<ResumeRow>, StoreError>;

    async fn delete_resumes(&self, profile_id: Uuid) -> Result<(), StoreError>;

    async fn insert_resume(&self, resume: NewResume) -> Result<Uuid, StoreError>;

    async fn replace_certifications(
        &self,
        profile_id: Uuid,
        rows: Vec<NewCertification>,
    ) -> Result<(), StoreError>;

    async fn replace_skills(&self, profile_id: Uuid, skills: Vec<String>)
        -> Result<(), StoreError>;

    async fn replace_experience(
        &self,
        profile_id: Uuid,
        rows: Vec<NewExperience>,
    ) -> Result<(), StoreError>;

    async fn replace_education(
        &self,
        profile_id: Uuid,
        rows: Vec<NewEducation>,
    ) -> Result<(), StoreError>;
}
