//! The pipeline entry: upload a resume, decode it, extract a record, and
//! persist blob + metadata + per-entity rows for the subject.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::decode::{self, DecodeError, DocumentFormat};
use crate::errors::PipelineError;
use crate::extract::dates::{is_present, missing_start_sentinel, to_date_string};
use crate::extract::lines::looks_like_sentence;
use crate::hybrid::HybridExtractor;
use crate::llm::LlmExtractor;
use crate::models::record::ParsedRecord;
use crate::models::rows::{
    NewCertification, NewEducation, NewExperience, NewResume, ProfilePatch, ProfileRow,
};
use crate::store::{
    BlobStore, MetadataStore, LEGACY_PROFILE_IMAGE_PREFIX, PROFILE_PICTURE_BUCKET, RESUME_BUCKET,
};

/// Ingress ceiling for resume uploads.
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;
/// Ingress ceiling for profile pictures.
pub const MAX_PICTURE_BYTES: usize = 5 * 1024 * 1024;

const PICTURE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// An uploaded file as received from the transport layer.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Result of one resume upload.
#[derive(Debug)]
pub struct UploadOutcome {
    pub resume_id: Uuid,
    pub has_text: bool,
    pub record: Option<ParsedRecord>,
    pub warning: Option<String>,
}

pub struct Pipeline {
    blobs: Arc<dyn BlobStore>,
    meta: Arc<dyn MetadataStore>,
    extractor: HybridExtractor,
}

impl Pipeline {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        meta: Arc<dyn MetadataStore>,
        llm: Arc<dyn LlmExtractor>,
    ) -> Self {
        Self {
            blobs,
            meta,
            extractor: HybridExtractor::new(llm),
        }
    }

    /// Ingests a resume for `subject`: upload the blob, decode, extract,
    /// and replace all previously extracted entities.
    pub async fn upload_resume(
        &self,
        subject: Uuid,
        upload: Upload,
    ) -> Result<UploadOutcome, PipelineError> {
        let profile = self
            .meta
            .find_profile_by_user(subject)
            .await?
            .ok_or_else(|| PipelineError::NotFound(format!("no profile for user {subject}")))?;

        let format = DocumentFormat::from_filename(&upload.filename)
            .ok_or_else(|| PipelineError::UnsupportedFormat(upload.filename.clone()))?;
        if upload.bytes.is_empty() {
            return Err(PipelineError::BadRequest("empty file".to_string()));
        }
        if upload.bytes.len() > MAX_RESUME_BYTES {
            return Err(PipelineError::BadRequest(format!(
                "file exceeds {MAX_RESUME_BYTES} bytes"
            )));
        }

        let timestamp = Utc::now().timestamp_millis();
        let file_path = format!("{}/{}.{}", profile.id, timestamp, format.extension());
        self.store_blob(&profile, &file_path, &upload, timestamp, format)
            .await?;

        let (text, warning) = match decode::decode_as(&upload.bytes, format) {
            Ok(text) => (text, None),
            Err(DecodeError::UnsupportedFormat(f)) => {
                return Err(PipelineError::UnsupportedFormat(f))
            }
            Err(e) => {
                warn!("resume decode failed, continuing with empty text: {e}");
                (String::new(), Some(e.to_string()))
            }
        };
        let has_text = !text.trim().is_empty();

        let record = if has_text {
            Some(self.extractor.extract(&text).await)
        } else {
            None
        };

        let resume_id = self
            .persist(&profile, &upload, &file_path, format, &text, record.as_ref())
            .await
            .inspect_err(|_| self.cleanup_blob_best_effort(&file_path))?;

        info!(%subject, %resume_id, has_text, "resume ingested");

        Ok(UploadOutcome {
            resume_id,
            has_text,
            record,
            warning,
        })
    }

    /// Uploads into the primary resume bucket, falling back to the legacy
    /// prefix; only a double failure is fatal.
    async fn store_blob(
        &self,
        profile: &ProfileRow,
        file_path: &str,
        upload: &Upload,
        timestamp: i64,
        format: DocumentFormat,
    ) -> Result<(), PipelineError> {
        let primary = self
            .blobs
            .upload(
                RESUME_BUCKET,
                file_path,
                &upload.bytes,
                &upload.content_type,
            )
            .await;
        let Err(primary_err) = primary else {
            return Ok(());
        };

        warn!("primary resume upload failed, trying legacy prefix: {primary_err}");
        let legacy_path = format!(
            "{}/{}/{}.{}",
            LEGACY_PROFILE_IMAGE_PREFIX,
            profile.user_id,
            timestamp,
            format.extension()
        );
        self.blobs
            .upload(
                RESUME_BUCKET,
                &legacy_path,
                &upload.bytes,
                &upload.content_type,
            )
            .await
            .map_err(|e| PipelineError::Storage(format!("{primary_err}; legacy: {e}")))
    }

    fn cleanup_blob_best_effort(&self, file_path: &str) {
        let blobs = Arc::clone(&self.blobs);
        let path = file_path.to_string();
        tokio::spawn(async move {
            if let Err(e) = blobs.remove(RESUME_BUCKET, &[path]).await {
                warn!("blob cleanup after persistence failure also failed: {e}");
            }
        });
    }

    async fn persist(
        &self,
        profile: &ProfileRow,
        upload: &Upload,
        file_path: &str,
        format: DocumentFormat,
        text: &str,
        record: Option<&ParsedRecord>,
    ) -> Result<Uuid, PipelineError> {
        // Replace prior blobs and resume rows for this subject. The new
        // blob's own path must survive a same-millisecond re-upload.
        let prior = self.meta.list_resumes(profile.id).await?;
        if !prior.is_empty() {
            let paths: Vec<String> = prior
                .iter()
                .map(|r| r.file_path.clone())
                .filter(|p| p != file_path)
                .collect();
            if !paths.is_empty() {
                if let Err(e) = self.blobs.remove(RESUME_BUCKET, &paths).await {
                    warn!("failed to remove prior resume blobs: {e}");
                }
            }
            self.meta.delete_resumes(profile.id).await?;
        }

        let resume_id = self
            .meta
            .insert_resume(NewResume {
                profile_id: profile.id,
                file_path: file_path.to_string(),
                original_filename: upload.filename.clone(),
                file_type: format.extension().to_string(),
                extracted_text: (!text.trim().is_empty()).then(|| text.to_string()),
                parsed_data: record.map(|r| json!(r)),
            })
            .await?;

        if let Some(record) = record {
            self.persist_entities(profile, record).await?;
        }

        Ok(resume_id)
    }

    async fn persist_entities(
        &self,
        profile: &ProfileRow,
        record: &ParsedRecord,
    ) -> Result<(), PipelineError> {
        let certifications: Vec<NewCertification> = record
            .certifications
            .iter()
            .map(|c| NewCertification {
                certification_type: c.kind.clone(),
                number: c.number.clone(),
                score: c.score.clone(),
            })
            .collect();
        self.meta
            .replace_certifications(profile.id, certifications)
            .await?;

        self.meta
            .replace_skills(profile.id, record.skills.clone())
            .await?;

        let experience: Vec<NewExperience> = record
            .experience
            .iter()
            .filter(|e| !e.employer.as_deref().is_some_and(looks_like_sentence))
            .map(|e| NewExperience {
                employer: e.employer.clone(),
                position: e.position.clone(),
                experience_type: e.kind.as_str().to_string(),
                department: e.department.clone(),
                start_date: map_start_date(e.start_date.as_deref()),
                end_date: map_end_date(e.end_date.as_deref()),
                description: e.description.clone(),
                location: e.location.clone(),
            })
            .collect();
        self.meta.replace_experience(profile.id, experience).await?;

        let education: Vec<NewEducation> = record
            .education
            .iter()
            .map(|e| NewEducation {
                institution: e.institution.clone(),
                degree: e.degree.clone(),
                field_of_study: e.field_of_study.clone(),
                graduation_year: e.year,
                institution_location: e.institution_location.clone(),
                status: e.status.clone(),
            })
            .collect();
        self.meta.replace_education(profile.id, education).await?;

        // Populate empty profile fields only.
        let patch = ProfilePatch {
            bio: profile
                .bio
                .as_deref()
                .map_or(true, str::is_empty)
                .then(|| record.summary.clone())
                .flatten(),
            address: profile
                .address
                .as_deref()
                .map_or(true, str::is_empty)
                .then(|| record.address.clone())
                .flatten(),
            graduation_year: profile
                .graduation_year
                .is_none()
                .then_some(record.graduation_year)
                .flatten(),
            years_of_experience: profile
                .years_of_experience
                .is_none()
                .then_some(record.years_of_experience.map(|y| y as i32))
                .flatten(),
        };
        if !patch.is_noop() {
            self.meta.update_profile(profile.id, patch).await?;
        }

        Ok(())
    }

    /// Uploads a profile picture, replacing any prior picture and
    /// persisting the cache-busted public URL.
    pub async fn upload_profile_picture(
        &self,
        subject: Uuid,
        upload: Upload,
    ) -> Result<String, PipelineError> {
        let profile = self
            .meta
            .find_profile_by_user(subject)
            .await?
            .ok_or_else(|| PipelineError::NotFound(format!("no profile for user {subject}")))?;

        let ext = upload
            .filename
            .rsplit_once('.')
            .map(|(_, e)| e.to_lowercase())
            .filter(|e| PICTURE_EXTENSIONS.contains(&e.as_str()))
            .ok_or_else(|| PipelineError::UnsupportedFormat(upload.filename.clone()))?;
        if upload.bytes.is_empty() || upload.bytes.len() > MAX_PICTURE_BYTES {
            return Err(PipelineError::BadRequest(format!(
                "picture must be 1..={MAX_PICTURE_BYTES} bytes"
            )));
        }

        let timestamp = Utc::now().timestamp_millis();
        let path = format!("{}/{}.{}", profile.id, timestamp, ext);
        self.blobs
            .upload(
                PROFILE_PICTURE_BUCKET,
                &path,
                &upload.bytes,
                &upload.content_type,
            )
            .await
            .map_err(|e| PipelineError::Storage(e.to_string()))?;

        if let Some(old) = profile
            .profile_picture_url
            .as_deref()
            .and_then(|url| blob_path_from_url(url, PROFILE_PICTURE_BUCKET))
        {
            if let Err(e) = self.blobs.remove(PROFILE_PICTURE_BUCKET, &[old]).await {
                warn!("failed to remove prior profile picture: {e}");
            }
        }

        // Cache-busted so clients refetch immediately after replacement.
        let url = format!(
            "{}?v={timestamp}",
            self.blobs.public_url(PROFILE_PICTURE_BUCKET, &path)
        );
        self.meta
            .update_profile_picture_url(profile.id, &url)
            .await?;
        Ok(url)
    }
}

fn blob_path_from_url(url: &str, bucket: &str) -> Option<String> {
    let marker = format!("/{bucket}/");
    let start = url.find(&marker)? + marker.len();
    let tail = &url[start..];
    let path = tail.split('?').next().unwrap_or(tail);
    (!path.is_empty()).then(|| path.to_string())
}

/// Experience start dates are mandatory at the storage boundary; a start
/// that never parsed gets the 1900-01-01 sentinel.
fn map_start_date(raw: Option<&str>) -> NaiveDate {
    raw.and_then(to_date_string)
        .and_then(|iso| NaiveDate::parse_from_str(&iso, "%Y-%m-%d").ok())
        .unwrap_or_else(missing_start_sentinel)
}

/// `Present`/`Current` (and anything unparsable) stores as NULL.
fn map_end_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    if is_present(raw) {
        return None;
    }
    to_date_string(raw).and_then(|iso| NaiveDate::parse_from_str(&iso, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::Mutex;

    use crate::models::rows::ResumeRow;
    use crate::store::StoreError;

    struct NullLlm;

    #[async_trait]
    impl LlmExtractor for NullLlm {
        async fn extract(&self, _text: &str) -> ParsedRecord {
            ParsedRecord::default()
        }
    }

    #[derive(Default)]
    struct MemBlobStore {
        objects: Mutex<HashMap<String, Vec<u8>>>,
        fail_uploads: bool,
    }

    #[async_trait]
    impl BlobStore for MemBlobStore {
        async fn upload(
            &self,
            bucket: &str,
            path: &str,
            bytes: &[u8],
            _content_type: &str,
        ) -> Result<(), StoreError> {
            if self.fail_uploads {
                return Err(StoreError::Backend("upload disabled".to_string()));
            }
            self.objects
                .lock()
                .unwrap()
                .insert(format!("{bucket}/{path}"), bytes.to_vec());
            Ok(())
        }

        async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StoreError> {
            let mut objects = self.objects.lock().unwrap();
            for path in paths {
                objects.remove(&format!("{bucket}/{path}"));
            }
            Ok(())
        }

        async fn signed_url(
            &self,
            bucket: &str,
            path: &str,
            _ttl_secs: u64,
        ) -> Result<String, StoreError> {
            Ok(format!("mem://{bucket}/{path}?signed"))
        }

        fn public_url(&self, bucket: &str, path: &str) -> String {
            format!("mem://{bucket}/{path}")
        }
    }

    #[derive(Default)]
    struct MemMetadataStore {
        profiles: Mutex<Vec<ProfileRow>>,
        resumes: Mutex<Vec<ResumeRow>>,
        experience: Mutex<HashMap<Uuid, Vec<NewExperience>>>,
        education: Mutex<HashMap<Uuid, Vec<NewEducation>>>,
        skills: Mutex<HashMap<Uuid, Vec<String>>>,
        certifications: Mutex<HashMap<Uuid, Vec<NewCertification>>>,
        patches: Mutex<Vec<ProfilePatch>>,
        picture_urls: Mutex<Vec<String>>,
    }

    impl MemMetadataStore {
        fn with_profile(profile: ProfileRow) -> Self {
            let store = Self::default();
            store.profiles.lock().unwrap().push(profile);
            store
        }
    }

    #[async_trait]
    impl MetadataStore for MemMetadataStore {
        async fn find_profile_by_user(
            &self,
            user_id: Uuid,
        ) -> Result<Option<ProfileRow>, StoreError> {
            Ok(self
                .profiles
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.user_id == user_id)
                .cloned())
        }

        async fn update_profile(
            &self,
            _profile_id: Uuid,
            patch: ProfilePatch,
        ) -> Result<(), StoreError> {
            self.patches.lock().unwrap().push(patch);
            Ok(())
        }

        async fn update_profile_picture_url(
            &self,
            _profile_id: Uuid,
            url: &str,
        ) -> Result<(), StoreError> {
            self.picture_urls.lock().unwrap().push(url.to_string());
            Ok(())
        }

        async fn list_resumes(&self, profile_id: Uuid) -> Result<Vec<ResumeRow>, StoreError> {
            Ok(self
                .resumes
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.profile_id == profile_id)
                .cloned()
                .collect())
        }

        async fn delete_resumes(&self, profile_id: Uuid) -> Result<(), StoreError> {
            self.resumes
                .lock()
                .unwrap()
                .retain(|r| r.profile_id != profile_id);
            Ok(())
        }

        async fn insert_resume(&self, resume: NewResume) -> Result<Uuid, StoreError> {
            let id = Uuid::new_v4();
            self.resumes.lock().unwrap().push(ResumeRow {
                id,
                profile_id: resume.profile_id,
                file_path: resume.file_path,
                original_filename: resume.original_filename,
                file_type: resume.file_type,
                extracted_text: resume.extracted_text,
                parsed_data: resume.parsed_data,
                created_at: Utc::now(),
            });
            Ok(id)
        }

        async fn replace_certifications(
            &self,
            profile_id: Uuid,
            rows: Vec<NewCertification>,
        ) -> Result<(), StoreError> {
            self.certifications.lock().unwrap().insert(profile_id, rows);
            Ok(())
        }

        async fn replace_skills(
            &self,
            profile_id: Uuid,
            skills: Vec<String>,
        ) -> Result<(), StoreError> {
            self.skills.lock().unwrap().insert(profile_id, skills);
            Ok(())
        }

        async fn replace_experience(
            &self,
            profile_id: Uuid,
            rows: Vec<NewExperience>,
        ) -> Result<(), StoreError> {
            self.experience.lock().unwrap().insert(profile_id, rows);
            Ok(())
        }

        async fn replace_education(
            &self,
            profile_id: Uuid,
            rows: Vec<NewEducation>,
        ) -> Result<(), StoreError> {
            self.education.lock().unwrap().insert(profile_id, rows);
            Ok(())
        }
    }

    fn profile(user_id: Uuid) -> ProfileRow {
        ProfileRow {
            id: Uuid::new_v4(),
            user_id,
            bio: None,
            address: None,
            graduation_year: None,
            years_of_experience: None,
            profile_picture_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    const RESUME_XML: &str = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>MARIA SANTOS</w:t></w:r></w:p><w:p><w:r><w:t>Quezon City, Philippines</w:t></w:r></w:p><w:p><w:r><w:t>PROFESSIONAL SUMMARY</w:t></w:r></w:p><w:p><w:r><w:t>Dedicated ICU nurse with eight years of critical care practice.</w:t></w:r></w:p><w:p><w:r><w:t>PROFESSIONAL EXPERIENCE</w:t></w:r></w:p><w:p><w:r><w:t>Staff Nurse Jan 2020 - Present</w:t></w:r></w:p><w:p><w:r><w:t>Makati Medical Center</w:t></w:r></w:p><w:p><w:r><w:t>\u{2022} Managed a 24-bed intensive care unit</w:t></w:r></w:p><w:p><w:r><w:t>EDUCATION</w:t></w:r></w:p><w:p><w:r><w:t>Bachelor of Science in Nursing</w:t></w:r></w:p><w:p><w:r><w:t>University of Santo Tomas</w:t></w:r></w:p><w:p><w:r><w:t>Graduated: April 2016</w:t></w:r></w:p></w:body></w:document>"#;

    fn docx_fixture() -> Vec<u8> {
        let xml = RESUME_XML.replace("\\u{2022}", "\u{2022}");
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        zip.start_file(
            "word/document.xml",
            zip::write::SimpleFileOptions::default(),
        )
        .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    fn docx_upload() -> Upload {
        Upload {
            filename: "maria_santos_resume.docx".to_string(),
            content_type:
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                    .to_string(),
            bytes: docx_fixture(),
        }
    }

    fn pipeline_with(
        blobs: Arc<MemBlobStore>,
        meta: Arc<MemMetadataStore>,
    ) -> Pipeline {
        Pipeline::new(blobs, meta, Arc::new(NullLlm))
    }

    #[tokio::test]
    async fn test_upload_resume_end_to_end() {
        let subject = Uuid::new_v4();
        let p = profile(subject);
        let profile_id = p.id;
        let blobs = Arc::new(MemBlobStore::default());
        let meta = Arc::new(MemMetadataStore::with_profile(p));
        let pipeline = pipeline_with(Arc::clone(&blobs), Arc::clone(&meta));

        let outcome = pipeline.upload_resume(subject, docx_upload()).await.unwrap();

        assert!(outcome.has_text);
        assert!(outcome.warning.is_none());
        let record = outcome.record.unwrap();
        assert_eq!(
            record.experience[0].employer.as_deref(),
            Some("Makati Medical Center")
        );

        let resumes = meta.resumes.lock().unwrap();
        assert_eq!(resumes.len(), 1);
        assert_eq!(resumes[0].file_type, "docx");
        assert!(resumes[0].extracted_text.is_some());
        assert!(resumes[0].parsed_data.is_some());

        let experience = meta.experience.lock().unwrap();
        let rows = experience.get(&profile_id).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].start_date,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        assert_eq!(rows[0].end_date, None); // Present → NULL

        let education = meta.education.lock().unwrap();
        assert_eq!(education.get(&profile_id).unwrap().len(), 1);

        // empty profile fields were populated
        let patches = meta.patches.lock().unwrap();
        assert_eq!(patches.len(), 1);
        assert!(patches[0].bio.is_some());
        assert_eq!(patches[0].graduation_year, Some(2016));
    }

    #[tokio::test]
    async fn test_second_upload_replaces_rows_and_blobs() {
        let subject = Uuid::new_v4();
        let p = profile(subject);
        let profile_id = p.id;
        let blobs = Arc::new(MemBlobStore::default());
        let meta = Arc::new(MemMetadataStore::with_profile(p));
        let pipeline = pipeline_with(Arc::clone(&blobs), Arc::clone(&meta));

        pipeline.upload_resume(subject, docx_upload()).await.unwrap();
        pipeline.upload_resume(subject, docx_upload()).await.unwrap();

        assert_eq!(meta.resumes.lock().unwrap().len(), 1);
        assert_eq!(blobs.objects.lock().unwrap().len(), 1);
        assert_eq!(
            meta.experience.lock().unwrap().get(&profile_id).unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_unknown_subject_is_not_found() {
        let pipeline = pipeline_with(
            Arc::new(MemBlobStore::default()),
            Arc::new(MemMetadataStore::default()),
        );
        let err = pipeline
            .upload_resume(Uuid::new_v4(), docx_upload())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_disallowed_extension_rejected() {
        let subject = Uuid::new_v4();
        let meta = Arc::new(MemMetadataStore::with_profile(profile(subject)));
        let pipeline = pipeline_with(Arc::new(MemBlobStore::default()), meta);
        let upload = Upload {
            filename: "resume.txt".to_string(),
            content_type: "text/plain".to_string(),
            bytes: b"hello".to_vec(),
        };
        let err = pipeline.upload_resume(subject, upload).await.unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let subject = Uuid::new_v4();
        let meta = Arc::new(MemMetadataStore::with_profile(profile(subject)));
        let pipeline = pipeline_with(Arc::new(MemBlobStore::default()), meta);
        let upload = Upload {
            filename: "resume.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: vec![0u8; MAX_RESUME_BYTES + 1],
        };
        let err = pipeline.upload_resume(subject, upload).await.unwrap_err();
        assert!(matches!(err, PipelineError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_undecodable_file_warns_and_continues() {
        let subject = Uuid::new_v4();
        let meta = Arc::new(MemMetadataStore::with_profile(profile(subject)));
        let pipeline = pipeline_with(Arc::new(MemBlobStore::default()), Arc::clone(&meta));
        let upload = Upload {
            filename: "resume.docx".to_string(),
            content_type: "application/octet-stream".to_string(),
            bytes: b"this is not a zip archive at all".to_vec(),
        };
        let outcome = pipeline.upload_resume(subject, upload).await.unwrap();
        assert!(!outcome.has_text);
        assert!(outcome.warning.is_some());
        assert!(outcome.record.is_none());
        // the resume row still exists for reprocessing
        assert_eq!(meta.resumes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_double_blob_failure_is_storage_error() {
        let subject = Uuid::new_v4();
        let meta = Arc::new(MemMetadataStore::with_profile(profile(subject)));
        let blobs = Arc::new(MemBlobStore {
            fail_uploads: true,
            ..Default::default()
        });
        let pipeline = pipeline_with(blobs, meta);
        let err = pipeline
            .upload_resume(subject, docx_upload())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Storage(_)));
    }

    #[tokio::test]
    async fn test_sentence_like_employers_filtered_at_persistence() {
        let subject = Uuid::new_v4();
        let p = profile(subject);
        let profile_id = p.id;
        let meta = Arc::new(MemMetadataStore::with_profile(p));
        let blobs = Arc::new(MemBlobStore::default());
        let pipeline = pipeline_with(blobs, Arc::clone(&meta));

        let record = ParsedRecord {
            experience: vec![
                crate::models::record::ExperienceEntry {
                    employer: Some(
                        "Handled the unit while coordinating with physicians and aides daily"
                            .to_string(),
                    ),
                    start_date: Some("Jan 2020".to_string()),
                    ..Default::default()
                },
                crate::models::record::ExperienceEntry {
                    employer: Some("Makati Medical Center".to_string()),
                    start_date: Some("Jan 2018".to_string()),
                    end_date: Some("Dec 2019".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let prof = meta.find_profile_by_user(subject).await.unwrap().unwrap();
        pipeline.persist_entities(&prof, &record).await.unwrap();

        let experience = meta.experience.lock().unwrap();
        let rows = experience.get(&profile_id).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employer.as_deref(), Some("Makati Medical Center"));
        assert_eq!(
            rows[0].end_date,
            NaiveDate::from_ymd_opt(2019, 12, 1)
        );
    }

    #[tokio::test]
    async fn test_missing_start_date_gets_sentinel() {
        assert_eq!(map_start_date(None), missing_start_sentinel());
        assert_eq!(map_start_date(Some("garbage")), missing_start_sentinel());
        assert_eq!(
            map_start_date(Some("July 2009")),
            NaiveDate::from_ymd_opt(2009, 7, 1).unwrap()
        );
    }

    #[tokio::test]
    async fn test_profile_picture_cache_busted_url_persisted() {
        let subject = Uuid::new_v4();
        let meta = Arc::new(MemMetadataStore::with_profile(profile(subject)));
        let blobs = Arc::new(MemBlobStore::default());
        let pipeline = pipeline_with(blobs, Arc::clone(&meta));

        let upload = Upload {
            filename: "me.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        };
        let url = pipeline
            .upload_profile_picture(subject, upload)
            .await
            .unwrap();
        assert!(url.contains("?v="));
        assert_eq!(meta.picture_urls.lock().unwrap().as_slice(), &[url]);
    }

    #[tokio::test]
    async fn test_profile_picture_size_ceiling() {
        let subject = Uuid::new_v4();
        let meta = Arc::new(MemMetadataStore::with_profile(profile(subject)));
        let pipeline = pipeline_with(Arc::new(MemBlobStore::default()), meta);
        let upload = Upload {
            filename: "me.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0u8; MAX_PICTURE_BYTES + 1],
        };
        let err = pipeline
            .upload_profile_picture(subject, upload)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::BadRequest(_)));
    }

    #[test]
    fn test_blob_path_from_url() {
        assert_eq!(
            blob_path_from_url(
                "http://minio:9000/profile-pictures/abc/1.png?v=99",
                "profile-pictures"
            ),
            Some("abc/1.png".to_string())
        );
        assert_eq!(blob_path_from_url("http://x/other/abc.png", "profile-pictures"), None);
    }
}
