//! Postgres-backed metadata store.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{MetadataStore, StoreError};
use crate::models::rows::{
    NewCertification, NewEducation, NewExperience, NewResume, ProfilePatch, ProfileRow, ResumeRow,
};

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool, StoreError> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

pub struct PgMetadataStore {
    pool: PgPool,
}

impl PgMetadataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    async fn find_profile_by_user(&self, user_id: Uuid) -> Result<Option<ProfileRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, ProfileRow>("SELECT * FROM nurse_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn update_profile(
        &self,
        profile_id: Uuid,
        patch: ProfilePatch,
    ) -> Result<(), StoreError> {
        if patch.is_noop() {
            return Ok(());
        }
        sqlx::query(
            r#"
            UPDATE nurse_profiles SET
                bio = COALESCE($2, bio),
                address = COALESCE($3, address),
                graduation_year = COALESCE($4, graduation_year),
                years_of_experience = COALESCE($5, years_of_experience),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(profile_id)
        .bind(patch.bio)
        .bind(patch.address)
        .bind(patch.graduation_year)
        .bind(patch.years_of_experience)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_profile_picture_url(
        &self,
        profile_id: Uuid,
        url: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE nurse_profiles SET profile_picture_url = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(profile_id)
        .bind(url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_resumes(&self, profile_id: Uuid) -> Result<Vec<ResumeRow>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE profile_id = $1 ORDER BY created_at DESC",
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_resumes(&self, profile_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM resumes WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_resume(&self, resume: NewResume) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO resumes
                (id, profile_id, file_path, original_filename, file_type,
                 extracted_text, parsed_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(resume.profile_id)
        .bind(&resume.file_path)
        .bind(&resume.original_filename)
        .bind(&resume.file_type)
        .bind(&resume.extracted_text)
        .bind(&resume.parsed_data)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn replace_certifications(
        &self,
        profile_id: Uuid,
        rows: Vec<NewCertification>,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM nurse_certifications WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&self.pool)
            .await?;
        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO nurse_certifications
                    (id, profile_id, certification_type, number, score)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(profile_id)
            .bind(&row.certification_type)
            .bind(&row.number)
            .bind(&row.score)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn replace_skills(
        &self,
        profile_id: Uuid,
        skills: Vec<String>,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM nurse_skills WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&self.pool)
            .await?;
        for skill in skills {
            sqlx::query("INSERT INTO nurse_skills (id, profile_id, name) VALUES ($1, $2, $3)")
                .bind(Uuid::new_v4())
                .bind(profile_id)
                .bind(&skill)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    async fn replace_experience(
        &self,
        profile_id: Uuid,
        rows: Vec<NewExperience>,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM nurse_experience WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&self.pool)
            .await?;
        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO nurse_experience
                    (id, profile_id, employer, position, experience_type,
                     department, start_date, end_date, description, location)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(profile_id)
            .bind(&row.employer)
            .bind(&row.position)
            .bind(&row.experience_type)
            .bind(&row.department)
            .bind(row.start_date)
            .bind(row.end_date)
            .bind(&row.description)
            .bind(&row.location)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn replace_education(
        &self,
        profile_id: Uuid,
        rows: Vec<NewEducation>,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM nurse_education WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&self.pool)
            .await?;
        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO nurse_education
                    (id, profile_id, institution, degree, field_of_study,
                     graduation_year, institution_location, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(profile_id)
            .bind(&row.institution)
            .bind(&row.degree)
            .bind(&row.field_of_study)
            .bind(row.graduation_year)
            .bind(&row.institution_location)
            .bind(&row.status)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }
}
