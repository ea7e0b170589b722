use sqlx::PgPool;

use crate::dto::user_dto::{RegisterUserPayload, UpdateProfilePayload};
use crate::error::{Error, Result};
use crate::models::user::UserProfile;
use crate::utils::crypto;

const USER_COLUMNS: &str = "id, name, username, college_email, personal_email, password_hash, \
     enrollment_number, phone, department, tenth_percentage, twelfth_percentage, college_gpa, \
     batch_start, batch_end, linkedin, github, leetcode, resume_url, status, created_at, updated_at";

#[derive(Clone)]
pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register_user(&self, payload: RegisterUserPayload) -> Result<UserProfile> {
        let password_hash = crypto::hash_password(&payload.password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;

        let user = sqlx::query_as::<_, UserProfile>(&format!(
            "INSERT INTO users (name, username, college_email, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&payload.name)
        .bind(&payload.username)
        .bind(&payload.college_email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return Error::Conflict("Username or email is already registered".to_string());
                }
            }
            Error::from(e)
        })?;

        tracing::info!(username = %user.username, "student registered");
        Ok(user)
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE college_email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<UserProfile> {
        let user = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {} FROM users WHERE college_email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    /// Partial update; absent fields keep their stored values. The batch span
    /// is validated against the merged state so a single-field update cannot
    /// sneak an inverted range past the check.
    pub async fn update_profile(
        &self,
        email: &str,
        payload: UpdateProfilePayload,
    ) -> Result<UserProfile> {
        let current = self.get_by_email(email).await?;

        let batch_start = payload.batch_start.or(current.batch_start);
        let batch_end = payload.batch_end.or(current.batch_end);
        if let (Some(start), Some(end)) = (batch_start, batch_end) {
            if end <= start {
                return Err(Error::BadRequest(
                    "batch_end must be greater than batch_start".to_string(),
                ));
            }
        }

        let user = sqlx::query_as::<_, UserProfile>(&format!(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                personal_email = COALESCE($3, personal_email), \
                enrollment_number = COALESCE($4, enrollment_number), \
                phone = COALESCE($5, phone), \
                department = COALESCE($6, department), \
                tenth_percentage = COALESCE($7, tenth_percentage), \
                twelfth_percentage = COALESCE($8, twelfth_percentage), \
                college_gpa = COALESCE($9, college_gpa), \
                batch_start = COALESCE($10, batch_start), \
                batch_end = COALESCE($11, batch_end), \
                linkedin = COALESCE($12, linkedin), \
                github = COALESCE($13, github), \
                leetcode = COALESCE($14, leetcode), \
                resume_url = COALESCE($15, resume_url), \
                status = COALESCE($16, status), \
                updated_at = NOW() \
             WHERE college_email = $1 \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(email)
        .bind(payload.name)
        .bind(payload.personal_email)
        .bind(payload.enrollment_number)
        .bind(payload.phone)
        .bind(payload.department)
        .bind(payload.tenth_percentage)
        .bind(payload.twelfth_percentage)
        .bind(payload.college_gpa)
        .bind(payload.batch_start)
        .bind(payload.batch_end)
        .bind(payload.linkedin)
        .bind(payload.github)
        .bind(payload.leetcode)
        .bind(payload.resume_url)
        .bind(payload.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
