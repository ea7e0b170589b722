use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::job_dto::{
    ApplicationReceipt, JobDetail, SubmitApplicationPayload, WithdrawReceipt,
};
use crate::error::{Error, Result};
use crate::models::application::{ApplicationStatus, JobApplication};
use crate::models::job::Job;
use crate::utils::{deadline, eligibility, forms};

const JOB_COLUMNS: &str = "id, company, role, location, description, deadline, \
     job_description_pdf, link_to_apply, eligibility, extra_fields, input_fields, \
     created_at, updated_at";

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs ORDER BY created_at DESC",
            JOB_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    pub async fn get(&self, id: Uuid) -> Result<Job> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs WHERE id = $1",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        job.ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    pub async fn detail(&self, id: Uuid, principal: &str) -> Result<JobDetail> {
        let job = self.get(id).await?;
        let applicant_count = self.applicant_count(id).await?;
        let my_application = self.application_for(id, principal).await?;
        Ok(JobDetail {
            deadline_info: deadline::classify(job.deadline, Utc::now()),
            applicant_count,
            has_applied: my_application.is_some(),
            my_application,
            job,
        })
    }

    /// Validates and records a structured application. Check order is fixed:
    /// existence, identity, response shape, required/typed fields, deadline,
    /// eligibility, duplicate. Everything is vetted before the single insert.
    pub async fn submit_application(
        &self,
        job_id: Uuid,
        principal: &str,
        payload: SubmitApplicationPayload,
    ) -> Result<ApplicationReceipt> {
        let job = self.get(job_id).await?;

        vet_submission(&job, principal, &payload, Utc::now())?;

        let profile = sqlx::query_as::<_, (Option<i32>, Option<i32>)>(
            "SELECT batch_start, batch_end FROM users WHERE college_email = $1",
        )
        .bind(principal)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Student profile not found".to_string()))?;

        if !eligibility::is_eligible(profile.0, profile.1, &job.eligibility) {
            return Err(Error::NotEligible(
                "Your batch is not eligible for this job".to_string(),
            ));
        }

        let mut responses = payload.responses;
        forms::coerce(&job.input_fields, &mut responses);

        // The unique (job_id, email) constraint makes the duplicate check and
        // the insert one atomic operation, so concurrent submissions cannot
        // both land.
        let inserted = sqlx::query(
            "INSERT INTO job_applications (job_id, email, responses, status) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (job_id, email) DO NOTHING",
        )
        .bind(job_id)
        .bind(&payload.email)
        .bind(Json(&responses))
        .bind(ApplicationStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        if inserted.rows_affected() == 0 {
            return Err(Error::Conflict(
                "You have already applied for this job".to_string(),
            ));
        }

        let applicant_count = self.applicant_count(job_id).await?;
        tracing::info!(%job_id, applicant = %payload.email, "application recorded");

        Ok(ApplicationReceipt {
            message: "Application submitted successfully".to_string(),
            applicant_count,
        })
    }

    /// Withdrawal is allowed even after the deadline; removing an application
    /// that does not exist is a no-op.
    pub async fn withdraw_application(
        &self,
        job_id: Uuid,
        principal: &str,
        email: &str,
    ) -> Result<WithdrawReceipt> {
        if email != principal {
            return Err(Error::Forbidden(
                "Cannot withdraw on behalf of another user".to_string(),
            ));
        }
        self.get(job_id).await?;

        sqlx::query("DELETE FROM job_applications WHERE job_id = $1 AND email = $2")
            .bind(job_id)
            .bind(email)
            .execute(&self.pool)
            .await?;

        let remaining_applicants = self.applicant_count(job_id).await?;
        Ok(WithdrawReceipt {
            message: "Application withdrawn successfully".to_string(),
            remaining_applicants,
        })
    }

    /// Administrative status transition on a single roster entry, keyed by
    /// (job, applicant) in one conditional update.
    pub async fn update_application_status(
        &self,
        job_id: Uuid,
        email: &str,
        status: ApplicationStatus,
    ) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE job_applications SET status = $3 WHERE job_id = $1 AND email = $2",
        )
        .bind(job_id)
        .bind(email)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(Error::NotFound(
                "Job or application not found".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn applicant_count(&self, job_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM job_applications WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn application_for(
        &self,
        job_id: Uuid,
        email: &str,
    ) -> Result<Option<JobApplication>> {
        let application = sqlx::query_as::<_, JobApplication>(
            "SELECT id, job_id, email, responses, status, applied_at \
             FROM job_applications WHERE job_id = $1 AND email = $2",
        )
        .bind(job_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }
}

/// The pure, pre-persistence part of submission vetting: identity, response
/// shape, field validation, deadline. First violation wins, except field
/// validation which reports every problem at once.
fn vet_submission(
    job: &Job,
    principal: &str,
    payload: &SubmitApplicationPayload,
    now: DateTime<Utc>,
) -> Result<()> {
    if payload.email != principal {
        return Err(Error::Forbidden(
            "Cannot apply on behalf of another user".to_string(),
        ));
    }

    for response in &payload.responses {
        if response.field_name.trim().is_empty() || response.value.is_null() {
            return Err(Error::BadRequest(
                "Each response must have a field name and a value".to_string(),
            ));
        }
    }

    let validation = forms::validate(&job.input_fields, &payload.responses);
    if !validation.is_valid() {
        return Err(Error::BadRequest(validation.into_message()));
    }

    if deadline::is_expired(job.deadline, now) {
        return Err(Error::DeadlinePassed(
            "Application deadline has passed".to_string(),
        ));
    }

    Ok(())
}
