use serde::{Deserialize, Serialize};

use crate::models::application::{ApplicationStatus, FieldResponse, JobApplication};
use crate::models::job::Job;
use crate::utils::deadline::DeadlineInfo;

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitApplicationPayload {
    pub email: String,
    pub responses: Vec<FieldResponse>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationReceipt {
    pub message: String,
    pub applicant_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawQuery {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct WithdrawReceipt {
    pub message: String,
    pub remaining_applicants: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusPayload {
    pub application_email: String,
    pub new_status: ApplicationStatus,
}

#[derive(Debug, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    pub deadline_info: DeadlineInfo,
    pub applicant_count: i64,
    pub has_applied: bool,
    pub my_application: Option<JobApplication>,
}
