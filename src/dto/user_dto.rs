use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUserPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    #[validate(email)]
    pub college_email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username_exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_exists: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfilePayload {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub personal_email: Option<String>,
    pub enrollment_number: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub tenth_percentage: Option<Decimal>,
    pub twelfth_percentage: Option<Decimal>,
    pub college_gpa: Option<Decimal>,
    #[validate(range(min = 2000, max = 2100))]
    pub batch_start: Option<i32>,
    #[validate(range(min = 2000, max = 2100))]
    pub batch_end: Option<i32>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub leetcode: Option<String>,
    pub resume_url: Option<String>,
    pub status: Option<String>,
}
