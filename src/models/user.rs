use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub college_email: String,
    pub personal_email: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub enrollment_number: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub tenth_percentage: Option<Decimal>,
    pub twelfth_percentage: Option<Decimal>,
    pub college_gpa: Option<Decimal>,
    pub batch_start: Option<i32>,
    pub batch_end: Option<i32>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub leetcode: Option<String>,
    pub resume_url: Option<String>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
