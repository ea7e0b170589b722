use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::form::{ExtraField, InputField};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub job_description_pdf: Option<String>,
    pub link_to_apply: Option<String>,
    pub eligibility: Vec<String>,
    pub extra_fields: Json<Vec<ExtraField>>,
    pub input_fields: Json<Vec<InputField>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
