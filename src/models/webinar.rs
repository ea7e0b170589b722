use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Webinars carry no application deadline; registration stays open until the
// event itself.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Webinar {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration: Option<String>,
    pub mode: Option<String>,
    pub link: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
