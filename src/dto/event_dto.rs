use serde::{Deserialize, Serialize};

use crate::models::test::Test;
use crate::models::webinar::Webinar;
use crate::utils::deadline::DeadlineInfo;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPayload {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct DeregisterQuery {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct RegistrationReceipt {
    pub message: String,
    pub registrant_count: i64,
}

#[derive(Debug, Serialize)]
pub struct TestDetail {
    #[serde(flatten)]
    pub test: Test,
    pub deadline_info: DeadlineInfo,
    pub registrant_count: i64,
    pub is_registered: bool,
}

#[derive(Debug, Serialize)]
pub struct WebinarDetail {
    #[serde(flatten)]
    pub webinar: Webinar,
    pub registrant_count: i64,
    pub is_registered: bool,
}
