use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct SignUploadPayload {
    pub folder: Option<String>,
    pub public_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignedUpload {
    pub timestamp: i64,
    pub signature: String,
    pub api_key: String,
    pub folder: String,
}
