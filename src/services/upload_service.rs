use chrono::Utc;

use crate::dto::upload_dto::{SignUploadPayload, SignedUpload};
use crate::utils::crypto;

const DEFAULT_FOLDER: &str = "resumes";

/// Issues time-limited upload credentials for the object store. The resulting
/// file reference comes back to us later as an opaque URL inside a form
/// response or profile field; this service never sees the bytes.
#[derive(Clone)]
pub struct UploadService {
    api_key: String,
    api_secret: String,
}

impl UploadService {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }

    pub fn sign(&self, payload: SignUploadPayload) -> SignedUpload {
        self.sign_at(payload, Utc::now().timestamp())
    }

    fn sign_at(&self, payload: SignUploadPayload, timestamp: i64) -> SignedUpload {
        let folder = payload
            .folder
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FOLDER.to_string());

        let mut params: Vec<(&str, String)> = vec![
            ("folder", folder.clone()),
            ("timestamp", timestamp.to_string()),
        ];
        if let Some(public_id) = payload.public_id {
            params.push(("public_id", public_id));
        }
        params.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        SignedUpload {
            timestamp,
            signature: crypto::hmac_sha256_hex(&self.api_secret, &to_sign),
            api_key: self.api_key.clone(),
            folder,
        }
    }
}
