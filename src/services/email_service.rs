use reqwest::Client;
use serde_json::json;

use crate::error::{Error, Result};

/// Transactional email over an HTTP delivery API (Resend-compatible). The
/// only contract the rest of the system relies on is send -> delivered|fails.
#[derive(Clone)]
pub struct EmailService {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl EmailService {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
            from,
        }
    }

    pub async fn send_otp(&self, to: &str, code: &str) -> Result<()> {
        let body = json!({
            "from": self.from,
            "to": to,
            "subject": "Welcome to Cleit CDC - OTP Verification",
            "html": format!(
                "<h1>Welcome to Cleit!</h1>\
                 <p>Please use this OTP to verify your email:</p>\
                 <h2>{}</h2>\
                 <p>This OTP is valid for <strong>5 minutes.</strong></p>\
                 <p>If you did not request this, please ignore this email.</p>",
                code
            ),
        });

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            tracing::error!(%status, %detail, "email delivery failed");
            return Err(Error::Internal("Failed to send email".to_string()));
        }

        Ok(())
    }
}
