use chrono::{DateTime, Utc};
use rand::Rng;
use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::services::email_service::EmailService;
use crate::utils::crypto;

const OTP_TTL_SECONDS: i64 = 300;

#[derive(Clone)]
pub struct OtpService {
    pool: PgPool,
    email_service: EmailService,
}

impl OtpService {
    pub fn new(pool: PgPool, email_service: EmailService) -> Self {
        Self {
            pool,
            email_service,
        }
    }

    /// Issues a fresh 6-digit code for the address, replacing any previous
    /// one, and delivers it by email. The code expires after 300 seconds.
    pub async fn send(&self, email: &str) -> Result<()> {
        let code = generate_code();

        sqlx::query(
            "INSERT INTO otp_codes (email, code, expires_at) \
             VALUES ($1, $2, NOW() + make_interval(secs => $3)) \
             ON CONFLICT (email) DO UPDATE \
             SET code = EXCLUDED.code, expires_at = EXCLUDED.expires_at, created_at = NOW()",
        )
        .bind(email)
        .bind(&code)
        .bind(OTP_TTL_SECONDS as f64)
        .execute(&self.pool)
        .await?;

        self.email_service.send_otp(email, &code).await?;
        tracing::info!(%email, "otp issued");
        Ok(())
    }

    /// Verifies and consumes the code: success deletes it, so each code is
    /// single-use. Expired codes are purged on the way out.
    pub async fn verify(&self, email: &str, code: &str) -> Result<()> {
        let stored = sqlx::query_as::<_, (String, DateTime<Utc>)>(
            "SELECT code, expires_at FROM otp_codes WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some((stored_code, expires_at)) = stored else {
            return Err(Error::BadRequest("Invalid or expired OTP".to_string()));
        };

        if expires_at < Utc::now() {
            self.discard(email).await?;
            return Err(Error::BadRequest("Invalid or expired OTP".to_string()));
        }

        if !crypto::constant_time_eq(&stored_code, code) {
            return Err(Error::BadRequest("Invalid or expired OTP".to_string()));
        }

        self.discard(email).await?;
        Ok(())
    }

    async fn discard(&self, email: &str) -> Result<()> {
        sqlx::query("DELETE FROM otp_codes WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}
