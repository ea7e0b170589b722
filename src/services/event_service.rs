use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::event_dto::{RegistrationReceipt, TestDetail, WebinarDetail};
use crate::error::{Error, Result};
use crate::models::test::Test;
use crate::models::webinar::Webinar;
use crate::utils::deadline;

/// Tests and webinars share flat email rosters; only the tables differ.
#[derive(Debug, Clone, Copy)]
enum EventKind {
    Test,
    Webinar,
}

impl EventKind {
    fn roster_table(self) -> &'static str {
        match self {
            EventKind::Test => "test_registrations",
            EventKind::Webinar => "webinar_registrations",
        }
    }

    fn fk_column(self) -> &'static str {
        match self {
            EventKind::Test => "test_id",
            EventKind::Webinar => "webinar_id",
        }
    }
}

#[derive(Clone)]
pub struct EventService {
    pool: PgPool,
}

impl EventService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_tests(&self) -> Result<Vec<Test>> {
        let tests = sqlx::query_as::<_, Test>(
            "SELECT id, title, description, scheduled_at, duration, mode, link, \
             instructions, eligibility, deadline, created_at, updated_at \
             FROM tests ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tests)
    }

    pub async fn get_test(&self, id: Uuid) -> Result<Test> {
        let test = sqlx::query_as::<_, Test>(
            "SELECT id, title, description, scheduled_at, duration, mode, link, \
             instructions, eligibility, deadline, created_at, updated_at \
             FROM tests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        test.ok_or_else(|| Error::NotFound("Test not found".to_string()))
    }

    pub async fn test_detail(&self, id: Uuid, principal: &str) -> Result<TestDetail> {
        let test = self.get_test(id).await?;
        Ok(TestDetail {
            deadline_info: deadline::classify(test.deadline, Utc::now()),
            registrant_count: self.roster_count(EventKind::Test, id).await?,
            is_registered: self.is_member(EventKind::Test, id, principal).await?,
            test,
        })
    }

    pub async fn list_webinars(&self) -> Result<Vec<Webinar>> {
        let webinars = sqlx::query_as::<_, Webinar>(
            "SELECT id, title, description, scheduled_at, duration, mode, link, \
             created_at, updated_at \
             FROM webinars ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(webinars)
    }

    pub async fn get_webinar(&self, id: Uuid) -> Result<Webinar> {
        let webinar = sqlx::query_as::<_, Webinar>(
            "SELECT id, title, description, scheduled_at, duration, mode, link, \
             created_at, updated_at \
             FROM webinars WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        webinar.ok_or_else(|| Error::NotFound("Webinar not found".to_string()))
    }

    pub async fn webinar_detail(&self, id: Uuid, principal: &str) -> Result<WebinarDetail> {
        let webinar = self.get_webinar(id).await?;
        Ok(WebinarDetail {
            registrant_count: self.roster_count(EventKind::Webinar, id).await?,
            is_registered: self.is_member(EventKind::Webinar, id, principal).await?,
            webinar,
        })
    }

    /// Registering for a test is gated on its deadline; re-registering is a
    /// no-op, not an error, since the roster is a set.
    pub async fn register_for_test(
        &self,
        test_id: Uuid,
        principal: &str,
        email: &str,
    ) -> Result<RegistrationReceipt> {
        let test = self.get_test(test_id).await?;
        check_identity(principal, email)?;
        if deadline::is_expired(test.deadline, Utc::now()) {
            return Err(Error::DeadlinePassed(
                "Registration deadline has passed".to_string(),
            ));
        }
        self.add_member(EventKind::Test, test_id, email).await?;
        Ok(RegistrationReceipt {
            message: "Registered successfully".to_string(),
            registrant_count: self.roster_count(EventKind::Test, test_id).await?,
        })
    }

    pub async fn deregister_from_test(
        &self,
        test_id: Uuid,
        principal: &str,
        email: &str,
    ) -> Result<RegistrationReceipt> {
        self.get_test(test_id).await?;
        check_identity(principal, email)?;
        self.remove_member(EventKind::Test, test_id, email).await?;
        Ok(RegistrationReceipt {
            message: "Registration withdrawn".to_string(),
            registrant_count: self.roster_count(EventKind::Test, test_id).await?,
        })
    }

    pub async fn register_for_webinar(
        &self,
        webinar_id: Uuid,
        principal: &str,
        email: &str,
    ) -> Result<RegistrationReceipt> {
        self.get_webinar(webinar_id).await?;
        check_identity(principal, email)?;
        self.add_member(EventKind::Webinar, webinar_id, email).await?;
        Ok(RegistrationReceipt {
            message: "Registered successfully".to_string(),
            registrant_count: self.roster_count(EventKind::Webinar, webinar_id).await?,
        })
    }

    pub async fn deregister_from_webinar(
        &self,
        webinar_id: Uuid,
        principal: &str,
        email: &str,
    ) -> Result<RegistrationReceipt> {
        self.get_webinar(webinar_id).await?;
        check_identity(principal, email)?;
        self.remove_member(EventKind::Webinar, webinar_id, email).await?;
        Ok(RegistrationReceipt {
            message: "Registration withdrawn".to_string(),
            registrant_count: self.roster_count(EventKind::Webinar, webinar_id).await?,
        })
    }

    /// Set-semantics insert: the primary key absorbs duplicates, so a retry
    /// under concurrency cannot create a second roster entry.
    async fn add_member(&self, kind: EventKind, id: Uuid, email: &str) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO {} ({}, email) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            kind.roster_table(),
            kind.fk_column()
        ))
        .bind(id)
        .bind(email)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Removing an absent member is a no-op.
    async fn remove_member(&self, kind: EventKind, id: Uuid, email: &str) -> Result<()> {
        sqlx::query(&format!(
            "DELETE FROM {} WHERE {} = $1 AND email = $2",
            kind.roster_table(),
            kind.fk_column()
        ))
        .bind(id)
        .bind(email)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn roster_count(&self, kind: EventKind, id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE {} = $1",
            kind.roster_table(),
            kind.fk_column()
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn is_member(&self, kind: EventKind, id: Uuid, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1 AND email = $2)",
            kind.roster_table(),
            kind.fk_column()
        ))
        .bind(id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

fn check_identity(principal: &str, email: &str) -> Result<()> {
    if principal != email {
        return Err(Error::Forbidden(
            "Cannot register on behalf of another user".to_string(),
        ));
    }
    Ok(())
}
