pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    email_service::EmailService, event_service::EventService, job_service::JobService,
    otp_service::OtpService, profile_service::ProfileService, upload_service::UploadService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub job_service: JobService,
    pub event_service: EventService,
    pub profile_service: ProfileService,
    pub otp_service: OtpService,
    pub upload_service: UploadService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();

        let email_service = EmailService::new(
            config.email_api_url.clone(),
            config.email_api_key.clone(),
            config.email_from.clone(),
        );

        let job_service = JobService::new(pool.clone());
        let event_service = EventService::new(pool.clone());
        let profile_service = ProfileService::new(pool.clone());
        let otp_service = OtpService::new(pool.clone(), email_service);
        let upload_service = UploadService::new(
            config.upload_api_key.clone(),
            config.upload_api_secret.clone(),
        );

        Self {
            pool,
            job_service,
            event_service,
            profile_service,
            otp_service,
            upload_service,
        }
    }
}
