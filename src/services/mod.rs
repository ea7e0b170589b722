pub mod email_service;
pub mod event_service;
pub mod job_service;
pub mod otp_service;
pub mod profile_service;
pub mod upload_service;
