pub mod event_dto;
pub mod job_dto;
pub mod otp_dto;
pub mod upload_dto;
pub mod user_dto;
