pub mod account;
pub mod health;
pub mod jobs;
pub mod otp;
pub mod register;
pub mod upload;
pub mod webinars;
