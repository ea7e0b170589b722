pub mod application;
pub mod form;
pub mod job;
pub mod test;
pub mod user;
pub mod webinar;
