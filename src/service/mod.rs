pub mod admin;
pub mod matches;
pub mod registration;
