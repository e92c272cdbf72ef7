pub mod account;
pub mod auth;
pub mod course;
pub mod grade;
pub mod grading;
pub mod grant;
pub mod health;
pub mod institution;
pub mod report;
pub mod student;
pub mod subject;
