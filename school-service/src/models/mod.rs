pub mod account;
pub mod capability;
pub mod course;
pub mod grade;
pub mod institution;
pub mod student;

pub use account::{
    Account, AccountResponse, AccountStatus, AuthResponse, CreateAccountRequest, LoginRequest,
    Role, TokenResponse,
};
pub use capability::{Capability, CreateRoleGrantRequest, RoleGrant};
pub use course::{Course, CreateCourseRequest, CreateSubjectRequest, Subject};
pub use grade::{
    CreateGradingWindowRequest, Grade, GradingPeriod, GradingSubPeriod, RecordGradeRequest,
};
pub use institution::{
    AccountInstitutionLink, CreateInstitutionRequest, Institution, InstitutionResponse,
};
pub use student::{CreateStudentRequest, Student};
