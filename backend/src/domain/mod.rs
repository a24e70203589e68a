//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: define the strongly typed model of the approval workflow — users
//! and roles, documents, course results, review statuses — together with the
//! ports the services drive and the services themselves. Types are immutable
//! once constructed; each type's Rustdoc documents its invariants and serde
//! contract. Nothing in this module imports a web framework or a database
//! driver.

pub(crate) mod actor;
pub mod auth;
pub mod course_result;
pub mod dashboard_service;
pub mod document;
pub mod document_service;
pub mod error;
pub mod policy;
pub mod ports;
pub mod profile_service;
pub mod record;
pub mod result_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::course_result::{
    AcademicSession, CourseCode, CourseResult, CourseResultDraft, CourseTitle, ResultFilter,
    ResultUpload, ResultValidationError, Semester, SessionName,
};
pub use self::dashboard_service::DashboardService;
pub use self::document::{
    Document, DocumentDraft, DocumentTitle, DocumentUpload, DocumentValidationError,
};
pub use self::document_service::DocumentWorkflowService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::profile_service::ProfileService;
pub use self::record::{
    FileAttachment, FileUpload, RecordValidationError, ReviewStatus, ReviewTransition,
};
pub use self::result_service::ResultWorkflowService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DepartmentName, DisplayName, EmailAddress, Role, User, UserId, UserSummary,
    UserValidationError,
};
