//! Domain models for TestLedger: API request and response types.

use serde::Deserialize;
use utoipa::ToSchema;

pub mod assignment;
pub mod bug;
pub mod comment;
pub mod deletion;
pub mod entity_kind;
pub mod execution;
pub mod notification;
pub mod project;
pub mod report;
pub mod requirement;
pub mod test_case;
pub mod test_suite;
pub mod user;

// Re-export commonly used types
pub use assignment::{
    Assignment, AssignmentQuery, AssignmentStatus, CreateAssignmentRequest,
    UpdateAssignmentRequest,
};
pub use bug::{Bug, BugQuery, CreateBugRequest, UpdateBugRequest, UpdateBugStatusRequest};
pub use comment::{Comment, CommentTarget, CreateCommentRequest};
pub use deletion::{BulkDeleteRequest, BulkDeleteResponse, BulkDeleteSummary, DeleteResponse};
pub use entity_kind::EntityKind;
pub use execution::{
    ExecuteTestCaseRequest, ExecuteTestCaseResponse, ExecutionQuery, ExecutionStatus,
    TestExecution,
};
pub use notification::{Notification, NotificationQuery, NotificationType};
pub use project::{CreateProjectRequest, Project, ProjectQuery, UpdateProjectRequest};
pub use report::{DashboardStats, ProjectReport, ReportSummary, UserStats};
pub use requirement::{
    CandidateTestCase, CreateRequirementRequest, LinkTestCasesRequest, LinkTestCasesResponse,
    Requirement, RequirementDetail, RequirementQuery, UpdateRequirementRequest,
};
pub use test_case::{CreateTestCaseRequest, TestCase, TestCaseQuery, UpdateTestCaseRequest};
pub use test_suite::{CreateTestSuiteRequest, TestSuite, TestSuiteQuery, UpdateTestSuiteRequest};
pub use user::{Actor, CreateUserRequest, Role, UpdateUserRequest, User};

/// Generic `{ success, message }` acknowledgement.
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Optional result limit for list endpoints.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LimitParams {
    pub limit: Option<u64>,
}
