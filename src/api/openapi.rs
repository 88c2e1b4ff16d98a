//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::config::USER_ID_HEADER;
use crate::{api, error, models, services};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TestLedger Server",
        version = "0.1.0",
        description = "API server for managing test projects, suites, cases, executions, bugs, requirements and assignments"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Users
        api::users::list_users,
        api::users::create_user,
        api::users::user_stats,
        api::users::get_user,
        api::users::update_user,
        api::users::delete_user,
        api::users::toggle_active,
        api::users::bulk_delete_users,
        // Projects
        api::projects::list_projects,
        api::projects::create_project,
        api::projects::get_project,
        api::projects::update_project,
        api::projects::delete_project,
        api::projects::bulk_delete_projects,
        api::projects::project_test_cases,
        api::projects::project_report,
        // Test suites
        api::test_suites::list_test_suites,
        api::test_suites::create_test_suite,
        api::test_suites::get_test_suite,
        api::test_suites::update_test_suite,
        api::test_suites::delete_test_suite,
        api::test_suites::suite_test_cases,
        // Test cases
        api::test_cases::list_test_cases,
        api::test_cases::create_test_case,
        api::test_cases::get_test_case,
        api::test_cases::update_test_case,
        api::test_cases::delete_test_case,
        api::test_cases::duplicate_test_case,
        api::test_cases::execute_test_case,
        // Test executions
        api::test_executions::list_test_executions,
        api::test_executions::delete_test_execution,
        api::test_executions::bulk_delete_test_executions,
        api::test_executions::add_execution_comment,
        // Bugs
        api::bugs::list_bugs,
        api::bugs::create_bug,
        api::bugs::get_bug,
        api::bugs::update_bug,
        api::bugs::delete_bug,
        api::bugs::update_bug_status,
        // Requirements
        api::requirements::list_requirements,
        api::requirements::create_requirement,
        api::requirements::get_requirement,
        api::requirements::update_requirement,
        api::requirements::delete_requirement,
        api::requirements::bulk_delete_requirements,
        api::requirements::candidate_test_cases,
        api::requirements::link_test_cases,
        // Assignments
        api::assignments::list_assignments,
        api::assignments::create_assignment,
        api::assignments::update_assignment,
        api::assignments::delete_assignment,
        api::assignments::complete_assignment,
        api::assignments::bulk_delete_assignments,
        // Notifications
        api::notifications::list_notifications,
        api::notifications::mark_read,
        api::notifications::mark_all_read,
        // Reports
        api::reports::dashboard,
        api::reports::report_summary,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::MessageResponse,
            models::EntityKind,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Users
            models::Role,
            models::User,
            models::CreateUserRequest,
            models::UpdateUserRequest,
            models::UserStats,
            // Projects and suites
            models::Project,
            models::CreateProjectRequest,
            models::UpdateProjectRequest,
            models::TestSuite,
            models::CreateTestSuiteRequest,
            models::UpdateTestSuiteRequest,
            // Test cases and executions
            models::TestCase,
            models::CreateTestCaseRequest,
            models::UpdateTestCaseRequest,
            models::ExecutionStatus,
            models::TestExecution,
            models::ExecuteTestCaseRequest,
            models::ExecuteTestCaseResponse,
            models::Comment,
            models::CreateCommentRequest,
            // Bugs
            models::Bug,
            models::CreateBugRequest,
            models::UpdateBugRequest,
            models::UpdateBugStatusRequest,
            // Requirements
            models::Requirement,
            models::RequirementDetail,
            models::CandidateTestCase,
            models::CreateRequirementRequest,
            models::UpdateRequirementRequest,
            models::LinkTestCasesRequest,
            models::LinkTestCasesResponse,
            // Assignments and notifications
            models::AssignmentStatus,
            models::Assignment,
            models::CreateAssignmentRequest,
            models::UpdateAssignmentRequest,
            models::NotificationType,
            models::Notification,
            // Reports
            models::ReportSummary,
            models::ProjectReport,
            models::DashboardStats,
            // Deletion
            models::DeleteResponse,
            models::BulkDeleteRequest,
            models::BulkDeleteResponse,
            services::cascade::CascadeReport,
            services::cascade::CascadeStep,
            services::cascade::StepAction,
            services::cascade::StepOutcome,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Users", description = "User administration"),
        (name = "Projects", description = "Projects and their cascading deletion"),
        (name = "Test Suites", description = "Test suite hierarchy"),
        (name = "Test Cases", description = "Test cases, duplication and execution"),
        (name = "Test Executions", description = "Recorded test runs"),
        (name = "Bugs", description = "Bug tracking"),
        (name = "Requirements", description = "Requirements and test case coverage"),
        (name = "Assignments", description = "Work assignments"),
        (name = "Notifications", description = "Per-user notifications"),
        (name = "Reports", description = "Aggregate pass/fail reporting")
    ),
    security(
        ("user_id" = [])
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add the acting-user header as a security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "user_id",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new(USER_ID_HEADER),
                    ),
                ),
            );
        }
    }
}
