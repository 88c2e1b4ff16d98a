//! Shared test helpers for cascade E2E tests.

use actix_web::{App, dev::ServiceResponse, test, web};
use sea_orm::{ConnectionTrait, Statement};
use serde_json::Value;
use testledger_lib::config::{DatabaseSettings, USER_ID_HEADER};
use testledger_lib::db::{self, DbPool};
use testledger_lib::entity::{
    assignment, bug, project, requirement, test_case, test_execution, test_suite, user,
};
use testledger_lib::models::{
    Actor, CommentTarget, CreateAssignmentRequest, CreateBugRequest, CreateProjectRequest,
    CreateRequirementRequest, CreateTestCaseRequest, CreateTestSuiteRequest, CreateUserRequest,
    ExecuteTestCaseRequest, ExecutionStatus, Role,
};
use testledger_lib::services::DeletionService;

/// Error messages kept per bulk deletion in tests.
pub const TEST_BULK_ERROR_LIMIT: usize = 3;

/// Open a fresh in-memory database without running migrations.
pub async fn create_empty_pool() -> DbPool {
    DbPool::connect(&DatabaseSettings::in_memory())
        .await
        .expect("Failed to open in-memory database")
}

/// Open a fresh in-memory database with the full schema.
pub async fn create_test_pool() -> DbPool {
    let pool = create_empty_pool().await;
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

pub fn deletion_service() -> DeletionService {
    DeletionService::new(
        testledger_lib::services::CascadeEngine::standard().expect("standard graph is acyclic"),
        TEST_BULK_ERROR_LIMIT,
    )
}

pub fn actor(user: &user::Model) -> Actor {
    let role = Role::parse(&user.role).expect("seeded users carry a known role");
    Actor::new(user.id, role)
}

pub async fn seed_user(pool: &DbPool, username: &str, role: Role) -> user::Model {
    let req = CreateUserRequest {
        username: username.to_string(),
        email: format!("{}@testledger.local", username),
        password_hash: "$2b$12$test-hash".to_string(),
        role,
        department: None,
    };
    db::users::insert(pool.connection(), &req)
        .await
        .expect("Failed to seed user")
}

pub async fn seed_project(pool: &DbPool, name: &str, created_by: i32) -> project::Model {
    let req = CreateProjectRequest {
        name: name.to_string(),
        description: None,
        status: None,
        start_date: None,
        end_date: None,
    };
    db::projects::create(pool.connection(), &req, created_by)
        .await
        .expect("Failed to seed project")
}

pub async fn seed_suite(
    pool: &DbPool,
    name: &str,
    project_id: i32,
    parent_suite_id: Option<i32>,
) -> test_suite::Model {
    let req = CreateTestSuiteRequest {
        name: name.to_string(),
        description: None,
        project_id,
        parent_suite_id,
    };
    db::test_suites::create(pool.connection(), &req)
        .await
        .expect("Failed to seed test suite")
}

pub async fn seed_requirement(
    pool: &DbPool,
    title: &str,
    project_id: i32,
    created_by: i32,
) -> requirement::Model {
    let req = CreateRequirementRequest {
        title: title.to_string(),
        description: None,
        requirement_type: None,
        priority: None,
        status: None,
        project_id,
    };
    db::requirements::create(pool.connection(), &req, created_by)
        .await
        .expect("Failed to seed requirement")
}

pub async fn seed_case(
    pool: &DbPool,
    title: &str,
    suite_id: i32,
    requirement_id: Option<i32>,
    created_by: i32,
) -> test_case::Model {
    let req = CreateTestCaseRequest {
        title: title.to_string(),
        test_suite_id: Some(suite_id),
        requirement_id,
        expected_result: Some("It works".to_string()),
        ..Default::default()
    };
    db::test_cases::create(pool.connection(), &req, created_by)
        .await
        .expect("Failed to seed test case")
}

pub fn execute_request(status: ExecutionStatus) -> ExecuteTestCaseRequest {
    ExecuteTestCaseRequest {
        status,
        actual_result: None,
        comments: None,
        environment: None,
        build_version: None,
        execution_minutes: None,
        create_bug: false,
        bug_severity: None,
    }
}

pub async fn seed_execution(
    pool: &DbPool,
    test_case_id: i32,
    executed_by: i32,
    status: ExecutionStatus,
) -> test_execution::Model {
    db::test_executions::insert(
        pool.connection(),
        test_case_id,
        executed_by,
        &execute_request(status),
    )
    .await
    .expect("Failed to seed execution")
}

pub async fn seed_bug(
    pool: &DbPool,
    title: &str,
    test_case_id: i32,
    reported_by: i32,
) -> bug::Model {
    let req = CreateBugRequest {
        title: title.to_string(),
        test_case_id: Some(test_case_id),
        ..Default::default()
    };
    db::bugs::create(pool.connection(), &req, reported_by)
        .await
        .expect("Failed to seed bug")
}

pub fn assignment_request(title: &str, assigned_to: i32) -> CreateAssignmentRequest {
    CreateAssignmentRequest {
        title: title.to_string(),
        description: None,
        assignment_type: None,
        assigned_to,
        due_date: None,
        priority: None,
        project_id: None,
        test_case_id: None,
        bug_id: None,
        notes: None,
    }
}

pub async fn seed_assignment(
    pool: &DbPool,
    title: &str,
    assigned_to: i32,
    project_id: Option<i32>,
    test_case_id: Option<i32>,
    assigned_by: i32,
) -> assignment::Model {
    let mut req = assignment_request(title, assigned_to);
    req.test_case_id = test_case_id;
    db::assignments::insert(pool.connection(), &req, project_id, assigned_by)
        .await
        .expect("Failed to seed assignment")
}

pub async fn seed_comment(pool: &DbPool, target: CommentTarget, created_by: i32) {
    db::comments::create(pool.connection(), target, "Looks flaky on CI", created_by)
        .await
        .expect("Failed to seed comment");
}

/// Run a raw statement that must succeed.
pub async fn exec(pool: &DbPool, sql: &str) {
    pool.connection()
        .execute_unprepared(sql)
        .await
        .unwrap_or_else(|e| panic!("Failed to execute `{}`: {}", sql, e));
}

/// Number of rows in `table` matching `filter` (a SQL condition, or "1=1").
pub async fn count_rows(pool: &DbPool, table: &str, filter: &str) -> i64 {
    let conn = pool.connection();
    let sql = format!("SELECT COUNT(*) AS count FROM {} WHERE {}", table, filter);
    let row = conn
        .query_one_raw(Statement::from_string(conn.get_database_backend(), sql))
        .await
        .expect("Count query failed")
        .expect("Count query returned no row");
    row.try_get::<i64>("", "count").expect("count column")
}

/// Create a test app serving the full `/api/v1` scope.
pub async fn create_test_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(deletion_service()))
            .service(web::scope("/api/v1").configure(testledger_lib::api::configure_api_routes)),
    )
    .await
}

/// Send a request as `user_id` (or anonymously) and return status and JSON body.
pub async fn call<S>(app: &S, req: test::TestRequest, user_id: Option<i32>) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = match user_id {
        Some(id) => req.insert_header((USER_ID_HEADER, id.to_string())),
        None => req,
    };

    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    let bytes = test::read_body(resp).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
