//! Aggregate report models.

use serde::Serialize;
use utoipa::ToSchema;

use super::TestExecution;

/// Execution totals for managers and admins.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportSummary {
    pub total_test_cases: u64,
    pub total_executions: u64,
    pub passed: u64,
    pub failed: u64,
    pub blocked: u64,
    /// Percentage rounded to two decimals; 0 when nothing ran.
    pub pass_rate: f64,
}

/// Totals scoped to one project.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProjectReport {
    pub project_id: i32,
    pub total_test_cases: u64,
    pub total_executions: u64,
    pub passed: u64,
    pub failed: u64,
    pub total_bugs: u64,
    pub total_requirements: u64,
    pub pass_rate: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_test_cases: u64,
    pub total_executions: u64,
    pub total_bugs: u64,
    pub pass_rate: f64,
    pub recent_executions: Vec<TestExecution>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserStats {
    pub total_users: u64,
    pub active_users: u64,
    pub admin_count: u64,
    pub manager_count: u64,
    pub developer_count: u64,
    pub tester_count: u64,
}
