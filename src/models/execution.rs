//! Test execution models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Bug;
use crate::entity::test_execution;

/// Outcome of a test execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ExecutionStatus {
    Pass,
    Fail,
    Blocked,
    Skipped,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
            Self::Blocked => "Blocked",
            Self::Skipped => "Skipped",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pass" | "passed" => Some(Self::Pass),
            "fail" | "failed" => Some(Self::Fail),
            "blocked" => Some(Self::Blocked),
            "skipped" | "skip" => Some(Self::Skipped),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TestExecution {
    pub id: i32,
    pub test_case_id: i32,
    pub executed_by: Option<i32>,
    pub status: String,
    pub actual_result: Option<String>,
    pub comments: Option<String>,
    pub environment: Option<String>,
    pub build_version: Option<String>,
    pub execution_minutes: Option<i32>,
    pub execution_date: DateTime<Utc>,
}

impl From<test_execution::Model> for TestExecution {
    fn from(m: test_execution::Model) -> Self {
        Self {
            id: m.id,
            test_case_id: m.test_case_id,
            executed_by: m.executed_by,
            status: m.status,
            actual_result: m.actual_result,
            comments: m.comments,
            environment: m.environment,
            build_version: m.build_version,
            execution_minutes: m.execution_minutes,
            execution_date: m.execution_date,
        }
    }
}

/// Record a run of a test case.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ExecuteTestCaseRequest {
    pub status: ExecutionStatus,
    pub actual_result: Option<String>,
    pub comments: Option<String>,
    pub environment: Option<String>,
    pub build_version: Option<String>,
    pub execution_minutes: Option<i32>,
    /// File a bug against the test case when the run failed.
    #[serde(default)]
    pub create_bug: bool,
    pub bug_severity: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExecuteTestCaseResponse {
    pub execution: TestExecution,
    pub bug: Option<Bug>,
}

/// Filters for listing executions, newest first.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ExecutionQuery {
    pub test_case_id: Option<i32>,
    pub project_id: Option<i32>,
    pub executed_by: Option<i32>,
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_accepts_past_tense() {
        assert_eq!(ExecutionStatus::parse("Passed"), Some(ExecutionStatus::Pass));
        assert_eq!(ExecutionStatus::parse("fail"), Some(ExecutionStatus::Fail));
        assert_eq!(ExecutionStatus::parse("Flaky"), None);
    }

    #[test]
    fn test_status_serializes_capitalized() {
        assert_eq!(
            serde_json::to_string(&ExecutionStatus::Blocked).unwrap(),
            "\"Blocked\""
        );
    }
}
