//! Test case models.
//!
//! Request payloads accept the legacy field names `suite_id` and `steps` as
//! aliases of `test_suite_id` and `test_steps`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::test_case;

pub const DEFAULT_PRIORITY: &str = "Medium";
pub const DEFAULT_CASE_STATUS: &str = "Active";
pub const DEFAULT_CASE_TYPE: &str = "Manual";
pub const DEFAULT_AUTOMATION_STATUS: &str = "Not Automated";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TestCase {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub preconditions: Option<String>,
    pub test_steps: Option<String>,
    pub expected_result: Option<String>,
    pub test_data: Option<String>,
    pub priority: String,
    pub status: String,
    #[serde(rename = "type")]
    pub case_type: String,
    pub automation_status: String,
    pub estimated_minutes: Option<i32>,
    pub project_id: Option<i32>,
    pub test_suite_id: Option<i32>,
    pub requirement_id: Option<i32>,
    pub created_by: Option<i32>,
    pub assigned_to: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<test_case::Model> for TestCase {
    fn from(m: test_case::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            preconditions: m.preconditions,
            test_steps: m.test_steps,
            expected_result: m.expected_result,
            test_data: m.test_data,
            priority: m.priority,
            status: m.status,
            case_type: m.case_type,
            automation_status: m.automation_status,
            estimated_minutes: m.estimated_minutes,
            project_id: m.project_id,
            test_suite_id: m.test_suite_id,
            requirement_id: m.requirement_id,
            created_by: m.created_by,
            assigned_to: m.assigned_to,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateTestCaseRequest {
    pub title: String,
    pub description: Option<String>,
    pub preconditions: Option<String>,
    #[serde(alias = "steps")]
    pub test_steps: Option<String>,
    pub expected_result: Option<String>,
    pub test_data: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub case_type: Option<String>,
    pub automation_status: Option<String>,
    pub estimated_minutes: Option<i32>,
    /// Taken from the suite when omitted.
    pub project_id: Option<i32>,
    #[serde(alias = "suite_id")]
    pub test_suite_id: Option<i32>,
    pub requirement_id: Option<i32>,
    pub assigned_to: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTestCaseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub preconditions: Option<String>,
    #[serde(alias = "steps")]
    pub test_steps: Option<String>,
    pub expected_result: Option<String>,
    pub test_data: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub case_type: Option<String>,
    pub automation_status: Option<String>,
    pub estimated_minutes: Option<i32>,
    #[serde(alias = "suite_id")]
    pub test_suite_id: Option<i32>,
    pub requirement_id: Option<i32>,
    pub assigned_to: Option<i32>,
}

/// Filters for listing test cases.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TestCaseQuery {
    pub project_id: Option<i32>,
    #[serde(alias = "suite_id")]
    pub test_suite_id: Option<i32>,
    pub requirement_id: Option<i32>,
    pub assigned_to: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_field_names_are_accepted() {
        let req: CreateTestCaseRequest = serde_json::from_str(
            r#"{"title": "Login", "suite_id": 4, "steps": "1. open", "type": "Automated"}"#,
        )
        .unwrap();

        assert_eq!(req.test_suite_id, Some(4));
        assert_eq!(req.test_steps.as_deref(), Some("1. open"));
        assert_eq!(req.case_type.as_deref(), Some("Automated"));
    }

    #[test]
    fn test_canonical_field_names_are_accepted() {
        let req: UpdateTestCaseRequest =
            serde_json::from_str(r#"{"test_suite_id": 9, "test_steps": "x"}"#).unwrap();

        assert_eq!(req.test_suite_id, Some(9));
        assert_eq!(req.test_steps.as_deref(), Some("x"));
    }
}
