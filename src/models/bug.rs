//! Bug models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::bug;

pub const DEFAULT_BUG_STATUS: &str = "Open";
pub const DEFAULT_BUG_TYPE: &str = "Functional";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Bug {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub severity: String,
    pub priority: String,
    pub status: String,
    #[serde(rename = "type")]
    pub bug_type: String,
    pub environment: Option<String>,
    pub build_version: Option<String>,
    pub steps_to_reproduce: Option<String>,
    pub expected_result: Option<String>,
    pub actual_result: Option<String>,
    pub test_case_id: Option<i32>,
    pub reported_by: Option<i32>,
    pub assigned_to: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<bug::Model> for Bug {
    fn from(m: bug::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            severity: m.severity,
            priority: m.priority,
            status: m.status,
            bug_type: m.bug_type,
            environment: m.environment,
            build_version: m.build_version,
            steps_to_reproduce: m.steps_to_reproduce,
            expected_result: m.expected_result,
            actual_result: m.actual_result,
            test_case_id: m.test_case_id,
            reported_by: m.reported_by,
            assigned_to: m.assigned_to,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateBugRequest {
    pub title: String,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub priority: Option<String>,
    #[serde(rename = "type")]
    pub bug_type: Option<String>,
    pub environment: Option<String>,
    pub build_version: Option<String>,
    pub steps_to_reproduce: Option<String>,
    pub expected_result: Option<String>,
    pub actual_result: Option<String>,
    pub test_case_id: Option<i32>,
    pub assigned_to: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateBugRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub bug_type: Option<String>,
    pub environment: Option<String>,
    pub build_version: Option<String>,
    pub steps_to_reproduce: Option<String>,
    pub expected_result: Option<String>,
    pub actual_result: Option<String>,
    pub assigned_to: Option<i32>,
}

/// Change a bug's status, optionally leaving a comment.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateBugStatusRequest {
    pub status: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BugQuery {
    pub test_case_id: Option<i32>,
    pub status: Option<String>,
}
