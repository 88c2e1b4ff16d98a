//! Requirement models and requirement-to-test-case linking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TestCase;
use crate::entity::requirement;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Requirement {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub requirement_type: String,
    pub priority: String,
    pub status: String,
    pub project_id: Option<i32>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<requirement::Model> for Requirement {
    fn from(m: requirement::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            requirement_type: m.requirement_type,
            priority: m.priority,
            status: m.status,
            project_id: m.project_id,
            created_by: m.created_by,
            created_at: m.created_at,
        }
    }
}

/// A requirement together with the test cases that cover it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequirementDetail {
    #[serde(flatten)]
    pub requirement: Requirement,
    pub test_cases: Vec<TestCase>,
}

/// A test case from the requirement's project, flagged when already linked.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CandidateTestCase {
    #[serde(flatten)]
    pub test_case: TestCase,
    pub is_linked: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRequirementRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub requirement_type: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub project_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRequirementRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub requirement_type: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RequirementQuery {
    pub project_id: Option<i32>,
}

/// Replace the set of test cases linked to a requirement.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LinkTestCasesRequest {
    #[serde(default)]
    pub test_case_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LinkTestCasesResponse {
    pub success: bool,
    pub linked_count: u64,
}
