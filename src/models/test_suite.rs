//! Test suite models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::test_suite;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TestSuite {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub project_id: Option<i32>,
    pub parent_suite_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<test_suite::Model> for TestSuite {
    fn from(m: test_suite::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            project_id: m.project_id,
            parent_suite_id: m.parent_suite_id,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTestSuiteRequest {
    pub name: String,
    pub description: Option<String>,
    pub project_id: i32,
    pub parent_suite_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTestSuiteRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent_suite_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TestSuiteQuery {
    pub project_id: Option<i32>,
}
