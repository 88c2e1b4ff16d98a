//! Assignment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::assignment;

/// Assignment lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AssignmentStatus {
    Assigned,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Assignment {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub assignment_type: Option<String>,
    pub assigned_to: Option<i32>,
    pub assigned_by: Option<i32>,
    pub created_by: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: String,
    pub priority: String,
    pub project_id: Option<i32>,
    pub test_case_id: Option<i32>,
    pub bug_id: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<assignment::Model> for Assignment {
    fn from(m: assignment::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            assignment_type: m.assignment_type,
            assigned_to: m.assigned_to,
            assigned_by: m.assigned_by,
            created_by: m.created_by,
            due_date: m.due_date,
            status: m.status,
            priority: m.priority,
            project_id: m.project_id,
            test_case_id: m.test_case_id,
            bug_id: m.bug_id,
            notes: m.notes,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub assignment_type: Option<String>,
    pub assigned_to: i32,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<String>,
    /// Derived from the test case or bug when omitted.
    pub project_id: Option<i32>,
    pub test_case_id: Option<i32>,
    pub bug_id: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<AssignmentStatus>,
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AssignmentQuery {
    pub assigned_to: Option<i32>,
    pub status: Option<String>,
}
