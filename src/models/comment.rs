//! Comment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::EntityKind;
use crate::entity::comment;

/// The single record a comment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    TestCase(i32),
    Bug(i32),
    TestExecution(i32),
}

impl CommentTarget {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::TestCase(_) => EntityKind::TestCase,
            Self::Bug(_) => EntityKind::Bug,
            Self::TestExecution(_) => EntityKind::TestExecution,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Self::TestCase(id) | Self::Bug(id) | Self::TestExecution(id) => *id,
        }
    }

    /// Recover the target from stored columns. `None` unless exactly one is set.
    pub fn from_columns(
        test_case_id: Option<i32>,
        bug_id: Option<i32>,
        test_execution_id: Option<i32>,
    ) -> Option<Self> {
        match (test_case_id, bug_id, test_execution_id) {
            (Some(id), None, None) => Some(Self::TestCase(id)),
            (None, Some(id), None) => Some(Self::Bug(id)),
            (None, None, Some(id)) => Some(Self::TestExecution(id)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Comment {
    pub id: i32,
    pub content: String,
    pub test_case_id: Option<i32>,
    pub bug_id: Option<i32>,
    pub test_execution_id: Option<i32>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<comment::Model> for Comment {
    fn from(m: comment::Model) -> Self {
        Self {
            id: m.id,
            content: m.content,
            test_case_id: m.test_case_id,
            bug_id: m.bug_id,
            test_execution_id: m.test_execution_id,
            created_by: m.created_by,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_requires_exactly_one_column() {
        assert_eq!(
            CommentTarget::from_columns(None, Some(3), None),
            Some(CommentTarget::Bug(3))
        );
        assert_eq!(CommentTarget::from_columns(Some(1), Some(3), None), None);
        assert_eq!(CommentTarget::from_columns(None, None, None), None);
    }
}
