//! The kinds of persisted entity, shared by repositories and the cascade engine.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Every entity kind the service stores.
///
/// Declaration order is also the tie-break order used when computing the
/// deletion order, so it must stay stable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Project,
    TestSuite,
    Requirement,
    TestCase,
    TestExecution,
    Bug,
    Assignment,
    Comment,
    Notification,
}

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        Self::User,
        Self::Project,
        Self::TestSuite,
        Self::Requirement,
        Self::TestCase,
        Self::TestExecution,
        Self::Bug,
        Self::Assignment,
        Self::Comment,
        Self::Notification,
    ];

    /// Backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Project => "projects",
            Self::TestSuite => "test_suites",
            Self::Requirement => "requirements",
            Self::TestCase => "test_cases",
            Self::TestExecution => "test_executions",
            Self::Bug => "bugs",
            Self::Assignment => "assignments",
            Self::Comment => "comments",
            Self::Notification => "notifications",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Project => "project",
            Self::TestSuite => "test_suite",
            Self::Requirement => "requirement",
            Self::TestCase => "test_case",
            Self::TestExecution => "test_execution",
            Self::Bug => "bug",
            Self::Assignment => "assignment",
            Self::Comment => "comment",
            Self::Notification => "notification",
        }
    }

    /// Human-readable name used in messages ("Test case 4 not found").
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Project => "Project",
            Self::TestSuite => "Test suite",
            Self::Requirement => "Requirement",
            Self::TestCase => "Test case",
            Self::TestExecution => "Test execution",
            Self::Bug => "Bug",
            Self::Assignment => "Assignment",
            Self::Comment => "Comment",
            Self::Notification => "Notification",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_kind() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EntityKind::parse("test_cycle"), None);
    }

    #[test]
    fn test_tables_are_distinct() {
        let mut tables: Vec<_> = EntityKind::ALL.iter().map(|k| k.table()).collect();
        tables.sort_unstable();
        tables.dedup();
        assert_eq!(tables.len(), EntityKind::ALL.len());
    }
}
