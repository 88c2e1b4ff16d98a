//! Declared dependency graph between entity kinds.
//!
//! Each [`Reference`] states that rows of `from` point at rows of `to` through
//! `column`, and what happens to those rows when the target is deleted. The
//! deletion order is derived from the graph instead of being written by hand.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::EntityKind;

/// What happens to a referencing row when its target is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
    /// The referencing row is deleted too.
    Cascade,
    /// The referencing column is cleared.
    SetNull,
}

/// `from.column -> to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub from: EntityKind,
    pub column: &'static str,
    pub to: EntityKind,
    pub on_delete: OnDelete,
}

const fn cascade(from: EntityKind, column: &'static str, to: EntityKind) -> Reference {
    Reference {
        from,
        column,
        to,
        on_delete: OnDelete::Cascade,
    }
}

const fn set_null(from: EntityKind, column: &'static str, to: EntityKind) -> Reference {
    Reference {
        from,
        column,
        to,
        on_delete: OnDelete::SetNull,
    }
}

use EntityKind::*;

/// Every foreign key in the schema and its deletion behaviour.
pub const REFERENCES: &[Reference] = &[
    // Project
    cascade(TestSuite, "project_id", Project),
    cascade(TestCase, "project_id", Project),
    cascade(Requirement, "project_id", Project),
    cascade(Assignment, "project_id", Project),
    // TestSuite
    cascade(TestCase, "test_suite_id", TestSuite),
    set_null(TestSuite, "parent_suite_id", TestSuite),
    // Requirement
    set_null(TestCase, "requirement_id", Requirement),
    // TestCase
    cascade(TestExecution, "test_case_id", TestCase),
    cascade(Bug, "test_case_id", TestCase),
    cascade(Assignment, "test_case_id", TestCase),
    cascade(Comment, "test_case_id", TestCase),
    // TestExecution
    cascade(Comment, "test_execution_id", TestExecution),
    // Bug
    cascade(Assignment, "bug_id", Bug),
    cascade(Comment, "bug_id", Bug),
    // User
    cascade(TestExecution, "executed_by", User),
    cascade(Bug, "reported_by", User),
    cascade(Assignment, "assigned_to", User),
    cascade(Assignment, "created_by", User),
    cascade(Notification, "user_id", User),
    set_null(TestCase, "created_by", User),
    set_null(TestCase, "assigned_to", User),
    set_null(Project, "created_by", User),
    set_null(Bug, "assigned_to", User),
    set_null(Requirement, "created_by", User),
    set_null(Assignment, "assigned_by", User),
    set_null(Comment, "created_by", User),
];

/// Errors detected while validating a dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Cascade edges form a cycle; no deletion order exists.
    #[error("Cascade cycle among entity kinds: {0:?}")]
    CascadeCycle(Vec<EntityKind>),
}

/// A validated dependency graph with its deletion order.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    references: Vec<Reference>,
    order: Vec<EntityKind>,
}

impl DependencyGraph {
    /// Validate `references` and compute the deletion order.
    pub fn new(references: Vec<Reference>) -> Result<Self, GraphError> {
        let order = deletion_order(&references)?;
        Ok(Self { references, order })
    }

    /// The graph of the TestLedger schema.
    pub fn standard() -> Result<Self, GraphError> {
        Self::new(REFERENCES.to_vec())
    }

    /// Entity kinds ordered so that every kind comes before the kinds it
    /// cascades into.
    pub fn order(&self) -> &[EntityKind] {
        &self.order
    }

    /// Position of `kind` in the deletion order.
    pub fn rank(&self, kind: EntityKind) -> usize {
        self.order
            .iter()
            .position(|k| *k == kind)
            .unwrap_or(self.order.len())
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Cascade references whose target is `kind`.
    pub fn cascades_into(&self, kind: EntityKind) -> impl Iterator<Item = &Reference> {
        self.references
            .iter()
            .filter(move |r| r.to == kind && r.on_delete == OnDelete::Cascade)
    }

    /// SetNull references whose target is `kind`.
    pub fn nullified_by(&self, kind: EntityKind) -> impl Iterator<Item = &Reference> {
        self.references
            .iter()
            .filter(move |r| r.to == kind && r.on_delete == OnDelete::SetNull)
    }
}

/// Kahn's algorithm over cascade edges `from -> to`.
///
/// A kind becomes ready once every kind referencing it has been placed. Among
/// ready kinds the one declared last in [`EntityKind`] is taken first, which
/// keeps leaf tables (comments, assignments) ahead of their parents.
/// SetNull edges impose no order: those columns are cleared before any row is
/// deleted.
fn deletion_order(references: &[Reference]) -> Result<Vec<EntityKind>, GraphError> {
    let mut referrers: BTreeMap<EntityKind, BTreeSet<EntityKind>> =
        EntityKind::ALL.iter().map(|k| (*k, BTreeSet::new())).collect();

    for r in references.iter().filter(|r| r.on_delete == OnDelete::Cascade) {
        if r.from == r.to {
            return Err(GraphError::CascadeCycle(vec![r.from]));
        }
        referrers.entry(r.to).or_default().insert(r.from);
    }

    let mut placed: BTreeSet<EntityKind> = BTreeSet::new();
    let mut order = Vec::with_capacity(referrers.len());

    while placed.len() < referrers.len() {
        let next = referrers
            .iter()
            .filter(|(kind, from)| !placed.contains(*kind) && from.is_subset(&placed))
            .map(|(kind, _)| *kind)
            .next_back();

        match next {
            Some(kind) => {
                placed.insert(kind);
                order.push(kind);
            }
            None => {
                let remaining = referrers
                    .keys()
                    .filter(|k| !placed.contains(*k))
                    .copied()
                    .collect();
                return Err(GraphError::CascadeCycle(remaining));
            }
        }
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> DependencyGraph {
        DependencyGraph::standard().expect("standard graph is acyclic")
    }

    #[test]
    fn test_every_kind_is_ordered_once() {
        let graph = standard();
        let mut kinds = graph.order().to_vec();
        kinds.sort();
        assert_eq!(kinds, EntityKind::ALL.to_vec());
    }

    #[test]
    fn test_referencing_kinds_come_first() {
        let graph = standard();
        for r in graph.references() {
            if r.on_delete == OnDelete::Cascade {
                assert!(
                    graph.rank(r.from) < graph.rank(r.to),
                    "{} must be deleted before {}",
                    r.from,
                    r.to
                );
            }
        }
    }

    #[test]
    fn test_suites_are_deleted_after_cases() {
        let graph = standard();
        assert!(graph.rank(TestCase) < graph.rank(TestSuite));
        assert!(graph.rank(TestExecution) < graph.rank(TestCase));
        assert!(graph.rank(Bug) < graph.rank(TestCase));
        assert!(graph.rank(TestSuite) < graph.rank(Project));
        assert!(graph.rank(Requirement) < graph.rank(Project));
    }

    #[test]
    fn test_order_is_deterministic() {
        assert_eq!(
            standard().order(),
            &[
                Notification,
                Comment,
                Assignment,
                Bug,
                TestExecution,
                TestCase,
                Requirement,
                TestSuite,
                Project,
                User,
            ]
        );
    }

    #[test]
    fn test_self_cascade_is_rejected() {
        let result = DependencyGraph::new(vec![cascade(TestSuite, "parent_suite_id", TestSuite)]);
        assert_eq!(result.unwrap_err(), GraphError::CascadeCycle(vec![TestSuite]));
    }

    #[test]
    fn test_two_kind_cycle_is_rejected() {
        let result = DependencyGraph::new(vec![
            cascade(Bug, "test_case_id", TestCase),
            cascade(TestCase, "bug_id", Bug),
        ]);
        assert!(matches!(result, Err(GraphError::CascadeCycle(kinds)) if kinds.contains(&Bug)));
    }

    #[test]
    fn test_set_null_self_reference_is_allowed() {
        let graph = DependencyGraph::new(vec![set_null(TestSuite, "parent_suite_id", TestSuite)]);
        assert!(graph.is_ok());
    }
}
