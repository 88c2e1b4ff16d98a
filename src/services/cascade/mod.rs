//! Cascading deletion engine.
//!
//! Deleting a root row first collects every row that depends on it through
//! cascade references, clears set-null references pointing at the collected
//! rows, deletes the collected rows kind by kind in dependency order and
//! finally deletes the root.
//!
//! Every step except the root deletion is best effort: it runs in its own
//! savepoint, and a failure rolls back only that savepoint and is recorded in
//! the report. Steps whose table or column is missing from the live schema are
//! skipped without being attempted. The root deletion is fatal: if it fails the
//! caller must roll back the enclosing transaction.

pub mod graph;

use std::collections::{BTreeMap, BTreeSet};

use sea_orm::{DatabaseTransaction, DbErr, Statement, TransactionTrait};
use serde::Serialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::db::{IN_LIST_CHUNK, SchemaCatalog, raw};
use crate::models::EntityKind;

pub use graph::{DependencyGraph, GraphError, OnDelete, REFERENCES, Reference};

/// What a step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    /// Look up ids of dependent rows.
    Collect,
    /// Clear a set-null reference.
    Nullify,
    /// Delete dependent rows.
    Delete,
    /// Delete the root row.
    DeleteRoot,
}

/// How a step ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Ran; `rows` rows were found or affected.
    Applied { rows: u64 },
    /// Not attempted: the table or column does not exist in this database.
    SkippedLegacySchema,
    /// Attempted and failed; only this step was rolled back.
    Failed { error: String },
}

/// One entry of a cascade report.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CascadeStep {
    pub action: StepAction,
    pub table: String,
    pub column: Option<String>,
    pub outcome: StepOutcome,
}

/// Everything a cascade run did.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CascadeReport {
    pub root_kind: EntityKind,
    pub root_id: i32,
    pub steps: Vec<CascadeStep>,
    /// Rows deleted per entity kind, root included.
    pub deleted: BTreeMap<String, u64>,
}

impl CascadeReport {
    fn new(root_kind: EntityKind, root_id: i32) -> Self {
        Self {
            root_kind,
            root_id,
            steps: Vec::new(),
            deleted: BTreeMap::new(),
        }
    }

    /// Rows of `kind` removed by this run.
    pub fn deleted_count(&self, kind: EntityKind) -> u64 {
        self.deleted.get(kind.as_str()).copied().unwrap_or(0)
    }

    /// Steps that were attempted and failed.
    pub fn failures(&self) -> impl Iterator<Item = &CascadeStep> {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Failed { .. }))
    }

    /// Steps skipped because the schema lacks their table or column.
    pub fn skipped(&self) -> impl Iterator<Item = &CascadeStep> {
        self.steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::SkippedLegacySchema)
    }

    fn record(
        &mut self,
        action: StepAction,
        table: &str,
        column: Option<&str>,
        outcome: StepOutcome,
    ) {
        match &outcome {
            StepOutcome::SkippedLegacySchema => warn!(
                "Cascade {:?} on {}{} skipped: not present in database schema",
                action,
                table,
                column.map(|c| format!(".{}", c)).unwrap_or_default()
            ),
            StepOutcome::Failed { error } => warn!(
                "Cascade {:?} on {}{} failed: {}",
                action,
                table,
                column.map(|c| format!(".{}", c)).unwrap_or_default(),
                error
            ),
            StepOutcome::Applied { .. } => {}
        }

        self.steps.push(CascadeStep {
            action,
            table: table.to_string(),
            column: column.map(str::to_string),
            outcome,
        });
    }

    fn add_deleted(&mut self, kind: EntityKind, rows: u64) {
        *self.deleted.entry(kind.as_str().to_string()).or_insert(0) += rows;
    }
}

/// Fatal outcomes of a cascade run. The caller must roll back.
#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    #[error("{} {} not found", .kind.label(), .id)]
    NotFound { kind: EntityKind, id: i32 },

    /// The root row could not be locked or deleted; carries the database error.
    #[error("{0}")]
    Root(String),
}

/// Runs cascading deletions over a [`DependencyGraph`].
#[derive(Debug, Clone)]
pub struct CascadeEngine {
    graph: DependencyGraph,
}

impl CascadeEngine {
    pub fn new(graph: DependencyGraph) -> Self {
        Self { graph }
    }

    /// Engine over the TestLedger schema graph.
    pub fn standard() -> Result<Self, GraphError> {
        Ok(Self::new(DependencyGraph::standard()?))
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Delete `root_id` of `root` and everything depending on it inside `txn`.
    ///
    /// Commits nothing; on `Err` the caller must roll `txn` back.
    pub async fn run(
        &self,
        txn: &DatabaseTransaction,
        catalog: &SchemaCatalog,
        root: EntityKind,
        root_id: i32,
    ) -> Result<CascadeReport, CascadeError> {
        let exists = raw::lock_row(txn, root.table(), root_id)
            .await
            .map_err(|e| CascadeError::Root(e.to_string()))?;
        if !exists {
            return Err(CascadeError::NotFound {
                kind: root,
                id: root_id,
            });
        }

        let mut report = CascadeReport::new(root, root_id);

        let collected = self
            .collect_dependents(txn, catalog, root, root_id, &mut report)
            .await;
        self.nullify_references(txn, catalog, &collected, &mut report)
            .await;
        self.delete_dependents(txn, catalog, root, root_id, &collected, &mut report)
            .await;

        match raw::delete_row(txn, root.table(), root_id).await {
            Ok(0) => {
                return Err(CascadeError::NotFound {
                    kind: root,
                    id: root_id,
                });
            }
            Ok(rows) => {
                report.record(
                    StepAction::DeleteRoot,
                    root.table(),
                    None,
                    StepOutcome::Applied { rows },
                );
                report.add_deleted(root, rows);
            }
            Err(e) => {
                error!("Failed to delete {} {}: {}", root.label(), root_id, e);
                return Err(CascadeError::Root(e.to_string()));
            }
        }

        info!(
            root = %root,
            id = root_id,
            steps = report.steps.len(),
            failed = report.failures().count(),
            skipped = report.skipped().count(),
            "Cascade deletion completed"
        );

        Ok(report)
    }

    /// Follow cascade references from the root until no new ids appear.
    async fn collect_dependents(
        &self,
        txn: &DatabaseTransaction,
        catalog: &SchemaCatalog,
        root: EntityKind,
        root_id: i32,
        report: &mut CascadeReport,
    ) -> BTreeMap<EntityKind, BTreeSet<i32>> {
        let mut collected: BTreeMap<EntityKind, BTreeSet<i32>> = BTreeMap::new();
        collected.entry(root).or_default().insert(root_id);

        let mut frontier: BTreeMap<EntityKind, Vec<i32>> = BTreeMap::from([(root, vec![root_id])]);

        while !frontier.is_empty() {
            let mut next: BTreeMap<EntityKind, Vec<i32>> = BTreeMap::new();

            for (kind, ids) in &frontier {
                for reference in self.graph.cascades_into(*kind) {
                    let found = collect_step(txn, catalog, reference, ids, report).await;
                    let seen = collected.entry(reference.from).or_default();
                    for id in found {
                        if seen.insert(id) {
                            next.entry(reference.from).or_default().push(id);
                        }
                    }
                }
            }

            frontier = next;
        }

        collected
    }

    /// Clear every set-null reference that points at a collected row.
    async fn nullify_references(
        &self,
        txn: &DatabaseTransaction,
        catalog: &SchemaCatalog,
        collected: &BTreeMap<EntityKind, BTreeSet<i32>>,
        report: &mut CascadeReport,
    ) {
        for (kind, ids) in collected {
            let ids: Vec<i32> = ids.iter().copied().collect();
            for reference in self.graph.nullified_by(*kind) {
                let table = reference.from.table();
                if !catalog.has_column(table, reference.column) {
                    report.record(
                        StepAction::Nullify,
                        table,
                        Some(reference.column),
                        StepOutcome::SkippedLegacySchema,
                    );
                    continue;
                }

                let mut rows = 0;
                let mut failure = None;
                for chunk in ids.chunks(IN_LIST_CHUNK) {
                    let stmt = raw::null_where_in(txn, table, reference.column, chunk);
                    match savepoint_execute(txn, stmt).await {
                        Ok(n) => rows += n,
                        Err(e) => {
                            failure.get_or_insert_with(|| e.to_string());
                        }
                    }
                }

                report.record(
                    StepAction::Nullify,
                    table,
                    Some(reference.column),
                    outcome(rows, failure),
                );
            }
        }
    }

    /// Delete collected rows, referencing kinds before referenced kinds.
    async fn delete_dependents(
        &self,
        txn: &DatabaseTransaction,
        catalog: &SchemaCatalog,
        root: EntityKind,
        root_id: i32,
        collected: &BTreeMap<EntityKind, BTreeSet<i32>>,
        report: &mut CascadeReport,
    ) {
        for kind in self.graph.order() {
            let ids: Vec<i32> = collected
                .get(kind)
                .into_iter()
                .flatten()
                .copied()
                .filter(|id| !(*kind == root && *id == root_id))
                .collect();
            if ids.is_empty() {
                continue;
            }

            let table = kind.table();
            if !catalog.has_column(table, "id") {
                report.record(
                    StepAction::Delete,
                    table,
                    None,
                    StepOutcome::SkippedLegacySchema,
                );
                continue;
            }

            let mut rows = 0;
            let mut failure = None;
            for chunk in ids.chunks(IN_LIST_CHUNK) {
                let stmt = raw::delete_ids(txn, table, chunk);
                match savepoint_execute(txn, stmt).await {
                    Ok(n) => rows += n,
                    Err(e) => {
                        failure.get_or_insert_with(|| e.to_string());
                    }
                }
            }

            report.add_deleted(*kind, rows);
            report.record(StepAction::Delete, table, None, outcome(rows, failure));
        }
    }
}

/// Find rows of `reference.from` pointing at any of `ids`.
async fn collect_step(
    txn: &DatabaseTransaction,
    catalog: &SchemaCatalog,
    reference: &Reference,
    ids: &[i32],
    report: &mut CascadeReport,
) -> Vec<i32> {
    let table = reference.from.table();
    if !catalog.has_column(table, reference.column) || !catalog.has_column(table, "id") {
        report.record(
            StepAction::Collect,
            table,
            Some(reference.column),
            StepOutcome::SkippedLegacySchema,
        );
        return Vec::new();
    }

    let mut found = Vec::new();
    let mut failure = None;
    for chunk in ids.chunks(IN_LIST_CHUNK) {
        let stmt = raw::select_ids_where_in(txn, table, reference.column, chunk);
        match savepoint_query_ids(txn, stmt).await {
            Ok(mut rows) => found.append(&mut rows),
            Err(e) => {
                failure.get_or_insert_with(|| e.to_string());
            }
        }
    }

    report.record(
        StepAction::Collect,
        table,
        Some(reference.column),
        outcome(found.len() as u64, failure),
    );
    found
}

fn outcome(rows: u64, failure: Option<String>) -> StepOutcome {
    match failure {
        Some(error) => StepOutcome::Failed { error },
        None => StepOutcome::Applied { rows },
    }
}

/// Run a write inside a savepoint, rolling back just the savepoint on failure.
async fn savepoint_execute(txn: &DatabaseTransaction, stmt: Statement) -> Result<u64, DbErr> {
    let savepoint = txn.begin().await?;
    match raw::execute_raw(&savepoint, stmt).await {
        Ok(rows) => {
            savepoint.commit().await?;
            Ok(rows)
        }
        Err(e) => {
            if let Err(rollback) = savepoint.rollback().await {
                warn!("Failed to roll back savepoint: {}", rollback);
            }
            Err(e)
        }
    }
}

/// Run a select inside a savepoint; a failed read must not poison the transaction.
async fn savepoint_query_ids(
    txn: &DatabaseTransaction,
    stmt: Statement,
) -> Result<Vec<i32>, DbErr> {
    let savepoint = txn.begin().await?;
    match raw::query_ids(&savepoint, stmt).await {
        Ok(ids) => {
            savepoint.commit().await?;
            Ok(ids)
        }
        Err(e) => {
            if let Err(rollback) = savepoint.rollback().await {
                warn!("Failed to roll back savepoint: {}", rollback);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_prefers_failure() {
        assert_eq!(outcome(4, None), StepOutcome::Applied { rows: 4 });
        assert_eq!(
            outcome(4, Some("deadlock detected".to_string())),
            StepOutcome::Failed {
                error: "deadlock detected".to_string()
            }
        );
    }

    #[test]
    fn test_report_separates_skipped_from_failed() {
        let mut report = CascadeReport::new(EntityKind::Project, 7);
        report.record(
            StepAction::Collect,
            "assignments",
            Some("project_id"),
            StepOutcome::SkippedLegacySchema,
        );
        report.record(
            StepAction::Delete,
            "bugs",
            None,
            StepOutcome::Failed {
                error: "constraint".to_string(),
            },
        );
        report.record(
            StepAction::Delete,
            "test_cases",
            None,
            StepOutcome::Applied { rows: 3 },
        );
        report.add_deleted(EntityKind::TestCase, 3);
        report.add_deleted(EntityKind::TestCase, 2);

        assert_eq!(report.skipped().count(), 1);
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.failures().next().map(|s| s.table.as_str()), Some("bugs"));
        assert_eq!(report.deleted_count(EntityKind::TestCase), 5);
        assert_eq!(report.deleted_count(EntityKind::Bug), 0);
    }

    #[test]
    fn test_report_serializes_outcome_tag() {
        let step = CascadeStep {
            action: StepAction::Nullify,
            table: "test_cases".to_string(),
            column: Some("requirement_id".to_string()),
            outcome: StepOutcome::SkippedLegacySchema,
        };
        let json = serde_json::to_value(&step).expect("step serializes");
        assert_eq!(json["action"], "nullify");
        assert_eq!(json["outcome"]["status"], "skipped_legacy_schema");
    }
}
