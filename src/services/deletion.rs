//! Deletion service: access policy, transactions and the bulk variant on top
//! of the cascade engine.
//!
//! Every single deletion runs in one transaction that is committed only after
//! the root row is gone. A bulk deletion runs each id in its own savepoint of
//! one transaction so that a failing id leaves the others intact.

use sea_orm::{DatabaseTransaction, TransactionTrait};
use tracing::{info, warn};

use crate::config::Config;
use crate::db::{self, DbPool, SchemaCatalog};
use crate::error::AppError;
use crate::models::{Actor, BulkDeleteSummary, EntityKind};
use crate::services::cascade::{CascadeEngine, CascadeError, CascadeReport, GraphError};

/// Why a deletion did not happen.
#[derive(Debug, thiserror::Error)]
pub enum DeletionError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("{} {} not found", .kind.label(), .id)]
    NotFound { kind: EntityKind, id: i32 },

    #[error("You cannot delete your own account")]
    SelfDeletion,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Database failure of the root deletion or of the transaction itself.
    #[error("{0}")]
    Persistence(String),
}

impl From<CascadeError> for DeletionError {
    fn from(err: CascadeError) -> Self {
        match err {
            CascadeError::NotFound { kind, id } => DeletionError::NotFound { kind, id },
            CascadeError::Root(detail) => DeletionError::Persistence(detail),
        }
    }
}

impl From<sea_orm::DbErr> for DeletionError {
    fn from(err: sea_orm::DbErr) -> Self {
        DeletionError::Persistence(err.to_string())
    }
}

impl From<DeletionError> for AppError {
    fn from(err: DeletionError) -> Self {
        match err {
            DeletionError::AccessDenied(msg) => AppError::Forbidden(msg),
            DeletionError::SelfDeletion => AppError::Forbidden(err.to_string()),
            DeletionError::NotFound { kind, id } => {
                AppError::NotFound(format!("{} {}", kind.label(), id))
            }
            DeletionError::InvalidInput(msg) => AppError::InvalidInput(msg),
            DeletionError::Persistence(detail) => AppError::Database(detail),
        }
    }
}

/// Map a repository lookup failure for `kind`/`id`.
fn lookup_error(kind: EntityKind, id: i32) -> impl FnOnce(AppError) -> DeletionError {
    move |err| match err {
        AppError::NotFound(_) => DeletionError::NotFound { kind, id },
        other => DeletionError::Persistence(other.to_string()),
    }
}

/// Deletes entities with their dependents on behalf of an actor.
#[derive(Debug, Clone)]
pub struct DeletionService {
    engine: CascadeEngine,
    bulk_error_limit: usize,
}

impl DeletionService {
    pub fn new(engine: CascadeEngine, bulk_error_limit: usize) -> Self {
        Self {
            engine,
            bulk_error_limit,
        }
    }

    /// Service over the standard schema graph with limits from configuration.
    pub fn from_config(config: &Config) -> Result<Self, GraphError> {
        Ok(Self::new(CascadeEngine::standard()?, config.bulk_error_limit))
    }

    pub fn engine(&self) -> &CascadeEngine {
        &self.engine
    }

    /// Delete a project with its suites, cases, requirements, assignments and
    /// everything hanging off those.
    pub async fn delete_project(
        &self,
        pool: &DbPool,
        project_id: i32,
        actor: &Actor,
    ) -> Result<CascadeReport, DeletionError> {
        self.delete(pool, EntityKind::Project, project_id, actor)
            .await
    }

    /// Delete a user: their executions, reported bugs and assignments go,
    /// weaker references to them are cleared. Users cannot delete themselves.
    pub async fn delete_user(
        &self,
        pool: &DbPool,
        user_id: i32,
        actor: &Actor,
    ) -> Result<CascadeReport, DeletionError> {
        self.delete(pool, EntityKind::User, user_id, actor).await
    }

    /// Delete one root of any kind in its own transaction.
    pub async fn delete(
        &self,
        pool: &DbPool,
        kind: EntityKind,
        id: i32,
        actor: &Actor,
    ) -> Result<CascadeReport, DeletionError> {
        // Refused before anything touches the database.
        if kind == EntityKind::User && id == actor.id {
            return Err(DeletionError::SelfDeletion);
        }

        let catalog = pool
            .schema_catalog()
            .await
            .map_err(|e| DeletionError::Persistence(e.to_string()))?;

        let txn = pool.connection().begin().await?;

        match self.delete_in(&txn, catalog, kind, id, actor).await {
            Ok(report) => {
                txn.commit().await?;
                info!(
                    "{} {} deleted by user {} ({} rows)",
                    kind.label(),
                    id,
                    actor.id,
                    report.deleted.values().sum::<u64>()
                );
                Ok(report)
            }
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    warn!("Failed to roll back deletion of {} {}: {}", kind, id, rollback);
                }
                Err(e)
            }
        }
    }

    /// Delete many roots of one kind.
    ///
    /// Up-front checks reject the whole batch before any deletion. After that
    /// each id succeeds or fails on its own; at most `bulk_error_limit` error
    /// messages are kept.
    pub async fn bulk_delete(
        &self,
        pool: &DbPool,
        kind: EntityKind,
        ids: &[i32],
        actor: &Actor,
    ) -> Result<BulkDeleteSummary, DeletionError> {
        if kind == EntityKind::User && ids.contains(&actor.id) {
            return Err(DeletionError::SelfDeletion);
        }
        if ids.is_empty() {
            return Err(DeletionError::InvalidInput(format!(
                "No {} ids provided",
                kind.label().to_lowercase()
            )));
        }
        bulk_role_gate(kind, actor)?;

        let mut unique = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }

        let catalog = pool
            .schema_catalog()
            .await
            .map_err(|e| DeletionError::Persistence(e.to_string()))?;

        let txn = pool.connection().begin().await?;
        let mut summary = BulkDeleteSummary {
            deleted_count: 0,
            errors: Vec::new(),
        };

        for id in unique {
            let savepoint = txn.begin().await?;
            match self.delete_in(&savepoint, catalog, kind, id, actor).await {
                Ok(_) => {
                    savepoint.commit().await?;
                    summary.deleted_count += 1;
                }
                Err(e) => {
                    if let Err(rollback) = savepoint.rollback().await {
                        warn!("Failed to roll back savepoint for {} {}: {}", kind, id, rollback);
                    }
                    warn!("Bulk deletion of {} {} failed: {}", kind, id, e);
                    if summary.errors.len() < self.bulk_error_limit {
                        summary.errors.push(bulk_error_message(kind, id, &e));
                    }
                }
            }
        }

        txn.commit().await?;
        info!(
            "Bulk deletion of {} by user {}: {} deleted, {} error(s) reported",
            kind,
            actor.id,
            summary.deleted_count,
            summary.errors.len()
        );

        Ok(summary)
    }

    async fn delete_in(
        &self,
        txn: &DatabaseTransaction,
        catalog: &SchemaCatalog,
        kind: EntityKind,
        id: i32,
        actor: &Actor,
    ) -> Result<CascadeReport, DeletionError> {
        authorize(txn, kind, id, actor).await?;
        Ok(self.engine.run(txn, catalog, kind, id).await?)
    }
}

/// Error text for one failed id of a batch. Database errors get the id prefixed.
fn bulk_error_message(kind: EntityKind, id: i32, err: &DeletionError) -> String {
    match err {
        DeletionError::Persistence(detail) => format!("{} {}: {}", kind.label(), id, detail),
        other => other.to_string(),
    }
}

/// Batch-wide role requirements checked before any id is touched.
fn bulk_role_gate(kind: EntityKind, actor: &Actor) -> Result<(), DeletionError> {
    match kind {
        EntityKind::Project if !actor.is_manager_or_admin() => Err(DeletionError::AccessDenied(
            "Only admins and managers can bulk delete projects".to_string(),
        )),
        EntityKind::User if !actor.is_admin() => Err(DeletionError::AccessDenied(
            "Only admins can delete users".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Per-row access policy.
async fn authorize(
    txn: &DatabaseTransaction,
    kind: EntityKind,
    id: i32,
    actor: &Actor,
) -> Result<(), DeletionError> {
    let not_found = || lookup_error(kind, id);

    let allowed = match kind {
        EntityKind::User => actor.is_admin(),
        EntityKind::Project => {
            let project = db::projects::get(txn, id).await.map_err(not_found())?;
            actor.can_manage(project.created_by)
        }
        EntityKind::TestExecution => {
            let execution = db::test_executions::get(txn, id)
                .await
                .map_err(not_found())?;
            actor.can_manage(execution.executed_by)
        }
        EntityKind::Requirement => {
            let requirement = db::requirements::get(txn, id)
                .await
                .map_err(not_found())?;
            actor.can_manage(requirement.created_by)
        }
        EntityKind::Assignment => {
            let assignment = db::assignments::get(txn, id).await.map_err(not_found())?;
            actor.can_manage(assignment.created_by)
                || assignment.assigned_to == Some(actor.id)
        }
        EntityKind::Comment => {
            let comment = db::comments::get(txn, id).await.map_err(not_found())?;
            actor.can_manage(comment.created_by)
        }
        EntityKind::Notification => {
            let notification = db::notifications::get(txn, id)
                .await
                .map_err(not_found())?;
            actor.is_admin() || notification.user_id == actor.id
        }
        EntityKind::TestCase | EntityKind::TestSuite | EntityKind::Bug => true,
    };

    if allowed {
        Ok(())
    } else {
        Err(DeletionError::AccessDenied(format!(
            "You do not have permission to delete {} {}",
            kind.label().to_lowercase(),
            id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_bulk_gate_requires_manager_for_projects() {
        let tester = Actor::new(2, Role::Tester);
        let manager = Actor::new(3, Role::Manager);

        assert!(matches!(
            bulk_role_gate(EntityKind::Project, &tester),
            Err(DeletionError::AccessDenied(_))
        ));
        assert!(bulk_role_gate(EntityKind::Project, &manager).is_ok());
        assert!(bulk_role_gate(EntityKind::TestExecution, &tester).is_ok());
    }

    #[test]
    fn test_bulk_gate_requires_admin_for_users() {
        let manager = Actor::new(3, Role::Manager);
        let admin = Actor::new(1, Role::Admin);

        assert!(bulk_role_gate(EntityKind::User, &manager).is_err());
        assert!(bulk_role_gate(EntityKind::User, &admin).is_ok());
    }

    #[test]
    fn test_bulk_error_message_names_the_id_once() {
        let missing = DeletionError::NotFound {
            kind: EntityKind::Project,
            id: 999,
        };
        assert_eq!(
            bulk_error_message(EntityKind::Project, 999, &missing),
            "Project 999 not found"
        );

        let failed = DeletionError::Persistence("FOREIGN KEY constraint failed".to_string());
        assert_eq!(
            bulk_error_message(EntityKind::Project, 4, &failed),
            "Project 4: FOREIGN KEY constraint failed"
        );
    }

    #[test]
    fn test_error_mapping_to_http_errors() {
        let not_found: AppError = DeletionError::NotFound {
            kind: EntityKind::Project,
            id: 9,
        }
        .into();
        assert_eq!(not_found.to_string(), "Project 9 not found");

        let self_delete: AppError = DeletionError::SelfDeletion.into();
        assert!(matches!(self_delete, AppError::Forbidden(_)));

        let root: AppError = DeletionError::Persistence("FOREIGN KEY constraint failed".into()).into();
        assert!(matches!(root, AppError::Database(ref d) if d.contains("FOREIGN KEY")));
    }
}
