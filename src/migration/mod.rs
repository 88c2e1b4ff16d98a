//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_projects;
mod m20250301_000003_create_test_suites;
mod m20250301_000004_create_requirements;
mod m20250301_000005_create_test_cases;
mod m20250301_000006_create_test_executions;
mod m20250301_000007_create_bugs;
mod m20250301_000008_create_assignments;
mod m20250301_000009_create_comments;
mod m20250301_000010_create_notifications;
mod m20250315_000011_collapse_test_case_aliases;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_projects::Migration),
            Box::new(m20250301_000003_create_test_suites::Migration),
            Box::new(m20250301_000004_create_requirements::Migration),
            Box::new(m20250301_000005_create_test_cases::Migration),
            Box::new(m20250301_000006_create_test_executions::Migration),
            Box::new(m20250301_000007_create_bugs::Migration),
            Box::new(m20250301_000008_create_assignments::Migration),
            Box::new(m20250301_000009_create_comments::Migration),
            Box::new(m20250301_000010_create_notifications::Migration),
            Box::new(m20250315_000011_collapse_test_case_aliases::Migration),
        ]
    }
}

/// Table identifiers shared by the create-table migrations for foreign keys.
#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
pub(crate) enum Projects {
    Table,
    Id,
}

#[derive(DeriveIden)]
pub(crate) enum TestSuites {
    Table,
    Id,
}

#[derive(DeriveIden)]
pub(crate) enum Requirements {
    Table,
    Id,
}

#[derive(DeriveIden)]
pub(crate) enum TestCases {
    Table,
    Id,
}

#[derive(DeriveIden)]
pub(crate) enum TestExecutions {
    Table,
    Id,
}

#[derive(DeriveIden)]
pub(crate) enum Bugs {
    Table,
    Id,
}
