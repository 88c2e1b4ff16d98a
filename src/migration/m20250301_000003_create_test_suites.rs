//! Migration: Create test_suites table.
//!
//! Suites belong to a project and may nest under a parent suite.

use sea_orm_migration::prelude::*;

use super::Projects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestSuites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestSuites::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestSuites::Name).string_len(100).not_null())
                    .col(ColumnDef::new(TestSuites::Description).text().null())
                    .col(ColumnDef::new(TestSuites::ProjectId).integer().null())
                    .col(ColumnDef::new(TestSuites::ParentSuiteId).integer().null())
                    .col(
                        ColumnDef::new(TestSuites::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_suites_project_id")
                            .from(TestSuites::Table, TestSuites::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_suites_parent_suite_id")
                            .from(TestSuites::Table, TestSuites::ParentSuiteId)
                            .to(TestSuites::Table, TestSuites::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_suites_project_id")
                    .table(TestSuites::Table)
                    .col(TestSuites::ProjectId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestSuites::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TestSuites {
    Table,
    Id,
    Name,
    Description,
    ProjectId,
    ParentSuiteId,
    CreatedAt,
}
