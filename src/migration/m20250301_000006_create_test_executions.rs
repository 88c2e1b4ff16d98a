//! Migration: Create test_executions table.

use sea_orm_migration::prelude::*;

use super::{TestCases, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestExecutions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestExecutions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestExecutions::TestCaseId).integer().not_null())
                    .col(ColumnDef::new(TestExecutions::ExecutedBy).integer().null())
                    .col(ColumnDef::new(TestExecutions::Status).string_len(20).not_null())
                    .col(ColumnDef::new(TestExecutions::ActualResult).text().null())
                    .col(ColumnDef::new(TestExecutions::Comments).text().null())
                    .col(ColumnDef::new(TestExecutions::Environment).string_len(50).null())
                    .col(ColumnDef::new(TestExecutions::BuildVersion).string_len(50).null())
                    .col(ColumnDef::new(TestExecutions::ExecutionMinutes).integer().null())
                    .col(
                        ColumnDef::new(TestExecutions::ExecutionDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_executions_test_case_id")
                            .from(TestExecutions::Table, TestExecutions::TestCaseId)
                            .to(TestCases::Table, TestCases::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_executions_executed_by")
                            .from(TestExecutions::Table, TestExecutions::ExecutedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_executions_test_case_id")
                    .table(TestExecutions::Table)
                    .col(TestExecutions::TestCaseId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Dashboard lists the newest executions first.
        manager
            .create_index(
                Index::create()
                    .name("idx_test_executions_execution_date")
                    .table(TestExecutions::Table)
                    .col(TestExecutions::ExecutionDate)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(TestExecutions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum TestExecutions {
    Table,
    Id,
    TestCaseId,
    ExecutedBy,
    Status,
    ActualResult,
    Comments,
    Environment,
    BuildVersion,
    ExecutionMinutes,
    ExecutionDate,
}
