//! Migration: Create comments table.

use sea_orm_migration::prelude::*;

use super::{Bugs, TestCases, TestExecutions, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comments::Content).text().not_null())
                    .col(ColumnDef::new(Comments::TestCaseId).integer().null())
                    .col(ColumnDef::new(Comments::BugId).integer().null())
                    .col(ColumnDef::new(Comments::TestExecutionId).integer().null())
                    .col(ColumnDef::new(Comments::CreatedBy).integer().null())
                    .col(
                        ColumnDef::new(Comments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_test_case_id")
                            .from(Comments::Table, Comments::TestCaseId)
                            .to(TestCases::Table, TestCases::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_bug_id")
                            .from(Comments::Table, Comments::BugId)
                            .to(Bugs::Table, Bugs::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_test_execution_id")
                            .from(Comments::Table, Comments::TestExecutionId)
                            .to(TestExecutions::Table, TestExecutions::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_created_by")
                            .from(Comments::Table, Comments::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comments::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    Content,
    TestCaseId,
    BugId,
    TestExecutionId,
    CreatedBy,
    CreatedAt,
}
