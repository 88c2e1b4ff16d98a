//! Migration: Create assignments table.

use sea_orm_migration::prelude::*;

use super::{Bugs, Projects, TestCases, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assignments::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(ColumnDef::new(Assignments::Type).string_len(50).null())
                    .col(ColumnDef::new(Assignments::AssignedTo).integer().null())
                    .col(ColumnDef::new(Assignments::AssignedBy).integer().null())
                    .col(ColumnDef::new(Assignments::CreatedBy).integer().null())
                    .col(
                        ColumnDef::new(Assignments::DueDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::Status)
                            .string_len(20)
                            .not_null()
                            .default("Assigned"),
                    )
                    .col(
                        ColumnDef::new(Assignments::Priority)
                            .string_len(20)
                            .not_null()
                            .default("Medium"),
                    )
                    .col(ColumnDef::new(Assignments::ProjectId).integer().null())
                    .col(ColumnDef::new(Assignments::TestCaseId).integer().null())
                    .col(ColumnDef::new(Assignments::BugId).integer().null())
                    .col(ColumnDef::new(Assignments::Notes).text().null())
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignments_assigned_to")
                            .from(Assignments::Table, Assignments::AssignedTo)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignments_assigned_by")
                            .from(Assignments::Table, Assignments::AssignedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignments_created_by")
                            .from(Assignments::Table, Assignments::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignments_project_id")
                            .from(Assignments::Table, Assignments::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignments_test_case_id")
                            .from(Assignments::Table, Assignments::TestCaseId)
                            .to(TestCases::Table, TestCases::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignments_bug_id")
                            .from(Assignments::Table, Assignments::BugId)
                            .to(Bugs::Table, Bugs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assignments_assigned_to")
                    .table(Assignments::Table)
                    .col(Assignments::AssignedTo)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Assignments::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Assignments {
    Table,
    Id,
    Title,
    Description,
    Type,
    AssignedTo,
    AssignedBy,
    CreatedBy,
    DueDate,
    Status,
    Priority,
    ProjectId,
    TestCaseId,
    BugId,
    Notes,
    CreatedAt,
    UpdatedAt,
}
