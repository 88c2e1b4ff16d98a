//! Migration: Create bugs table.

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
                    .table(Bugs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bugs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bugs::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Bugs::Description).text().null())
                    .col(
                        ColumnDef::new(Bugs::Severity)
                            .string_len(20)
                            .not_null()
                            .default("Medium"),
                    )
                    .col(
                        ColumnDef::new(Bugs::Priority)
                            .string_len(20)
                            .not_null()
                            .default("Medium"),
                    )
                    .col(
                        ColumnDef::new(Bugs::Status)
                            .string_len(20)
                            .not_null()
                            .default("Open"),
                    )
                    .col(
                        ColumnDef::new(Bugs::Type)
                            .string_len(50)
                            .not_null()
                            .default("Functional"),
                    )
                    .col(ColumnDef::new(Bugs::Environment).string_len(50).null())
                    .col(ColumnDef::new(Bugs::BuildVersion).string_len(50).null())
                    .col(ColumnDef::new(Bugs::StepsToReproduce).text().null())
                    .col(ColumnDef::new(Bugs::ExpectedResult).text().null())
                    .col(ColumnDef::new(Bugs::ActualResult).text().null())
                    .col(ColumnDef::new(Bugs::TestCaseId).integer().null())
                    .col(ColumnDef::new(Bugs::ReportedBy).integer().null())
                    .col(ColumnDef::new(Bugs::AssignedTo).integer().null())
                    .col(
                        ColumnDef::new(Bugs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bugs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bugs_test_case_id")
                            .from(Bugs::Table, Bugs::TestCaseId)
                            .to(TestCases::Table, TestCases::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bugs_reported_by")
                            .from(Bugs::Table, Bugs::ReportedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bugs_assigned_to")
                            .from(Bugs::Table, Bugs::AssignedTo)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bugs_test_case_id")
                    .table(Bugs::Table)
                    .col(Bugs::TestCaseId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bugs::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Bugs {
    Table,
    Id,
    Title,
    Description,
    Severity,
    Priority,
    Status,
    Type,
    Environment,
    BuildVersion,
    StepsToReproduce,
    ExpectedResult,
    ActualResult,
    TestCaseId,
    ReportedBy,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
}
