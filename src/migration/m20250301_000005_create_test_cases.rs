//! Migration: Create test_cases table.
//!
//! `test_suite_id` is the only suite link; older deployments also carried a
//! `suite_id` alias that a later migration folds into it.

use sea_orm_migration::prelude::*;

use super::{Projects, Requirements, TestSuites, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestCases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestCases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestCases::Title).string_len(200).not_null())
                    .col(ColumnDef::new(TestCases::Description).text().null())
                    .col(ColumnDef::new(TestCases::Preconditions).text().null())
                    .col(ColumnDef::new(TestCases::TestSteps).text().null())
                    .col(ColumnDef::new(TestCases::ExpectedResult).text().null())
                    .col(ColumnDef::new(TestCases::TestData).text().null())
                    .col(
                        ColumnDef::new(TestCases::Priority)
                            .string_len(20)
                            .not_null()
                            .default("Medium"),
                    )
                    .col(
                        ColumnDef::new(TestCases::Status)
                            .string_len(20)
                            .not_null()
                            .default("Active"),
                    )
                    .col(
                        ColumnDef::new(TestCases::Type)
                            .string_len(50)
                            .not_null()
                            .default("Manual"),
                    )
                    .col(
                        ColumnDef::new(TestCases::AutomationStatus)
                            .string_len(20)
                            .not_null()
                            .default("Not Automated"),
                    )
                    .col(ColumnDef::new(TestCases::EstimatedMinutes).integer().null())
                    .col(ColumnDef::new(TestCases::ProjectId).integer().null())
                    .col(ColumnDef::new(TestCases::TestSuiteId).integer().null())
                    .col(ColumnDef::new(TestCases::RequirementId).integer().null())
                    .col(ColumnDef::new(TestCases::CreatedBy).integer().null())
                    .col(ColumnDef::new(TestCases::AssignedTo).integer().null())
                    .col(
                        ColumnDef::new(TestCases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TestCases::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_cases_project_id")
                            .from(TestCases::Table, TestCases::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_cases_test_suite_id")
                            .from(TestCases::Table, TestCases::TestSuiteId)
                            .to(TestSuites::Table, TestSuites::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_cases_requirement_id")
                            .from(TestCases::Table, TestCases::RequirementId)
                            .to(Requirements::Table, Requirements::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_cases_created_by")
                            .from(TestCases::Table, TestCases::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_cases_assigned_to")
                            .from(TestCases::Table, TestCases::AssignedTo)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_test_cases_project_id", TestCases::ProjectId),
            ("idx_test_cases_test_suite_id", TestCases::TestSuiteId),
            ("idx_test_cases_requirement_id", TestCases::RequirementId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(TestCases::Table)
                        .col(column)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestCases::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TestCases {
    Table,
    Id,
    Title,
    Description,
    Preconditions,
    TestSteps,
    ExpectedResult,
    TestData,
    Priority,
    Status,
    Type,
    AutomationStatus,
    EstimatedMinutes,
    ProjectId,
    TestSuiteId,
    RequirementId,
    CreatedBy,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
}
