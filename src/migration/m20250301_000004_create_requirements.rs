//! Migration: Create requirements table.

use sea_orm_migration::prelude::*;

use super::{Projects, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Requirements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Requirements::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Requirements::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Requirements::Description).text().null())
                    .col(
                        ColumnDef::new(Requirements::Type)
                            .string_len(50)
                            .not_null()
                            .default("Functional"),
                    )
                    .col(
                        ColumnDef::new(Requirements::Priority)
                            .string_len(20)
                            .not_null()
                            .default("Medium"),
                    )
                    .col(
                        ColumnDef::new(Requirements::Status)
                            .string_len(20)
                            .not_null()
                            .default("Draft"),
                    )
                    .col(ColumnDef::new(Requirements::ProjectId).integer().null())
                    .col(ColumnDef::new(Requirements::CreatedBy).integer().null())
                    .col(
                        ColumnDef::new(Requirements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requirements_project_id")
                            .from(Requirements::Table, Requirements::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requirements_created_by")
                            .from(Requirements::Table, Requirements::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requirements_project_id")
                    .table(Requirements::Table)
                    .col(Requirements::ProjectId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Requirements::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Requirements {
    Table,
    Id,
    Title,
    Description,
    Type,
    Priority,
    Status,
    ProjectId,
    CreatedBy,
    CreatedAt,
}
