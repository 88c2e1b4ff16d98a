//! Migration: Fold legacy test case alias columns into their canonical columns.
//!
//! Databases carried over from the previous schema have both `suite_id` and
//! `test_suite_id`, and both `steps` and `test_steps`. Values are copied into
//! the canonical column where it is still empty, then the alias is dropped.
//! Fresh databases have no aliases and this migration does nothing.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const ALIASES: &[(&str, &str)] = &[("suite_id", "test_suite_id"), ("steps", "test_steps")];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for (alias, canonical) in ALIASES {
            if !manager.has_column("test_cases", alias).await? {
                continue;
            }

            db.execute_unprepared(&format!(
                "UPDATE test_cases SET {canonical} = {alias} \
                 WHERE {canonical} IS NULL AND {alias} IS NOT NULL"
            ))
            .await?;

            db.execute_unprepared(&format!("ALTER TABLE test_cases DROP COLUMN {alias}"))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // The aliases carried no information beyond their canonical columns.
        Ok(())
    }
}
