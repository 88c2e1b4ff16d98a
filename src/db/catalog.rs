//! Schema catalog: the (table, column) pairs the live database actually has.
//!
//! The cascade engine consults it before each step so that deployments on an
//! older schema skip steps they cannot run instead of failing them.

use std::collections::{BTreeMap, BTreeSet};

use sea_orm::{ConnectionTrait, DatabaseBackend, FromQueryResult, Statement};

use crate::error::{AppError, AppResult};

#[derive(Debug, FromQueryResult)]
struct ColumnRow {
    table_name: String,
    column_name: String,
}

/// Known tables and their columns.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    tables: BTreeMap<String, BTreeSet<String>>,
}

impl SchemaCatalog {
    /// Read table and column names from the database metadata.
    pub async fn load<C: ConnectionTrait>(db: &C) -> AppResult<Self> {
        let backend = db.get_database_backend();
        let sql = match backend {
            DatabaseBackend::Postgres => {
                "SELECT table_name::text AS table_name, column_name::text AS column_name \
                 FROM information_schema.columns \
                 WHERE table_schema = current_schema()"
            }
            DatabaseBackend::MySql => {
                "SELECT table_name AS table_name, column_name AS column_name \
                 FROM information_schema.columns \
                 WHERE table_schema = DATABASE()"
            }
            DatabaseBackend::Sqlite => {
                "SELECT m.name AS table_name, p.name AS column_name \
                 FROM sqlite_master m, pragma_table_info(m.name) p \
                 WHERE m.type = 'table'"
            }
            #[allow(unreachable_patterns)]
            other => {
                return Err(AppError::Database(format!(
                    "Unsupported database backend for schema catalog: {:?}",
                    other
                )));
            }
        };

        let rows = ColumnRow::find_by_statement(Statement::from_string(backend, sql))
            .all(db)
            .await
            .map_err(|e| AppError::Database(format!("Failed to read schema catalog: {}", e)))?;

        Ok(Self::from_pairs(
            rows.into_iter().map(|r| (r.table_name, r.column_name)),
        ))
    }

    /// Build a catalog from explicit (table, column) pairs.
    pub fn from_pairs<I, T, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: Into<String>,
        C: Into<String>,
    {
        let mut tables: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (table, column) in pairs {
            tables
                .entry(table.into().to_lowercase())
                .or_default()
                .insert(column.into().to_lowercase());
        }
        Self { tables }
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .is_some_and(|columns| columns.contains(column))
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive_on_load() {
        let catalog = SchemaCatalog::from_pairs([("Assignments", "Bug_Id"), ("assignments", "id")]);

        assert!(catalog.has_table("assignments"));
        assert!(catalog.has_column("assignments", "bug_id"));
        assert!(catalog.has_column("assignments", "id"));
        assert!(!catalog.has_column("assignments", "project_id"));
        assert_eq!(catalog.table_count(), 1);
    }

    #[test]
    fn test_missing_table_has_no_columns() {
        let catalog = SchemaCatalog::default();

        assert!(!catalog.has_table("comments"));
        assert!(!catalog.has_column("comments", "id"));
    }
}
