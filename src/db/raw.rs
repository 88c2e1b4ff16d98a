//! Raw statement execution used by the cascade engine.
//!
//! Statements are built with sea-query so identifiers are quoted and values
//! bound as parameters for whichever backend is connected.

use sea_orm::sea_query::{Alias, Expr, ExprTrait, Query};
use sea_orm::{ConnectionTrait, DbErr, Statement, Value};

/// Execute a statement and return the number of rows it affected.
pub async fn execute_raw<C: ConnectionTrait>(db: &C, stmt: Statement) -> Result<u64, DbErr> {
    let result = db.execute_raw(stmt).await?;
    Ok(result.rows_affected())
}

/// `SELECT id FROM <table> WHERE <column> IN (<ids>)`.
pub fn select_ids_where_in<C: ConnectionTrait>(
    db: &C,
    table: &'static str,
    column: &'static str,
    ids: &[i32],
) -> Statement {
    let query = Query::select()
        .column(Alias::new("id"))
        .from(Alias::new(table))
        .and_where(Expr::col(Alias::new(column)).is_in(ids.iter().copied()))
        .to_owned();
    db.get_database_backend().build(&query)
}

/// `UPDATE <table> SET <column> = NULL WHERE <column> IN (<ids>)`.
pub fn null_where_in<C: ConnectionTrait>(
    db: &C,
    table: &'static str,
    column: &'static str,
    ids: &[i32],
) -> Statement {
    let query = Query::update()
        .table(Alias::new(table))
        .value(Alias::new(column), Value::Int(None))
        .and_where(Expr::col(Alias::new(column)).is_in(ids.iter().copied()))
        .to_owned();
    db.get_database_backend().build(&query)
}

/// `DELETE FROM <table> WHERE id IN (<ids>)`.
pub fn delete_ids<C: ConnectionTrait>(db: &C, table: &'static str, ids: &[i32]) -> Statement {
    let query = Query::delete()
        .from_table(Alias::new(table))
        .and_where(Expr::col(Alias::new("id")).is_in(ids.iter().copied()))
        .to_owned();
    db.get_database_backend().build(&query)
}

/// Fetch the `id` column of every row a select statement returns.
pub async fn query_ids<C: ConnectionTrait>(db: &C, stmt: Statement) -> Result<Vec<i32>, DbErr> {
    let rows = db.query_all_raw(stmt).await?;
    rows.iter().map(|row| row.try_get::<i32>("", "id")).collect()
}

/// Check that a row exists, taking a row lock where the backend supports one.
///
/// On PostgreSQL and MySQL this is `SELECT ... FOR UPDATE`; SQLite serializes
/// writers at the database level so a plain select suffices there.
pub async fn lock_row<C: ConnectionTrait>(
    db: &C,
    table: &'static str,
    id: i32,
) -> Result<bool, DbErr> {
    let mut query = Query::select();
    query
        .column(Alias::new("id"))
        .from(Alias::new(table))
        .and_where(Expr::col(Alias::new("id")).eq(id));

    let backend = db.get_database_backend();
    if !matches!(backend, sea_orm::DatabaseBackend::Sqlite) {
        query.lock_exclusive();
    }

    let row = db.query_one_raw(backend.build(&query)).await?;
    Ok(row.is_some())
}

/// Delete one row by id, returning the number of rows removed.
pub async fn delete_row<C: ConnectionTrait>(
    db: &C,
    table: &'static str,
    id: i32,
) -> Result<u64, DbErr> {
    execute_raw(db, delete_ids(db, table, &[id])).await
}
