//! Multi-row INSERT composition and execution.

use libseed_core::{Error, Result, Value, encode_row};
use libseed_generate::{SeedRow, TableSpec};

use crate::store::Store;

/// Build one `INSERT ... VALUES (...),(...)` statement for a batch.
///
/// The table's conflict policy decides whether an `ON CONFLICT` clause is
/// appended. Returns `None` for an empty batch.
pub fn insert_statement(spec: &TableSpec, rows: &[Vec<Value>]) -> Result<Option<String>> {
    if rows.is_empty() {
        return Ok(None);
    }

    let mut sql = spec.insert_prefix();
    sql.push_str(" VALUES ");
    for (idx, row) in rows.iter().enumerate() {
        if row.len() != spec.columns.len() {
            return Err(Error::Other(format!(
                "row {idx} for '{}' has {} values, expected {}",
                spec.table,
                row.len(),
                spec.columns.len()
            )));
        }
        if idx > 0 {
            sql.push(',');
        }
        sql.push_str(&encode_row(row)?);
    }
    if let Some(clause) = spec.conflict.clause() {
        sql.push(' ');
        sql.push_str(&clause);
    }
    Ok(Some(sql))
}

/// Insert one batch of raw values into `spec.table`.
///
/// Returns the number of rows the store reports as inserted, which is lower
/// than `rows.len()` when the conflict policy dropped duplicates.
pub async fn insert_batch<S>(store: &mut S, spec: &TableSpec, rows: &[Vec<Value>]) -> Result<u64>
where
    S: Store + ?Sized,
{
    match insert_statement(spec, rows)? {
        Some(sql) => store.execute(&sql).await,
        None => Ok(0),
    }
}

/// Insert one batch of typed rows into the table their type is bound to.
pub async fn insert_rows<S, R>(store: &mut S, rows: &[R]) -> Result<u64>
where
    S: Store + ?Sized,
    R: SeedRow + Sync,
{
    let values: Vec<Vec<Value>> = rows.iter().map(R::values).collect();
    insert_batch(store, R::ENTITY.spec(), &values).await
}
