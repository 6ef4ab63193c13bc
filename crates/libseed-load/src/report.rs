use serde::Serialize;
use tracing::info;

use libseed_core::Result;
use libseed_generate::Entity;

use crate::store::Store;

/// Outcome of one table's load stage.
#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub entity: Entity,
    pub table: String,
    pub rows_requested: u64,
    /// Rows the store reported as inserted.
    pub rows_loaded: u64,
    pub batches: u64,
    pub duration_ms: u64,
}

/// Row count read back from the store after the load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: String,
    pub rows: u64,
}

/// Summary of a seeding run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub tables: Vec<TableReport>,
    /// Parent counts observed before the transactions load.
    pub users_observed: u64,
    pub book_copies_observed: u64,
    pub counts: Vec<TableCount>,
    pub duration_ms: u64,
}

impl SeedReport {
    pub fn table(&self, entity: Entity) -> Option<&TableReport> {
        self.tables.iter().find(|report| report.entity == entity)
    }

    pub fn count(&self, entity: Entity) -> Option<u64> {
        self.counts
            .iter()
            .find(|count| count.table == entity.table_name())
            .map(|count| count.rows)
    }
}

/// Query and log the row count of every seeded table, in load order.
pub async fn count_tables<S>(store: &mut S) -> Result<Vec<TableCount>>
where
    S: Store + ?Sized,
{
    let mut counts = Vec::with_capacity(Entity::LOAD_ORDER.len());
    for entity in Entity::LOAD_ORDER {
        let table = entity.table_name();
        let rows = store.count_rows(table).await?;
        info!(table = %table, rows, "{table}: {rows} rows");
        counts.push(TableCount {
            table: table.to_string(),
            rows,
        });
    }
    Ok(counts)
}
