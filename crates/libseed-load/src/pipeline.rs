//! Ordered population of the library tables.
//!
//! Stages run strictly in sequence against one store: drop secondary
//! indexes, load parents before children, read back the post-dedup user and
//! copy counts, load transactions, rebuild indexes, count every table. There
//! is no enclosing transaction; a failure leaves whatever was already loaded
//! in place and the store must be reset before the next run.

use std::time::Instant;

use tracing::{info, warn};

use libseed_core::{Result, SeedConfig};
use libseed_generate::{
    BatchBuilder, Entity, ForeignContext, GENRES, GenreRow, PositionalIds, RowFactory, SeedRow,
};

use crate::loader::insert_rows;
use crate::report::{SeedReport, TableReport, count_tables};
use crate::store::Store;

/// Drives one seeding run and owns the store for its duration.
pub struct SeedPipeline<S: Store> {
    store: S,
    config: SeedConfig,
    rows: RowFactory,
    ids: PositionalIds,
    report: SeedReport,
}

impl<S: Store> SeedPipeline<S> {
    /// Take ownership of `store`. A rejected config closes it before
    /// returning the error.
    pub async fn new(mut store: S, config: SeedConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            if let Err(close_err) = store.close().await {
                warn!(error = %close_err, "failed to close store after invalid config");
            }
            return Err(err);
        }
        let rows = RowFactory::new(config.seed, config.date_window);
        Ok(Self {
            store,
            config,
            rows,
            ids: PositionalIds::new(),
            report: SeedReport::default(),
        })
    }

    /// Run every stage, then release the store whether or not they succeeded.
    pub async fn run(&mut self) -> Result<SeedReport> {
        let started = Instant::now();
        info!(
            event = "seed_started",
            engine = self.store.engine(),
            batch_size = self.config.batch_size,
            seed = self.config.seed,
        );

        let outcome = self.run_stages().await;
        let closed = self.store.close().await;

        match outcome {
            Ok(()) => {
                closed?;
                self.report.duration_ms = started.elapsed().as_millis() as u64;
                info!(
                    event = "seed_finished",
                    duration_ms = self.report.duration_ms,
                    "seeding completed"
                );
                Ok(self.report.clone())
            }
            Err(err) => {
                if let Err(close_err) = closed {
                    warn!(error = %close_err, "failed to close store after error");
                }
                warn!(error = %err, "seeding aborted; loaded tables are left as-is");
                Err(err)
            }
        }
    }

    async fn run_stages(&mut self) -> Result<()> {
        self.drop_indexes().await?;

        let targets = self.config.targets;

        let authors = self
            .load_stage(targets.authors, false, |rows, _| rows.author())
            .await?;
        self.ids.record_count(Entity::Authors, authors);

        let genres = self
            .load_stage(GENRES.len() as u64, false, |_, idx| GenreRow {
                name: GENRES[idx as usize],
            })
            .await?;
        self.ids.record_count(Entity::Genres, genres);

        let books = if targets.books == 0 {
            self.skip_stage(Entity::Books)
        } else {
            let author_ids = self.ids.parent(Entity::Authors)?;
            let genre_ids = self.ids.parent(Entity::Genres)?;
            self.load_stage(targets.books, false, move |rows, _| {
                rows.book(author_ids, genre_ids)
            })
            .await?
        };
        self.ids.record_count(Entity::Books, books);

        self.load_stage(targets.users, false, |rows, idx| rows.user(idx + 1))
            .await?;

        if targets.book_copies == 0 {
            self.skip_stage(Entity::BookCopies);
        } else {
            let book_ids = self.ids.parent(Entity::Books)?;
            self.load_stage(targets.book_copies, true, move |rows, idx| {
                rows.book_copy(idx + 1, book_ids)
            })
            .await?;
        }

        let users = self.store.count_rows(Entity::Users.table_name()).await?;
        let copies = self
            .store
            .count_rows(Entity::BookCopies.table_name())
            .await?;
        self.ids.record_count(Entity::Users, users);
        self.ids.record_count(Entity::BookCopies, copies);
        self.report.users_observed = users;
        self.report.book_copies_observed = copies;
        info!(users, book_copies = copies, "parent counts observed");

        if targets.transactions == 0 {
            self.skip_stage(Entity::Transactions);
        } else {
            let user_ids = self.ids.parent(Entity::Users)?;
            let copy_ids = self.ids.parent(Entity::BookCopies)?;
            self.load_stage(targets.transactions, true, move |rows, _| {
                rows.transaction(user_ids, copy_ids)
            })
            .await?;
        }

        self.restore_indexes().await?;

        self.report.counts = count_tables(&mut self.store).await?;
        Ok(())
    }

    async fn drop_indexes(&mut self) -> Result<()> {
        info!("temporarily dropping secondary indexes");
        for index in &self.config.indexes {
            self.store.execute(&index.drop_statement()).await?;
        }
        Ok(())
    }

    async fn restore_indexes(&mut self) -> Result<()> {
        info!("restoring secondary indexes");
        for index in &self.config.indexes {
            self.store.execute(&index.create_statement()).await?;
        }
        Ok(())
    }

    /// Record an empty stage without resolving its parents.
    fn skip_stage(&mut self, entity: Entity) -> u64 {
        info!(table = %entity, "no rows requested; skipping");
        self.report.tables.push(TableReport {
            entity,
            table: entity.table_name().to_string(),
            rows_requested: 0,
            rows_loaded: 0,
            batches: 0,
            duration_ms: 0,
        });
        0
    }

    /// Generate `target` rows in batches and insert each batch before
    /// building the next. Returns the rows the store accepted.
    async fn load_stage<R, F>(
        &mut self,
        target: u64,
        progress: bool,
        mut make_row: F,
    ) -> Result<u64>
    where
        R: SeedRow + Sync,
        F: FnMut(&mut RowFactory, u64) -> R,
    {
        let started = Instant::now();
        let entity = R::ENTITY;
        let table = entity.table_name();
        let builder = BatchBuilder::new(target, self.config.batch_size)?;
        let every = self.config.progress_every_batches;
        info!(table = %table, rows = target, batches = builder.batch_count(), "inserting {table}");

        let rows = &mut self.rows;
        let store = &mut self.store;
        let mut loaded = 0_u64;
        let mut generated = 0_u64;
        let mut batch_no = 0_u64;

        for batch in builder.batches(|idx| make_row(rows, idx)) {
            generated += batch.len() as u64;
            loaded += insert_rows(store, &batch).await.inspect_err(|err| {
                warn!(table = %table, batch = batch_no, error = %err, "batch insert failed");
            })?;
            if progress && batch_no % every == 0 {
                info!(
                    table = %table,
                    rows = generated,
                    target,
                    "   -> {generated} / {target} {table} inserted"
                );
            }
            batch_no += 1;
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        if loaded < generated {
            info!(table = %table, dropped = generated - loaded, "conflicting rows skipped");
        }
        self.report.tables.push(TableReport {
            entity,
            table: table.to_string(),
            rows_requested: target,
            rows_loaded: loaded,
            batches: batch_no,
            duration_ms,
        });
        Ok(loaded)
    }
}
