//! Batched loading into a [`MarketStore`].
//!
//! Each batch is sent once. Duplicate-key batches are logged and skipped,
//! other failures are logged and the remaining batches still go out.

use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

use finstocks_api::store::{MarketStore, RowBatch, Table};

/// Batch size for daily price rows.
pub const PRICE_BATCH_SIZE: usize = 100;
/// Batch size for fundamentals, indicators and holdings.
pub const ROW_BATCH_SIZE: usize = 50;

/// Log progress each time this many more rows have landed.
const PROGRESS_EVERY: usize = 1000;

/// Outcome of loading one table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub attempted: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub failed_batches: usize,
}

impl LoadReport {
    pub fn merge(&mut self, other: LoadReport) {
        self.attempted += other.attempted;
        self.inserted += other.inserted;
        self.duplicates += other.duplicates;
        self.failed_batches += other.failed_batches;
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} rows inserted, {} duplicates, {} failed batches",
            self.inserted, self.attempted, self.duplicates, self.failed_batches
        )
    }
}

pub struct Loader {
    store: Arc<dyn MarketStore>,
}

impl Loader {
    pub fn new(store: Arc<dyn MarketStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn MarketStore> {
        &self.store
    }

    /// Insert rows one at a time, so a duplicate only skips that row.
    pub async fn load_each<T: Clone>(
        &self,
        rows: &[T],
        wrap: impl Fn(Vec<T>) -> RowBatch,
    ) -> LoadReport {
        self.load(rows, 1, wrap).await
    }

    /// Insert rows in chunks of `batch_size`.
    pub async fn load<T: Clone>(
        &self,
        rows: &[T],
        batch_size: usize,
        wrap: impl Fn(Vec<T>) -> RowBatch,
    ) -> LoadReport {
        let mut report = LoadReport {
            attempted: rows.len(),
            ..LoadReport::default()
        };
        let mut next_progress = PROGRESS_EVERY;
        let mut table = None;

        for chunk in rows.chunks(batch_size.max(1)) {
            let batch = wrap(chunk.to_vec());
            table = Some(batch.table());

            match self.store.insert_batch(&batch).await {
                Ok(count) => {
                    report.inserted += count;
                    if report.inserted >= next_progress {
                        info!(table = %batch.table(), inserted = report.inserted, "Loading...");
                        next_progress += PROGRESS_EVERY;
                    }
                }
                Err(e) if e.is_duplicate() => {
                    warn!(table = %batch.table(), rows = chunk.len(), error = %e, "Skipping duplicate rows");
                    report.duplicates += chunk.len();
                }
                Err(e) => {
                    error!(table = %batch.table(), rows = chunk.len(), error = %e, "Failed to insert batch");
                    report.failed_batches += 1;
                }
            }
        }

        if let Some(table) = table {
            info!(table = %table, "Loaded {}", report);
        }
        report
    }

    /// Delete every row of `tables`, in order. Failures are logged and the
    /// remaining tables are still cleared. Returns how many tables failed.
    pub async fn clear(&self, tables: &[Table]) -> usize {
        let mut failures = 0;
        for table in tables {
            match self.store.clear(*table).await {
                Ok(()) => info!(table = %table, "Cleared"),
                Err(e) => {
                    warn!(table = %table, error = %e, "Failed to clear table");
                    failures += 1;
                }
            }
        }
        failures
    }
}
