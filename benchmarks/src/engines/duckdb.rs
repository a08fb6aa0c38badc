//! DuckDB adapter
//!
//! DuckDB gets the dataset through a staged Parquet file that is copied into
//! a native table, so every statement scans DuckDB's own storage rather than
//! the Parquet reader. The connection is limited to one thread.

use std::time::Instant;

use duckdb::Connection;
use tempfile::TempDir;
use tracing::debug;

use super::{EngineAdapter, EngineId, EngineSession, Execution, TABLE_NAME};
use crate::dataset::Dataset;
use crate::error::{BenchError, ExecutionError, Result};

#[derive(Debug, Default, Clone, Copy)]
pub struct DuckDbAdapter;

impl DuckDbAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn setup_error(reason: impl ToString) -> BenchError {
    BenchError::EngineSetup {
        engine: EngineId::DuckDb,
        reason: reason.to_string(),
    }
}

impl EngineAdapter for DuckDbAdapter {
    fn engine_id(&self) -> EngineId {
        EngineId::DuckDb
    }

    fn prepare(&self, dataset: &Dataset) -> Result<Box<dyn EngineSession>> {
        let conn = Connection::open_in_memory().map_err(setup_error)?;
        conn.execute_batch("SET threads TO 1").map_err(setup_error)?;

        let staging = TempDir::new()?;
        let path = dataset.stage_parquet(staging.path())?;
        let load = format!(
            "CREATE TABLE {} AS SELECT * FROM read_parquet('{}')",
            TABLE_NAME,
            path.display().to_string().replace('\'', "''")
        );
        conn.execute_batch(&load).map_err(setup_error)?;

        debug!(
            rows = dataset.row_count(),
            path = %path.display(),
            "loaded dataset into DuckDB"
        );

        Ok(Box::new(DuckDbSession { conn }))
    }
}

struct DuckDbSession {
    conn: Connection,
}

impl EngineSession for DuckDbSession {
    fn execute(&mut self, sql: &str) -> std::result::Result<Execution, ExecutionError> {
        let fail = |e: duckdb::Error| ExecutionError::new(EngineId::DuckDb, sql, e);

        let start = Instant::now();
        let mut stmt = self.conn.prepare(sql).map_err(fail)?;
        let rows = stmt
            .query_arrow([])
            .map_err(fail)?
            .map(|batch| batch.num_rows())
            .sum::<usize>();
        let elapsed = start.elapsed();

        Ok(Execution { elapsed, rows })
    }
}
