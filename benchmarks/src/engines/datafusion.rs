//! Apache DataFusion adapter
//!
//! The dataset batch is registered as an in-memory table, so string view
//! columns reach the engine untouched. Each session drives its own
//! current-thread Tokio runtime and is pinned to a single target partition.

use std::time::Instant;

use datafusion::execution::context::SessionContext;
use datafusion::prelude::SessionConfig;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use super::{EngineAdapter, EngineId, EngineSession, Execution, TABLE_NAME};
use crate::dataset::Dataset;
use crate::error::{BenchError, ExecutionError, Result};

#[derive(Debug, Default, Clone, Copy)]
pub struct DataFusionAdapter;

impl DataFusionAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl EngineAdapter for DataFusionAdapter {
    fn engine_id(&self) -> EngineId {
        EngineId::DataFusion
    }

    fn prepare(&self, dataset: &Dataset) -> Result<Box<dyn EngineSession>> {
        let setup_error = |reason: String| BenchError::EngineSetup {
            engine: EngineId::DataFusion,
            reason,
        };

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| setup_error(format!("failed to start runtime: {}", e)))?;

        let config = SessionConfig::new().with_target_partitions(1);
        let ctx = SessionContext::new_with_config(config);
        ctx.register_batch(TABLE_NAME, dataset.batch().clone())
            .map_err(|e| setup_error(e.to_string()))?;

        debug!(
            rows = dataset.row_count(),
            variant = %dataset.variant(),
            "registered dataset with DataFusion"
        );

        Ok(Box::new(DataFusionSession { runtime, ctx }))
    }
}

struct DataFusionSession {
    runtime: Runtime,
    ctx: SessionContext,
}

impl EngineSession for DataFusionSession {
    fn execute(&mut self, sql: &str) -> std::result::Result<Execution, ExecutionError> {
        let ctx = &self.ctx;
        let start = Instant::now();
        let batches = self
            .runtime
            .block_on(async move {
                let df = ctx.sql(sql).await?;
                df.collect().await
            })
            .map_err(|e| ExecutionError::new(EngineId::DataFusion, sql, e))?;
        let elapsed = start.elapsed();

        Ok(Execution {
            elapsed,
            rows: batches.iter().map(|b| b.num_rows()).sum(),
        })
    }
}
