//! Synthetic datasets
//!
//! A [`Dataset`] is the in-memory table one benchmark invocation runs
//! against. It is generated from a suite's generator, checked against the
//! suite's declared schema and shared read-only by every engine.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use datafusion::arrow::array::{ArrayRef, StringArray};
use datafusion::arrow::compute::cast;
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::parquet::arrow::ArrowWriter;
use datafusion::parquet::basic::Compression;
use datafusion::parquet::file::properties::WriterProperties;
use tracing::{debug, info};

use crate::error::{BenchError, Result};
use crate::suite::{Suite, Variant};

/// Seed shared by every built-in generator
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    suite_name: String,
    variant: Variant,
    batch: RecordBatch,
}

impl Dataset {
    pub fn suite_name(&self) -> &str {
        &self.suite_name
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn row_count(&self) -> usize {
        self.batch.num_rows()
    }

    /// The same rows with every `Utf8View` column cast to `Utf8`.
    ///
    /// Used by engines that do not ingest the view layout.
    pub fn baseline_batch(&self) -> Result<RecordBatch> {
        let schema = self.batch.schema();
        if !schema
            .fields()
            .iter()
            .any(|f| f.data_type() == &DataType::Utf8View)
        {
            return Ok(self.batch.clone());
        }

        let mut fields = Vec::with_capacity(schema.fields().len());
        let mut columns = Vec::with_capacity(schema.fields().len());
        for (field, column) in schema.fields().iter().zip(self.batch.columns()) {
            if field.data_type() == &DataType::Utf8View {
                fields.push(Field::new(field.name(), DataType::Utf8, field.is_nullable()));
                columns.push(cast(column, &DataType::Utf8)?);
            } else {
                fields.push(field.as_ref().clone());
                columns.push(column.clone());
            }
        }

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
    }

    /// Write the dataset to `dir` as a Parquet file and return its path
    pub fn stage_parquet(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}_{}.parquet", self.suite_name, self.variant));
        let batch = self.baseline_batch()?;

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let file = File::create(&path)?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        debug!(path = %path.display(), rows = batch.num_rows(), "staged dataset as parquet");
        Ok(path)
    }
}

/// Generate the dataset for `suite` with `row_count` rows.
///
/// An unsupported `variant` falls back to the suite's baseline.
pub fn generate(suite: &Suite, row_count: usize, variant: Variant) -> Result<Dataset> {
    if row_count == 0 {
        return Err(BenchError::config("row count must be a positive integer"));
    }
    let variant = suite.resolve_variant(variant);

    let batch = suite.generate_batch(row_count, variant)?;
    check_shape(suite, variant, row_count, &batch)?;

    info!(
        suite = suite.name(),
        rows = row_count,
        variant = %variant,
        bytes = batch.get_array_memory_size(),
        "generated dataset"
    );

    Ok(Dataset {
        suite_name: suite.name().to_string(),
        variant,
        batch,
    })
}

fn check_shape(suite: &Suite, variant: Variant, row_count: usize, batch: &RecordBatch) -> Result<()> {
    if batch.num_rows() != row_count {
        return Err(BenchError::config(format!(
            "suite {} generated {} rows, expected {}",
            suite.name(),
            batch.num_rows(),
            row_count
        )));
    }

    let expected = suite.schema(variant);
    let actual = batch.schema();
    let matches = expected.fields().len() == actual.fields().len()
        && expected
            .fields()
            .iter()
            .zip(actual.fields().iter())
            .all(|(e, a)| e.name() == a.name() && e.data_type() == a.data_type());

    if !matches {
        return Err(BenchError::config(format!(
            "suite {} generated schema {:?}, declared {:?}",
            suite.name(),
            actual,
            expected
        )));
    }
    Ok(())
}

/// Build a text column in the representation `variant` asks for
pub fn text_array(values: Vec<String>, variant: Variant) -> Result<ArrayRef> {
    let array: ArrayRef = Arc::new(StringArray::from(values));
    match variant {
        Variant::Baseline => Ok(array),
        Variant::StringView => Ok(cast(&array, &DataType::Utf8View)?),
    }
}
