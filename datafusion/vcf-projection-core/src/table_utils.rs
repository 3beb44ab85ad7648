use datafusion::arrow::array::{
    ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, StringBuilder,
};
use datafusion::arrow::datatypes::{DataType, SchemaRef};
use datafusion::arrow::record_batch::{RecordBatch, RecordBatchOptions};
use datafusion::common::{DataFusionError, Result};
use std::sync::Arc;

/// Type-erased Arrow column builder for the scalar column types a projected
/// table can contain
#[derive(Debug)]
pub enum ColumnBuilder {
    /// Builder for Int64 scalar values
    Int64(Int64Builder),
    /// Builder for Float64 scalar values
    Float64(Float64Builder),
    /// Builder for UTF8 string values
    Utf8(StringBuilder),
    /// Builder for Boolean values
    Boolean(BooleanBuilder),
}

impl ColumnBuilder {
    /// Creates a new builder for the specified data type
    ///
    /// # Arguments
    ///
    /// * `data_type` - Arrow data type to build
    /// * `capacity` - Initial row capacity for the builder
    ///
    /// # Errors
    ///
    /// Returns an error if the data type is not one of Int64, Float64, Utf8, Boolean
    pub fn new(data_type: &DataType, capacity: usize) -> Result<Self> {
        match data_type {
            DataType::Int64 => Ok(Self::Int64(Int64Builder::with_capacity(capacity))),
            DataType::Float64 => Ok(Self::Float64(Float64Builder::with_capacity(capacity))),
            DataType::Utf8 => Ok(Self::Utf8(StringBuilder::with_capacity(
                capacity,
                capacity * 16,
            ))),
            DataType::Boolean => Ok(Self::Boolean(BooleanBuilder::with_capacity(capacity))),
            other => Err(DataFusionError::Execution(format!(
                "Unsupported column data type: {other:?}"
            ))),
        }
    }

    fn data_type(&self) -> DataType {
        match self {
            Self::Int64(_) => DataType::Int64,
            Self::Float64(_) => DataType::Float64,
            Self::Utf8(_) => DataType::Utf8,
            Self::Boolean(_) => DataType::Boolean,
        }
    }

    /// Appends a null value to the builder
    #[inline]
    pub fn append_null(&mut self) {
        match self {
            Self::Int64(b) => b.append_null(),
            Self::Float64(b) => b.append_null(),
            Self::Utf8(b) => b.append_null(),
            Self::Boolean(b) => b.append_null(),
        }
    }

    /// Finalizes the builder and returns the built Arrow array, leaving the
    /// builder empty and reusable
    pub fn finish(&mut self) -> ArrayRef {
        match self {
            Self::Int64(b) => Arc::new(b.finish()),
            Self::Float64(b) => Arc::new(b.finish()),
            Self::Utf8(b) => Arc::new(b.finish()),
            Self::Boolean(b) => Arc::new(b.finish()),
        }
    }
}

fn type_mismatch(col: usize, expected: DataType, found: &ColumnBuilder) -> DataFusionError {
    DataFusionError::Execution(format!(
        "Column {col} expects {:?}, got a {expected:?} value",
        found.data_type()
    ))
}

/// Builds a `RecordBatch` one row at a time, up to a fixed capacity.
///
/// Columns are addressed by index into the schema. Columns that were not set
/// for a row are null-filled by [`BatchBuilder::finish_row`], so every column
/// always has exactly [`BatchBuilder::len`] values.
#[derive(Debug)]
pub struct BatchBuilder {
    builders: Vec<ColumnBuilder>,
    schema: SchemaRef,
    capacity: usize,
    row_count: usize,
    written: Vec<bool>,
    written_count: usize,
}

impl BatchBuilder {
    /// Creates a builder for `schema` holding at most `capacity` rows per batch
    ///
    /// # Errors
    ///
    /// Returns an error if the schema contains an unsupported column type
    pub fn new(schema: SchemaRef, capacity: usize) -> Result<Self> {
        let builders = schema
            .fields()
            .iter()
            .map(|field| ColumnBuilder::new(field.data_type(), capacity))
            .collect::<Result<Vec<_>>>()?;
        let num_cols = builders.len();
        Ok(Self {
            builders,
            schema,
            capacity,
            row_count: 0,
            written: vec![false; num_cols],
            written_count: 0,
        })
    }

    #[inline]
    fn mark_written(&mut self, col: usize) {
        if !self.written[col] {
            self.written[col] = true;
            self.written_count += 1;
        }
    }

    /// Sets a non-null string value for `col` in the current row
    #[inline]
    pub fn set_utf8(&mut self, col: usize, value: &str) -> Result<()> {
        match &mut self.builders[col] {
            ColumnBuilder::Utf8(b) => b.append_value(value),
            other => return Err(type_mismatch(col, DataType::Utf8, other)),
        }
        self.mark_written(col);
        Ok(())
    }

    /// Sets a non-null Int64 value for `col` in the current row
    #[inline]
    pub fn set_i64(&mut self, col: usize, value: i64) -> Result<()> {
        match &mut self.builders[col] {
            ColumnBuilder::Int64(b) => b.append_value(value),
            other => return Err(type_mismatch(col, DataType::Int64, other)),
        }
        self.mark_written(col);
        Ok(())
    }

    /// Sets a non-null Float64 value for `col` in the current row
    #[inline]
    pub fn set_f64(&mut self, col: usize, value: f64) -> Result<()> {
        match &mut self.builders[col] {
            ColumnBuilder::Float64(b) => b.append_value(value),
            other => return Err(type_mismatch(col, DataType::Float64, other)),
        }
        self.mark_written(col);
        Ok(())
    }

    /// Sets a non-null Boolean value for `col` in the current row
    #[inline]
    pub fn set_bool(&mut self, col: usize, value: bool) -> Result<()> {
        match &mut self.builders[col] {
            ColumnBuilder::Boolean(b) => b.append_value(value),
            other => return Err(type_mismatch(col, DataType::Boolean, other)),
        }
        self.mark_written(col);
        Ok(())
    }

    /// Sets `col` to null in the current row
    #[inline]
    pub fn set_null(&mut self, col: usize) {
        self.builders[col].append_null();
        self.mark_written(col);
    }

    /// Completes the current row, null-filling every column that was not set
    pub fn finish_row(&mut self) {
        let num_cols = self.written.len();
        if self.written_count != num_cols {
            for idx in 0..num_cols {
                if !self.written[idx] {
                    self.builders[idx].append_null();
                }
            }
        }
        self.written.fill(false);
        self.written_count = 0;
        self.row_count += 1;
    }

    /// Number of completed rows in the pending batch
    #[inline]
    pub fn len(&self) -> usize {
        self.row_count
    }

    /// Returns true if no row has been completed since the last `finish`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Maximum number of rows per batch
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true once the pending batch holds `capacity` rows
    #[inline]
    pub fn is_full(&self) -> bool {
        self.row_count >= self.capacity
    }

    /// Emits the pending rows as a `RecordBatch` and resets the builder.
    ///
    /// A builder with no completed rows yields a valid zero-row batch.
    ///
    /// # Errors
    ///
    /// Returns an error if Arrow rejects the assembled columns
    pub fn finish(&mut self) -> Result<RecordBatch> {
        let count = self.row_count;
        self.row_count = 0;
        self.written.fill(false);
        self.written_count = 0;

        if self.schema.fields().is_empty() {
            let options = RecordBatchOptions::new().with_row_count(Some(count));
            return RecordBatch::try_new_with_options(self.schema.clone(), Vec::new(), &options)
                .map_err(|e| DataFusionError::ArrowError(Box::new(e), None));
        }

        let arrays: Vec<ArrayRef> = self
            .builders
            .iter_mut()
            .map(ColumnBuilder::finish)
            .collect();
        RecordBatch::try_new(self.schema.clone(), arrays)
            .map_err(|e| DataFusionError::ArrowError(Box::new(e), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafusion::arrow::array::{
        Array, BooleanArray, Float64Array, Int64Array, StringArray,
    };
    use datafusion::arrow::datatypes::{Field, Schema};

    fn test_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("chrom", DataType::Utf8, false),
            Field::new("pos", DataType::Int64, false),
            Field::new("qual", DataType::Float64, true),
            Field::new("flag", DataType::Boolean, true),
        ]))
    }

    #[test]
    fn test_rows_are_null_filled_when_columns_are_skipped() -> Result<()> {
        let mut builder = BatchBuilder::new(test_schema(), 4)?;

        builder.set_utf8(0, "chr1")?;
        builder.set_i64(1, 99)?;
        builder.set_f64(2, 30.5)?;
        builder.set_bool(3, true)?;
        builder.finish_row();

        builder.set_utf8(0, "chr2")?;
        builder.set_i64(1, 199)?;
        builder.set_null(2);
        builder.finish_row();

        assert_eq!(builder.len(), 2);
        let batch = builder.finish()?;
        assert_eq!(batch.num_rows(), 2);

        let chrom = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        let pos = batch
            .column(1)
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        let qual = batch
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        let flag = batch
            .column(3)
            .as_any()
            .downcast_ref::<BooleanArray>()
            .unwrap();

        assert_eq!(chrom.value(1), "chr2");
        assert_eq!(pos.value(0), 99);
        assert_eq!(qual.value(0), 30.5);
        assert!(qual.is_null(1));
        assert!(flag.value(0));
        assert!(flag.is_null(1));
        Ok(())
    }

    #[test]
    fn test_finish_resets_for_next_batch() -> Result<()> {
        let mut builder = BatchBuilder::new(test_schema(), 1)?;
        builder.set_utf8(0, "chr1")?;
        builder.set_i64(1, 1)?;
        builder.finish_row();
        assert!(builder.is_full());

        let first = builder.finish()?;
        assert_eq!(first.num_rows(), 1);
        assert!(builder.is_empty());
        assert!(!builder.is_full());

        let empty = builder.finish()?;
        assert_eq!(empty.num_rows(), 0);
        assert_eq!(empty.num_columns(), 4);
        Ok(())
    }

    #[test]
    fn test_type_mismatch_is_an_error() -> Result<()> {
        let mut builder = BatchBuilder::new(test_schema(), 1)?;
        let err = builder.set_i64(0, 5).unwrap_err();
        assert!(err.to_string().contains("Column 0"));
        Ok(())
    }

    #[test]
    fn test_zero_column_schema_keeps_row_count() -> Result<()> {
        let mut builder = BatchBuilder::new(Arc::new(Schema::empty()), 8)?;
        builder.finish_row();
        builder.finish_row();
        let batch = builder.finish()?;
        assert_eq!(batch.num_columns(), 0);
        assert_eq!(batch.num_rows(), 2);
        Ok(())
    }

    #[test]
    fn test_unsupported_type_is_rejected() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "start",
            DataType::UInt32,
            false,
        )]));
        assert!(BatchBuilder::new(schema, 8).is_err());
    }
}
