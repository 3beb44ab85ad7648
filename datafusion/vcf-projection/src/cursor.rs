//! Pull-based batch producer over one variant file.

use crate::error::{Result, VcfScanError};
use crate::field_value::FieldValue;
use crate::info_coercer::extract_info;
use crate::record_fields::extract_record_fields;
use crate::schema::{ColumnKind, ResolvedSchema};
use crate::storage::{RecordBuffer, VariantReader, open_local_variant_file};
use datafusion::arrow::array::RecordBatch;
use datafusion_vcf_projection_core::table_utils::BatchBuilder;
use log::{debug, info};
use noodles::vcf::Header;
use noodles::vcf::variant::Record as VariantRecord;

/// Rows per batch when the caller has no preference
pub const DEFAULT_BATCH_CAPACITY: usize = 2048;

/// Lifecycle of a [`VcfScanCursor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Created, nothing opened yet
    Unopened,
    /// File open and header read
    Opened,
    /// At least one batch pulled, input not yet exhausted
    Scanning,
    /// End of input reached; every further pull yields zero rows
    Exhausted,
    /// Opening or decoding failed; the cursor is unusable
    Failed,
}

/// Owns the open file and decoder for a single scan.
///
/// A cursor is not shared between threads. Dropping it (or calling
/// [`VcfScanCursor::close`]) releases the file and decoder.
pub struct VcfScanCursor {
    path: String,
    state: CursorState,
    reader: Option<VariantReader>,
    header: Option<Header>,
    rows_read: u64,
}

impl VcfScanCursor {
    /// Creates an unopened cursor for `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: CursorState::Unopened,
            reader: None,
            header: None,
            rows_read: 0,
        }
    }

    /// File this cursor reads
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current lifecycle state
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Header of the open file
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Records converted so far
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Opens the file and reads its header.
    ///
    /// Opening an already opened cursor does nothing.
    ///
    /// # Errors
    ///
    /// [`VcfScanError::FileOpen`] or [`VcfScanError::HeaderRead`]; the cursor
    /// is then [`CursorState::Failed`]. A failed cursor reports
    /// [`VcfScanError::ScanAborted`].
    pub fn open(&mut self) -> Result<()> {
        match self.state {
            CursorState::Unopened => {}
            CursorState::Failed => {
                return Err(VcfScanError::ScanAborted {
                    path: self.path.clone(),
                });
            }
            CursorState::Opened | CursorState::Scanning | CursorState::Exhausted => return Ok(()),
        }

        match open_local_variant_file(&self.path) {
            Ok((reader, header)) => {
                info!("Opened variant file {} ({:?})", self.path, reader.format());
                self.reader = Some(reader);
                self.header = Some(header);
                self.state = CursorState::Opened;
                Ok(())
            }
            Err(e) => {
                self.state = CursorState::Failed;
                Err(e)
            }
        }
    }

    /// Converts up to `capacity` records into one batch shaped by `schema`.
    ///
    /// A batch shorter than `capacity` means the input is exhausted, after
    /// which every call returns an empty batch. A `capacity` of zero is
    /// treated as one.
    ///
    /// # Errors
    ///
    /// * [`VcfScanError::NotOpened`] before [`VcfScanCursor::open`]
    /// * [`VcfScanError::CorruptRecord`] when a record fails to decode; the
    ///   cursor moves to [`CursorState::Failed`] and the partial batch is
    ///   discarded
    /// * [`VcfScanError::ScanAborted`] on a failed or closed cursor
    pub fn pull_batch(
        &mut self,
        buffer: &mut RecordBuffer,
        schema: &ResolvedSchema,
        capacity: usize,
    ) -> datafusion::common::Result<RecordBatch> {
        match self.state {
            CursorState::Unopened => {
                return Err(VcfScanError::NotOpened {
                    path: self.path.clone(),
                }
                .into());
            }
            CursorState::Failed => {
                return Err(VcfScanError::ScanAborted {
                    path: self.path.clone(),
                }
                .into());
            }
            CursorState::Exhausted => return Ok(RecordBatch::new_empty(schema.arrow_schema())),
            CursorState::Opened | CursorState::Scanning => {}
        }

        let (Some(reader), Some(header)) = (self.reader.as_mut(), self.header.as_ref()) else {
            self.state = CursorState::Failed;
            return Err(VcfScanError::ScanAborted {
                path: self.path.clone(),
            }
            .into());
        };
        self.state = CursorState::Scanning;

        let capacity = capacity.max(1);
        let mut builder = BatchBuilder::new(schema.arrow_schema(), capacity)?;
        while builder.len() < capacity {
            let record = match reader.read_next(buffer) {
                Ok(Some(record)) => record,
                Ok(None) => {
                    debug!(
                        "Reached end of {} after {} records",
                        self.path,
                        self.rows_read + builder.len() as u64
                    );
                    self.state = CursorState::Exhausted;
                    break;
                }
                Err(e) => {
                    self.state = CursorState::Failed;
                    return Err(VcfScanError::corrupt("Failed to decode record", e).into());
                }
            };
            if let Err(e) = write_row(&mut builder, record, header, schema) {
                self.state = CursorState::Failed;
                return Err(e);
            }
        }

        self.rows_read += builder.len() as u64;
        builder.finish()
    }

    /// Releases the file and decoder. Later pulls report
    /// [`VcfScanError::ScanAborted`].
    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!("Closed {} after {} records", self.path, self.rows_read);
        }
        self.header = None;
    }
}

/// Appends one record as a row. INFO is only decoded when the schema has
/// INFO columns.
fn write_row(
    builder: &mut BatchBuilder,
    record: &dyn VariantRecord,
    header: &Header,
    schema: &ResolvedSchema,
) -> datafusion::common::Result<()> {
    let fields = extract_record_fields(record, header)?;
    for (col, column) in schema.columns().iter().enumerate() {
        match column.kind {
            ColumnKind::Chrom => builder.set_utf8(col, &fields.chrom)?,
            ColumnKind::Pos => builder.set_i64(col, fields.pos)?,
            ColumnKind::Id => write_value(builder, col, &fields.id)?,
            ColumnKind::Ref => write_value(builder, col, &fields.ref_allele)?,
            ColumnKind::Alt => write_value(builder, col, &fields.alt)?,
            ColumnKind::Qual => write_value(builder, col, &fields.qual)?,
            ColumnKind::Filter => builder.set_utf8(col, &fields.filter)?,
            ColumnKind::Info => {
                let value = extract_info(record, header, column)?;
                write_value(builder, col, &value)?;
            }
        }
    }
    builder.finish_row();
    Ok(())
}

fn write_value(
    builder: &mut BatchBuilder,
    col: usize,
    value: &FieldValue,
) -> datafusion::common::Result<()> {
    if value.is_null() {
        builder.set_null(col);
        return Ok(());
    }
    match value {
        FieldValue::Absent | FieldValue::Null => Ok(()),
        FieldValue::Int64(v) => builder.set_i64(col, *v),
        FieldValue::Float64(v) => builder.set_f64(col, *v),
        FieldValue::Utf8(v) => builder.set_utf8(col, v),
        FieldValue::Bool(v) => builder.set_bool(col, *v),
    }
}
