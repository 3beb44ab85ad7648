use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::cursor::VcfScanCursor;
use crate::schema::ResolvedSchema;
use crate::storage::RecordBuffer;
use datafusion::arrow::datatypes::SchemaRef;
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::common::DataFusionError;
use datafusion::execution::{SendableRecordBatchStream, TaskContext};
use datafusion::physical_plan::stream::RecordBatchStreamAdapter;
use datafusion::physical_plan::{DisplayAs, DisplayFormatType, ExecutionPlan, PlanProperties};
use futures::SinkExt;
use futures::channel::mpsc::Sender;
use futures::executor::block_on;
use log::{debug, info};

type BatchSender = Sender<Result<RecordBatch, DataFusionError>>;

/// Leaf plan node that scans one local VCF or BCF file.
///
/// Batches are decoded on a dedicated thread and handed to the stream through
/// a channel holding at most two batches.
pub struct VcfExec {
    pub(crate) file_path: String,
    /// Full table schema the cursor builds rows for
    pub(crate) resolved_schema: Arc<ResolvedSchema>,
    /// Output schema after projection
    pub(crate) schema: SchemaRef,
    pub(crate) projection: Option<Vec<usize>>,
    pub(crate) limit: Option<usize>,
    pub(crate) cache: PlanProperties,
}

impl Debug for VcfExec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VcfExec")
            .field("file_path", &self.file_path)
            .field("projection", &self.projection)
            .field("limit", &self.limit)
            .finish()
    }
}

impl DisplayAs for VcfExec {
    fn fmt_as(&self, _t: DisplayFormatType, f: &mut Formatter) -> std::fmt::Result {
        let proj_str = match &self.projection {
            Some(_) => {
                let col_names: Vec<&str> = self
                    .schema
                    .fields()
                    .iter()
                    .map(|f| f.name().as_str())
                    .collect();
                col_names.join(", ")
            }
            None => "*".to_string(),
        };
        write!(f, "VcfExec: projection=[{}]", proj_str)?;
        if let Some(limit) = self.limit {
            write!(f, ", limit={limit}")?;
        }
        Ok(())
    }
}

impl ExecutionPlan for VcfExec {
    fn name(&self) -> &str {
        "VcfExec"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn properties(&self) -> &PlanProperties {
        &self.cache
    }

    fn children(&self) -> Vec<&Arc<dyn ExecutionPlan>> {
        vec![]
    }

    fn with_new_children(
        self: Arc<Self>,
        _children: Vec<Arc<dyn ExecutionPlan>>,
    ) -> datafusion::common::Result<Arc<dyn ExecutionPlan>> {
        Ok(self)
    }

    fn execute(
        &self,
        partition: usize,
        context: Arc<TaskContext>,
    ) -> datafusion::common::Result<SendableRecordBatchStream> {
        info!(
            "{}: executing partition={} on {} with projection={:?} limit={:?}",
            self.name(),
            partition,
            self.file_path,
            self.projection,
            self.limit
        );
        let batch_size = context.session_config().batch_size();
        Ok(get_local_vcf_stream(
            self.file_path.clone(),
            Arc::clone(&self.resolved_schema),
            self.schema.clone(),
            batch_size,
            self.projection.clone(),
            self.limit,
        ))
    }
}

/// Blocks the producer thread until the consumer has room.
///
/// Returns `false` once the consumer is gone.
fn send_batch(tx: &mut BatchSender, item: Result<RecordBatch, DataFusionError>) -> bool {
    block_on(tx.send(item)).is_ok()
}

/// Streams a local file on its own thread.
///
/// The producer stops after `limit` rows, at end of input, at the first error,
/// or as soon as the stream is dropped.
fn get_local_vcf_stream(
    file_path: String,
    resolved_schema: Arc<ResolvedSchema>,
    schema_ref: SchemaRef,
    batch_size: usize,
    projection: Option<Vec<usize>>,
    limit: Option<usize>,
) -> SendableRecordBatchStream {
    let (mut tx, rx) = futures::channel::mpsc::channel::<Result<RecordBatch, DataFusionError>>(2);

    std::thread::spawn(move || {
        let mut read_and_send = || -> Result<(), DataFusionError> {
            let mut cursor = VcfScanCursor::new(file_path.clone());
            cursor.open()?;
            let mut buffer = RecordBuffer::default();
            let mut remaining = limit.unwrap_or(usize::MAX);
            let mut batch_num = 0usize;

            while remaining > 0 {
                let batch =
                    cursor.pull_batch(&mut buffer, &resolved_schema, batch_size.min(remaining))?;
                if batch.num_rows() == 0 {
                    break;
                }
                remaining -= batch.num_rows();
                batch_num += 1;
                let batch = match &projection {
                    Some(indices) => batch.project(indices)?,
                    None => batch,
                };
                if !send_batch(&mut tx, Ok(batch)) {
                    debug!("{file_path}: consumer dropped after {batch_num} batches");
                    return Ok(());
                }
            }

            debug!(
                "{file_path}: scan finished with {} records in {batch_num} batches",
                cursor.rows_read()
            );
            Ok(())
        };
        if let Err(e) = read_and_send() {
            send_batch(&mut tx, Err(e));
        }
    });

    Box::pin(RecordBatchStreamAdapter::new(schema_ref, rx))
}
