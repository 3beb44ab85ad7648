use crate::error::VcfScanError;
use crate::header_resolver::{dedup_field_names, resolve};
use crate::physical_exec::VcfExec;
use crate::schema::{ResolvedSchema, fixed_columns};
use crate::storage::get_local_variant_header;
use async_trait::async_trait;
use datafusion::arrow::datatypes::SchemaRef;
use datafusion::catalog::{Session, TableProvider};
use datafusion::datasource::TableType;
use datafusion::logical_expr::Expr;
use datafusion::physical_expr::{EquivalenceProperties, Partitioning};
use datafusion::physical_plan::{
    ExecutionPlan, PlanProperties,
    execution_plan::{Boundedness, EmissionType},
};
use datafusion_vcf_projection_core::COORDINATE_SYSTEM_METADATA_KEY;
use datafusion_vcf_projection_core::metadata::{
    BIO_SOURCE_URI_KEY, ContigMetadata, FilterMetadata, VCF_CONTIGS_KEY, VCF_FILE_FORMAT_KEY,
    VCF_FILTERS_KEY, to_json_string,
};
use log::debug;
use noodles::vcf::Header;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Schema-level metadata describing the file the table was bound to
fn header_metadata(header: &Header, file_path: &str) -> HashMap<String, String> {
    let file_format = header.file_format();
    let filters: Vec<FilterMetadata> = header
        .filters()
        .iter()
        .map(|(id, filter)| FilterMetadata {
            id: id.to_string(),
            description: filter.description().to_string(),
        })
        .collect();
    let contigs: Vec<ContigMetadata> = header
        .contigs()
        .iter()
        .map(|(id, contig)| ContigMetadata {
            id: id.to_string(),
            length: contig.length().map(|l| l as u64),
            metadata: HashMap::new(),
        })
        .collect();

    let mut metadata = HashMap::new();
    metadata.insert(
        COORDINATE_SYSTEM_METADATA_KEY.to_string(),
        "true".to_string(),
    );
    metadata.insert(
        VCF_FILE_FORMAT_KEY.to_string(),
        format!("VCFv{}.{}", file_format.major(), file_format.minor()),
    );
    metadata.insert(BIO_SOURCE_URI_KEY.to_string(), file_path.to_string());
    metadata.insert(VCF_FILTERS_KEY.to_string(), to_json_string(&filters));
    metadata.insert(VCF_CONTIGS_KEY.to_string(), to_json_string(&contigs));
    metadata
}

/// Reads the header of `file_path` and resolves the requested INFO fields
/// against it. No records are read.
///
/// # Errors
///
/// Any [`VcfScanError`] raised while opening the file, reading its header or
/// resolving a field.
pub fn determine_schema_from_header(
    file_path: &str,
    info_fields: &[String],
) -> Result<ResolvedSchema, VcfScanError> {
    let header = get_local_variant_header(file_path)?;
    let resolved = resolve(&header, info_fields)?;
    debug!(
        "Resolved {} INFO columns for {}",
        resolved.len(),
        file_path
    );
    Ok(ResolvedSchema::build(fixed_columns(), &resolved)
        .with_metadata(header_metadata(&header, file_path)))
}

/// A DataFusion table provider over one local VCF or BCF file.
///
/// The schema is fixed when the provider is created: seven variant columns
/// followed by one `info_<NAME>` column per requested INFO field. Scans
/// support projection and LIMIT pushdown.
#[derive(Clone, Debug)]
pub struct VcfTableProvider {
    file_path: String,
    info_fields: Vec<String>,
    resolved_schema: Arc<ResolvedSchema>,
}

impl VcfTableProvider {
    /// Binds a provider to `file_path`.
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to a VCF, gzip/BGZF-compressed VCF, or BCF file
    /// * `info_fields` - INFO fields to expose as columns, in output order.
    ///   Repeated names are kept once.
    ///
    /// # Errors
    ///
    /// Fails when the header cannot be read or a requested field is missing
    /// from it or has an unsupported type.
    pub fn new(
        file_path: String,
        info_fields: Option<Vec<String>>,
    ) -> datafusion::common::Result<Self> {
        let info_fields = dedup_field_names(info_fields.unwrap_or_default());
        let resolved_schema = determine_schema_from_header(&file_path, &info_fields)?;
        Ok(Self {
            file_path,
            info_fields,
            resolved_schema: Arc::new(resolved_schema),
        })
    }

    /// Path the provider was bound to
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// INFO fields backing the `info_` columns, in column order
    pub fn info_fields(&self) -> &[String] {
        &self.info_fields
    }

    /// Column model shared by every scan of this table
    pub fn resolved_schema(&self) -> &Arc<ResolvedSchema> {
        &self.resolved_schema
    }
}

#[async_trait]
impl TableProvider for VcfTableProvider {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn schema(&self) -> SchemaRef {
        self.resolved_schema.arrow_schema()
    }

    fn table_type(&self) -> TableType {
        TableType::Base
    }

    async fn scan(
        &self,
        _state: &dyn Session,
        projection: Option<&Vec<usize>>,
        _filters: &[Expr],
        limit: Option<usize>,
    ) -> datafusion::common::Result<Arc<dyn ExecutionPlan>> {
        debug!(
            "VcfTableProvider::scan {} projection={:?} limit={:?}",
            self.file_path, projection, limit
        );
        let table_schema = self.schema();
        let schema = match projection {
            Some(indices) => Arc::new(table_schema.project(indices)?),
            None => table_schema,
        };

        Ok(Arc::new(VcfExec {
            cache: PlanProperties::new(
                EquivalenceProperties::new(schema.clone()),
                Partitioning::UnknownPartitioning(1),
                EmissionType::Incremental,
                Boundedness::Bounded,
            ),
            file_path: self.file_path.clone(),
            resolved_schema: Arc::clone(&self.resolved_schema),
            schema,
            projection: projection.cloned(),
            limit,
        }))
    }
}
