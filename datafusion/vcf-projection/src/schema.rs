//! Output column model: the fixed variant columns followed by one column per
//! resolved INFO field.

use crate::header_resolver::ResolvedInfoField;
use datafusion::arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use datafusion_vcf_projection_core::metadata::{
    VCF_FIELD_DESCRIPTION_KEY, VCF_FIELD_FIELD_TYPE_KEY, VCF_FIELD_NUMBER_KEY,
    VCF_FIELD_TYPE_KEY,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Prefix of every INFO column name. The field identifier keeps its case.
pub const INFO_COLUMN_PREFIX: &str = "info_";

/// Number of fixed columns preceding the INFO columns
pub const FIXED_COLUMN_COUNT: usize = 7;

/// Where a column's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Contig name
    Chrom,
    /// 0-based start position
    Pos,
    /// Variant identifiers
    Id,
    /// Reference allele
    Ref,
    /// Alternate alleles
    Alt,
    /// Phred quality
    Qual,
    /// Filter status
    Filter,
    /// One INFO field
    Info,
}

/// Logical value type of an output column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// 64-bit signed integer
    Int64,
    /// 64-bit float
    Float64,
    /// UTF-8 string
    Utf8,
    /// Boolean
    Bool,
}

impl ValueType {
    /// Arrow type used for this value type
    pub fn data_type(self) -> DataType {
        match self {
            ValueType::Int64 => DataType::Int64,
            ValueType::Float64 => DataType::Float64,
            ValueType::Utf8 => DataType::Utf8,
            ValueType::Bool => DataType::Boolean,
        }
    }
}

/// One output column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Output column name
    pub name: String,
    /// Value source
    pub kind: ColumnKind,
    /// INFO field identifier, present only for [`ColumnKind::Info`]
    pub source_field_name: Option<String>,
    /// Logical value type
    pub value_type: ValueType,
}

impl ColumnDescriptor {
    fn fixed(name: &str, kind: ColumnKind, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            kind,
            source_field_name: None,
            value_type,
        }
    }

    /// Builds the column for a resolved INFO field
    pub fn info(field: &ResolvedInfoField) -> Self {
        Self {
            name: format!("{INFO_COLUMN_PREFIX}{}", field.name),
            kind: ColumnKind::Info,
            source_field_name: Some(field.name.clone()),
            value_type: field.value_type,
        }
    }

    /// Every variant has a contig, a position and a filter status.
    pub fn nullable(&self) -> bool {
        !matches!(
            self.kind,
            ColumnKind::Chrom | ColumnKind::Pos | ColumnKind::Filter
        )
    }
}

/// The seven fixed columns in canonical order
pub fn fixed_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::fixed("chrom", ColumnKind::Chrom, ValueType::Utf8),
        ColumnDescriptor::fixed("pos", ColumnKind::Pos, ValueType::Int64),
        ColumnDescriptor::fixed("id", ColumnKind::Id, ValueType::Utf8),
        ColumnDescriptor::fixed("ref", ColumnKind::Ref, ValueType::Utf8),
        ColumnDescriptor::fixed("alt", ColumnKind::Alt, ValueType::Utf8),
        ColumnDescriptor::fixed("qual", ColumnKind::Qual, ValueType::Float64),
        ColumnDescriptor::fixed("filter", ColumnKind::Filter, ValueType::Utf8),
    ]
}

/// Ordered column list plus its Arrow schema.
///
/// Built once at bind time and shared read-only by every scan of the table.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    columns: Vec<ColumnDescriptor>,
    arrow_schema: SchemaRef,
}

impl ResolvedSchema {
    /// Appends one INFO column per resolved field, in resolution order, to the
    /// fixed columns.
    pub fn build(fixed: Vec<ColumnDescriptor>, info_fields: &[ResolvedInfoField]) -> Self {
        let mut columns = fixed;
        let mut fields: Vec<Field> = columns
            .iter()
            .map(|c| Field::new(&c.name, c.value_type.data_type(), c.nullable()))
            .collect();

        for info in info_fields {
            let column = ColumnDescriptor::info(info);
            let mut field_metadata = HashMap::new();
            field_metadata.insert(
                VCF_FIELD_DESCRIPTION_KEY.to_string(),
                info.description.clone(),
            );
            field_metadata.insert(VCF_FIELD_TYPE_KEY.to_string(), info.declared.to_string());
            field_metadata.insert(VCF_FIELD_NUMBER_KEY.to_string(), info.number.clone());
            field_metadata.insert(VCF_FIELD_FIELD_TYPE_KEY.to_string(), "INFO".to_string());
            fields.push(
                Field::new(&column.name, column.value_type.data_type(), true)
                    .with_metadata(field_metadata),
            );
            columns.push(column);
        }

        Self {
            columns,
            arrow_schema: Arc::new(Schema::new(fields)),
        }
    }

    /// Attaches schema-level metadata
    pub fn with_metadata(self, metadata: HashMap<String, String>) -> Self {
        let schema = self.arrow_schema.as_ref().clone().with_metadata(metadata);
        Self {
            columns: self.columns,
            arrow_schema: Arc::new(schema),
        }
    }

    /// All columns in output order
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// The INFO columns, in request order
    pub fn info_columns(&self) -> &[ColumnDescriptor] {
        &self.columns[FIXED_COLUMN_COUNT.min(self.columns.len())..]
    }

    /// Whether records need their INFO block decoded
    pub fn has_info_columns(&self) -> bool {
        self.columns.len() > FIXED_COLUMN_COUNT
    }

    /// Arrow schema of the full table
    pub fn arrow_schema(&self) -> SchemaRef {
        Arc::clone(&self.arrow_schema)
    }
}
