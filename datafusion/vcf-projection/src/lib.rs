//! Projection of VCF/BCF files into Apache DataFusion tables
//!
//! This crate exposes a single local variant file as a DataFusion table whose
//! columns are the fixed variant fields plus a caller-chosen set of INFO fields,
//! each coerced to one scalar Arrow type.
//!
//! # Features
//!
//! - Plain VCF text, gzip/BGZF-compressed VCF and BCF, detected from file content
//! - INFO fields resolved against the header when the table is bound
//! - Projection and LIMIT pushdown
//! - `read_vcf(path [, info_cols])` table function for SQL
//!
//! # Schema
//!
//! **Fixed columns:** chrom, pos (0-based), id, ref, alt, qual, filter
//!
//! **INFO columns:** `info_<NAME>`, one per requested field, with the field
//! name's case preserved. Integer maps to Int64, Float to Float64, String and
//! Character to Utf8, Flag to Boolean. Multi-valued fields keep their first
//! element.
//!
//! # Example
//!
//! ```rust,no_run
//! use datafusion::prelude::*;
//! use datafusion_vcf_projection::register_read_vcf;
//! use datafusion_vcf_projection::table_provider::VcfTableProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> datafusion::error::Result<()> {
//! let ctx = SessionContext::new();
//!
//! let table = VcfTableProvider::new(
//!     "data/variants.vcf.gz".to_string(),
//!     Some(vec!["DP".to_string(), "AF".to_string()]),
//! )?;
//! ctx.register_table("variants", Arc::new(table))?;
//! ctx.sql("SELECT chrom, pos, info_DP FROM variants LIMIT 10")
//!     .await?
//!     .show()
//!     .await?;
//!
//! register_read_vcf(&ctx);
//! ctx.sql("SELECT count(*) FROM read_vcf('data/variants.vcf.gz', 'DP')")
//!     .await?
//!     .show()
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Batch producer that owns one open file
pub mod cursor;
/// Error type shared by binding and scanning
pub mod error;
/// Decoded value of a single field
pub mod field_value;
/// Requested INFO field resolution against the header
pub mod header_resolver;
/// INFO value coercion
pub mod info_coercer;
/// Physical execution plan implementation for VCF scans.
mod physical_exec;
/// Fixed column extraction
pub mod record_fields;
/// Output column model
pub mod schema;
/// Storage layer: compression and format detection, decoder access
pub mod storage;
/// `read_vcf` table function
pub mod table_function;
/// DataFusion table provider implementation for VCF files.
pub mod table_provider;

#[cfg(test)]
mod test_fixtures;

pub use cursor::{CursorState, DEFAULT_BATCH_CAPACITY, VcfScanCursor};
pub use error::VcfScanError;
pub use field_value::FieldValue;
pub use physical_exec::VcfExec;
pub use schema::{ColumnDescriptor, ColumnKind, ResolvedSchema, ValueType};
pub use table_function::{ReadVcfFunction, register_read_vcf};
pub use table_provider::VcfTableProvider;
