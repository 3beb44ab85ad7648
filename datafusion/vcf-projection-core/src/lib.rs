//! Core utilities for the DataFusion VCF projection table provider
//!
//! This crate holds the format-agnostic pieces shared by the projection engine:
//!
//! - **Metadata**: Arrow schema/field metadata keys and JSON helpers used to carry
//!   header information alongside the projected columns
//! - **Table Utilities**: an incremental, fixed-capacity columnar batch builder
//! - **Test Utilities**: assertions over DataFusion physical plans
//!
//! ## Modules
//!
//! - [`metadata`]: metadata keys, header metadata structures, JSON helpers
//! - [`table_utils`]: [`table_utils::BatchBuilder`] for building `RecordBatch`es row by row

#![warn(missing_docs)]

/// Bioinformatics metadata key constants and utilities
pub mod metadata;
/// Table utilities for building DataFusion record batches
pub mod table_utils;
/// Shared test utilities for projection pushdown and execution plan analysis
pub mod test_utils;

pub use metadata::{COORDINATE_SYSTEM_METADATA_KEY, to_json_string};
