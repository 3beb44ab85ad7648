//! Generic bioinformatics metadata handling for Arrow schemas
//!
//! This module provides standardized metadata key constants and serialization
//! utilities for storing variant file headers in Arrow schema metadata.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Generic Metadata Keys
// ============================================================================

/// Coordinate system: "true" = 0-based start positions, "false" = 1-based
pub const COORDINATE_SYSTEM_METADATA_KEY: &str = "bio.coordinate_system_zero_based";

/// Source file path the schema was resolved from
pub const BIO_SOURCE_URI_KEY: &str = "bio.source_uri";

// ============================================================================
// VCF-Specific Metadata Keys
// ============================================================================

// Schema-level metadata

/// VCF file format version (e.g., "VCFv4.3") stored in schema metadata
pub const VCF_FILE_FORMAT_KEY: &str = "bio.vcf.file_format";

/// VCF FILTER definitions stored as JSON array of FilterMetadata
pub const VCF_FILTERS_KEY: &str = "bio.vcf.filters";

/// VCF CONTIG definitions stored as JSON array of ContigMetadata
pub const VCF_CONTIGS_KEY: &str = "bio.vcf.contigs";

// Field-level metadata

/// VCF field description stored in field metadata
pub const VCF_FIELD_DESCRIPTION_KEY: &str = "bio.vcf.field.description";

/// VCF field type (Integer, Float, String, Character, Flag) stored in field metadata
pub const VCF_FIELD_TYPE_KEY: &str = "bio.vcf.field.type";

/// VCF field number (1, A, R, G, .) stored in field metadata
pub const VCF_FIELD_NUMBER_KEY: &str = "bio.vcf.field.number";

/// VCF field type category (INFO) stored in field metadata
pub const VCF_FIELD_FIELD_TYPE_KEY: &str = "bio.vcf.field.field_type";

// ============================================================================
// Shared Metadata Structures
// ============================================================================

/// FILTER definition from a variant header
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FilterMetadata {
    /// Filter ID (e.g., "PASS", "LowQual")
    pub id: String,
    /// Filter description
    pub description: String,
}

/// Contig/reference sequence definition from a variant header
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContigMetadata {
    /// Contig/chromosome ID (e.g., "chr1", "1")
    pub id: String,
    /// Contig length in base pairs (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    /// Additional metadata key-value pairs
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub metadata: HashMap<String, String>,
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Serialize a value to JSON string, returning empty string on failure
pub fn to_json_string<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::new())
}
