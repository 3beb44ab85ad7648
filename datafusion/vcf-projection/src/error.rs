//! Error taxonomy for resolving and scanning variant files

use datafusion::common::DataFusionError;
use std::io;
use thiserror::Error;

/// Errors raised while binding or scanning a VCF/BCF file.
///
/// None of these are retried: they describe malformed input or a request the
/// header cannot satisfy.
#[derive(Debug, Error)]
pub enum VcfScanError {
    /// The file could not be opened
    #[error("Could not open VCF file: {path}: {source}")]
    FileOpen {
        /// Path of the file
        path: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The file was opened but its header could not be decoded
    #[error("Could not read VCF header: {path}: {source}")]
    HeaderRead {
        /// Path of the file
        path: String,
        /// Underlying decode error
        #[source]
        source: io::Error,
    },
    /// A requested INFO field is not declared in the header
    #[error("INFO field not found in header: {name}")]
    FieldNotFound {
        /// Requested field name
        name: String,
    },
    /// A requested INFO field has no supported declared type
    #[error("Unsupported INFO field type for: {name} (declared as {declared})")]
    UnsupportedFieldType {
        /// Requested field name
        name: String,
        /// What the header declares for the name
        declared: String,
    },
    /// A record is structurally invalid
    #[error("Corrupt VCF record: {message}")]
    CorruptRecord {
        /// What could not be decoded
        message: String,
    },
    /// `pull_batch` was called before `open`
    #[error("VCF scan of {path} has not been opened")]
    NotOpened {
        /// Path of the file
        path: String,
    },
    /// `pull_batch` was called after an earlier error aborted the scan
    #[error("VCF scan of {path} was aborted by an earlier error")]
    ScanAborted {
        /// Path of the file
        path: String,
    },
}

impl VcfScanError {
    pub(crate) fn corrupt(context: &str, err: impl std::fmt::Display) -> Self {
        Self::CorruptRecord {
            message: format!("{context}: {err}"),
        }
    }
}

impl From<VcfScanError> for DataFusionError {
    fn from(err: VcfScanError) -> Self {
        DataFusionError::External(Box::new(err))
    }
}

/// Result alias for fallible engine operations
pub type Result<T> = std::result::Result<T, VcfScanError>;
