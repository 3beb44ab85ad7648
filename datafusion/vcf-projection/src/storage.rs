//! Local file access for variant files: compression and format sniffing, and
//! a single reader type over VCF text and BCF.

use crate::error::{Result, VcfScanError};
use crate::header_resolver::{DeclaredType, info_number_to_string};
use datafusion::arrow::array::{ArrayRef, RecordBatch, StringBuilder};
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use flate2::read::MultiGzDecoder;
use log::debug;
use noodles::bcf;
use noodles::vcf::{self, Header};
use noodles::vcf::variant::Record as VariantRecord;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::sync::Arc;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const BCF_MAGIC: &[u8] = b"BCF";

/// Decompressed byte stream handed to the decoders
pub type DecodedStream = BufReader<Box<dyn Read + Send>>;

/// Compression detected from the leading bytes of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    /// gzip or BGZF
    GZIP,
    /// Plain bytes
    NONE,
}

/// Record encoding detected after decompression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantFormat {
    /// Tab-delimited VCF text
    Vcf,
    /// Binary BCF
    Bcf,
}

/// Reader over either encoding. Records come back through the shared
/// [`VariantRecord`] trait so callers never branch on the format.
pub enum VariantReader {
    /// VCF text reader
    Vcf(vcf::io::Reader<DecodedStream>),
    /// BCF reader
    Bcf(bcf::io::Reader<DecodedStream>),
}

impl fmt::Debug for VariantReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VariantReader").field(&self.format()).finish()
    }
}

/// Reusable record storage for [`VariantReader::read_next`].
///
/// Keeps one slot per encoding so a scan does not allocate a record per row.
#[derive(Default)]
pub struct RecordBuffer {
    vcf: vcf::Record,
    bcf: bcf::Record,
}

impl VariantReader {
    /// Encoding of the underlying file
    pub fn format(&self) -> VariantFormat {
        match self {
            VariantReader::Vcf(_) => VariantFormat::Vcf,
            VariantReader::Bcf(_) => VariantFormat::Bcf,
        }
    }

    /// Reads the header. Must be called once before any record is read.
    pub fn read_header(&mut self) -> io::Result<Header> {
        match self {
            VariantReader::Vcf(reader) => reader.read_header(),
            VariantReader::Bcf(reader) => reader.read_header(),
        }
    }

    /// Decodes the next record into `buffer`.
    ///
    /// Returns `Ok(None)` at end of input.
    pub fn read_next<'b>(
        &mut self,
        buffer: &'b mut RecordBuffer,
    ) -> io::Result<Option<&'b dyn VariantRecord>> {
        match self {
            VariantReader::Vcf(reader) => match reader.read_record(&mut buffer.vcf)? {
                0 => Ok(None),
                _ => Ok(Some(&buffer.vcf as &dyn VariantRecord)),
            },
            VariantReader::Bcf(reader) => match reader.read_record(&mut buffer.bcf)? {
                0 => Ok(None),
                _ => Ok(Some(&buffer.bcf as &dyn VariantRecord)),
            },
        }
    }
}

/// Detects the compression of a buffered stream without consuming it
pub fn get_compression_type<R: BufRead>(reader: &mut R) -> io::Result<CompressionType> {
    let buf = reader.fill_buf()?;
    if buf.starts_with(&GZIP_MAGIC) {
        Ok(CompressionType::GZIP)
    } else {
        Ok(CompressionType::NONE)
    }
}

/// Detects the record encoding of a decompressed stream without consuming it
pub fn get_variant_format<R: BufRead>(reader: &mut R) -> io::Result<VariantFormat> {
    let buf = reader.fill_buf()?;
    if buf.starts_with(BCF_MAGIC) {
        Ok(VariantFormat::Bcf)
    } else {
        Ok(VariantFormat::Vcf)
    }
}

/// Opens a local variant file and reads its header.
///
/// # Errors
///
/// * [`VcfScanError::FileOpen`] if the file cannot be opened
/// * [`VcfScanError::HeaderRead`] if the stream cannot be sniffed or the
///   header does not parse
pub fn open_local_variant_file(file_path: &str) -> Result<(VariantReader, Header)> {
    let file = File::open(file_path).map_err(|source| VcfScanError::FileOpen {
        path: file_path.to_string(),
        source,
    })?;
    let header_error = |source: io::Error| VcfScanError::HeaderRead {
        path: file_path.to_string(),
        source,
    };

    let mut raw = BufReader::new(file);
    let compression = get_compression_type(&mut raw).map_err(header_error)?;
    let inner: Box<dyn Read + Send> = match compression {
        CompressionType::GZIP => Box::new(MultiGzDecoder::new(raw)),
        CompressionType::NONE => Box::new(raw),
    };
    let mut stream: DecodedStream = BufReader::new(inner);
    let format = get_variant_format(&mut stream).map_err(header_error)?;
    debug!("Opened {file_path} as {format:?} with compression {compression:?}");

    let mut reader = match format {
        VariantFormat::Vcf => VariantReader::Vcf(vcf::io::Reader::new(stream)),
        VariantFormat::Bcf => VariantReader::Bcf(bcf::io::Reader::from(stream)),
    };
    let header = reader.read_header().map_err(header_error)?;
    Ok((reader, header))
}

/// Reads only the header of a local variant file
pub fn get_local_variant_header(file_path: &str) -> Result<Header> {
    open_local_variant_file(file_path).map(|(_, header)| header)
}

/// Lists the INFO fields declared in `header`.
///
/// Columns: `name`, `number`, `type`, `description`, and `column_type`, the
/// Arrow type an INFO column for the field would get.
pub fn get_info_fields(header: &Header) -> datafusion::common::Result<RecordBatch> {
    let mut names = StringBuilder::new();
    let mut numbers = StringBuilder::new();
    let mut types = StringBuilder::new();
    let mut descriptions = StringBuilder::new();
    let mut column_types = StringBuilder::new();

    for (name, info) in header.infos() {
        let declared = DeclaredType::from(info.ty());
        names.append_value(name);
        numbers.append_value(info_number_to_string(info.number()));
        types.append_value(declared.to_string());
        descriptions.append_value(info.description());
        column_types.append_option(declared.value_type().map(|t| t.data_type().to_string()));
    }

    let schema = Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("number", DataType::Utf8, false),
        Field::new("type", DataType::Utf8, false),
        Field::new("description", DataType::Utf8, false),
        Field::new("column_type", DataType::Utf8, true),
    ]);
    let columns: Vec<ArrayRef> = vec![
        Arc::new(names.finish()),
        Arc::new(numbers.finish()),
        Arc::new(types.finish()),
        Arc::new(descriptions.finish()),
        Arc::new(column_types.finish()),
    ];
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}
