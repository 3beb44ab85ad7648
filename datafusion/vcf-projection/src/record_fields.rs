//! Extraction of the seven fixed columns from one decoded record.

use crate::error::{Result, VcfScanError};
use crate::field_value::FieldValue;
use noodles::vcf::Header;
use noodles::vcf::variant::Record as VariantRecord;

/// Bit pattern BCF uses for a missing QUAL
const MISSING_QUALITY_BITS: u32 = 0x7F80_0001;

/// Fixed column values of one record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFields {
    /// Contig name
    pub chrom: String,
    /// 0-based; `-1` when the record carries no start
    pub pos: i64,
    /// Identifiers joined with `;`
    pub id: FieldValue,
    /// Reference allele
    pub ref_allele: FieldValue,
    /// Alternate alleles joined with `,`
    pub alt: FieldValue,
    /// Phred quality
    pub qual: FieldValue,
    /// Filter status
    pub filter: String,
}

/// Reads the fixed columns of `record`.
///
/// # Errors
///
/// Returns [`VcfScanError::CorruptRecord`] when the contig or a filter cannot
/// be resolved through the header, or a field fails to decode.
pub fn extract_record_fields(record: &dyn VariantRecord, header: &Header) -> Result<RecordFields> {
    Ok(RecordFields {
        chrom: extract_chrom(record, header)?,
        pos: extract_pos(record)?,
        id: extract_id(record),
        ref_allele: extract_ref(record)?,
        alt: extract_alt(record)?,
        qual: extract_qual(record)?,
        filter: extract_filter(record, header)?,
    })
}

fn extract_chrom(record: &dyn VariantRecord, header: &Header) -> Result<String> {
    record
        .reference_sequence_name(header)
        .map(str::to_string)
        .map_err(|e| VcfScanError::corrupt("Invalid contig", e))
}

fn extract_pos(record: &dyn VariantRecord) -> Result<i64> {
    match record.variant_start() {
        Some(Ok(position)) => Ok(position.get() as i64 - 1),
        Some(Err(e)) => Err(VcfScanError::corrupt("Invalid position", e)),
        None => Ok(-1),
    }
}

fn extract_id(record: &dyn VariantRecord) -> FieldValue {
    let ids = record.ids();
    let mut joined = String::new();
    for id in ids.iter().filter(|id| !id.is_empty() && *id != ".") {
        if !joined.is_empty() {
            joined.push(';');
        }
        joined.push_str(id);
    }
    FieldValue::from_utf8((!joined.is_empty()).then_some(joined))
}

fn extract_ref(record: &dyn VariantRecord) -> Result<FieldValue> {
    let bases = record
        .reference_bases()
        .iter()
        .collect::<std::io::Result<Vec<u8>>>()
        .map_err(|e| VcfScanError::corrupt("Invalid reference bases", e))?;
    if bases.is_empty() {
        return Ok(FieldValue::Null);
    }
    String::from_utf8(bases)
        .map(FieldValue::Utf8)
        .map_err(|e| VcfScanError::corrupt("Invalid reference bases", e))
}

fn extract_alt(record: &dyn VariantRecord) -> Result<FieldValue> {
    let alternate_bases = record.alternate_bases();
    let mut joined = String::new();
    for allele in alternate_bases.iter() {
        let allele = allele.map_err(|e| VcfScanError::corrupt("Invalid alternate bases", e))?;
        if allele.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push(',');
        }
        joined.push_str(allele);
    }
    if joined.is_empty() || joined == "." {
        Ok(FieldValue::Null)
    } else {
        Ok(FieldValue::Utf8(joined))
    }
}

fn extract_qual(record: &dyn VariantRecord) -> Result<FieldValue> {
    match record.quality_score() {
        Some(Ok(score)) if score.to_bits() == MISSING_QUALITY_BITS => Ok(FieldValue::Null),
        Some(Ok(score)) => Ok(FieldValue::Float64(f64::from(score))),
        Some(Err(e)) => Err(VcfScanError::corrupt("Invalid quality score", e)),
        None => Ok(FieldValue::Null),
    }
}

/// `PASS` when the record lists no filters, otherwise the filter names joined
/// with `;`.
fn extract_filter(record: &dyn VariantRecord, header: &Header) -> Result<String> {
    let filters = record.filters();
    let mut joined = String::new();
    for name in filters.iter(header) {
        let name = name.map_err(|e| VcfScanError::corrupt("Invalid filter", e))?;
        if name.is_empty() || name == "." {
            continue;
        }
        if !joined.is_empty() {
            joined.push(';');
        }
        joined.push_str(name);
    }
    if joined.is_empty() {
        joined.push_str("PASS");
    }
    Ok(joined)
}
