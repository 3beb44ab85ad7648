//! Coercion of a single INFO value into its output column type.
//!
//! Multi-valued fields contribute only their first element. A value whose
//! decoded shape does not match the column type becomes null.

use crate::error::{Result, VcfScanError};
use crate::field_value::FieldValue;
use crate::schema::{ColumnDescriptor, ValueType};
use noodles::vcf::Header;
use noodles::vcf::variant::Record as VariantRecord;
use noodles::vcf::variant::record::info::field::{Value, value::Array as ValueArray};
use std::io;

/// Produces the value of one INFO column for `record`.
///
/// * field absent from the record: [`FieldValue::Absent`]
/// * flag column with the field present: `true`, whatever the payload
/// * field present without a payload, or with an empty string:
///   [`FieldValue::Null`]
///
/// # Errors
///
/// Returns [`VcfScanError::CorruptRecord`] if the decoder rejects the value
/// of a non-flag column.
pub fn extract_info(
    record: &dyn VariantRecord,
    header: &Header,
    column: &ColumnDescriptor,
) -> Result<FieldValue> {
    let Some(key) = column.source_field_name.as_deref() else {
        return Ok(FieldValue::Absent);
    };

    let info = record.info();
    let value = match info.get(header, key) {
        None => return Ok(FieldValue::Absent),
        // a flag carrying a payload still counts as set
        Some(_) if column.value_type == ValueType::Bool => return Ok(FieldValue::Bool(true)),
        Some(result) => result.map_err(|e| corrupt_value(key, e))?,
    };

    match value {
        Some(value) => coerce(column.value_type, value, key),
        None => Ok(FieldValue::Null),
    }
}

fn coerce(value_type: ValueType, value: Value<'_>, key: &str) -> Result<FieldValue> {
    let coerced = match (value_type, value) {
        (ValueType::Int64, Value::Integer(n)) => FieldValue::Int64(i64::from(n)),
        (ValueType::Int64, Value::Array(ValueArray::Integer(values))) => {
            first_value(values.iter(), key)?.map_or(FieldValue::Null, |n| {
                FieldValue::Int64(i64::from(n))
            })
        }
        (ValueType::Float64, Value::Float(f)) => FieldValue::Float64(f64::from(f)),
        (ValueType::Float64, Value::Array(ValueArray::Float(values))) => {
            first_value(values.iter(), key)?.map_or(FieldValue::Null, |f| {
                FieldValue::Float64(f64::from(f))
            })
        }
        (ValueType::Utf8, Value::String(s)) => FieldValue::from_utf8(Some(s.to_string())),
        (ValueType::Utf8, Value::Character(c)) => FieldValue::from_utf8(Some(c.to_string())),
        (ValueType::Utf8, Value::Array(ValueArray::String(values))) => {
            FieldValue::from_utf8(first_value(values.iter(), key)?.map(|s| s.to_string()))
        }
        (ValueType::Utf8, Value::Array(ValueArray::Character(values))) => {
            FieldValue::from_utf8(first_value(values.iter(), key)?.map(|c| c.to_string()))
        }
        (ValueType::Bool, _) => FieldValue::Bool(true),
        _ => FieldValue::Null,
    };
    Ok(coerced)
}

/// First element of a multi-valued field; `None` when it is missing
fn first_value<T, I>(mut values: I, key: &str) -> Result<Option<T>>
where
    I: Iterator<Item = io::Result<Option<T>>>,
{
    match values.next() {
        Some(result) => result.map_err(|e| corrupt_value(key, e)),
        None => Ok(None),
    }
}

fn corrupt_value(key: &str, err: io::Error) -> VcfScanError {
    VcfScanError::corrupt(&format!("Invalid value for INFO field {key}"), err)
}
