//! Bind-time resolution of requested INFO fields against the file header.

use crate::error::{Result, VcfScanError};
use crate::schema::ValueType;
use log::{debug, warn};
use noodles::vcf::Header;
use noodles::vcf::header::record::value::map::info::{Number, Type as InfoType};
use std::collections::HashSet;
use std::fmt;

/// What the header declares for an identifier.
///
/// INFO, FORMAT and FILTER identifiers share one dictionary in the header, so a
/// name can exist without being an INFO field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    /// `Type=Integer`
    Integer,
    /// `Type=Float`
    Float,
    /// `Type=Character`
    Character,
    /// `Type=String`
    String,
    /// `Type=Flag`
    Flag,
    /// Declared only as a FORMAT field
    FormatOnly,
    /// Declared only as a FILTER
    FilterOnly,
}

impl From<InfoType> for DeclaredType {
    fn from(ty: InfoType) -> Self {
        match ty {
            InfoType::Integer => DeclaredType::Integer,
            InfoType::Float => DeclaredType::Float,
            InfoType::Character => DeclaredType::Character,
            InfoType::String => DeclaredType::String,
            InfoType::Flag => DeclaredType::Flag,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeclaredType::Integer => "Integer",
            DeclaredType::Float => "Float",
            DeclaredType::Character => "Character",
            DeclaredType::String => "String",
            DeclaredType::Flag => "Flag",
            DeclaredType::FormatOnly => "FORMAT field",
            DeclaredType::FilterOnly => "FILTER",
        };
        f.write_str(s)
    }
}

impl DeclaredType {
    /// Output column type for this declaration, if it is supported
    pub fn value_type(self) -> Option<ValueType> {
        match self {
            DeclaredType::Integer => Some(ValueType::Int64),
            DeclaredType::Float => Some(ValueType::Float64),
            DeclaredType::Character | DeclaredType::String => Some(ValueType::Utf8),
            DeclaredType::Flag => Some(ValueType::Bool),
            DeclaredType::FormatOnly | DeclaredType::FilterOnly => None,
        }
    }
}

/// A requested INFO field that passed resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInfoField {
    /// Field identifier as declared in the header
    pub name: String,
    /// Output column type
    pub value_type: ValueType,
    /// Declared header type
    pub declared: DeclaredType,
    /// Declared `Number` in VCF notation (1, A, R, G, .)
    pub number: String,
    /// Declared `Description`
    pub description: String,
}

/// Converts INFO Number enum to VCF string representation
pub(crate) fn info_number_to_string(number: Number) -> String {
    match number {
        Number::Count(n) => n.to_string(),
        Number::AlternateBases => "A".to_string(),
        Number::ReferenceAlternateBases => "R".to_string(),
        Number::Samples => "G".to_string(),
        Number::Unknown => ".".to_string(),
    }
}

/// Looks up what the header declares for `name`.
///
/// Returns `None` when the identifier does not occur in the header at all.
pub fn lookup_info_field(header: &Header, name: &str) -> Option<DeclaredType> {
    if let Some(info) = header.infos().get(name) {
        return Some(DeclaredType::from(info.ty()));
    }
    if header.formats().contains_key(name) {
        return Some(DeclaredType::FormatOnly);
    }
    if header.filters().contains_key(name) {
        return Some(DeclaredType::FilterOnly);
    }
    None
}

/// Resolves requested INFO field names against the header, in request order.
///
/// Pure and idempotent: the same header and request list always produce the
/// same result.
///
/// # Errors
///
/// * [`VcfScanError::FieldNotFound`] if a name is not declared in the header
/// * [`VcfScanError::UnsupportedFieldType`] if a name has no supported INFO type
pub fn resolve(header: &Header, requested: &[String]) -> Result<Vec<ResolvedInfoField>> {
    requested
        .iter()
        .map(|name| {
            let declared =
                lookup_info_field(header, name).ok_or_else(|| VcfScanError::FieldNotFound {
                    name: name.clone(),
                })?;
            let value_type =
                declared
                    .value_type()
                    .ok_or_else(|| VcfScanError::UnsupportedFieldType {
                        name: name.clone(),
                        declared: declared.to_string(),
                    })?;
            let (number, description) = match header.infos().get(name.as_str()) {
                Some(info) => (
                    info_number_to_string(info.number()),
                    info.description().to_string(),
                ),
                None => (String::new(), String::new()),
            };
            debug!("Resolved INFO field {name} ({declared}) as {value_type:?}");
            Ok(ResolvedInfoField {
                name: name.clone(),
                value_type,
                declared,
                number,
                description,
            })
        })
        .collect()
}

/// Splits a comma-separated INFO column list into field names.
///
/// Names are trimmed and empty entries are dropped.
pub fn parse_info_columns(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drops repeated field names, keeping each at its first position
pub fn dedup_field_names(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(names.len());
    names
        .into_iter()
        .filter(|name| {
            let first = seen.insert(name.clone());
            if !first {
                warn!("INFO field '{name}' requested more than once; keeping the first");
            }
            first
        })
        .collect()
}
