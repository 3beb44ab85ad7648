/// Canonical result of extracting one field from one record.
///
/// `Absent` and `Null` both become an Arrow null. They stay distinct so that
/// "not present on this record" can be told apart from "present without a
/// usable value".
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The field does not occur on the record
    Absent,
    /// The field occurs but carries no usable value
    Null,
    /// Integer value
    Int64(i64),
    /// Floating point value
    Float64(f64),
    /// Text value
    Utf8(String),
    /// Boolean value
    Bool(bool),
}

impl FieldValue {
    /// Returns true for both `Absent` and `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Absent | FieldValue::Null)
    }

    /// Wraps an optional string. `None` and the empty string are `Null`.
    pub fn from_utf8(value: Option<String>) -> Self {
        value
            .filter(|s| !s.is_empty())
            .map_or(FieldValue::Null, FieldValue::Utf8)
    }
}
