use std::fmt;

/// Column types a record schema can declare.
///
/// The name mapping is closed in both directions: every variant has exactly
/// one canonical spelling, and spellings this build does not recognize fold
/// into [`FieldType::Unknown`] rather than failing the read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    FixedDecimal,
    Float,
    Double,
    String,
    WString,
    VString,
    VWString,
    Date,
    Time,
    DateTime,
    Blob,
    SpatialObj,
    Unknown,
}

impl FieldType {
    pub const ALL: [FieldType; 18] = [
        FieldType::Bool,
        FieldType::Byte,
        FieldType::Int16,
        FieldType::Int32,
        FieldType::Int64,
        FieldType::FixedDecimal,
        FieldType::Float,
        FieldType::Double,
        FieldType::String,
        FieldType::WString,
        FieldType::VString,
        FieldType::VWString,
        FieldType::Date,
        FieldType::Time,
        FieldType::DateTime,
        FieldType::Blob,
        FieldType::SpatialObj,
        FieldType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Bool => "Bool",
            FieldType::Byte => "Byte",
            FieldType::Int16 => "Int16",
            FieldType::Int32 => "Int32",
            FieldType::Int64 => "Int64",
            FieldType::FixedDecimal => "FixedDecimal",
            FieldType::Float => "Float",
            FieldType::Double => "Double",
            FieldType::String => "String",
            FieldType::WString => "WString",
            FieldType::VString => "V_String",
            FieldType::VWString => "V_WString",
            FieldType::Date => "Date",
            FieldType::Time => "Time",
            FieldType::DateTime => "DateTime",
            FieldType::Blob => "Blob",
            FieldType::SpatialObj => "SpatialObj",
            FieldType::Unknown => "Unknown",
        }
    }

    pub fn from_name(name: &str) -> FieldType {
        match name {
            "Bool" => FieldType::Bool,
            "Byte" => FieldType::Byte,
            "Int16" => FieldType::Int16,
            "Int32" => FieldType::Int32,
            "Int64" => FieldType::Int64,
            "FixedDecimal" => FieldType::FixedDecimal,
            "Float" => FieldType::Float,
            "Double" => FieldType::Double,
            "String" => FieldType::String,
            "WString" => FieldType::WString,
            "V_String" => FieldType::VString,
            "V_WString" => FieldType::VWString,
            "Date" => FieldType::Date,
            "Time" => FieldType::Time,
            "DateTime" => FieldType::DateTime,
            "Blob" => FieldType::Blob,
            "SpatialObj" => FieldType::SpatialObj,
            _ => FieldType::Unknown,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
