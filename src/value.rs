//! Per-type field value codecs.
//!
//! Every implemented type follows the same convention: a fixed-width value
//! layout followed by a single null-indicator byte, zero when the value is
//! present and non-zero when the cell is NULL.  Types without a codec fail
//! at lookup time, so adding one never touches the framing layer.

use byteorder::{LittleEndian, WriteBytesExt};

use crate::cursor::ByteReader;
use crate::error::YxdbError;
use crate::field::FieldType;

/// One decoded cell value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Double(f64),
}

pub trait ValueCodec {
    fn field_type(&self) -> FieldType;

    /// Serialized width of one cell, null indicator included.
    fn encoded_size(&self) -> usize;

    /// `None` encodes a NULL cell.
    fn encode(&self, value: Option<&FieldValue>, out: &mut Vec<u8>) -> Result<(), YxdbError>;

    /// `None` means the cell's null indicator was set.
    fn decode(&self, r: &mut ByteReader<'_>) -> Result<Option<FieldValue>, YxdbError>;
}

/// Look up the codec for `field_type`.
pub fn get_value_codec(field_type: FieldType) -> Result<&'static dyn ValueCodec, YxdbError> {
    match field_type {
        FieldType::Double => Ok(&DoubleCodec),
        other => Err(YxdbError::Unimplemented(other)),
    }
}

/// IEEE-754 double: 8 bytes little-endian plus the null indicator.
pub struct DoubleCodec;

impl ValueCodec for DoubleCodec {
    fn field_type(&self) -> FieldType {
        FieldType::Double
    }

    fn encoded_size(&self) -> usize {
        9
    }

    fn encode(&self, value: Option<&FieldValue>, out: &mut Vec<u8>) -> Result<(), YxdbError> {
        match value {
            Some(FieldValue::Double(x)) => {
                out.write_u64::<LittleEndian>(x.to_bits())?;
                out.write_u8(0)?;
            }
            None => {
                out.write_u64::<LittleEndian>(0)?;
                out.write_u8(1)?;
            }
        }
        Ok(())
    }

    fn decode(&self, r: &mut ByteReader<'_>) -> Result<Option<FieldValue>, YxdbError> {
        let bits = r.u64_le("double value")?;
        let null_indicator = r.u8("double null indicator")?;
        if null_indicator != 0 {
            return Ok(None);
        }
        Ok(Some(FieldValue::Double(f64::from_bits(bits))))
    }
}
