//! Record schema metadata: XML in UTF-16LE.
//!
//! # On-disk form
//! The metadata section is an XML document
//!
//! ```text
//! <MetaInfo>
//!   <RecordInfo>
//!     <Field name="..." type="..." [size="..."] [scale="..."] />
//!     ...
//!   </RecordInfo>
//!   ...
//! </MetaInfo>
//! ```
//!
//! rendered without declaration or doctype, followed by a literal newline
//! and a NUL, then encoded as UTF-16LE with no BOM.  The header's
//! `meta_info_length` counts UTF-16 code units, so the section is always an
//! even number of bytes.
//!
//! # Tolerance
//! Readers preserve record and field order, fold unrecognized `type`
//! spellings into [`FieldType::Unknown`], and ignore attributes they do not
//! know (`description` among them).  Malformed `size`/`scale` values are an
//! error; so is a window missing its trailing sentinels.

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::cursor::ByteReader;
use crate::error::YxdbError;
use crate::field::FieldType;

/// One named, typed column descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub size: Option<u32>,
    pub scale: Option<u32>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self { name: name.into(), field_type, size: None, scale: None }
    }
}

/// The schema for one record stream: an ordered field list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordInfo {
    pub fields: Vec<Field>,
}

/// The full metadata section: one or more record schemas, order preserving.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetaInfo {
    pub records: Vec<RecordInfo>,
}

fn xml_err(err: impl ToString) -> YxdbError {
    YxdbError::XmlMalformed(err.to_string())
}

impl MetaInfo {
    // ── Encode ───────────────────────────────────────────────────────────────

    fn to_xml(&self) -> Result<String, YxdbError> {
        let mut writer = Writer::new(Vec::new());
        if self.records.is_empty() {
            writer
                .write_event(Event::Empty(BytesStart::new("MetaInfo")))
                .map_err(xml_err)?;
        } else {
            writer
                .write_event(Event::Start(BytesStart::new("MetaInfo")))
                .map_err(xml_err)?;
            for record in &self.records {
                if record.fields.is_empty() {
                    writer
                        .write_event(Event::Empty(BytesStart::new("RecordInfo")))
                        .map_err(xml_err)?;
                    continue;
                }
                writer
                    .write_event(Event::Start(BytesStart::new("RecordInfo")))
                    .map_err(xml_err)?;
                for field in &record.fields {
                    let mut element = BytesStart::new("Field");
                    element.push_attribute(("name", field.name.as_str()));
                    element.push_attribute(("type", field.field_type.as_str()));
                    if let Some(size) = field.size {
                        element.push_attribute(("size", size.to_string().as_str()));
                    }
                    if let Some(scale) = field.scale {
                        element.push_attribute(("scale", scale.to_string().as_str()));
                    }
                    writer.write_event(Event::Empty(element)).map_err(xml_err)?;
                }
                writer
                    .write_event(Event::End(BytesEnd::new("RecordInfo")))
                    .map_err(xml_err)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new("MetaInfo")))
                .map_err(xml_err)?;
        }
        String::from_utf8(writer.into_inner()).map_err(xml_err)
    }

    /// Render the XML, append the newline and NUL sentinels, and encode the
    /// whole text as UTF-16LE.  The result is always an even number of bytes
    /// and `meta_info_length` is exactly half of it.
    pub fn to_bytes(&self) -> Result<Vec<u8>, YxdbError> {
        let text = self.to_xml()?;
        let mut out = Vec::with_capacity(2 * (text.len() + 2));
        for unit in text.encode_utf16().chain([0x000Au16, 0x0000]) {
            out.write_u16::<LittleEndian>(unit)?;
        }
        Ok(out)
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let bytes = self
            .to_bytes()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
        writer.write_all(&bytes)
    }

    /// Header value for this metadata: its length in UTF-16 code units.
    pub fn meta_info_length(&self) -> Result<u32, YxdbError> {
        Ok((self.to_bytes()?.len() / 2) as u32)
    }

    // ── Decode ───────────────────────────────────────────────────────────────

    /// Decode a metadata window.  Consumes the reader to its end: the window
    /// boundary is the caller's framing (`2 * meta_info_length` bytes).
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, YxdbError> {
        let window_start = r.offset();
        if r.remaining() < 4 {
            return Err(YxdbError::MetadataTruncated { offset: window_start });
        }
        let mut units = Vec::with_capacity(r.remaining() / 2);
        while !r.is_empty() {
            units.push(r.u16_le("metadata code unit")?);
        }
        let nul = units[units.len() - 1];
        let newline = units[units.len() - 2];
        if newline != 0x000A || nul != 0x0000 {
            return Err(YxdbError::MetadataTruncated { offset: window_start });
        }
        units.truncate(units.len() - 2);
        let text = String::from_utf16(&units).map_err(xml_err)?;
        Self::from_xml(&text)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, YxdbError> {
        Self::read(&mut ByteReader::new(bytes))
    }

    fn from_xml(text: &str) -> Result<Self, YxdbError> {
        let mut reader = Reader::from_str(text);
        let mut records: Vec<RecordInfo> = Vec::new();
        loop {
            match reader.read_event().map_err(xml_err)? {
                Event::Start(element) | Event::Empty(element) => {
                    match element.name().as_ref() {
                        b"RecordInfo" => records.push(RecordInfo::default()),
                        b"Field" => {
                            let field = parse_field(&element)?;
                            if let Some(record) = records.last_mut() {
                                record.fields.push(field);
                            }
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(Self { records })
    }
}

fn parse_field(element: &BytesStart<'_>) -> Result<Field, YxdbError> {
    let mut field = Field::new("", FieldType::Unknown);
    for attribute in element.attributes() {
        let attribute = attribute.map_err(xml_err)?;
        let value = attribute.unescape_value().map_err(xml_err)?;
        match attribute.key.as_ref() {
            b"name" => field.name = value.into_owned(),
            b"type" => field.field_type = FieldType::from_name(&value),
            b"size" => field.size = Some(parse_int("size", &value)?),
            b"scale" => field.scale = Some(parse_int("scale", &value)?),
            _ => {}
        }
    }
    Ok(field)
}

fn parse_int(attr: &'static str, value: &str) -> Result<u32, YxdbError> {
    value
        .parse()
        .map_err(|_| YxdbError::BadFieldAttribute { attr, value: value.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str) -> Vec<u8> {
        let mut out = Vec::new();
        for unit in text.encode_utf16() {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out
    }

    fn sample() -> MetaInfo {
        let mut amount = Field::new("amt", FieldType::FixedDecimal);
        amount.size = Some(19);
        amount.scale = Some(4);
        MetaInfo {
            records: vec![
                RecordInfo {
                    fields: vec![
                        Field::new("x", FieldType::Double),
                        Field::new("label", FieldType::VWString),
                        amount,
                    ],
                },
                RecordInfo { fields: vec![Field::new("when", FieldType::DateTime)] },
            ],
        }
    }

    #[test]
    fn round_trips_known_schemas() {
        let meta = sample();
        let bytes = meta.to_bytes().unwrap();
        assert_eq!(MetaInfo::from_bytes(&bytes).unwrap(), meta);
    }

    #[test]
    fn encoded_length_is_even_and_sentinel_terminated() {
        let bytes = sample().to_bytes().unwrap();
        assert_eq!(bytes.len() % 2, 0);
        assert_eq!(&bytes[bytes.len() - 4..], &[0x0A, 0x00, 0x00, 0x00]);
        assert_eq!(
            sample().meta_info_length().unwrap() as usize,
            bytes.len() / 2
        );
    }

    #[test]
    fn empty_meta_renders_self_closing() {
        let bytes = MetaInfo::default().to_bytes().unwrap();
        assert_eq!(bytes, utf16le("<MetaInfo/>\n\u{0}"));
        assert_eq!(MetaInfo::from_bytes(&bytes).unwrap(), MetaInfo::default());
    }

    #[test]
    fn size_and_scale_appear_as_decimal_attributes() {
        let text = String::from_utf16(
            &sample()
                .to_bytes()
                .unwrap()
                .chunks(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect::<Vec<_>>(),
        )
        .unwrap();
        assert!(text.contains(r#"size="19""#));
        assert!(text.contains(r#"scale="4""#));
    }

    #[test]
    fn unknown_types_decode_without_error() {
        let bytes = utf16le("<MetaInfo><RecordInfo><Field name=\"x\" type=\"NotReal\"/></RecordInfo></MetaInfo>\n\u{0}");
        let meta = MetaInfo::from_bytes(&bytes).unwrap();
        assert_eq!(meta.records.len(), 1);
        assert_eq!(meta.records[0].fields[0].name, "x");
        assert_eq!(meta.records[0].fields[0].field_type, FieldType::Unknown);
    }

    #[test]
    fn unknown_attributes_are_ignored() {
        let bytes = utf16le(
            "<MetaInfo><RecordInfo><Field name=\"x\" type=\"Double\" description=\"speed\"/></RecordInfo></MetaInfo>\n\u{0}",
        );
        let meta = MetaInfo::from_bytes(&bytes).unwrap();
        assert_eq!(meta.records[0].fields[0], Field::new("x", FieldType::Double));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let meta = MetaInfo {
            records: vec![RecordInfo {
                fields: vec![Field::new("a<b>&\"c\"", FieldType::String)],
            }],
        };
        let bytes = meta.to_bytes().unwrap();
        assert_eq!(MetaInfo::from_bytes(&bytes).unwrap(), meta);
    }

    #[test]
    fn missing_nul_sentinel_is_rejected() {
        let mut bytes = sample().to_bytes().unwrap();
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(
            MetaInfo::from_bytes(&bytes),
            Err(YxdbError::MetadataTruncated { .. })
        ));
    }

    #[test]
    fn tiny_windows_are_rejected() {
        assert!(matches!(
            MetaInfo::from_bytes(&[0x0A, 0x00]),
            Err(YxdbError::MetadataTruncated { offset: 0 })
        ));
    }

    #[test]
    fn bad_size_attribute_is_an_error() {
        let bytes = utf16le(
            "<MetaInfo><RecordInfo><Field name=\"x\" type=\"Double\" size=\"wide\"/></RecordInfo></MetaInfo>\n\u{0}",
        );
        match MetaInfo::from_bytes(&bytes) {
            Err(YxdbError::BadFieldAttribute { attr: "size", value }) => {
                assert_eq!(value, "wide");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let bytes = utf16le("<MetaInfo><Field name=\"x/></MetaInfo>\n\u{0}");
        assert!(matches!(
            MetaInfo::from_bytes(&bytes),
            Err(YxdbError::XmlMalformed(_))
        ));
    }
}
