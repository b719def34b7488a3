use std::fs;

use tempfile::NamedTempFile;

use yxdb::{
    get_value_codec, ByteReader, Field, FieldType, FieldValue, MetaInfo, RecordInfo, YxdbError,
    YxdbFile,
};

fn single_double_schema() -> MetaInfo {
    MetaInfo {
        records: vec![RecordInfo { fields: vec![Field::new("x", FieldType::Double)] }],
    }
}

#[test]
fn test_empty_file_survives_disk_round_trip() {
    let mut file = YxdbFile::new(MetaInfo::default());
    file.finalize().unwrap();
    let bytes = file.to_bytes().unwrap();

    let temp = NamedTempFile::new().unwrap();
    fs::write(temp.path(), &bytes).unwrap();
    let reread = fs::read(temp.path()).unwrap();

    let decoded = YxdbFile::from_bytes(&reread).unwrap();
    assert_eq!(decoded, file);
    assert_eq!(decoded.header.num_records, 0);
    assert!(decoded.payload.is_empty());
    assert!(decoded.block_index.offsets.is_empty());
    assert_eq!(decoded.to_bytes().unwrap(), bytes);
}

#[test]
fn test_single_double_record() {
    let codec = get_value_codec(FieldType::Double).unwrap();

    let mut file = YxdbFile::new(single_double_schema());
    codec
        .encode(Some(&FieldValue::Double(3.14)), &mut file.payload)
        .unwrap();
    file.header.num_records = 1;
    file.finalize().unwrap();

    let temp = NamedTempFile::new().unwrap();
    fs::write(temp.path(), file.to_bytes().unwrap()).unwrap();
    let decoded = YxdbFile::from_bytes(&fs::read(temp.path()).unwrap()).unwrap();

    assert_eq!(decoded.metadata, single_double_schema());
    assert_eq!(decoded.header.num_records, 1);
    assert_eq!(decoded.payload.len(), 9);

    let mut r = ByteReader::new(&decoded.payload);
    let value = codec.decode(&mut r).unwrap();
    assert_eq!(value, Some(FieldValue::Double(3.14)));
    assert!(r.is_empty());
}

#[test]
fn test_compressible_and_incompressible_payloads() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let compressible = vec![0x41u8; 1000];
    let mut incompressible = vec![0u8; 1000];
    StdRng::seed_from_u64(20260802).fill(&mut incompressible[..]);

    for payload in [compressible, incompressible] {
        let mut file = YxdbFile::new(single_double_schema());
        file.payload = payload.clone();
        file.finalize().unwrap();
        let decoded = YxdbFile::from_bytes(&file.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.payload, payload);
    }
}

#[test]
fn test_fixed_decimal_size_and_scale_survive() {
    let mut amount = Field::new("amt", FieldType::FixedDecimal);
    amount.size = Some(19);
    amount.scale = Some(4);
    let schema = MetaInfo { records: vec![RecordInfo { fields: vec![amount] }] };

    let mut file = YxdbFile::new(schema.clone());
    file.finalize().unwrap();
    let decoded = YxdbFile::from_bytes(&file.to_bytes().unwrap()).unwrap();
    assert_eq!(decoded.metadata, schema);
}

#[test]
fn test_corrupted_metadata_trailer_is_detected() {
    let mut file = YxdbFile::new(single_double_schema());
    file.finalize().unwrap();
    let mut bytes = file.to_bytes().unwrap();

    // Overwrite the metadata's final NUL code unit, leaving lengths intact.
    let metadata_end = file.header.start_of_blocks() as usize;
    bytes[metadata_end - 2] = b'!';

    assert!(matches!(
        YxdbFile::from_bytes(&bytes),
        Err(YxdbError::MetadataTruncated { .. })
    ));
}

#[test]
fn test_truncated_file_is_detected() {
    let mut file = YxdbFile::new(single_double_schema());
    file.payload = vec![1, 2, 3, 4];
    file.finalize().unwrap();
    let bytes = file.to_bytes().unwrap();

    for cut in [0, 100, 512, bytes.len() - 1] {
        assert!(YxdbFile::from_bytes(&bytes[..cut]).is_err());
    }
}
