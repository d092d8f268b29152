use payproof_journal::frame::MAX_PAYLOAD_SIZE;
use payproof_journal::{
    FrameKind, JournalError, JournalReader, JournalWriter, ReadMode, WriteOptions,
};
use serde_json::json;
use std::fs::{self, OpenOptions};
use std::io::Write;
use tempfile::TempDir;

fn write_two_records(path: &std::path::Path) {
    let mut writer = JournalWriter::open(path, WriteOptions::default()).unwrap();
    writer.append_record(&json!({"sequence": 0})).unwrap();
    writer.append_record(&json!({"sequence": 1})).unwrap();
    writer.finish().unwrap();
}

#[test]
fn test_payload_size_limit() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("big.ppj");

    let oversized = vec![b' '; MAX_PAYLOAD_SIZE as usize + 1];
    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    match writer.append_raw(FrameKind::RegistryRecord, &oversized) {
        Err(JournalError::PayloadTooLarge { size, max }) => {
            assert_eq!(size, MAX_PAYLOAD_SIZE as usize + 1);
            assert_eq!(max, MAX_PAYLOAD_SIZE);
        }
        other => panic!("expected PayloadTooLarge, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_truncated_tail_strict_vs_permissive() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("venmo.ppj");
    write_two_records(&path);

    let len = fs::metadata(&path).unwrap().len();
    let file = OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(len - 3).unwrap();

    let mut strict = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert!(strict.read_record().unwrap().is_some());
    assert!(matches!(
        strict.read_record(),
        Err(JournalError::TruncatedFrame { .. })
    ));

    let mut permissive = JournalReader::open(&path, ReadMode::Permissive).unwrap();
    assert_eq!(permissive.read_all().unwrap().len(), 1);
}

#[test]
fn test_truncated_frame_header() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("venmo.ppj");
    write_two_records(&path);

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&[0x01, 0x00, 0x00]).unwrap();

    let mut strict = JournalReader::open(&path, ReadMode::Strict).unwrap();
    strict.read_record().unwrap();
    strict.read_record().unwrap();
    assert!(matches!(
        strict.read_record(),
        Err(JournalError::TruncatedFrame { .. })
    ));
}

#[test]
fn test_unknown_frame_kinds_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("venmo.ppj");

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer.append_raw(FrameKind::Unknown(0x7f), b"opaque").unwrap();
    writer.append_record(&json!({"sequence": 0})).unwrap();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    let record = reader.read_record().unwrap().unwrap();
    assert_eq!(record["sequence"], 0);
    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn test_corrupt_reserved_bytes_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("venmo.ppj");
    write_two_records(&path);

    let mut bytes = fs::read(&path).unwrap();
    bytes[16 + 1] = 0xff;
    fs::write(&path, &bytes).unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Permissive).unwrap();
    assert!(matches!(
        reader.read_record(),
        Err(JournalError::InvalidFrame { offset: 16, .. })
    ));
}

#[test]
fn test_non_json_payload_is_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("venmo.ppj");

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer
        .append_raw(FrameKind::RegistryRecord, b"{not json")
        .unwrap();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert!(matches!(
        reader.read_record(),
        Err(JournalError::JsonParse(_))
    ));
}

#[test]
fn test_header_too_short_on_read() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("short.ppj");
    fs::write(&path, b"PPJ").unwrap();

    assert!(matches!(
        JournalReader::open(&path, ReadMode::Strict),
        Err(JournalError::InvalidHeader(_))
    ));
}
