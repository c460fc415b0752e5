use bouncer_verifier::ser::{ByteReader, ByteWriter, SerError, SerKind};
use insta::assert_snapshot;

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn integers_are_little_endian() {
    let mut out = ByteWriter::new();
    out.write_u32(0xdead_beef);
    out.write_i32(-7);
    out.write_u8(3);
    assert_eq!(&out.as_bytes()[..4], &[0xef, 0xbe, 0xad, 0xde]);

    let mut cursor = ByteReader::new(out.as_bytes());
    assert_eq!(cursor.read_u32("machine_id").unwrap(), 0xdead_beef);
    assert_eq!(cursor.read_i32("shift").unwrap(), -7);
    assert_eq!(cursor.read_u8("state").unwrap(), 3);
    assert!(cursor.is_empty());
}

#[test]
fn flags_accept_only_zero_and_one() {
    let mut out = ByteWriter::new();
    out.write_flag(true);
    out.write_flag(false);
    out.write_u8(2);
    let mut cursor = ByteReader::new(out.as_bytes());
    cursor.enter(SerKind::Transition);
    assert!(cursor.read_flag("after_image").unwrap());
    assert!(!cursor.read_flag("after_image").unwrap());
    assert_eq!(
        cursor.read_flag("after_image"),
        Err(SerError::invalid_value(SerKind::Transition, "after_image"))
    );
}

#[test]
fn cells_carry_a_length_prefix() {
    let mut out = ByteWriter::new();
    out.write_i32(-2);
    out.write_cells("tape", &[1, 1]).unwrap();
    assert_snapshot!(hex(out.as_bytes()), @"fe ff ff ff 02 00 00 00 01 01");

    let mut cursor = ByteReader::new(out.as_bytes());
    cursor.read_i32("head").unwrap();
    assert_eq!(cursor.read_cells("tape").unwrap(), vec![1, 1]);
}

#[test]
fn short_cell_run_names_the_section_and_field() {
    let data = [0x05, 0x00, 0x00, 0x00, 1, 2, 3];
    let mut cursor = ByteReader::new(&data);
    cursor.enter(SerKind::Segment);
    let err = cursor.read_cells("tape").expect_err("short buffer");
    assert_eq!(err, SerError::unexpected_end(SerKind::Segment, "tape"));
    assert_snapshot!(err.to_string(), @"segment: unexpected end of input while reading `tape`");
}

#[test]
fn counts_are_bounded_by_the_remaining_input() {
    let mut out = ByteWriter::new();
    out.write_count("transitions", 2).unwrap();
    out.write_u8(0);
    out.write_u8(0);
    let mut cursor = ByteReader::new(out.as_bytes());
    assert_eq!(cursor.read_count("transitions", 1).unwrap(), 2);

    let mut cursor = ByteReader::new(out.as_bytes());
    cursor.enter(SerKind::Run);
    assert_eq!(
        cursor.read_count("transitions", 2),
        Err(SerError::invalid_length(SerKind::Run, "transitions"))
    );
}

#[test]
fn entering_a_section_returns_the_previous_one() {
    let mut cursor = ByteReader::new(&[]);
    let outer = cursor.enter(SerKind::Segment);
    assert_eq!(outer, SerKind::Certificate);
    assert_eq!(cursor.enter(outer), SerKind::Segment);
    assert_eq!(
        cursor.read_u8("kind"),
        Err(SerError::unexpected_end(SerKind::Certificate, "kind"))
    );
}

#[test]
fn trailing_bytes_are_reported_with_their_offset() {
    let data = [0u8; 6];
    let mut cursor = ByteReader::new(&data);
    cursor.enter(SerKind::Closure);
    cursor.read_i32("shift").unwrap();
    let err = cursor.finish().expect_err("two bytes left");
    assert_eq!(err, SerError::trailing_bytes(SerKind::Certificate, 4, 2));
    assert_snapshot!(err.to_string(), @"certificate: 2 trailing bytes after offset 4");
}
