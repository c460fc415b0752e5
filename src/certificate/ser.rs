//! Canonical binary layout of certificates.
//!
//! All integers are little-endian. Byte strings carry a `u32` length prefix.
//!
//! | Record | Layout |
//! |--------|--------|
//! | header | `machine_id u32 · type u8 · partitions u32 · runs u32 · initial_steps u32` |
//! | tape descriptor | `P u32 · walls[P+1] · repeaters[P] · counts[P] u32 · state u8 · leftmost i32 · rightmost i32 · head_wall u32 · head_offset i32` |
//! | run start | `transitions u32` |
//! | transition | `kind u8 · index u32 · steps u32 · initial segment · final segment · after_image (u8 flag · tape descriptor)` |
//! | segment | `len u32 · cells[len] · state u8 · head i32` |
//! | closure | `shift i32` |
//!
//! A certificate is a header, the initial tape descriptor, `runs` runs (a run
//! start followed by its transitions) and a closure, with no trailing bytes.

use super::types::{
    BouncerType, Certificate, CertificateHeader, Closure, Run, TransitionKind, TransitionRecord,
};
use crate::ser::{ByteReader, ByteWriter, SerError, SerKind, SerResult};
use crate::tape::{Segment, SegmentTransition, TapeDescriptor};

/// Smallest encoding of a cell run (its length prefix).
const MIN_CELLS_LEN: usize = 4;
/// Smallest encoding of a segment: empty cells, state, head.
const MIN_SEGMENT_LEN: usize = MIN_CELLS_LEN + 1 + 4;
/// Smallest encoding of a transition record without an after-image.
const MIN_TRANSITION_LEN: usize = 1 + 4 + 4 + 2 * MIN_SEGMENT_LEN + 1;

/// Encodes the header record.
pub fn write_header(out: &mut ByteWriter, header: &CertificateHeader) {
    out.write_u32(header.machine_id);
    out.write_u8(header.bouncer_type.to_byte());
    out.write_u32(header.partitions);
    out.write_u32(header.runs);
    out.write_u32(header.initial_steps);
}

/// Decodes the header record.
pub fn read_header(cursor: &mut ByteReader<'_>) -> SerResult<CertificateHeader> {
    cursor.enter(SerKind::Header);
    let machine_id = cursor.read_u32("machine_id")?;
    let bouncer_type = BouncerType::from_byte(cursor.read_u8("type")?)
        .ok_or_else(|| cursor.invalid_value("type"))?;
    Ok(CertificateHeader {
        machine_id,
        bouncer_type,
        partitions: cursor.read_u32("partitions")?,
        runs: cursor.read_u32("runs")?,
        initial_steps: cursor.read_u32("initial_steps")?,
    })
}

/// Encodes a tape descriptor.
pub fn write_descriptor(out: &mut ByteWriter, td: &TapeDescriptor) -> SerResult<()> {
    let outer = out.enter(SerKind::TapeDescriptor);
    let partitions = td.partitions();
    if td.walls.len() != partitions + 1 || td.counts.len() != partitions {
        return Err(SerError::invalid_length(SerKind::TapeDescriptor, "partitions"));
    }
    out.write_count("partitions", partitions)?;
    for wall in &td.walls {
        out.write_cells("wall", wall)?;
    }
    for repeater in &td.repeaters {
        out.write_cells("repeater", repeater)?;
    }
    for &count in &td.counts {
        out.write_u32(count);
    }
    out.write_u8(td.state);
    out.write_i32(td.leftmost);
    out.write_i32(td.rightmost);
    out.write_u32(td.head_wall);
    out.write_i32(td.head_offset);
    out.enter(outer);
    Ok(())
}

/// Decodes a tape descriptor.
///
/// Only the framing is checked here; structural invariants are enforced by
/// [`TapeDescriptor::validate`].
pub fn read_descriptor(cursor: &mut ByteReader<'_>) -> SerResult<TapeDescriptor> {
    let outer = cursor.enter(SerKind::TapeDescriptor);
    // Per partition: a repeater, a count and one more wall.
    let partitions = cursor.read_count("partitions", 3 * MIN_CELLS_LEN)?;
    let walls = (0..=partitions)
        .map(|_| cursor.read_cells("wall"))
        .collect::<SerResult<Vec<_>>>()?;
    let repeaters = (0..partitions)
        .map(|_| cursor.read_cells("repeater"))
        .collect::<SerResult<Vec<_>>>()?;
    let counts = (0..partitions)
        .map(|_| cursor.read_u32("count"))
        .collect::<SerResult<Vec<_>>>()?;
    let td = TapeDescriptor {
        walls,
        repeaters,
        counts,
        state: cursor.read_u8("state")?,
        leftmost: cursor.read_i32("leftmost")?,
        rightmost: cursor.read_i32("rightmost")?,
        head_wall: cursor.read_u32("head_wall")?,
        head_offset: cursor.read_i32("head_offset")?,
    };
    cursor.enter(outer);
    Ok(td)
}

fn write_segment(out: &mut ByteWriter, segment: &Segment) -> SerResult<()> {
    let outer = out.enter(SerKind::Segment);
    out.write_cells("tape", &segment.tape)?;
    out.write_u8(segment.state);
    out.write_i32(segment.head);
    out.enter(outer);
    Ok(())
}

fn read_segment(cursor: &mut ByteReader<'_>) -> SerResult<Segment> {
    let outer = cursor.enter(SerKind::Segment);
    let segment = Segment {
        tape: cursor.read_cells("tape")?,
        state: cursor.read_u8("state")?,
        head: cursor.read_i32("head")?,
    };
    cursor.enter(outer);
    Ok(segment)
}

/// Encodes the transition count that opens a run.
pub fn write_run_start(out: &mut ByteWriter, transitions: usize) -> SerResult<()> {
    out.enter(SerKind::Run);
    out.write_count("transitions", transitions)
}

/// Decodes the transition count that opens a run, rejecting counts the
/// remaining input cannot hold.
pub fn read_run_start(cursor: &mut ByteReader<'_>) -> SerResult<u32> {
    cursor.enter(SerKind::Run);
    let count = cursor.read_count("transitions", MIN_TRANSITION_LEN)?;
    // Lossless: the count was decoded from a u32.
    Ok(count as u32)
}

/// Encodes a transition record.
pub fn write_transition(out: &mut ByteWriter, record: &TransitionRecord) -> SerResult<()> {
    out.enter(SerKind::Transition);
    out.write_u8(record.kind.to_byte());
    out.write_u32(record.index);
    out.write_u32(record.transition.steps);
    write_segment(out, &record.transition.initial)?;
    write_segment(out, &record.transition.terminal)?;
    out.write_flag(record.after_image.is_some());
    match &record.after_image {
        Some(td) => write_descriptor(out, td),
        None => Ok(()),
    }
}

/// Decodes a transition record.
pub fn read_transition(cursor: &mut ByteReader<'_>) -> SerResult<TransitionRecord> {
    cursor.enter(SerKind::Transition);
    let kind = TransitionKind::from_byte(cursor.read_u8("kind")?)
        .ok_or_else(|| cursor.invalid_value("kind"))?;
    let index = cursor.read_u32("index")?;
    let steps = cursor.read_u32("steps")?;
    let initial = read_segment(cursor)?;
    let terminal = read_segment(cursor)?;
    let after_image = if cursor.read_flag("after_image")? {
        Some(read_descriptor(cursor)?)
    } else {
        None
    };
    Ok(TransitionRecord {
        kind,
        index,
        transition: SegmentTransition {
            steps,
            initial,
            terminal,
        },
        after_image,
    })
}

/// Encodes the closing record.
pub fn write_closure(out: &mut ByteWriter, closure: &Closure) {
    out.enter(SerKind::Closure);
    out.write_i32(closure.shift);
}

/// Decodes the closing record.
pub fn read_closure(cursor: &mut ByteReader<'_>) -> SerResult<Closure> {
    cursor.enter(SerKind::Closure);
    Ok(Closure {
        shift: cursor.read_i32("shift")?,
    })
}

/// Serialises a complete certificate into canonical bytes.
pub fn serialize_certificate(certificate: &Certificate) -> SerResult<Vec<u8>> {
    let mut out = ByteWriter::new();
    write_header(&mut out, &certificate.header);
    write_descriptor(&mut out, &certificate.initial_tape)?;
    for run in &certificate.runs {
        write_run_start(&mut out, run.transitions.len())?;
        for record in &run.transitions {
            write_transition(&mut out, record)?;
        }
    }
    write_closure(&mut out, &certificate.closure);
    Ok(out.into_bytes())
}

/// Deserialises a complete certificate, rejecting trailing bytes.
///
/// The number of runs is taken from the header; bounds on it are enforced
/// by the verifier, not here.
pub fn deserialize_certificate(bytes: &[u8]) -> SerResult<Certificate> {
    let mut cursor = ByteReader::new(bytes);
    let header = read_header(&mut cursor)?;
    let initial_tape = read_descriptor(&mut cursor)?;
    let mut runs = Vec::new();
    for _ in 0..header.runs {
        let count = read_run_start(&mut cursor)?;
        let transitions = (0..count)
            .map(|_| read_transition(&mut cursor))
            .collect::<SerResult<Vec<_>>>()?;
        runs.push(Run { transitions });
    }
    let closure = read_closure(&mut cursor)?;
    cursor.finish()?;
    Ok(Certificate {
        header,
        initial_tape,
        runs,
        closure,
    })
}
