use super::ser::{read_closure, read_descriptor, read_header, read_run_start, read_transition};
use super::types::Record;
use crate::ser::{ByteReader, SerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Header,
    InitialTape,
    Runs,
    Trailer,
    Done,
}

/// Lazy decoder yielding the records of an encoded certificate one at a time.
///
/// Nothing past the record being decoded is read, so a consumer that stops
/// early (for example after rejecting the header) never touches the rest of
/// the input. The reader fuses after the first error.
#[derive(Debug, Clone)]
pub struct RecordReader<'a> {
    cursor: ByteReader<'a>,
    stage: Stage,
    runs_total: u32,
    next_run: u32,
    transitions_left: u32,
}

impl<'a> RecordReader<'a> {
    /// Reader over the canonical bytes of a certificate.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: ByteReader::new(bytes),
            stage: Stage::Header,
            runs_total: 0,
            next_run: 0,
            transitions_left: 0,
        }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    fn read_next(&mut self) -> SerResult<Option<Record>> {
        let cursor = &mut self.cursor;
        match self.stage {
            Stage::Header => {
                let header = read_header(cursor)?;
                self.runs_total = header.runs;
                self.stage = Stage::InitialTape;
                Ok(Some(Record::Header(header)))
            }
            Stage::InitialTape => {
                let td = read_descriptor(cursor)?;
                self.stage = Stage::Runs;
                Ok(Some(Record::InitialTape(td)))
            }
            Stage::Runs if self.transitions_left > 0 => {
                let record = read_transition(cursor)?;
                self.transitions_left -= 1;
                Ok(Some(Record::Transition(record)))
            }
            Stage::Runs if self.next_run < self.runs_total => {
                let transitions = read_run_start(cursor)?;
                let run = self.next_run;
                self.next_run += 1;
                self.transitions_left = transitions;
                Ok(Some(Record::RunStart { run, transitions }))
            }
            Stage::Runs => {
                let closure = read_closure(cursor)?;
                self.stage = Stage::Trailer;
                Ok(Some(Record::Closure(closure)))
            }
            Stage::Trailer => {
                cursor.finish()?;
                self.stage = Stage::Done;
                Ok(None)
            }
            Stage::Done => Ok(None),
        }
    }
}

impl Iterator for RecordReader<'_> {
    type Item = SerResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_next() {
            Ok(record) => record.map(Ok),
            Err(err) => {
                self.stage = Stage::Done;
                Some(Err(err))
            }
        }
    }
}
