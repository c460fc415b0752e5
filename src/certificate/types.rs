use serde::{Deserialize, Serialize};

use crate::tape::{SegmentTransition, TapeDescriptor};

/// Declared kind of a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BouncerType {
    /// Head bounces between a fixed wall and a growing end.
    Unilateral = 1,
    /// Head bounces between two growing ends.
    Bilateral = 2,
    /// The whole pattern drifts by a fixed offset per cycle.
    Translated = 3,
    /// Counted but not verified as a bouncer.
    Bell = 4,
}

impl BouncerType {
    /// Canonical wire byte.
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Parses the wire byte.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(BouncerType::Unilateral),
            2 => Some(BouncerType::Bilateral),
            3 => Some(BouncerType::Translated),
            4 => Some(BouncerType::Bell),
            _ => None,
        }
    }
}

/// Which check a transition record asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransitionKind {
    /// Local rewrite of one wall; `index` is the wall.
    Wall = 0,
    /// Leftward sweep across a repeater block; `index` is the partition.
    RepeaterLeft = 1,
    /// Rightward sweep across a repeater block; `index` is the partition.
    RepeaterRight = 2,
}

impl TransitionKind {
    /// Canonical wire byte.
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Parses the wire byte.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(TransitionKind::Wall),
            1 => Some(TransitionKind::RepeaterLeft),
            2 => Some(TransitionKind::RepeaterRight),
            _ => None,
        }
    }
}

/// Leading record of a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateHeader {
    /// Identifier of the machine in the host's database.
    pub machine_id: u32,
    /// Declared certificate kind.
    pub bouncer_type: BouncerType,
    /// Number of partitions of the initial tape.
    pub partitions: u32,
    /// Number of runs in one cycle.
    pub runs: u32,
    /// Steps simulated from the blank tape before the initial tape applies.
    pub initial_steps: u32,
}

/// One checked step of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Check to perform.
    pub kind: TransitionKind,
    /// Wall index for wall transitions, partition index for repeaters.
    pub index: u32,
    /// Local simulation claim.
    pub transition: SegmentTransition,
    /// Descriptor after the transition. Required for wall transitions and for
    /// the last transition of a run; derived when absent on repeaters.
    pub after_image: Option<TapeDescriptor>,
}

/// Transitions forming one pass of the head.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Run {
    /// Ordered transitions.
    pub transitions: Vec<TransitionRecord>,
}

/// Closing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Closure {
    /// Net head displacement per cycle.
    pub shift: i32,
}

/// Complete non-halting certificate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Certificate {
    /// Header record.
    pub header: CertificateHeader,
    /// Descriptor the cycle starts from and returns to.
    pub initial_tape: TapeDescriptor,
    /// Runs of one cycle.
    pub runs: Vec<Run>,
    /// Closing record.
    pub closure: Closure,
}

/// Streamed unit of a certificate, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Certificate header.
    Header(CertificateHeader),
    /// Initial tape descriptor.
    InitialTape(TapeDescriptor),
    /// Start of run `run` holding `transitions` transitions.
    RunStart { run: u32, transitions: u32 },
    /// A transition of the current run.
    Transition(TransitionRecord),
    /// Closing record.
    Closure(Closure),
}

impl Certificate {
    /// Records of this certificate in wire order.
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        let head = [
            Record::Header(self.header),
            Record::InitialTape(self.initial_tape.clone()),
        ];
        let runs = self.runs.iter().enumerate().flat_map(|(index, run)| {
            let start = Record::RunStart {
                run: index as u32,
                transitions: run.transitions.len() as u32,
            };
            core::iter::once(start).chain(run.transitions.iter().cloned().map(Record::Transition))
        });
        head.into_iter()
            .chain(runs)
            .chain(core::iter::once(Record::Closure(self.closure)))
    }
}
