use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Record section a reader or writer is positioned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SerKind {
    /// Certificate header (machine id, type, partition and run counts).
    Header,
    /// Tape descriptor, either the initial tape or an after-image.
    TapeDescriptor,
    /// Transition count opening a run.
    Run,
    /// Transition record framing (kind, index, steps, after-image flag).
    Transition,
    /// Segment window embedded in a transition.
    Segment,
    /// Closure record.
    Closure,
    /// Framing of the certificate as a whole.
    Certificate,
}

impl SerKind {
    /// Lower-case name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            SerKind::Header => "header",
            SerKind::TapeDescriptor => "tape descriptor",
            SerKind::Run => "run",
            SerKind::Transition => "transition",
            SerKind::Segment => "segment",
            SerKind::Closure => "closure",
            SerKind::Certificate => "certificate",
        }
    }
}

impl fmt::Display for SerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encoding or decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerError {
    /// The input stopped inside a field.
    #[error("{kind}: unexpected end of input while reading `{field}`")]
    UnexpectedEnd { kind: SerKind, field: &'static str },
    /// A length or count cannot be honoured by the input, or does not fit
    /// the `u32` wire type on output.
    #[error("{kind}: invalid length for `{field}`")]
    InvalidLength { kind: SerKind, field: &'static str },
    /// Unknown discriminant or flag byte.
    #[error("{kind}: invalid value for `{field}`")]
    InvalidValue { kind: SerKind, field: &'static str },
    /// Bytes left over after the closing record.
    #[error("{kind}: {remaining} trailing bytes after offset {consumed}")]
    TrailingBytes {
        kind: SerKind,
        consumed: usize,
        remaining: usize,
    },
}

impl SerError {
    pub fn unexpected_end(kind: SerKind, field: &'static str) -> Self {
        SerError::UnexpectedEnd { kind, field }
    }

    pub fn invalid_length(kind: SerKind, field: &'static str) -> Self {
        SerError::InvalidLength { kind, field }
    }

    pub fn invalid_value(kind: SerKind, field: &'static str) -> Self {
        SerError::InvalidValue { kind, field }
    }

    pub fn trailing_bytes(kind: SerKind, consumed: usize, remaining: usize) -> Self {
        SerError::TrailingBytes {
            kind,
            consumed,
            remaining,
        }
    }

    /// Section the failure was raised in.
    pub fn kind(&self) -> SerKind {
        match *self {
            SerError::UnexpectedEnd { kind, .. }
            | SerError::InvalidLength { kind, .. }
            | SerError::InvalidValue { kind, .. }
            | SerError::TrailingBytes { kind, .. } => kind,
        }
    }
}

pub type SerResult<T> = Result<T, SerError>;
