//! Certificate model, canonical encoding and streaming decoder.

mod ser;
mod stream;
mod types;

pub use ser::{
    deserialize_certificate, read_closure, read_descriptor, read_header, read_run_start,
    read_transition, serialize_certificate, write_closure, write_descriptor, write_header,
    write_run_start, write_transition,
};
pub use stream::RecordReader;
pub use types::{
    BouncerType, Certificate, CertificateHeader, Closure, Record, Run, TransitionKind,
    TransitionRecord,
};

/// BLAKE3 digest of the canonical certificate bytes.
pub fn certificate_digest(bytes: &[u8]) -> [u8; 32] {
    *blake3::hash(bytes).as_bytes()
}
