//! Little-endian byte layer underneath the certificate codec.
//!
//! Reading and writing go through [`ByteReader`] and [`ByteWriter`]. Both
//! carry the record section they are working on, so every failure names the
//! section and the field that broke without each call site repeating it.

mod cursor;
mod error;
mod writer;

pub use cursor::ByteReader;
pub use error::{SerError, SerKind, SerResult};
pub use writer::ByteWriter;
