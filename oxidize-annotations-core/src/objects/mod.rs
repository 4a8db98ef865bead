//! Raw annotation data as handed over by the host document.
//!
//! The host's PDF engine resolves indirect references before calling into the
//! provider, so these objects are plain values.

mod dictionary;
mod primitive;

pub use dictionary::Dictionary;
pub use primitive::Object;
