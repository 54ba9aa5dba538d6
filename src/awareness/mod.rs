//! Decoding and bookkeeping for y-protocol awareness (presence) updates.

pub mod awareness;
pub mod decoder;
pub mod encoder;

pub use awareness::{Awareness, AwarenessChanges, ClientMeta};
pub use decoder::{DecodeError, Decoder};
pub use encoder::{encode_awareness_update, AwarenessRecord, Encoder};
