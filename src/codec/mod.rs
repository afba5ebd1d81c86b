//! ACE codec: byte streams to and from synthetic access-control entries.
//!
//! A synthetic entry stores its data entirely inside the 32-bit subject id
//! of a named-user ACL entry, so a chunk survives independent of on-disk
//! entry ordering.

mod decoder;
mod encoder;
mod record;

pub use decoder::deserialize;
pub use encoder::serialize;
pub use record::{SyntheticAce, MAX_CHUNK_BYTES, MAX_RECORDS_PER_CARRIER};
