//! Deserialization of synthetic ACE records back into payload bytes.

use crate::codec::record::{SyntheticAce, MAX_CHUNK_BYTES};
use crate::error::{Error, Result};

/// Reassemble the payload bytes held by one carrier's synthetic records.
///
/// The OS may return ACL entries in any order, so records are re-sorted
/// by ordinal before concatenation. Returns the bytes and whether a
/// terminal record (end of the payload stream) was seen.
///
/// Fails with `CorruptEncoding` when the records do not form a valid
/// stream segment: a mismatched tag, duplicate or missing ordinals, a
/// short chunk anywhere but the stream end, or a terminal record that is
/// not the segment's last chunk. Zero records decode to empty bytes, not
/// an error.
pub fn deserialize(records: Vec<SyntheticAce>, tag: u8) -> Result<(Vec<u8>, bool)> {
    if records.is_empty() {
        return Ok((Vec::new(), false));
    }

    for record in &records {
        if record.tag != tag {
            return Err(Error::CorruptEncoding(format!(
                "unexpected subject tag {:#04x}, expected {:#04x}",
                record.tag, tag
            )));
        }
        if record.chunk.is_empty() || record.chunk.len() > MAX_CHUNK_BYTES {
            return Err(Error::CorruptEncoding(format!(
                "chunk of {} bytes in record {}",
                record.chunk.len(),
                record.ordinal
            )));
        }
    }

    let mut records = records;
    records.sort_by_key(|r| r.ordinal);

    for (expected, record) in records.iter().enumerate() {
        if record.ordinal as usize != expected {
            return Err(Error::CorruptEncoding(format!(
                "duplicate or missing sequence number near ordinal {}",
                record.ordinal
            )));
        }
    }

    let terminals = records.iter().filter(|r| r.terminal).count();
    if terminals > 1 {
        return Err(Error::CorruptEncoding(
            "multiple terminal records in one carrier".to_string(),
        ));
    }

    let last = records.len() - 1;
    for (i, record) in records.iter().enumerate() {
        if record.terminal && i != last {
            return Err(Error::CorruptEncoding(
                "terminal record is not the final chunk".to_string(),
            ));
        }
        if !record.terminal && !record.wide() {
            return Err(Error::CorruptEncoding(
                "short chunk before end of stream".to_string(),
            ));
        }
    }

    let mut bytes = Vec::with_capacity(records.len() * MAX_CHUNK_BYTES);
    for record in &records {
        bytes.extend_from_slice(&record.chunk);
    }

    Ok((bytes, terminals == 1))
}
