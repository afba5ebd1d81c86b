//! Serialization of payload bytes into synthetic ACE records.

use crate::codec::record::{SyntheticAce, MAX_CHUNK_BYTES, MAX_RECORDS_PER_CARRIER};

/// Split `bytes` into synthetic records of at most `max_chunk` payload
/// bytes each, with ordinals starting at zero.
///
/// When `close_stream` is set, the last record is marked terminal: it
/// carries the final chunk of the whole payload stream, and decode will
/// not read past it. Zero-length input produces zero records.
///
/// Callers plan segments within the carrier record limit; a segment that
/// would need more than [`MAX_RECORDS_PER_CARRIER`] records is a planning
/// bug.
///
/// # Example
///
/// ```
/// use acl_stash::codec::serialize;
///
/// let records = serialize(b"hey", 2, 0xAC, true);
/// assert_eq!(records.len(), 2);
/// assert!(records[1].terminal);
/// assert_eq!(records[1].chunk, b"y");
/// ```
pub fn serialize(bytes: &[u8], max_chunk: usize, tag: u8, close_stream: bool) -> Vec<SyntheticAce> {
    assert!(
        max_chunk >= 1 && max_chunk <= MAX_CHUNK_BYTES,
        "chunk size outside wire limits"
    );

    if bytes.is_empty() {
        return Vec::new();
    }

    let chunks: Vec<&[u8]> = bytes.chunks(max_chunk).collect();
    assert!(
        chunks.len() <= MAX_RECORDS_PER_CARRIER,
        "segment exceeds carrier record limit"
    );

    let last = chunks.len() - 1;
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| SyntheticAce {
            tag,
            ordinal: i as u8,
            terminal: close_stream && i == last,
            chunk: chunk.to_vec(),
        })
        .collect()
}
