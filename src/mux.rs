//! Splitting one payload stream across many carriers of varying capacity.

use crate::carrier::FileList;
use crate::error::{Error, Result};

/// One carrier's share of the payload stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Index into the file list.
    pub carrier_index: usize,
    /// Byte offset of this segment within the payload.
    pub offset: usize,
    /// Segment length in bytes.
    pub len: usize,
}

/// The complete chunk-placement decision for one encode run.
///
/// Built before any carrier is mutated: planning is the synchronization
/// point that makes the later writes order-independent.
#[derive(Debug)]
pub struct EncodePlan {
    payload_len: usize,
    segments: Vec<Segment>,
}

impl EncodePlan {
    /// Greedily assign payload ranges to carriers in manifest order, each
    /// up to its capacity. Carriers whose capacity was zero at load time
    /// are skipped; every other carrier reached receives at least one
    /// byte.
    ///
    /// Fails with `InsufficientCapacity` before any mutation when the
    /// carrier set cannot hold the whole payload. A zero-length payload
    /// plans zero segments.
    pub fn build(list: &FileList, payload_len: usize) -> Result<Self> {
        let available = list.total_capacity();
        if payload_len as u64 > available {
            return Err(Error::InsufficientCapacity {
                needed: payload_len as u64,
                available,
            });
        }

        let mut segments = Vec::new();
        let mut offset = 0usize;
        for carrier in list.carriers() {
            if offset == payload_len {
                break;
            }
            if carrier.capacity_bytes == 0 {
                continue;
            }
            let len = (carrier.capacity_bytes as usize).min(payload_len - offset);
            segments.push(Segment {
                carrier_index: carrier.ordinal_index,
                offset,
                len,
            });
            offset += len;
        }

        Ok(Self {
            payload_len,
            segments,
        })
    }

    /// Planned segments, in stream order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether `segment_index` holds the final chunk of the stream.
    pub fn is_final(&self, segment_index: usize) -> bool {
        segment_index + 1 == self.segments.len()
    }

    /// The payload bytes belonging to one segment.
    pub fn slice<'a>(&self, payload: &'a [u8], segment: &Segment) -> &'a [u8] {
        &payload[segment.offset..segment.offset + segment.len]
    }

    pub fn payload_len(&self) -> usize {
        self.payload_len
    }
}
