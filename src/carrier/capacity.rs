//! How many payload bytes a single carrier's ACL can hold.

use crate::acl::{Ace, AceKind, AclStore};
use crate::codec::{MAX_CHUNK_BYTES, MAX_RECORDS_PER_CARRIER};
use crate::config::ChannelConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// Payload capacity of the ACL at `path`, in bytes.
///
/// Capacity is the entry-count headroom left by the file's real entries
/// (synthetic entries from an earlier encode are replaced, so they do not
/// count), times the payload bytes per synthetic entry. One slot is
/// reserved for the mask entry named-user entries require, unless the
/// ACL already carries one.
///
/// Fails with `CarrierTooSmall` when the existing ACL is already
/// saturated.
pub fn carrier_capacity(
    store: &dyn AclStore,
    path: &Path,
    config: &ChannelConfig,
) -> Result<u64> {
    let entries = store.read_acl(path)?;
    let capacity = capacity_of_entries(&entries, config);
    if capacity == 0 {
        let real = real_entry_count(&entries, config);
        return Err(Error::CarrierTooSmall {
            path: path.to_path_buf(),
            entries: real,
            limit: config.max_acl_entries,
        });
    }
    Ok(capacity)
}

pub(crate) fn capacity_of_entries(entries: &[Ace], config: &ChannelConfig) -> u64 {
    let real = real_entry_count(entries, config);
    let has_mask = entries
        .iter()
        .any(|e| !e.default_entry && e.kind == AceKind::Mask);
    let reserve = usize::from(!has_mask);

    let slots = config
        .max_acl_entries
        .saturating_sub(real + reserve)
        .min(MAX_RECORDS_PER_CARRIER);
    (slots * MAX_CHUNK_BYTES) as u64
}

fn real_entry_count(entries: &[Ace], config: &ChannelConfig) -> usize {
    entries
        .iter()
        .filter(|e| !e.default_entry && e.as_synthetic(config.tag).is_none())
        .count()
}
