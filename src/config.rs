//! Configuration constants and types for the ACL channel.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default tag byte marking synthetic entries.
///
/// The tag occupies the high byte of the synthetic subject id, so tagged
/// uids live in `0xAC000000..=0xACFFFFFF`, far above any real uid
/// allocation and below the reserved uid `0xFFFFFFFF`.
pub const DEFAULT_SUBJECT_TAG: u8 = 0xAC;

/// Lowest accepted tag byte. Keeps synthetic uids out of the range real
/// accounts are allocated from.
pub const MIN_SUBJECT_TAG: u8 = 0x80;

/// Highest accepted tag byte. `0xFF` would collide with the reserved
/// uid `-1`.
pub const MAX_SUBJECT_TAG: u8 = 0xFE;

/// Default ACL entry-count limit assumed per carrier file.
///
/// The true limit is filesystem-dependent; ext4 holds an access ACL in a
/// single fs block (~500 entries at 4 KiB). 128 leaves headroom on
/// filesystems with tighter limits.
pub const DEFAULT_MAX_ACL_ENTRIES: usize = 128;

/// Minimum sane entry-count limit (base entries plus at least one slot).
pub const MIN_MAX_ACL_ENTRIES: usize = 8;

/// Maximum accepted entry-count limit (the ext4 one-block bound).
pub const MAX_MAX_ACL_ENTRIES: usize = 512;

/// Configuration for an ACL covert channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Tag byte distinguishing synthetic entries from real ones.
    pub tag: u8,

    /// Assumed OS/filesystem limit on ACL entries per file.
    pub max_acl_entries: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            tag: DEFAULT_SUBJECT_TAG,
            max_acl_entries: DEFAULT_MAX_ACL_ENTRIES,
        }
    }
}

impl ChannelConfig {
    /// Create a configuration with custom settings.
    pub fn new(tag: u8, max_acl_entries: usize) -> Self {
        Self {
            tag,
            max_acl_entries,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SUBJECT_TAG..=MAX_SUBJECT_TAG).contains(&self.tag) {
            return Err(Error::InvalidConfig(format!(
                "tag byte must be between {:#04x} and {:#04x}",
                MIN_SUBJECT_TAG, MAX_SUBJECT_TAG
            )));
        }
        if !(MIN_MAX_ACL_ENTRIES..=MAX_MAX_ACL_ENTRIES).contains(&self.max_acl_entries) {
            return Err(Error::InvalidConfig(format!(
                "max ACL entries must be between {} and {}",
                MIN_MAX_ACL_ENTRIES, MAX_MAX_ACL_ENTRIES
            )));
        }
        Ok(())
    }
}
