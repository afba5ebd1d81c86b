//! Error types for the ACL channel.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ACL channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding into or decoding from carrier ACLs.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file or ACL operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest file itself does not exist.
    #[error("manifest file not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// One or more carrier paths listed in the manifest are absent.
    /// All missing paths are collected so the caller can report every
    /// problem at once.
    #[error("carrier files not found: {}", format_paths(.0))]
    CarrierNotFound(Vec<PathBuf>),

    /// The manifest lists the same carrier path twice.
    #[error("duplicate carrier path in manifest: {}", .0.display())]
    DuplicateCarrier(PathBuf),

    /// A carrier ACL has no room left for synthetic entries.
    #[error("carrier ACL has no room for hidden entries: {} ({entries} of {limit} entry slots in use)", .path.display())]
    CarrierTooSmall {
        path: PathBuf,
        entries: usize,
        limit: usize,
    },

    /// Total capacity across the carrier set is smaller than the payload.
    #[error("not enough carrier capacity: need {needed} bytes, have {available} bytes")]
    InsufficientCapacity { needed: u64, available: u64 },

    /// The process lacks permission to modify a carrier's ACL.
    #[error("access denied while modifying ACL of {}", .0.display())]
    AccessDenied(PathBuf),

    /// The synthetic entries on disk do not form a valid encoded stream.
    #[error("corrupt encoding: {0}")]
    CorruptEncoding(String),

    /// The payload file could not be read.
    #[error("failed to read payload {}: {source}", .path.display())]
    PayloadRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The decoded payload could not be written.
    #[error("failed to write payload {}: {source}", .path.display())]
    PayloadWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An operation was invoked in a state that does not permit it.
    #[error("{operation} is not permitted in the {state} state")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// Channel configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No ACL backend exists for the current platform.
    #[error("ACL access not supported on this platform: {0}")]
    UnsupportedPlatform(&'static str),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_carriers_all_listed() {
        let err = Error::CarrierNotFound(vec![PathBuf::from("/a/one"), PathBuf::from("/b/two")]);
        let msg = err.to_string();
        assert!(msg.contains("/a/one"));
        assert!(msg.contains("/b/two"));
    }

    #[test]
    fn test_insufficient_capacity_message() {
        let err = Error::InsufficientCapacity {
            needed: 12,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "not enough carrier capacity: need 12 bytes, have 10 bytes"
        );
    }
}
