//! ACL store abstraction for cross-platform support.

use crate::acl::entry::Ace;
use crate::error::Result;
use std::path::Path;

/// Trait for reading and replacing a file's access-control list.
///
/// Implementations expose the full entry list; classification of
/// synthetic versus real entries happens above this layer.
pub trait AclStore: Send + Sync {
    /// Read the complete ACL of a file.
    fn read_acl(&self, path: &Path) -> Result<Vec<Ace>>;

    /// Replace the complete ACL of a file.
    fn write_acl(&self, path: &Path, entries: &[Ace]) -> Result<()>;

    /// Name of this backend (for logging).
    fn name(&self) -> &'static str;
}

/// Create the ACL store for the current platform.
#[cfg(any(target_os = "linux", target_os = "freebsd"))]
pub fn platform_store() -> Result<Box<dyn AclStore>> {
    Ok(Box::new(super::fs::FsAclStore::new()))
}

/// Create the ACL store for the current platform.
#[cfg(not(any(target_os = "linux", target_os = "freebsd")))]
pub fn platform_store() -> Result<Box<dyn AclStore>> {
    Err(crate::error::Error::UnsupportedPlatform(
        "POSIX ACLs are required (Linux or FreeBSD)",
    ))
}
