//! ACL access: portable entry model, platform backends, and the mutator
//! that reads, appends, and strips synthetic entries.

mod entry;
#[cfg(any(target_os = "linux", target_os = "freebsd"))]
mod fs;
mod mem;
mod mutator;
mod store;

pub use entry::{Ace, AceKind, PERM_EXECUTE, PERM_READ, PERM_WRITE};
#[cfg(any(target_os = "linux", target_os = "freebsd"))]
pub use fs::FsAclStore;
pub use mem::MemAclStore;
pub use mutator::{AclMutator, AclSnapshot};
pub use store::{platform_store, AclStore};
