//! In-memory ACL store.
//!
//! A hermetic stand-in for the filesystem backend: cloned handles share
//! state, unknown paths synthesize the base entry triple a plain-mode
//! file would report, and writes can be failed on demand to exercise
//! rollback paths.

use crate::acl::entry::{Ace, PERM_READ, PERM_WRITE};
use crate::acl::store::AclStore;
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Inner {
    files: HashMap<PathBuf, Vec<Ace>>,
    deny_writes: HashSet<PathBuf>,
}

/// Shared in-memory ACL store.
#[derive(Debug, Clone, Default)]
pub struct MemAclStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemAclStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The base ACL of a plain-mode `rw-r--r--` file.
    pub fn base_acl() -> Vec<Ace> {
        vec![
            Ace::user_obj(PERM_READ | PERM_WRITE),
            Ace::group_obj(PERM_READ),
            Ace::other(PERM_READ),
        ]
    }

    /// Preload a path with a specific ACL.
    pub fn seed(&self, path: impl Into<PathBuf>, entries: Vec<Ace>) {
        self.lock().files.insert(path.into(), entries);
    }

    /// Make every subsequent write to `path` fail with `AccessDenied`.
    pub fn deny_writes_to(&self, path: impl Into<PathBuf>) {
        self.lock().deny_writes.insert(path.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AclStore for MemAclStore {
    fn read_acl(&self, path: &Path) -> Result<Vec<Ace>> {
        Ok(self
            .lock()
            .files
            .get(path)
            .cloned()
            .unwrap_or_else(Self::base_acl))
    }

    fn write_acl(&self, path: &Path, entries: &[Ace]) -> Result<()> {
        let mut inner = self.lock();
        if inner.deny_writes.contains(path) {
            return Err(Error::AccessDenied(path.to_path_buf()));
        }
        inner.files.insert(path.to_path_buf(), entries.to_vec());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mem"
    }
}
