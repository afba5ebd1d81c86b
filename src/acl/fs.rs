//! Filesystem ACL store backed by the `exacl` crate (POSIX.1e).

use crate::acl::entry::{Ace, AceKind, PERM_EXECUTE, PERM_READ, PERM_WRITE};
use crate::acl::store::AclStore;
use crate::error::{Error, Result};
use exacl::{getfacl, setfacl, AclEntry, AclEntryKind, Flag, Perm};
use std::io;
use std::path::Path;

/// ACL store operating on the real filesystem.
#[derive(Debug, Default)]
pub struct FsAclStore;

impl FsAclStore {
    pub fn new() -> Self {
        Self
    }
}

impl AclStore for FsAclStore {
    fn read_acl(&self, path: &Path) -> Result<Vec<Ace>> {
        let entries = getfacl(path, None).map_err(|e| map_io(e, path))?;
        entries.iter().map(|e| from_exacl(e, path)).collect()
    }

    fn write_acl(&self, path: &Path, entries: &[Ace]) -> Result<()> {
        // The kernel rejects ACLs whose entries are not in canonical
        // order (owner, named users, owning group, named groups, mask,
        // other), so sort before handing the list over.
        let mut sorted: Vec<&Ace> = entries.iter().collect();
        sorted.sort_by_key(|e| sort_key(e));
        let converted: Vec<AclEntry> = sorted.iter().map(|e| to_exacl(e)).collect();
        setfacl(&[path], &converted, None).map_err(|e| map_io(e, path))
    }

    fn name(&self) -> &'static str {
        "fs"
    }
}

fn map_io(err: io::Error, path: &Path) -> Error {
    if err.kind() == io::ErrorKind::PermissionDenied {
        Error::AccessDenied(path.to_path_buf())
    } else {
        Error::Io(err)
    }
}

fn sort_key(entry: &Ace) -> (bool, u8, u32, String) {
    let rank = match (entry.kind, entry.name.is_empty()) {
        (AceKind::User, true) => 0,
        (AceKind::User, false) => 1,
        (AceKind::Group, true) => 2,
        (AceKind::Group, false) => 3,
        (AceKind::Mask, _) => 4,
        (AceKind::Other, _) => 5,
    };
    let qualifier = entry.name.parse::<u32>().unwrap_or(u32::MAX);
    (entry.default_entry, rank, qualifier, entry.name.clone())
}

fn to_exacl(entry: &Ace) -> AclEntry {
    let mut perms = Perm::empty();
    if entry.perms & PERM_READ != 0 {
        perms |= Perm::READ;
    }
    if entry.perms & PERM_WRITE != 0 {
        perms |= Perm::WRITE;
    }
    if entry.perms & PERM_EXECUTE != 0 {
        perms |= Perm::EXECUTE;
    }

    let kind = match entry.kind {
        AceKind::User => AclEntryKind::User,
        AceKind::Group => AclEntryKind::Group,
        AceKind::Mask => AclEntryKind::Mask,
        AceKind::Other => AclEntryKind::Other,
    };

    let flags = if entry.default_entry {
        Flag::DEFAULT
    } else {
        Flag::empty()
    };

    AclEntry {
        kind,
        name: entry.name.clone(),
        perms,
        flags,
        allow: entry.allow,
    }
}

fn from_exacl(entry: &AclEntry, path: &Path) -> Result<Ace> {
    let kind = match entry.kind {
        AclEntryKind::User => AceKind::User,
        AclEntryKind::Group => AceKind::Group,
        AclEntryKind::Mask => AceKind::Mask,
        AclEntryKind::Other => AceKind::Other,
        k => {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsupported ACL entry kind {:?} on {}", k, path.display()),
            )))
        }
    };

    let mut perms = 0u8;
    if entry.perms.contains(Perm::READ) {
        perms |= PERM_READ;
    }
    if entry.perms.contains(Perm::WRITE) {
        perms |= PERM_WRITE;
    }
    if entry.perms.contains(Perm::EXECUTE) {
        perms |= PERM_EXECUTE;
    }

    Ok(Ace {
        kind,
        name: entry.name.clone(),
        perms,
        allow: entry.allow,
        default_entry: entry.flags.contains(Flag::DEFAULT),
    })
}
