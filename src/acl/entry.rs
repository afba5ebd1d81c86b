//! Portable ACL entry model, independent of the platform ACL library.

use serde::{Deserialize, Serialize};

/// Read permission bit.
pub const PERM_READ: u8 = 0b100;
/// Write permission bit.
pub const PERM_WRITE: u8 = 0b010;
/// Execute permission bit.
pub const PERM_EXECUTE: u8 = 0b001;

/// Kind of an access-control entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AceKind {
    /// Owner (`user::`) when the name is empty, named user otherwise.
    User,
    /// Owning group (`group::`) when the name is empty, named group otherwise.
    Group,
    /// Mask entry bounding the effective permissions of named entries.
    Mask,
    /// Everyone else (`other::`).
    Other,
}

/// One access-control entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ace {
    pub kind: AceKind,
    /// Qualifier: empty for owner/group/mask/other entries, a user or
    /// group name (or decimal id) for named entries.
    pub name: String,
    /// Permission bits (`PERM_READ | PERM_WRITE | PERM_EXECUTE`).
    pub perms: u8,
    /// Allow entry. POSIX.1e has no deny entries; the flag exists for
    /// snapshot fidelity with richer backends.
    pub allow: bool,
    /// Entry belongs to the default (inherited) ACL of a directory.
    pub default_entry: bool,
}

impl Ace {
    fn access_entry(kind: AceKind, name: String, perms: u8) -> Self {
        Self {
            kind,
            name,
            perms,
            allow: true,
            default_entry: false,
        }
    }

    /// Owner entry (`user::`).
    pub fn user_obj(perms: u8) -> Self {
        Self::access_entry(AceKind::User, String::new(), perms)
    }

    /// Named user entry (`user:name:`).
    pub fn named_user(name: impl Into<String>, perms: u8) -> Self {
        Self::access_entry(AceKind::User, name.into(), perms)
    }

    /// Owning-group entry (`group::`).
    pub fn group_obj(perms: u8) -> Self {
        Self::access_entry(AceKind::Group, String::new(), perms)
    }

    /// Named group entry (`group:name:`).
    pub fn named_group(name: impl Into<String>, perms: u8) -> Self {
        Self::access_entry(AceKind::Group, name.into(), perms)
    }

    /// Mask entry (`mask::`).
    pub fn mask(perms: u8) -> Self {
        Self::access_entry(AceKind::Mask, String::new(), perms)
    }

    /// Other entry (`other::`).
    pub fn other(perms: u8) -> Self {
        Self::access_entry(AceKind::Other, String::new(), perms)
    }

    /// Whether this is a named user or group entry.
    pub fn is_named(&self) -> bool {
        matches!(self.kind, AceKind::User | AceKind::Group) && !self.name.is_empty()
    }

    /// Interpret this entry as a synthetic record carrier.
    ///
    /// Returns the packed subject id and whether the entry carries a full
    /// 2-byte chunk (encoded in the write permission bit), or `None` for
    /// real entries.
    pub fn as_synthetic(&self, tag: u8) -> Option<(u32, bool)> {
        if self.default_entry || !self.allow || self.kind != AceKind::User || self.name.is_empty()
        {
            return None;
        }
        let subject: u32 = self.name.parse().ok()?;
        if (subject >> 24) as u8 != tag {
            return None;
        }
        Some((subject, self.perms & PERM_WRITE != 0))
    }
}
