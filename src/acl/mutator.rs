//! Read, append, and strip synthetic entries on a carrier's ACL.

use crate::acl::entry::{Ace, AceKind, PERM_READ, PERM_WRITE};
use crate::acl::store::AclStore;
use crate::codec::SyntheticAce;
use crate::config::ChannelConfig;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Opaque snapshot of a file's complete ACL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclSnapshot(Vec<Ace>);

impl AclSnapshot {
    pub(crate) fn new(entries: Vec<Ace>) -> Self {
        Self(entries)
    }

    pub(crate) fn entries(&self) -> &[Ace] {
        &self.0
    }
}

/// Performs the actual read/replace/remove of a file's ACL, keeping
/// synthetic entries distinguishable from the file's genuine permission
/// entries by their tag.
pub struct AclMutator {
    store: Box<dyn AclStore>,
    config: ChannelConfig,
}

impl AclMutator {
    pub fn new(store: Box<dyn AclStore>, config: ChannelConfig) -> Self {
        Self { store, config }
    }

    /// The underlying ACL store.
    pub fn store(&self) -> &dyn AclStore {
        self.store.as_ref()
    }

    /// Write `records` as synthetic entries on `path`.
    ///
    /// Real entries are never modified or reordered. Synthetic entries
    /// from an earlier encode are replaced rather than accumulated. A
    /// mask entry is added only when the ACL has none; its permissions
    /// cover the owning-group entry so effective access is unchanged.
    pub fn write_synthetic(&self, path: &Path, records: &[SyntheticAce]) -> Result<()> {
        let current = self.store.read_acl(path)?;
        let mut kept: Vec<Ace> = current
            .into_iter()
            .filter(|e| e.as_synthetic(self.config.tag).is_none())
            .collect();

        let access_count = kept.iter().filter(|e| !e.default_entry).count();
        let has_mask = kept
            .iter()
            .any(|e| !e.default_entry && e.kind == AceKind::Mask);
        let mask_add = usize::from(!has_mask && !records.is_empty());

        let total = access_count + mask_add + records.len();
        if total > self.config.max_acl_entries {
            return Err(Error::CarrierTooSmall {
                path: path.to_path_buf(),
                entries: total,
                limit: self.config.max_acl_entries,
            });
        }

        for record in records {
            kept.push(ace_from_record(record));
        }

        if mask_add == 1 {
            let group_perms = kept
                .iter()
                .find(|e| !e.default_entry && e.kind == AceKind::Group && e.name.is_empty())
                .map(|e| e.perms)
                .unwrap_or(0);
            kept.push(Ace::mask(group_perms | PERM_READ | PERM_WRITE));
        }

        debug!(
            path = %path.display(),
            records = records.len(),
            "writing synthetic entries"
        );
        self.store.write_acl(path, &kept)
    }

    /// Read the synthetic records present on `path`, in on-disk order.
    pub fn read_synthetic(&self, path: &Path) -> Result<Vec<SyntheticAce>> {
        let entries = self.store.read_acl(path)?;
        Ok(entries
            .iter()
            .filter_map(|e| e.as_synthetic(self.config.tag))
            .map(|(subject, wide)| SyntheticAce::from_subject(subject, wide))
            .collect())
    }

    /// Delete the synthetic entries on `path`, leaving real entries
    /// untouched. Succeeds as a no-op when none are present.
    pub fn remove_synthetic(&self, path: &Path) -> Result<()> {
        let entries = self.store.read_acl(path)?;
        let before = entries.len();
        let mut kept: Vec<Ace> = entries
            .into_iter()
            .filter(|e| e.as_synthetic(self.config.tag).is_none())
            .collect();

        if kept.len() == before {
            return Ok(());
        }

        // A mask with no named entries left was added by us; drop it so
        // the ACL returns to its original shape.
        let has_named = kept.iter().any(|e| !e.default_entry && e.is_named());
        if !has_named {
            kept.retain(|e| e.default_entry || e.kind != AceKind::Mask);
        }

        debug!(
            path = %path.display(),
            removed = before - kept.len(),
            "removing synthetic entries"
        );
        self.store.write_acl(path, &kept)
    }

    /// Snapshot the complete ACL of `path`.
    pub fn snapshot(&self, path: &Path) -> Result<AclSnapshot> {
        Ok(AclSnapshot::new(self.store.read_acl(path)?))
    }

    /// Restore `path` to a previously taken snapshot.
    pub fn restore(&self, path: &Path, snapshot: &AclSnapshot) -> Result<()> {
        self.store.write_acl(path, snapshot.entries())
    }
}

fn ace_from_record(record: &SyntheticAce) -> Ace {
    let mut perms = PERM_READ;
    if record.wide() {
        perms |= PERM_WRITE;
    }
    Ace::named_user(record.subject_id().to_string(), perms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::mem::MemAclStore;
    use crate::codec::serialize;
    use crate::codec::MAX_CHUNK_BYTES;

    fn mutator(store: &MemAclStore, max_acl_entries: usize) -> AclMutator {
        let config = ChannelConfig::new(crate::config::DEFAULT_SUBJECT_TAG, max_acl_entries);
        AclMutator::new(Box::new(store.clone()), config)
    }

    fn records(bytes: &[u8], close: bool) -> Vec<SyntheticAce> {
        serialize(bytes, MAX_CHUNK_BYTES, crate::config::DEFAULT_SUBJECT_TAG, close)
    }

    #[test]
    fn test_write_read_roundtrip() {
        let store = MemAclStore::new();
        let m = mutator(&store, 64);
        let path = Path::new("/tmp/carrier");

        let written = records(b"hidden bytes", true);
        m.write_synthetic(path, &written).unwrap();

        let read = m.read_synthetic(path).unwrap();
        assert_eq!(read, written);
    }

    #[test]
    fn test_real_entries_untouched_and_mask_added() {
        let store = MemAclStore::new();
        let m = mutator(&store, 64);
        let path = Path::new("/tmp/carrier");

        m.write_synthetic(path, &records(b"xy", true)).unwrap();

        let acl = store.read_acl(path).unwrap();
        for base in MemAclStore::base_acl() {
            assert!(acl.contains(&base));
        }
        assert!(acl
            .iter()
            .any(|e| e.kind == AceKind::Mask && e.name.is_empty()));
    }

    #[test]
    fn test_existing_mask_not_duplicated() {
        let store = MemAclStore::new();
        let path = Path::new("/tmp/carrier");
        let mut seeded = MemAclStore::base_acl();
        seeded.push(Ace::named_user("1000", PERM_READ));
        seeded.push(Ace::mask(PERM_READ));
        store.seed(path, seeded);

        let m = mutator(&store, 64);
        m.write_synthetic(path, &records(b"xy", true)).unwrap();

        let acl = store.read_acl(path).unwrap();
        let masks = acl.iter().filter(|e| e.kind == AceKind::Mask).count();
        assert_eq!(masks, 1);
        // the real mask keeps its original permissions
        assert!(acl
            .iter()
            .any(|e| e.kind == AceKind::Mask && e.perms == PERM_READ));
    }

    #[test]
    fn test_rewrite_replaces_previous_records() {
        let store = MemAclStore::new();
        let m = mutator(&store, 64);
        let path = Path::new("/tmp/carrier");

        m.write_synthetic(path, &records(b"first payload", true))
            .unwrap();
        let second = records(b"2nd", true);
        m.write_synthetic(path, &second).unwrap();

        assert_eq!(m.read_synthetic(path).unwrap(), second);
    }

    #[test]
    fn test_entry_limit_enforced() {
        let store = MemAclStore::new();
        // base triple + mask + 2 records > 5
        let m = mutator(&store, 5);
        let path = Path::new("/tmp/carrier");

        let result = m.write_synthetic(path, &records(b"abcd", true));
        assert!(matches!(result, Err(Error::CarrierTooSmall { .. })));
    }

    #[test]
    fn test_remove_is_idempotent_and_exact() {
        let store = MemAclStore::new();
        let m = mutator(&store, 64);
        let path = Path::new("/tmp/carrier");
        let original = store.read_acl(path).unwrap();

        m.write_synthetic(path, &records(b"temporary", true)).unwrap();
        m.remove_synthetic(path).unwrap();
        assert_eq!(store.read_acl(path).unwrap(), original);

        // second removal is a no-op success
        m.remove_synthetic(path).unwrap();
        assert_eq!(store.read_acl(path).unwrap(), original);
    }

    #[test]
    fn test_remove_keeps_real_mask() {
        let store = MemAclStore::new();
        let path = Path::new("/tmp/carrier");
        let mut seeded = MemAclStore::base_acl();
        seeded.push(Ace::named_group("staff", PERM_READ));
        seeded.push(Ace::mask(PERM_READ));
        store.seed(path, seeded.clone());

        let m = mutator(&store, 64);
        m.write_synthetic(path, &records(b"zz", true)).unwrap();
        m.remove_synthetic(path).unwrap();

        assert_eq!(store.read_acl(path).unwrap(), seeded);
    }

    #[test]
    fn test_snapshot_restore() {
        let store = MemAclStore::new();
        let m = mutator(&store, 64);
        let path = Path::new("/tmp/carrier");

        let snapshot = m.snapshot(path).unwrap();
        m.write_synthetic(path, &records(b"scratch", true)).unwrap();
        m.restore(path, &snapshot).unwrap();

        assert_eq!(store.read_acl(path).unwrap(), snapshot.entries());
    }
}
