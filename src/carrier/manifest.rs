//! The manifest-ordered carrier file list.

use crate::acl::{AclSnapshot, AclStore};
use crate::carrier::capacity::capacity_of_entries;
use crate::config::ChannelConfig;
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One carrier file, as loaded from the manifest.
///
/// Manifest order is load-bearing: it defines where payload chunks land,
/// and decode walks carriers in the same order.
#[derive(Debug, Clone)]
pub struct CarrierDescriptor {
    /// Path to the carrier file.
    pub path: PathBuf,
    /// Position within the manifest (0-based).
    pub ordinal_index: usize,
    /// Payload bytes this carrier's ACL can hold. Zero for a carrier
    /// whose ACL was already saturated at load time; the multiplexer
    /// skips those.
    pub capacity_bytes: u64,
    /// The carrier's complete ACL as of load time.
    original_acl: AclSnapshot,
}

impl CarrierDescriptor {
    /// The ACL snapshot taken when the list was loaded.
    pub fn original_acl(&self) -> &AclSnapshot {
        &self.original_acl
    }
}

/// Ordered set of carrier files parsed from a manifest.
#[derive(Debug)]
pub struct FileList {
    manifest: PathBuf,
    carriers: Vec<CarrierDescriptor>,
}

impl FileList {
    /// Load a manifest: one carrier path per line, blank lines skipped.
    ///
    /// Fails with `ManifestNotFound` when the manifest itself is absent,
    /// `DuplicateCarrier` on a repeated path, and `CarrierNotFound`
    /// listing *every* missing carrier so the caller can report all
    /// problems at once.
    pub fn load(manifest: &Path, store: &dyn AclStore, config: &ChannelConfig) -> Result<Self> {
        if !manifest.is_file() {
            return Err(Error::ManifestNotFound(manifest.to_path_buf()));
        }
        let text = fs::read_to_string(manifest)?;

        let mut seen = HashSet::new();
        let mut paths = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if !seen.insert(line.to_string()) {
                return Err(Error::DuplicateCarrier(PathBuf::from(line)));
            }
            paths.push(PathBuf::from(line));
        }

        let missing: Vec<PathBuf> = paths.iter().filter(|p| !p.is_file()).cloned().collect();
        if !missing.is_empty() {
            return Err(Error::CarrierNotFound(missing));
        }

        let mut carriers = Vec::with_capacity(paths.len());
        for (ordinal_index, path) in paths.into_iter().enumerate() {
            let entries = store.read_acl(&path)?;
            let capacity_bytes = capacity_of_entries(&entries, config);
            debug!(
                path = %path.display(),
                capacity_bytes,
                "carrier loaded"
            );
            carriers.push(CarrierDescriptor {
                path,
                ordinal_index,
                capacity_bytes,
                original_acl: AclSnapshot::new(entries),
            });
        }

        Ok(Self {
            manifest: manifest.to_path_buf(),
            carriers,
        })
    }

    /// Path of the manifest this list was loaded from.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest
    }

    /// The carriers, in manifest order.
    pub fn carriers(&self) -> &[CarrierDescriptor] {
        &self.carriers
    }

    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }

    /// Total payload capacity across the whole list.
    pub fn total_capacity(&self) -> u64 {
        self.carriers.iter().map(|c| c.capacity_bytes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::{Ace, MemAclStore, PERM_READ};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_manifest(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("carriers.txt");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"carrier").unwrap();
        path
    }

    #[test]
    fn test_load_preserves_manifest_order() {
        let dir = TempDir::new().unwrap();
        let a = touch(&dir, "a.dat");
        let b = touch(&dir, "b.dat");
        let manifest = write_manifest(
            &dir,
            &format!("{}\n\n{}\n", b.display(), a.display()),
        );

        let store = MemAclStore::new();
        let list = FileList::load(&manifest, &store, &ChannelConfig::default()).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.carriers()[0].path, b);
        assert_eq!(list.carriers()[0].ordinal_index, 0);
        assert_eq!(list.carriers()[1].path, a);
        assert_eq!(list.carriers()[1].ordinal_index, 1);
        assert!(list.total_capacity() > 0);

        // the load-time snapshot reflects the carrier's current ACL
        assert_eq!(
            list.carriers()[0].original_acl().entries(),
            store.read_acl(&b).unwrap().as_slice()
        );
    }

    #[test]
    fn test_manifest_not_found() {
        let dir = TempDir::new().unwrap();
        let store = MemAclStore::new();
        let result = FileList::load(
            &dir.path().join("missing.txt"),
            &store,
            &ChannelConfig::default(),
        );
        assert!(matches!(result, Err(Error::ManifestNotFound(_))));
    }

    #[test]
    fn test_all_missing_carriers_collected() {
        let dir = TempDir::new().unwrap();
        let a = touch(&dir, "a.dat");
        let manifest = write_manifest(
            &dir,
            &format!(
                "{}\n{}\n{}\n",
                dir.path().join("ghost1").display(),
                a.display(),
                dir.path().join("ghost2").display()
            ),
        );

        let store = MemAclStore::new();
        let result = FileList::load(&manifest, &store, &ChannelConfig::default());
        match result {
            Err(Error::CarrierNotFound(missing)) => {
                assert_eq!(missing.len(), 2);
                assert_eq!(missing[0], dir.path().join("ghost1"));
                assert_eq!(missing[1], dir.path().join("ghost2"));
            }
            other => panic!("expected CarrierNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_duplicate_carrier_rejected() {
        let dir = TempDir::new().unwrap();
        let a = touch(&dir, "a.dat");
        let manifest = write_manifest(&dir, &format!("{}\n{}\n", a.display(), a.display()));

        let store = MemAclStore::new();
        let result = FileList::load(&manifest, &store, &ChannelConfig::default());
        assert!(matches!(result, Err(Error::DuplicateCarrier(_))));
    }

    #[test]
    fn test_saturated_carrier_kept_with_zero_capacity() {
        let dir = TempDir::new().unwrap();
        let full = touch(&dir, "full.dat");
        let fresh = touch(&dir, "fresh.dat");
        let manifest =
            write_manifest(&dir, &format!("{}\n{}\n", full.display(), fresh.display()));

        let store = MemAclStore::new();
        let config = ChannelConfig::new(crate::config::DEFAULT_SUBJECT_TAG, 8);
        let mut entries = MemAclStore::base_acl();
        for i in 0..4u32 {
            entries.push(Ace::named_user((1000 + i).to_string(), PERM_READ));
        }
        entries.push(Ace::mask(PERM_READ));
        store.seed(&full, entries);

        let list = FileList::load(&manifest, &store, &config).unwrap();
        assert_eq!(list.carriers()[0].capacity_bytes, 0);
        assert!(list.carriers()[1].capacity_bytes > 0);
    }
}
