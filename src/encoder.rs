//! The encoder facade: load a carrier list, then encode, decode, or
//! strip hidden data.

use crate::acl::{platform_store, AclMutator, AclSnapshot, AclStore};
use crate::carrier::FileList;
use crate::codec::{self, MAX_CHUNK_BYTES};
use crate::config::ChannelConfig;
use crate::error::{Error, Result};
use crate::mux::EncodePlan;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Lifecycle state of an [`AclEncoder`].
///
/// A value starts `Loaded` (construction binds a file list; there is no
/// unloaded encoder). Encoding moves to `Encoded`; stripping moves to
/// `Clean`; reloading a manifest returns to `Loaded`. On-disk synthetic
/// entries outlive the value: carriers keep whatever they physically
/// hold until explicitly stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderState {
    Loaded,
    Encoded,
    Clean,
}

impl EncoderState {
    fn name(self) -> &'static str {
        match self {
            Self::Loaded => "Loaded",
            Self::Encoded => "Encoded",
            Self::Clean => "Clean",
        }
    }
}

/// Hides a payload file inside the ACLs of a carrier set, and recovers
/// or removes it again.
///
/// An explicit value passed around by the caller; one instance per
/// loaded file list.
pub struct AclEncoder {
    config: ChannelConfig,
    mutator: AclMutator,
    list: FileList,
    state: EncoderState,
}

impl AclEncoder {
    /// Load a manifest using the platform ACL backend.
    pub fn load(manifest: &Path, config: ChannelConfig) -> Result<Self> {
        Self::with_store(manifest, platform_store()?, config)
    }

    /// Load a manifest against a caller-supplied ACL store.
    pub fn with_store(
        manifest: &Path,
        store: Box<dyn AclStore>,
        config: ChannelConfig,
    ) -> Result<Self> {
        config.validate()?;
        let list = FileList::load(manifest, store.as_ref(), &config)?;
        info!(
            manifest = %manifest.display(),
            carriers = list.len(),
            capacity = list.total_capacity(),
            backend = store.name(),
            "file list loaded"
        );
        Ok(Self {
            mutator: AclMutator::new(store, config.clone()),
            list,
            config,
            state: EncoderState::Loaded,
        })
    }

    /// Re-load a manifest, discarding prior in-memory state.
    ///
    /// Does not touch the disk: carriers encoded earlier keep their
    /// synthetic entries until [`Self::remove_encoded`] runs.
    pub fn reload(&mut self, manifest: &Path) -> Result<()> {
        let list = FileList::load(manifest, self.mutator.store(), &self.config)?;
        self.list = list;
        self.state = EncoderState::Loaded;
        Ok(())
    }

    pub fn state(&self) -> EncoderState {
        self.state
    }

    pub fn file_list(&self) -> &FileList {
        &self.list
    }

    /// Hide the file at `payload_path` inside the carrier set.
    ///
    /// All-or-nothing: capacity is planned for every carrier first, each
    /// carrier's ACL is snapshotted before mutation, and any failure
    /// rolls every already-mutated carrier back before the error is
    /// surfaced. On success returns the number of payload bytes stored.
    pub fn encode(&mut self, payload_path: &Path) -> Result<u64> {
        self.require("Encode")?;

        let payload = fs::read(payload_path).map_err(|e| Error::PayloadRead {
            path: payload_path.to_path_buf(),
            source: e,
        })?;

        let plan = EncodePlan::build(&self.list, payload.len())?;
        info!(
            payload = %payload_path.display(),
            bytes = payload.len(),
            carriers_used = plan.segments().len(),
            "encode planned"
        );

        // Snapshot every carrier before mutating anything; stale records
        // on unplanned carriers are stripped below, so they are part of
        // the rollback set too.
        let mut snapshots: Vec<(PathBuf, AclSnapshot)> = Vec::with_capacity(self.list.len());
        for carrier in self.list.carriers() {
            snapshots.push((carrier.path.clone(), self.mutator.snapshot(&carrier.path)?));
        }

        if let Err(err) = self.write_planned(&plan, &payload) {
            self.rollback(&snapshots);
            return Err(err);
        }

        self.state = EncoderState::Encoded;
        Ok(payload.len() as u64)
    }

    fn write_planned(&self, plan: &EncodePlan, payload: &[u8]) -> Result<()> {
        let mut planned = vec![false; self.list.len()];
        for (i, segment) in plan.segments().iter().enumerate() {
            let carrier = &self.list.carriers()[segment.carrier_index];
            let records = codec::serialize(
                plan.slice(payload, segment),
                MAX_CHUNK_BYTES,
                self.config.tag,
                plan.is_final(i),
            );
            self.mutator.write_synthetic(&carrier.path, &records)?;
            planned[segment.carrier_index] = true;
            debug!(
                path = %carrier.path.display(),
                bytes = segment.len,
                "segment written"
            );
        }

        // A shorter re-encode must not leave records from an earlier run
        // beyond the new terminal.
        for carrier in self.list.carriers() {
            if !planned[carrier.ordinal_index] {
                self.mutator.remove_synthetic(&carrier.path)?;
            }
        }
        Ok(())
    }

    fn rollback(&self, snapshots: &[(PathBuf, AclSnapshot)]) {
        for (path, snapshot) in snapshots {
            if let Err(err) = self.mutator.restore(path, snapshot) {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "rollback failed for carrier"
                );
            }
        }
    }

    /// Reconstruct the hidden payload and write it to `target`.
    ///
    /// A pure read: neither the carriers nor the encoder state change.
    /// Returns the number of payload bytes recovered.
    pub fn decode(&self, target: &Path) -> Result<u64> {
        self.require("Decode")?;
        let payload = self.decode_bytes()?;
        fs::write(target, &payload).map_err(|e| Error::PayloadWrite {
            path: target.to_path_buf(),
            source: e,
        })?;
        info!(
            target = %target.display(),
            bytes = payload.len(),
            "payload decoded"
        );
        Ok(payload.len() as u64)
    }

    /// Reconstruct the hidden payload in memory.
    ///
    /// Carriers are read in manifest order and the stream ends at the
    /// first carrier holding a terminal record; carriers without
    /// synthetic records are skipped. Records present but no terminal
    /// anywhere is a corrupt stream; no records anywhere is the empty
    /// payload.
    pub fn decode_bytes(&self) -> Result<Vec<u8>> {
        self.require("Decode")?;

        let mut payload = Vec::new();
        let mut terminated = false;
        for carrier in self.list.carriers() {
            let records = self.mutator.read_synthetic(&carrier.path)?;
            if records.is_empty() {
                continue;
            }
            let (bytes, terminal) = codec::deserialize(records, self.config.tag)?;
            payload.extend_from_slice(&bytes);
            if terminal {
                terminated = true;
                break;
            }
        }

        if !terminated && !payload.is_empty() {
            return Err(Error::CorruptEncoding(
                "no terminal record found in carrier set".to_string(),
            ));
        }
        Ok(payload)
    }

    /// Strip synthetic entries from every carrier, restoring clean ACLs.
    ///
    /// Idempotent: permitted in every state, so a second call right after
    /// the first is a no-op success. Real entries are never touched.
    pub fn remove_encoded(&mut self) -> Result<()> {
        for carrier in self.list.carriers() {
            self.mutator.remove_synthetic(&carrier.path)?;
        }
        info!(carriers = self.list.len(), "synthetic entries removed");
        self.state = EncoderState::Clean;
        Ok(())
    }

    fn require(&self, operation: &'static str) -> Result<()> {
        match self.state {
            EncoderState::Loaded | EncoderState::Encoded => Ok(()),
            EncoderState::Clean => Err(Error::InvalidState {
                operation,
                state: self.state.name(),
            }),
        }
    }
}
