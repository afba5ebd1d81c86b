//! ACL Stash
//!
//! Hides an arbitrary payload file inside the access-control lists of a
//! set of otherwise-unrelated carrier files. The carriers' contents are
//! never modified; payload chunks travel as tagged, sequence-numbered
//! synthetic `user:` entries appended to each carrier's ACL, and can be
//! recovered or stripped again at any time.
//!
//! # Architecture
//!
//! ```text
//! Payload → Plan (carrier capacities) → Chunk (ACE codec) → ACL entries
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use acl_stash::{AclEncoder, ChannelConfig};
//! use std::path::Path;
//!
//! // Bind a manifest of carrier paths
//! let mut encoder = AclEncoder::load(
//!     Path::new("carriers.txt"),
//!     ChannelConfig::default(),
//! ).unwrap();
//!
//! // Hide a file, recover it, then wipe the hidden entries
//! encoder.encode(Path::new("secret.bin")).unwrap();
//! encoder.decode(Path::new("recovered.bin")).unwrap();
//! encoder.remove_encoded().unwrap();
//! ```

pub mod acl;
pub mod carrier;
pub mod codec;
pub mod config;
pub mod encoder;
pub mod error;
pub mod mux;

pub use config::ChannelConfig;
pub use encoder::{AclEncoder, EncoderState};
pub use error::{Error, Result};
