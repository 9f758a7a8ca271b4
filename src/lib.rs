//! # ccnx-codec
//!
//! TLV packet codec framework for CCNx 1.0 packet bodies.
//!
//! Packet elements are addressed by hierarchical type identifiers
//! ([`TypeIdentifier`]) and each one is handled by a pluggable
//! [`FieldCodec`](codec::FieldCodec) looked up in a [`CodecRegistry`].
//! Message level codecs walk the nested TLV structure of Interests and
//! Content Objects, dispatching every field through the registry, and
//! [`PacketBodyCodec`] frames a message together with its validation
//! algorithm and signature.
//!
//! ## Layout
//! - [`core`]: type identifiers, TLV cursor and schema constants
//! - [`protocol`]: in-memory messages and field values
//! - [`codec`]: field codecs, the registry and message codecs
//! - [`crypto`]: hashers, signers and verifiers for each crypto suite
//! - [`config`]: TOML / environment configuration
//! - [`utils`]: logging setup and metrics
//!
//! ## Example
//! ```
//! use ccnx_codec::{Interest, Message, Name, PacketBody, PacketBodyCodec};
//!
//! let codec = PacketBodyCodec::default();
//! let body = PacketBody::unsigned(Message::Interest(Interest::new(Name::parse("/parc/doc"))));
//!
//! let bytes = codec.encode(&body).unwrap();
//! let decoded = codec.decode(&bytes).unwrap();
//! assert_eq!(decoded, body);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod codec;
pub mod config;
pub mod core;
pub mod crypto;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::codec::{global_registry, CodecRegistry, DuplicatePolicy, PacketBodyCodec};
pub use crate::config::CodecConfig;
pub use crate::core::tid::TypeIdentifier;
pub use crate::error::{CodecError, Result};
pub use crate::protocol::{
    ContentObject, CryptoSuite, Field, Interest, Message, Name, PacketBody, ValidationAlgorithm,
};
