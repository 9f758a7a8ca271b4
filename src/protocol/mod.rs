//! # Protocol Messages
//!
//! In-memory representation of CCNx 1.0 messages and the field values codecs
//! exchange.
//!
//! ## Messages
//! - **Interest**: request by name, with optional KeyId / object hash restrictions
//! - **ContentObject**: named (or nameless) data with payload type and expiry
//!
//! ## Validation
//! A [`PacketBody`](message::PacketBody) pairs a message with an optional
//! [`ValidationAlgorithm`](validation::ValidationAlgorithm). The algorithm is
//! metadata only; signatures are checked by `crate::crypto` verifiers.

pub mod content_object;
pub mod field;
pub mod hash_value;
pub mod interest;
pub mod message;
pub mod name;
pub mod validation;


pub use content_object::{ContentObject, PayloadType};
pub use field::Field;
pub use hash_value::HashValue;
pub use interest::Interest;
pub use message::{Message, PacketBody};
pub use name::{Name, NameSegment, NameSegmentType};
pub use validation::{
    CryptoSuite, KeyId, PublicKey, Signature, SigningTime, SuiteKind, ValidationAlgorithm,
};
