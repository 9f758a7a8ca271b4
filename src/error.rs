//! # Error Types
//!
//! Error handling for the CCNx codec framework.
//!
//! This module defines every failure that can surface from type identifier
//! parsing, codec registration, TLV decoding/encoding and signature handling.
//!
//! ## Error Categories
//! - **Identifier Errors**: malformed or out-of-range type identifiers
//! - **Registry Errors**: duplicate registrations, unknown types, frozen registry
//! - **Wire Errors**: truncated input, length overflows, unknown or missing fields
//! - **Crypto Errors**: bad digests, unsupported suites, unusable keys
//! - **Configuration Errors**: invalid or unreadable configuration
//!
//! Decoding never returns a partially built message: the first error aborts the
//! whole container and is handed back to the caller. Wire errors carry the
//! offending type identifier and byte offset so a malformed packet can be
//! located.
//!
//! ## Example Usage
//! ```rust
//! use ccnx_codec::core::tid::TypeIdentifier;
//! use ccnx_codec::error::CodecError;
//!
//! match "3.x.1".parse::<TypeIdentifier>() {
//!     Ok(tid) => println!("parsed {tid}"),
//!     Err(CodecError::MalformedTid { input, .. }) => println!("rejected {input}"),
//!     Err(other) => println!("unexpected: {other}"),
//! }
//! ```

use crate::core::tid::TypeIdentifier;
use crate::protocol::validation::CryptoSuite;
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Registry lock errors
    pub const ERR_REGISTRY_WRITE_LOCK: &str = "Failed to acquire write lock on codec registry";
    pub const ERR_REGISTRY_READ_LOCK: &str = "Failed to acquire read lock on codec registry";

    /// Type identifier parsing errors
    pub const ERR_TID_EMPTY: &str = "type identifier is empty";
    pub const ERR_TID_EMPTY_COMPONENT: &str = "empty component";
    pub const ERR_TID_NOT_NUMERIC: &str = "component is not a non-negative decimal integer";
    pub const ERR_TID_OVERFLOW: &str = "component does not fit in 32 bits";

    /// Field structure errors
    pub const ERR_HASH_TOO_SHORT: &str = "hash value must be at least 8 bytes";
    pub const ERR_PAYLOAD_TYPE_LENGTH: &str = "payload type must be exactly 1 byte";
    pub const ERR_PAYLOAD_TYPE_UNKNOWN: &str = "unknown payload type";
    pub const ERR_TIMESTAMP_LENGTH: &str = "timestamp must be exactly 8 bytes";

    /// Validation shape errors
    pub const ERR_KEYID_NOT_ALLOWED: &str = "crypto suite does not carry a KeyId";
    pub const ERR_KEYID_REQUIRED: &str = "public key crypto suite requires a KeyId";
    pub const ERR_PUBLIC_KEY_NOT_ALLOWED: &str = "crypto suite does not carry a public key";
    pub const ERR_PAYLOAD_WITHOUT_ALGORITHM: &str = "validation payload without validation algorithm";
    pub const ERR_ALGORITHM_WITHOUT_PAYLOAD: &str = "validation algorithm without validation payload";
    pub const ERR_SUITE_UNDERRUN: &str = "crypto suite is shorter than its validation algorithm section";

    /// Key errors
    pub const ERR_KEYLESS_SUITE: &str = "CRC32C validation does not use keys";
    pub const ERR_KEY_KIND: &str = "key kind does not match the crypto suite";
    pub const ERR_KEY_ENCODING: &str = "key bytes are not a valid encoding for the crypto suite";
    pub const ERR_EMPTY_SECRET: &str = "symmetric key must not be empty";

    /// Clock errors
    pub const ERR_SYSTEM_TIME: &str = "System time is before UNIX_EPOCH";
}

/// CodecError is the primary error type for all codec operations
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Malformed type identifier '{input}': {reason}")]
    MalformedTid { input: String, reason: &'static str },

    #[error("Component index {index} out of range for type identifier of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("Codec already registered for {0}")]
    DuplicateRegistration(TypeIdentifier),

    #[error("Codec registry is frozen, cannot register {0}")]
    RegistryFrozen(TypeIdentifier),

    #[error("No codec registered for {0}")]
    UnknownType(TypeIdentifier),

    #[error("Truncated input at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Field {tid} at offset {offset} ends past its container (container length {container_length})")]
    LengthOverflow {
        tid: TypeIdentifier,
        offset: usize,
        container_length: usize,
    },

    #[error("Unknown field {tid} at offset {offset}")]
    UnknownField { tid: TypeIdentifier, offset: usize },

    #[error("Duplicate field {tid} at offset {offset}")]
    DuplicateField { tid: TypeIdentifier, offset: usize },

    #[error("Missing mandatory field {0}")]
    MissingMandatoryField(TypeIdentifier),

    #[error("Type mismatch: codec {codec} cannot handle a {found} field")]
    TypeMismatch {
        codec: &'static str,
        found: &'static str,
    },

    #[error("Wrong message type {found:#06x} at offset {offset}, expected {expected:#06x}")]
    WrongMessageType {
        expected: u16,
        found: u16,
        offset: usize,
    },

    #[error("Invalid length {length} for {tid}: {reason}")]
    InvalidFieldLength {
        tid: TypeIdentifier,
        length: usize,
        reason: &'static str,
    },

    #[error("Invalid field {tid}: {reason}")]
    InvalidField {
        tid: TypeIdentifier,
        reason: &'static str,
    },

    #[error("{count} trailing bytes at offset {offset}")]
    TrailingBytes { offset: usize, count: usize },

    #[error("Message too large: {size} bytes (limit {limit})")]
    MessageTooLarge { size: usize, limit: usize },

    #[error("Invalid digest length {actual} for {suite}, expected {expected}")]
    InvalidDigestLength {
        suite: CryptoSuite,
        expected: usize,
        actual: usize,
    },

    #[error("Unsupported crypto suite: {0}")]
    UnsupportedCryptoSuite(CryptoSuite),

    #[error("Unknown crypto suite type {0:#06x}")]
    UnknownCryptoSuite(u16),

    #[error("Invalid key: {0}")]
    InvalidKey(&'static str),

    #[error("Signing failed: {0}")]
    SigningFailure(String),

    #[error("{0}")]
    LockPoisoned(&'static str),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Formatting error")]
    Format(#[from] std::fmt::Error),
}

impl CodecError {
    /// Byte offset of the failure within the decoded buffer, when known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            CodecError::TruncatedInput { offset, .. }
            | CodecError::LengthOverflow { offset, .. }
            | CodecError::UnknownField { offset, .. }
            | CodecError::DuplicateField { offset, .. }
            | CodecError::WrongMessageType { offset, .. }
            | CodecError::TrailingBytes { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// Type identifier of the offending element, when known.
    pub fn tid(&self) -> Option<&TypeIdentifier> {
        match self {
            CodecError::DuplicateRegistration(tid)
            | CodecError::RegistryFrozen(tid)
            | CodecError::UnknownType(tid)
            | CodecError::MissingMandatoryField(tid)
            | CodecError::LengthOverflow { tid, .. }
            | CodecError::UnknownField { tid, .. }
            | CodecError::DuplicateField { tid, .. }
            | CodecError::InvalidFieldLength { tid, .. }
            | CodecError::InvalidField { tid, .. } => Some(tid),
            _ => None,
        }
    }
}

/// Type alias for Results using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;
