//! # Core Wire Components
//!
//! Low-level building blocks shared by every codec.
//!
//! ## Components
//! - **TypeIdentifier**: hierarchical identifiers addressing packet elements
//! - **TLV**: bounds-checked byte cursor and Type/Length helpers
//! - **Schema**: CCNx 1.0 TLV type numbers and well-known TIDs
//!
//! ## Wire Format
//! ```text
//! [Type(2)] [Length(2)] [Value(Length)]
//! ```
//!
//! ## Safety
//! - Every read is bounds-checked before touching the buffer
//! - Lengths are validated against the 16-bit field before writing

pub mod schema;
pub mod tid;
pub mod tlv;
