//! # Codecs
//!
//! Field codecs translate one TLV element to and from a [`Field`]. A
//! [`CodecRegistry`] maps type identifiers to codec instances, and packet
//! header codecs walk a container TLV dispatching each nested element through
//! the registry.
//!
//! ## Decoding Flow
//! ```text
//! outer T/L ──► peek nested T/L ──► TID = container TID + T
//!                   ▲                      │
//!                   │                lookup(TID) ──► codec.deserialize
//!                   └──────── bytes consumed ◄──────────┘
//! ```
//!
//! Codecs are stateless and shared as `Arc<dyn FieldCodec>`; one instance can
//! serve any number of TIDs.

pub mod body;
pub mod content_object;
mod container;
pub mod hash_value;
pub mod interest;
pub mod name;
pub mod payload;
pub mod payload_type;
pub mod registry;
pub mod timestamp;
pub mod validation;

use crate::core::tid::TypeIdentifier;
use crate::core::tlv::TlvReader;
use crate::error::{CodecError, Result};
use crate::protocol::field::Field;
use bytes::{Bytes, BytesMut};
use std::fmt;

pub use body::PacketBodyCodec;
pub use content_object::ContentObjectCodec;
pub use hash_value::HashValueCodec;
pub use interest::InterestCodec;
pub use name::NameCodec;
pub use payload::PayloadCodec;
pub use payload_type::PayloadTypeCodec;
pub use registry::{global_registry, CodecRegistry, DuplicatePolicy};
pub use timestamp::TimestampCodec;
pub use validation::ValidationAlgorithmCodec;

/// Stateless translator between one TLV element and a [`Field`].
pub trait FieldCodec: Send + Sync + fmt::Debug {
    /// Codec name used in error reports.
    fn name(&self) -> &'static str;

    /// Decodes the element starting at the reader's position, including its
    /// Type and Length, and returns the field with the number of bytes consumed.
    ///
    /// `tid` is the element's own type identifier and only feeds error reports.
    fn deserialize(&self, reader: &mut TlvReader<'_>, tid: &TypeIdentifier)
        -> Result<(Field, usize)>;

    /// Appends `field` as a TLV of type `tlv_type` and returns the bytes written.
    fn serialize(&self, field: &Field, tlv_type: u16, out: &mut BytesMut) -> Result<usize>;

    /// Exact number of bytes [`serialize`](FieldCodec::serialize) writes for `field`.
    fn serialized_size(&self, field: &Field) -> Result<usize>;

    /// Writes a human readable rendering of `field`.
    fn print(&self, field: &Field, out: &mut dyn fmt::Write) -> Result<()>;
}

/// Codec for a complete message container such as an Interest.
pub trait PacketHeaderCodec {
    type Message;

    /// Outer TLV type this codec accepts.
    fn message_type(&self) -> u16;

    /// Decodes one message starting at the reader's position.
    fn decode(&self, reader: &mut TlvReader<'_>) -> Result<(Self::Message, usize)>;

    /// Appends `message` and returns the bytes written.
    fn encode(&self, message: &Self::Message, out: &mut BytesMut) -> Result<usize>;

    /// Exact number of bytes [`encode`](PacketHeaderCodec::encode) writes.
    fn encoded_size(&self, message: &Self::Message) -> Result<usize>;

    /// Decodes a buffer holding exactly one message.
    fn decode_bytes(&self, bytes: &[u8]) -> Result<Self::Message> {
        let mut reader = TlvReader::new(bytes);
        let (message, _) = self.decode(&mut reader)?;
        if reader.remaining() > 0 {
            return Err(CodecError::TrailingBytes {
                offset: reader.position(),
                count: reader.remaining(),
            });
        }
        Ok(message)
    }

    /// Encodes `message` into a new buffer.
    fn encode_to_bytes(&self, message: &Self::Message) -> Result<Bytes> {
        let mut out = BytesMut::with_capacity(self.encoded_size(message)?);
        self.encode(message, &mut out)?;
        Ok(out.freeze())
    }
}

/// Builds the error returned when a codec is handed the wrong field variant.
pub(crate) fn type_mismatch(codec: &'static str, field: &Field) -> CodecError {
    CodecError::TypeMismatch {
        codec,
        found: field.kind(),
    }
}
