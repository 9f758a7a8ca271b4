use crate::codec::{type_mismatch, FieldCodec};
use crate::core::tid::TypeIdentifier;
use crate::core::tlv::{write_tlv, TlvReader, TL_SIZE};
use crate::error::{constants, CodecError, Result};
use crate::protocol::field::Field;
use crate::protocol::hash_value::{HashValue, HASH_VALUE_MIN_LEN, HASH_VALUE_WIRE_LEN};
use bytes::BytesMut;
use std::fmt;

/// Codec for KeyId and ContentObjectHash restrictions.
///
/// The first 8 bytes of the value hold the digest; any remaining bytes are
/// padding and are skipped on decode.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashValueCodec;

impl FieldCodec for HashValueCodec {
    fn name(&self) -> &'static str {
        "HashValueCodec"
    }

    fn deserialize(
        &self,
        reader: &mut TlvReader<'_>,
        tid: &TypeIdentifier,
    ) -> Result<(Field, usize)> {
        let (_, length) = reader.read_type_length()?;
        let length = usize::from(length);
        if length < HASH_VALUE_MIN_LEN {
            return Err(CodecError::InvalidFieldLength {
                tid: tid.clone(),
                length,
                reason: constants::ERR_HASH_TOO_SHORT,
            });
        }
        let value = reader.read_u64()?;
        reader.skip(length - HASH_VALUE_MIN_LEN)?;
        Ok((Field::HashValue(HashValue::new(value)), length + TL_SIZE))
    }

    fn serialize(&self, field: &Field, tlv_type: u16, out: &mut BytesMut) -> Result<usize> {
        match field {
            Field::HashValue(hash) => write_tlv(out, tlv_type, &hash.to_bytes()),
            other => Err(type_mismatch(self.name(), other)),
        }
    }

    fn serialized_size(&self, field: &Field) -> Result<usize> {
        match field {
            Field::HashValue(_) => Ok(TL_SIZE + HASH_VALUE_WIRE_LEN),
            other => Err(type_mismatch(self.name(), other)),
        }
    }

    fn print(&self, field: &Field, out: &mut dyn fmt::Write) -> Result<()> {
        match field {
            Field::HashValue(hash) => Ok(write!(out, "{hash}")?),
            other => Err(type_mismatch(self.name(), other)),
        }
    }
}
