use crate::codec::{type_mismatch, FieldCodec};
use crate::core::tid::TypeIdentifier;
use crate::core::tlv::{write_tlv, TlvReader, TL_SIZE};
use crate::error::{constants, CodecError, Result};
use crate::protocol::field::Field;
use bytes::BytesMut;
use std::fmt;

const TIMESTAMP_LEN: usize = 8;

/// 64-bit big-endian millisecond timestamps (Content Object expiry).
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampCodec;

impl FieldCodec for TimestampCodec {
    fn name(&self) -> &'static str {
        "TimestampCodec"
    }

    fn deserialize(
        &self,
        reader: &mut TlvReader<'_>,
        tid: &TypeIdentifier,
    ) -> Result<(Field, usize)> {
        let (_, length) = reader.read_type_length()?;
        if usize::from(length) != TIMESTAMP_LEN {
            return Err(CodecError::InvalidFieldLength {
                tid: tid.clone(),
                length: usize::from(length),
                reason: constants::ERR_TIMESTAMP_LENGTH,
            });
        }
        let millis = reader.read_u64()?;
        Ok((Field::Timestamp(millis), TL_SIZE + TIMESTAMP_LEN))
    }

    fn serialize(&self, field: &Field, tlv_type: u16, out: &mut BytesMut) -> Result<usize> {
        match field {
            Field::Timestamp(millis) => write_tlv(out, tlv_type, &millis.to_be_bytes()),
            other => Err(type_mismatch(self.name(), other)),
        }
    }

    fn serialized_size(&self, field: &Field) -> Result<usize> {
        match field {
            Field::Timestamp(_) => Ok(TL_SIZE + TIMESTAMP_LEN),
            other => Err(type_mismatch(self.name(), other)),
        }
    }

    fn print(&self, field: &Field, out: &mut dyn fmt::Write) -> Result<()> {
        match field {
            Field::Timestamp(millis) => Ok(write!(out, "{millis} ms")?),
            other => Err(type_mismatch(self.name(), other)),
        }
    }
}
