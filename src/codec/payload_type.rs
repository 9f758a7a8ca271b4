use crate::codec::{type_mismatch, FieldCodec};
use crate::core::tid::TypeIdentifier;
use crate::core::tlv::{write_tlv, TlvReader, TL_SIZE};
use crate::error::{constants, CodecError, Result};
use crate::protocol::content_object::PayloadType;
use crate::protocol::field::Field;
use bytes::BytesMut;
use std::fmt;

/// One-byte Content Object payload type.
#[derive(Debug, Default, Clone, Copy)]
pub struct PayloadTypeCodec;

impl FieldCodec for PayloadTypeCodec {
    fn name(&self) -> &'static str {
        "PayloadTypeCodec"
    }

    fn deserialize(
        &self,
        reader: &mut TlvReader<'_>,
        tid: &TypeIdentifier,
    ) -> Result<(Field, usize)> {
        let (_, length) = reader.read_type_length()?;
        if length != 1 {
            return Err(CodecError::InvalidFieldLength {
                tid: tid.clone(),
                length: usize::from(length),
                reason: constants::ERR_PAYLOAD_TYPE_LENGTH,
            });
        }
        let value = reader.read_u8()?;
        let kind = PayloadType::from_byte(value).ok_or_else(|| CodecError::InvalidField {
            tid: tid.clone(),
            reason: constants::ERR_PAYLOAD_TYPE_UNKNOWN,
        })?;
        Ok((Field::PayloadType(kind), TL_SIZE + 1))
    }

    fn serialize(&self, field: &Field, tlv_type: u16, out: &mut BytesMut) -> Result<usize> {
        match field {
            Field::PayloadType(kind) => write_tlv(out, tlv_type, &[kind.to_byte()]),
            other => Err(type_mismatch(self.name(), other)),
        }
    }

    fn serialized_size(&self, field: &Field) -> Result<usize> {
        match field {
            Field::PayloadType(_) => Ok(TL_SIZE + 1),
            other => Err(type_mismatch(self.name(), other)),
        }
    }

    fn print(&self, field: &Field, out: &mut dyn fmt::Write) -> Result<()> {
        match field {
            Field::PayloadType(kind) => Ok(write!(out, "{kind}")?),
            other => Err(type_mismatch(self.name(), other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tid() -> TypeIdentifier {
        "3.2.5".parse().unwrap()
    }

    #[test]
    fn test_decode_link() {
        let bytes = [0, 5, 0, 1, 2];
        let mut reader = TlvReader::new(&bytes);
        let (field, consumed) = PayloadTypeCodec.deserialize(&mut reader, &tid()).unwrap();
        assert_eq!(field, Field::PayloadType(PayloadType::Link));
        assert_eq!(consumed, 5);
    }

    #[test]
    fn test_bad_length_and_value() {
        let mut reader = TlvReader::new(&[0, 5, 0, 2, 0, 0]);
        assert!(matches!(
            PayloadTypeCodec.deserialize(&mut reader, &tid()),
            Err(CodecError::InvalidFieldLength { length: 2, .. })
        ));

        let mut reader = TlvReader::new(&[0, 5, 0, 1, 9]);
        assert!(matches!(
            PayloadTypeCodec.deserialize(&mut reader, &tid()),
            Err(CodecError::InvalidField { .. })
        ));
    }
}
