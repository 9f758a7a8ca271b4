use crate::codec::{type_mismatch, FieldCodec};
use crate::core::tid::TypeIdentifier;
use crate::core::tlv::{write_tlv, TlvReader, TL_SIZE};
use crate::error::Result;
use crate::protocol::field::Field;
use bytes::{Bytes, BytesMut};
use std::fmt;

/// Opaque byte payloads. Also used for the validation payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct PayloadCodec;

impl FieldCodec for PayloadCodec {
    fn name(&self) -> &'static str {
        "PayloadCodec"
    }

    fn deserialize(
        &self,
        reader: &mut TlvReader<'_>,
        _tid: &TypeIdentifier,
    ) -> Result<(Field, usize)> {
        let (_, length) = reader.read_type_length()?;
        let value = reader.read_bytes(usize::from(length))?;
        Ok((
            Field::Payload(Bytes::copy_from_slice(value)),
            TL_SIZE + value.len(),
        ))
    }

    fn serialize(&self, field: &Field, tlv_type: u16, out: &mut BytesMut) -> Result<usize> {
        match field {
            Field::Payload(bytes) => write_tlv(out, tlv_type, bytes),
            other => Err(type_mismatch(self.name(), other)),
        }
    }

    fn serialized_size(&self, field: &Field) -> Result<usize> {
        match field {
            Field::Payload(bytes) => Ok(TL_SIZE + bytes.len()),
            other => Err(type_mismatch(self.name(), other)),
        }
    }

    fn print(&self, field: &Field, out: &mut dyn fmt::Write) -> Result<()> {
        match field {
            Field::Payload(bytes) => Ok(write!(out, "{} bytes: {}", bytes.len(), hex::encode(bytes))?),
            other => Err(type_mismatch(self.name(), other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload() {
        let field = Field::Payload(Bytes::new());
        let mut out = BytesMut::new();
        assert_eq!(PayloadCodec.serialize(&field, 1, &mut out).unwrap(), 4);

        let mut reader = TlvReader::new(&out);
        let tid = TypeIdentifier::new(3).child(1).child(1);
        let (decoded, consumed) = PayloadCodec.deserialize(&mut reader, &tid).unwrap();
        assert_eq!(decoded, field);
        assert_eq!(consumed, 4);
    }

    #[test]
    fn test_print_hex() {
        let mut text = String::new();
        PayloadCodec
            .print(&Field::Payload(Bytes::from_static(b"\x01\xff")), &mut text)
            .unwrap();
        assert_eq!(text, "2 bytes: 01ff");
    }
}
