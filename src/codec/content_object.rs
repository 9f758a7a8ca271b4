use crate::codec::container::{container_size, decode_container, encode_container, ContainerSpec};
use crate::codec::registry::{global_registry, CodecRegistry};
use crate::codec::PacketHeaderCodec;
use crate::core::schema::{TID_OBJECT, T_EXPIRY, T_NAME, T_OBJECT, T_PAYLDTYPE, T_PAYLOAD};
use crate::core::tlv::TlvReader;
use crate::error::Result;
use crate::protocol::content_object::ContentObject;
use crate::protocol::field::Field;
use bytes::BytesMut;
use std::sync::Arc;

const OBJECT_FIELDS: &[u16] = &[T_NAME, T_PAYLOAD, T_PAYLDTYPE, T_EXPIRY];

/// Codec for the Content Object message TLV (`3.2.<type>`).
///
/// No field is mandatory. Fields are written as Name, PayloadType, Expiry,
/// Payload.
#[derive(Debug, Clone)]
pub struct ContentObjectCodec {
    registry: Arc<CodecRegistry>,
}

impl Default for ContentObjectCodec {
    fn default() -> Self {
        Self::new(global_registry())
    }
}

impl ContentObjectCodec {
    pub fn new(registry: Arc<CodecRegistry>) -> Self {
        Self { registry }
    }

    fn spec() -> ContainerSpec<'static> {
        ContainerSpec {
            codec: "ContentObjectCodec",
            message_type: T_OBJECT,
            tid: &TID_OBJECT,
            fields: OBJECT_FIELDS,
        }
    }

    fn fields(object: &ContentObject) -> Vec<(u16, Field)> {
        let mut fields = Vec::with_capacity(OBJECT_FIELDS.len());
        if let Some(name) = object.name() {
            fields.push((T_NAME, Field::Name(name.clone())));
        }
        if let Some(kind) = object.payload_type() {
            fields.push((T_PAYLDTYPE, Field::PayloadType(kind)));
        }
        if let Some(expiry) = object.expiry() {
            fields.push((T_EXPIRY, Field::Timestamp(expiry)));
        }
        if let Some(payload) = object.payload() {
            fields.push((T_PAYLOAD, Field::Payload(payload.clone())));
        }
        fields
    }
}

impl PacketHeaderCodec for ContentObjectCodec {
    type Message = ContentObject;

    fn message_type(&self) -> u16 {
        T_OBJECT
    }

    fn decode(&self, reader: &mut TlvReader<'_>) -> Result<(ContentObject, usize)> {
        let (mut fields, consumed) = decode_container(reader, &self.registry, &Self::spec())?;

        let mut object = match fields.take(T_NAME, |f| match f {
            Field::Name(name) => Ok(name),
            other => Err(other),
        })? {
            Some(name) => ContentObject::new(name),
            None => ContentObject::nameless(),
        };
        if let Some(kind) = fields.take(T_PAYLDTYPE, |f| match f {
            Field::PayloadType(kind) => Ok(kind),
            other => Err(other),
        })? {
            object = object.with_payload_type(kind);
        }
        if let Some(expiry) = fields.take(T_EXPIRY, |f| match f {
            Field::Timestamp(millis) => Ok(millis),
            other => Err(other),
        })? {
            object = object.with_expiry(expiry);
        }
        if let Some(payload) = fields.take(T_PAYLOAD, |f| match f {
            Field::Payload(bytes) => Ok(bytes),
            other => Err(other),
        })? {
            object = object.with_payload(payload);
        }

        Ok((object, consumed))
    }

    fn encode(&self, message: &ContentObject, out: &mut BytesMut) -> Result<usize> {
        encode_container(&self.registry, &Self::spec(), &Self::fields(message), out)
    }

    fn encoded_size(&self, message: &ContentObject) -> Result<usize> {
        container_size(&self.registry, &TID_OBJECT, &Self::fields(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::protocol::content_object::PayloadType;
    use crate::protocol::name::Name;

    #[test]
    fn test_round_trip_all_fields() {
        let codec = ContentObjectCodec::default();
        let object = ContentObject::new(Name::parse("/x/Version=3"))
            .with_payload(&b"data"[..])
            .with_payload_type(PayloadType::Key)
            .with_expiry(99);
        let bytes = codec.encode_to_bytes(&object).unwrap();
        assert_eq!(bytes.len(), codec.encoded_size(&object).unwrap());
        assert_eq!(codec.decode_bytes(&bytes).unwrap(), object);
    }

    #[test]
    fn test_nameless_object() {
        let codec = ContentObjectCodec::default();
        let bytes = codec.encode_to_bytes(&ContentObject::nameless()).unwrap();
        assert_eq!(&bytes[..], &[0, 2, 0, 0]);
        assert_eq!(codec.decode_bytes(&bytes).unwrap().name(), None);
    }

    #[test]
    fn test_interest_only_field_unknown() {
        // KeyIdRestriction (type 2) is not a Content Object field
        let bytes = [0, 2, 0, 12, 0, 2, 0, 8, 0, 0, 0, 0, 0, 0, 0, 1];
        match ContentObjectCodec::default().decode_bytes(&bytes) {
            Err(CodecError::UnknownField { tid, offset: 4 }) => {
                assert_eq!(tid.to_string(), "3.2.2")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_interest_bytes_rejected() {
        let bytes = [0, 1, 0, 0];
        assert!(matches!(
            ContentObjectCodec::default().decode_bytes(&bytes),
            Err(CodecError::WrongMessageType {
                expected: 2,
                found: 1,
                offset: 0
            })
        ));
    }
}
