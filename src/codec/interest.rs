use crate::codec::container::{container_size, decode_container, encode_container, ContainerSpec};
use crate::codec::registry::{global_registry, CodecRegistry};
use crate::codec::PacketHeaderCodec;
use crate::core::schema::{
    TID_INTEREST, TID_INTEREST_NAME, T_HASH_REST, T_INTEREST, T_KEYID_REST, T_NAME, T_PAYLOAD,
};
use crate::core::tlv::TlvReader;
use crate::error::{CodecError, Result};
use crate::protocol::field::Field;
use crate::protocol::interest::Interest;
use bytes::BytesMut;
use std::sync::Arc;

const INTEREST_FIELDS: &[u16] = &[T_NAME, T_PAYLOAD, T_KEYID_REST, T_HASH_REST];

/// Codec for the Interest message TLV.
///
/// Nested fields are dispatched through the registry under `3.1.<type>`.
/// Fields are written in the order Name, KeyIdRestriction,
/// ObjectHashRestriction, Payload and may appear in any order on decode.
#[derive(Debug, Clone)]
pub struct InterestCodec {
    registry: Arc<CodecRegistry>,
}

impl Default for InterestCodec {
    fn default() -> Self {
        Self::new(global_registry())
    }
}

impl InterestCodec {
    pub fn new(registry: Arc<CodecRegistry>) -> Self {
        Self { registry }
    }

    fn spec() -> ContainerSpec<'static> {
        ContainerSpec {
            codec: "InterestCodec",
            message_type: T_INTEREST,
            tid: &TID_INTEREST,
            fields: INTEREST_FIELDS,
        }
    }

    fn fields(interest: &Interest) -> Vec<(u16, Field)> {
        let mut fields = vec![(T_NAME, Field::Name(interest.name().clone()))];
        if let Some(hash) = interest.keyid_restriction() {
            fields.push((T_KEYID_REST, Field::HashValue(hash)));
        }
        if let Some(hash) = interest.hash_restriction() {
            fields.push((T_HASH_REST, Field::HashValue(hash)));
        }
        if let Some(payload) = interest.payload() {
            fields.push((T_PAYLOAD, Field::Payload(payload.clone())));
        }
        fields
    }
}

impl PacketHeaderCodec for InterestCodec {
    type Message = Interest;

    fn message_type(&self) -> u16 {
        T_INTEREST
    }

    fn decode(&self, reader: &mut TlvReader<'_>) -> Result<(Interest, usize)> {
        let (mut fields, consumed) = decode_container(reader, &self.registry, &Self::spec())?;

        let name = fields
            .take(T_NAME, |f| match f {
                Field::Name(name) => Ok(name),
                other => Err(other),
            })?
            .ok_or_else(|| CodecError::MissingMandatoryField(TID_INTEREST_NAME.clone()))?;
        let mut interest = Interest::new(name);

        if let Some(payload) = fields.take(T_PAYLOAD, |f| match f {
            Field::Payload(bytes) => Ok(bytes),
            other => Err(other),
        })? {
            interest = interest.with_payload(payload);
        }
        if let Some(hash) = fields.take(T_KEYID_REST, |f| match f {
            Field::HashValue(hash) => Ok(hash),
            other => Err(other),
        })? {
            interest = interest.with_keyid_restriction(hash);
        }
        if let Some(hash) = fields.take(T_HASH_REST, |f| match f {
            Field::HashValue(hash) => Ok(hash),
            other => Err(other),
        })? {
            interest = interest.with_hash_restriction(hash);
        }

        Ok((interest, consumed))
    }

    fn encode(&self, message: &Interest, out: &mut BytesMut) -> Result<usize> {
        encode_container(&self.registry, &Self::spec(), &Self::fields(message), out)
    }

    fn encoded_size(&self, message: &Interest) -> Result<usize> {
        container_size(&self.registry, &TID_INTEREST, &Self::fields(message))
    }
}
