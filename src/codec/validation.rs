use crate::codec::{type_mismatch, FieldCodec};
use crate::core::schema::{T_KEYID, T_PUBLICKEY, T_SIGTIME};
use crate::core::tid::TypeIdentifier;
use crate::core::tlv::{write_tlv, write_type_length, TlvReader, TL_SIZE};
use crate::error::{constants, CodecError, Result};
use crate::protocol::field::Field;
use crate::protocol::validation::{
    CryptoSuite, KeyId, PublicKey, SigningTime, ValidationAlgorithm,
};
use bytes::{Bytes, BytesMut};
use std::fmt;
use tracing::trace;

const SIGTIME_LEN: usize = 8;

/// Codec for a crypto suite TLV inside the Validation Algorithm section.
///
/// The suite TLV may carry KeyId, PublicKey and SigningTime elements in any
/// order, each at most once. The decoded algorithm must fit the suite's
/// shape, otherwise decoding fails with `InvalidField`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidationAlgorithmCodec;

fn dependent_data_size(alg: &ValidationAlgorithm) -> usize {
    let key_id = alg.key_id().map_or(0, |k| TL_SIZE + k.as_bytes().len());
    let public_key = alg.public_key().map_or(0, |k| TL_SIZE + k.as_bytes().len());
    let signing_time = alg.signing_time().map_or(0, |_| TL_SIZE + SIGTIME_LEN);
    key_id + public_key + signing_time
}

impl FieldCodec for ValidationAlgorithmCodec {
    fn name(&self) -> &'static str {
        "ValidationAlgorithmCodec"
    }

    fn deserialize(
        &self,
        reader: &mut TlvReader<'_>,
        tid: &TypeIdentifier,
    ) -> Result<(Field, usize)> {
        let (suite_type, length) = reader.read_type_length()?;
        let suite = CryptoSuite::from_tlv_type(suite_type)?;
        let length = usize::from(length);

        let mut key_id = None;
        let mut public_key = None;
        let mut signing_time = None;
        let mut bytes_read = 0;

        while bytes_read < length {
            let offset = reader.position();
            let (nested_type, nested_length) = reader.read_type_length()?;
            let nested_tid = tid.child(u32::from(nested_type));
            let nested_length = usize::from(nested_length);

            if bytes_read + TL_SIZE + nested_length > length {
                return Err(CodecError::LengthOverflow {
                    tid: nested_tid,
                    offset,
                    container_length: length,
                });
            }
            let duplicate = CodecError::DuplicateField {
                tid: nested_tid.clone(),
                offset,
            };
            let value = reader.read_bytes(nested_length)?;
            trace!(tid = %nested_tid, offset, len = nested_length, "validation dependent data");

            match nested_type {
                T_KEYID => {
                    if key_id.is_some() {
                        return Err(duplicate);
                    }
                    key_id = Some(KeyId::new(Bytes::copy_from_slice(value)));
                }
                T_PUBLICKEY => {
                    if public_key.is_some() {
                        return Err(duplicate);
                    }
                    public_key = Some(PublicKey::new(Bytes::copy_from_slice(value)));
                }
                T_SIGTIME => {
                    if signing_time.is_some() {
                        return Err(duplicate);
                    }
                    let raw: [u8; SIGTIME_LEN] =
                        value.try_into().map_err(|_| CodecError::InvalidFieldLength {
                            tid: nested_tid.clone(),
                            length: nested_length,
                            reason: constants::ERR_TIMESTAMP_LENGTH,
                        })?;
                    signing_time = Some(SigningTime::from_millis(u64::from_be_bytes(raw)));
                }
                _ => {
                    return Err(CodecError::UnknownField {
                        tid: nested_tid,
                        offset,
                    })
                }
            }
            bytes_read += TL_SIZE + nested_length;
        }

        let alg = ValidationAlgorithm::new(suite, key_id, public_key, signing_time)?;
        Ok((Field::ValidationAlgorithm(alg), TL_SIZE + length))
    }

    fn serialize(&self, field: &Field, tlv_type: u16, out: &mut BytesMut) -> Result<usize> {
        let Field::ValidationAlgorithm(alg) = field else {
            return Err(type_mismatch(self.name(), field));
        };
        let inner = dependent_data_size(alg);
        write_type_length(out, tlv_type, inner)?;
        if let Some(key_id) = alg.key_id() {
            write_tlv(out, T_KEYID, key_id.as_bytes())?;
        }
        if let Some(public_key) = alg.public_key() {
            write_tlv(out, T_PUBLICKEY, public_key.as_bytes())?;
        }
        if let Some(time) = alg.signing_time() {
            write_tlv(out, T_SIGTIME, &time.millis().to_be_bytes())?;
        }
        Ok(TL_SIZE + inner)
    }

    fn serialized_size(&self, field: &Field) -> Result<usize> {
        match field {
            Field::ValidationAlgorithm(alg) => Ok(TL_SIZE + dependent_data_size(alg)),
            other => Err(type_mismatch(self.name(), other)),
        }
    }

    fn print(&self, field: &Field, out: &mut dyn fmt::Write) -> Result<()> {
        let Field::ValidationAlgorithm(alg) = field else {
            return Err(type_mismatch(self.name(), field));
        };
        write!(out, "{}", alg.crypto_suite())?;
        if let Some(key_id) = alg.key_id() {
            write!(out, " keyid={key_id}")?;
        }
        if alg.public_key().is_some() {
            write!(out, " +publickey")?;
        }
        if let Some(time) = alg.signing_time() {
            write!(out, " sigtime={}", time.millis())?;
        }
        Ok(())
    }
}
