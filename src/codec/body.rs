//! # Packet Body Codec
//!
//! Encodes and decodes a complete packet body: the message TLV followed by an
//! optional validation section.
//!
//! ## Wire Format
//! ```text
//! [Interest | ContentObject TLV]
//! [T_VALIDATION_ALG [<suite> TLV [KeyId] [PublicKey] [SigningTime]]]   optional
//! [T_VALIDATION_PAYLOAD [signature bytes]]                             with the above
//! ```
//!
//! The protected region covers the message and the validation algorithm. The
//! signer's hasher digests it and the signature goes in the validation payload.

use crate::codec::registry::{global_registry, CodecRegistry};
use crate::codec::{ContentObjectCodec, InterestCodec, PacketHeaderCodec};
use crate::config::{CodecConfig, DEFAULT_MAX_MESSAGE_SIZE};
use crate::core::schema::{
    TID_PACKET_BODY, TID_VALIDATION_ALG, TID_VALIDATION_PAYLOAD, T_INTEREST, T_OBJECT,
    T_VALIDATION_ALG, T_VALIDATION_PAYLOAD,
};
use crate::core::tlv::{write_type_length, TlvReader, TL_SIZE};
use crate::crypto::{Signer, Verifier};
use crate::error::{constants, CodecError, Result};
use crate::protocol::field::Field;
use crate::protocol::message::{Message, PacketBody};
use crate::protocol::validation::{CryptoSuite, Signature, SigningTime, ValidationAlgorithm};
use crate::utils::metrics::{global_metrics, Timer};
use bytes::{Bytes, BytesMut};
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// A decoded body together with the byte range its signature covers.
#[derive(Debug, Clone)]
pub struct DecodedBody {
    pub body: PacketBody,
    /// Message plus validation algorithm, as offsets into the decoded buffer.
    pub protected_region: Range<usize>,
}

/// Codec for complete packet bodies.
#[derive(Debug, Clone)]
pub struct PacketBodyCodec {
    registry: Arc<CodecRegistry>,
    interest: InterestCodec,
    object: ContentObjectCodec,
    max_message_size: usize,
    embed_public_key: bool,
    include_signing_time: bool,
}

impl Default for PacketBodyCodec {
    fn default() -> Self {
        Self::new(global_registry())
    }
}

impl PacketBodyCodec {
    pub fn new(registry: Arc<CodecRegistry>) -> Self {
        Self {
            interest: InterestCodec::new(Arc::clone(&registry)),
            object: ContentObjectCodec::new(Arc::clone(&registry)),
            registry,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            embed_public_key: true,
            include_signing_time: true,
        }
    }

    /// Applies the limits and signing sections of `config`.
    pub fn from_config(registry: Arc<CodecRegistry>, config: &CodecConfig) -> Self {
        let mut codec = Self::new(registry);
        codec.max_message_size = config.limits.max_message_size;
        codec.embed_public_key = config.signing.embed_public_key;
        codec.include_signing_time = config.signing.include_signing_time;
        codec
    }

    pub fn with_max_message_size(mut self, limit: usize) -> Self {
        self.max_message_size = limit;
        self
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_message_size {
            return Err(CodecError::MessageTooLarge {
                size,
                limit: self.max_message_size,
            });
        }
        Ok(())
    }

    /// Decodes a buffer holding exactly one packet body.
    #[instrument(level = "debug", skip_all, fields(len = bytes.len()))]
    pub fn decode(&self, bytes: &[u8]) -> Result<PacketBody> {
        self.decode_with_region(bytes).map(|decoded| decoded.body)
    }

    /// Decodes a body and reports its protected region.
    pub fn decode_with_region(&self, bytes: &[u8]) -> Result<DecodedBody> {
        let result = self.decode_inner(bytes);
        match &result {
            Ok(_) => global_metrics().message_decoded(bytes.len() as u64),
            Err(e) => {
                debug!(error = %e, "packet body decode failed");
                global_metrics().decode_error();
            }
        }
        result
    }

    /// Byte range of `bytes` covered by its signature.
    pub fn protected_region<'a>(&self, bytes: &'a [u8]) -> Result<&'a [u8]> {
        let decoded = self.decode_with_region(bytes)?;
        Ok(&bytes[decoded.protected_region])
    }

    fn decode_inner(&self, bytes: &[u8]) -> Result<DecodedBody> {
        self.check_size(bytes.len())?;
        let mut reader = TlvReader::new(bytes);

        let (message_type, _) = reader.peek_type_length()?;
        let message = match message_type {
            T_INTEREST => Message::Interest(self.interest.decode(&mut reader)?.0),
            T_OBJECT => Message::ContentObject(self.object.decode(&mut reader)?.0),
            found => {
                return Err(CodecError::WrongMessageType {
                    expected: T_INTEREST,
                    found,
                    offset: 0,
                })
            }
        };

        let mut validation = None;
        if reader.remaining() > 0 {
            let offset = reader.position();
            let (section_type, _) = reader.peek_type_length()?;
            match section_type {
                T_VALIDATION_ALG => validation = Some(self.decode_validation_alg(&mut reader)?),
                T_VALIDATION_PAYLOAD => {
                    return Err(CodecError::InvalidField {
                        tid: TID_VALIDATION_PAYLOAD.clone(),
                        reason: constants::ERR_PAYLOAD_WITHOUT_ALGORITHM,
                    })
                }
                other => {
                    return Err(CodecError::UnknownField {
                        tid: TID_PACKET_BODY.child(u32::from(other)),
                        offset,
                    })
                }
            }
        }
        let protected_end = reader.position();

        let body = match validation {
            None => PacketBody {
                message,
                validation: None,
            },
            Some(alg) => {
                let signature = self.decode_validation_payload(&mut reader)?;
                PacketBody {
                    message,
                    validation: Some(alg.with_signature(signature)),
                }
            }
        };

        if reader.remaining() > 0 {
            return Err(CodecError::TrailingBytes {
                offset: reader.position(),
                count: reader.remaining(),
            });
        }

        Ok(DecodedBody {
            body,
            protected_region: 0..protected_end,
        })
    }

    fn decode_validation_alg(&self, reader: &mut TlvReader<'_>) -> Result<ValidationAlgorithm> {
        let section_offset = reader.position();
        let (_, section_length) = reader.read_type_length()?;
        let section_length = usize::from(section_length);

        let suite_offset = reader.position();
        let (suite_type, suite_length) = reader.peek_type_length()?;
        let suite_tid = TID_VALIDATION_ALG.child(u32::from(suite_type));
        let suite_end = usize::from(suite_length) + TL_SIZE;
        if suite_end > section_length {
            return Err(CodecError::LengthOverflow {
                tid: suite_tid,
                offset: suite_offset,
                container_length: section_length,
            });
        }
        if suite_end < section_length {
            return Err(CodecError::InvalidFieldLength {
                tid: TID_VALIDATION_ALG.clone(),
                length: section_length,
                reason: constants::ERR_SUITE_UNDERRUN,
            });
        }
        if CryptoSuite::from_tlv_type(suite_type).is_err() {
            return Err(CodecError::UnknownField {
                tid: suite_tid,
                offset: suite_offset,
            });
        }
        let codec = self.registry.lookup(&suite_tid)?;
        debug!(tid = %suite_tid, offset = section_offset, "decoding validation algorithm");

        match codec.deserialize(reader, &suite_tid)? {
            (Field::ValidationAlgorithm(alg), _) => Ok(alg),
            (other, _) => Err(CodecError::TypeMismatch {
                codec: codec.name(),
                found: other.kind(),
            }),
        }
    }

    fn decode_validation_payload(&self, reader: &mut TlvReader<'_>) -> Result<Signature> {
        let missing = || CodecError::InvalidField {
            tid: TID_VALIDATION_ALG.clone(),
            reason: constants::ERR_ALGORITHM_WITHOUT_PAYLOAD,
        };
        if reader.remaining() == 0 {
            return Err(missing());
        }
        let offset = reader.position();
        let (payload_type, _) = reader.peek_type_length()?;
        if payload_type != T_VALIDATION_PAYLOAD {
            warn!(offset, found = payload_type, "validation algorithm not followed by payload");
            return Err(missing());
        }

        let codec = self.registry.lookup(&TID_VALIDATION_PAYLOAD)?;
        match codec.deserialize(reader, &TID_VALIDATION_PAYLOAD)? {
            (Field::Payload(bytes), _) => Ok(Signature::new(bytes)),
            (other, _) => Err(CodecError::TypeMismatch {
                codec: codec.name(),
                found: other.kind(),
            }),
        }
    }

    fn encode_message(&self, message: &Message, out: &mut BytesMut) -> Result<usize> {
        match message {
            Message::Interest(interest) => self.interest.encode(interest, out),
            Message::ContentObject(object) => self.object.encode(object, out),
        }
    }

    fn encode_validation_alg(&self, alg: &ValidationAlgorithm, out: &mut BytesMut) -> Result<usize> {
        let codec = self.registry.lookup(&alg.codec_tid())?;
        let field = Field::ValidationAlgorithm(alg.clone());
        let inner = codec.serialized_size(&field)?;
        write_type_length(out, T_VALIDATION_ALG, inner)?;
        codec.serialize(&field, alg.crypto_suite().tlv_type(), out)?;
        Ok(TL_SIZE + inner)
    }

    fn encode_validation_payload(&self, signature: &Signature, out: &mut BytesMut) -> Result<usize> {
        let codec = self.registry.lookup(&TID_VALIDATION_PAYLOAD)?;
        let field = Field::Payload(Bytes::copy_from_slice(signature.as_bytes()));
        codec.serialize(&field, T_VALIDATION_PAYLOAD, out)
    }

    /// Encodes a body whose validation algorithm, if any, already carries its signature.
    #[instrument(level = "debug", skip_all)]
    pub fn encode(&self, body: &PacketBody) -> Result<Bytes> {
        let result = self.encode_inner(body);
        self.record_encode(&result);
        result
    }

    fn encode_inner(&self, body: &PacketBody) -> Result<Bytes> {
        let mut out = BytesMut::new();
        self.encode_message(&body.message, &mut out)?;
        if let Some(alg) = &body.validation {
            let signature = alg.signature().ok_or_else(|| CodecError::InvalidField {
                tid: TID_VALIDATION_ALG.clone(),
                reason: constants::ERR_ALGORITHM_WITHOUT_PAYLOAD,
            })?;
            self.encode_validation_alg(alg, &mut out)?;
            self.encode_validation_payload(signature, &mut out)?;
        }
        self.check_size(out.len())?;
        Ok(out.freeze())
    }

    /// Encodes `message`, signs the protected region with `signer` and appends
    /// the validation section.
    #[instrument(level = "debug", skip_all, fields(suite = %signer.crypto_suite()))]
    pub fn encode_signed(&self, message: &Message, signer: &dyn Signer) -> Result<Bytes> {
        let _timer = Timer::start("encode_signed");
        let result = self.encode_signed_inner(message, signer);
        if result.is_ok() {
            global_metrics().signature_created();
        }
        self.record_encode(&result);
        result
    }

    fn encode_signed_inner(&self, message: &Message, signer: &dyn Signer) -> Result<Bytes> {
        let signing_time = if self.include_signing_time {
            Some(SigningTime::now()?)
        } else {
            None
        };
        let alg = signer.validation_algorithm(self.embed_public_key, signing_time)?;

        let mut out = BytesMut::new();
        self.encode_message(message, &mut out)?;
        self.encode_validation_alg(&alg, &mut out)?;

        let digest = signer.signature_hasher().digest(&out);
        let signature = signer.sign_digest(&digest)?;
        self.encode_validation_payload(&signature, &mut out)?;

        self.check_size(out.len())?;
        Ok(out.freeze())
    }

    fn record_encode(&self, result: &Result<Bytes>) {
        match result {
            Ok(bytes) => global_metrics().message_encoded(bytes.len() as u64),
            Err(e) => {
                debug!(error = %e, "packet body encode failed");
                global_metrics().encode_error();
            }
        }
    }

    /// Decodes `bytes` and checks its signature with `verifier`.
    ///
    /// Returns `Ok(false)` for an unsigned body or a signature that does not
    /// verify. Malformed input is an error.
    #[instrument(level = "debug", skip_all, fields(suite = %verifier.crypto_suite()))]
    pub fn verify(&self, bytes: &[u8], verifier: &dyn Verifier) -> Result<bool> {
        let decoded = self.decode_with_region(bytes)?;
        let Some(alg) = decoded.body.validation.as_ref() else {
            warn!("verification requested for unsigned packet");
            global_metrics().verification(false);
            return Ok(false);
        };
        let Some(signature) = alg.signature() else {
            global_metrics().verification(false);
            return Ok(false);
        };

        let digest = verifier
            .signature_hasher()
            .digest(&bytes[decoded.protected_region.clone()]);
        let passed = verifier.verify(alg.key_id(), &digest, alg.crypto_suite(), signature)?;
        if !passed {
            warn!(suite = %alg.crypto_suite(), key_id = ?alg.key_id().map(|k| k.to_string()), "signature verification failed");
        }
        global_metrics().verification(passed);
        Ok(passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Crc32cSigner, Crc32cVerifier};
    use crate::protocol::interest::Interest;
    use crate::protocol::name::Name;

    fn untimed() -> PacketBodyCodec {
        let config = CodecConfig::default_with_overrides(|c| c.signing.include_signing_time = false);
        PacketBodyCodec::from_config(global_registry(), &config)
    }

    fn interest() -> Message {
        Message::Interest(Interest::new(Name::parse("/a/b")))
    }

    #[test]
    fn test_known_suite_without_codec_is_unknown_type() {
        let registry = CodecRegistry::new();
        for (tid, codec) in crate::codec::registry::standard_codecs() {
            if tid != CryptoSuite::Crc32c.tid() {
                registry.register(tid, codec).unwrap();
            }
        }
        let signed = untimed().encode_signed(&interest(), &Crc32cSigner).unwrap();

        let err = PacketBodyCodec::new(Arc::new(registry)).decode(&signed).unwrap_err();
        assert!(matches!(err, CodecError::UnknownType(t) if t == CryptoSuite::Crc32c.tid()));
    }

    #[test]
    fn test_unsigned_round_trip() {
        let codec = PacketBodyCodec::default();
        let body = PacketBody::unsigned(Interest::new(Name::parse("/a/b")));
        let bytes = codec.encode(&body).unwrap();
        let decoded = codec.decode_with_region(&bytes).unwrap();
        assert_eq!(decoded.body, body);
        assert_eq!(decoded.protected_region, 0..bytes.len());
        assert!(!decoded.body.is_signed());
    }

    #[test]
    fn test_crc32c_signed_layout() {
        let codec = untimed();
        let bytes = codec.encode_signed(&interest(), &Crc32cSigner).unwrap();
        // Interest(4 + 14), alg section (4 + 4), payload (4 + 4)
        assert_eq!(bytes.len(), 34);
        assert_eq!(&bytes[18..26], &[0, 3, 0, 4, 0, 2, 0, 0]);
        assert_eq!(&bytes[26..30], &[0, 4, 0, 4]);

        let region = codec.protected_region(&bytes).unwrap();
        assert_eq!(region.len(), 26);
        assert_eq!(&bytes[30..], &crc32c::crc32c(region).to_be_bytes());
        assert!(codec.verify(&bytes, &Crc32cVerifier).unwrap());
    }

    #[test]
    fn test_tampered_body_fails_verification() {
        let codec = PacketBodyCodec::default();
        let mut bytes = codec.encode_signed(&interest(), &Crc32cSigner).unwrap().to_vec();
        bytes[12] ^= 0x01;
        assert!(!codec.verify(&bytes, &Crc32cVerifier).unwrap());
    }

    #[test]
    fn test_algorithm_without_payload() {
        let codec = untimed();
        let signed = codec.encode_signed(&interest(), &Crc32cSigner).unwrap();
        let truncated = &signed[..26];
        match codec.decode(truncated) {
            Err(CodecError::InvalidField { tid, reason }) => {
                assert_eq!(tid.to_string(), "3.3");
                assert_eq!(reason, constants::ERR_ALGORITHM_WITHOUT_PAYLOAD);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_payload_without_algorithm() {
        let codec = PacketBodyCodec::default();
        let mut bytes = codec
            .encode(&PacketBody::unsigned(Interest::new(Name::parse("/a"))))
            .unwrap()
            .to_vec();
        bytes.extend_from_slice(&[0, 4, 0, 1, 0xFF]);
        assert!(matches!(
            codec.decode(&bytes),
            Err(CodecError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let codec = untimed();
        let mut bytes = codec.encode_signed(&interest(), &Crc32cSigner).unwrap().to_vec();
        bytes.push(0);
        assert!(matches!(
            codec.decode(&bytes),
            Err(CodecError::TrailingBytes { offset: 34, count: 1 })
        ));
    }

    #[test]
    fn test_size_limit() {
        let codec = PacketBodyCodec::default().with_max_message_size(16);
        let body = PacketBody::unsigned(Interest::new(Name::parse("/a/b")));
        assert!(matches!(
            codec.encode(&body),
            Err(CodecError::MessageTooLarge { size: 18, limit: 16 })
        ));
    }
}
