//! Integration tests for codec registration and pluggable field codecs

#![allow(clippy::unwrap_used, clippy::expect_used)]

use bytes::{Bytes, BytesMut};
use ccnx_codec::codec::{
    CodecRegistry, DuplicatePolicy, FieldCodec, InterestCodec, NameCodec, PacketHeaderCodec,
    PayloadCodec,
};
use ccnx_codec::config::RegistryConfig;
use ccnx_codec::core::tid::TypeIdentifier;
use ccnx_codec::core::tlv::{write_tlv, TlvReader, TL_SIZE};
use ccnx_codec::error::{CodecError, Result};
use ccnx_codec::protocol::{Field, Interest, Name};
use std::fmt;
use std::sync::Arc;

/// Payload codec that scrambles bytes on the wire with a fixed mask.
#[derive(Debug)]
struct MaskedPayloadCodec(u8);

impl MaskedPayloadCodec {
    fn mask(&self, bytes: &[u8]) -> Vec<u8> {
        bytes.iter().map(|b| b ^ self.0).collect()
    }
}

impl FieldCodec for MaskedPayloadCodec {
    fn name(&self) -> &'static str {
        "MaskedPayloadCodec"
    }

    fn deserialize(&self, reader: &mut TlvReader<'_>, _tid: &TypeIdentifier) -> Result<(Field, usize)> {
        let (_, length) = reader.read_type_length()?;
        let value = reader.read_bytes(usize::from(length))?;
        Ok((Field::Payload(Bytes::from(self.mask(value))), TL_SIZE + value.len()))
    }

    fn serialize(&self, field: &Field, tlv_type: u16, out: &mut BytesMut) -> Result<usize> {
        match field {
            Field::Payload(bytes) => write_tlv(out, tlv_type, &self.mask(bytes)),
            other => Err(CodecError::TypeMismatch {
                codec: self.name(),
                found: other.kind(),
            }),
        }
    }

    fn serialized_size(&self, field: &Field) -> Result<usize> {
        match field {
            Field::Payload(bytes) => Ok(TL_SIZE + bytes.len()),
            other => Err(CodecError::TypeMismatch {
                codec: self.name(),
                found: other.kind(),
            }),
        }
    }

    fn print(&self, field: &Field, out: &mut dyn fmt::Write) -> Result<()> {
        Ok(write!(out, "masked {:?}", field.kind())?)
    }
}

fn tid(s: &str) -> TypeIdentifier {
    s.parse().expect("valid test tid")
}

#[test]
fn test_custom_codec_replaces_standard_payload() {
    let registry = CodecRegistry::new();
    registry
        .register(tid("3.1.0"), Arc::new(NameCodec))
        .unwrap();
    registry
        .register(tid("3.1.1"), Arc::new(MaskedPayloadCodec(0xFF)))
        .unwrap();
    registry.freeze();

    let codec = InterestCodec::new(Arc::new(registry));
    let interest = Interest::new(Name::parse("/x")).with_payload(&b"\x00\x0f"[..]);
    let bytes = codec.encode_to_bytes(&interest).unwrap();

    // Payload TLV is last and carries the masked value
    assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xF0]);
    assert_eq!(codec.decode_bytes(&bytes).unwrap(), interest);
}

#[test]
fn test_missing_codec_is_unknown_type_both_ways() {
    let registry = CodecRegistry::new();
    registry.register(tid("3.1.0"), Arc::new(NameCodec)).unwrap();
    let codec = InterestCodec::new(Arc::new(registry));

    let interest = Interest::new(Name::parse("/a")).with_payload(&b"x"[..]);
    let err = codec.encode_to_bytes(&interest).unwrap_err();
    assert!(matches!(err, CodecError::UnknownType(t) if t == tid("3.1.1")));

    // Interest { Name "/a", Payload "x" } with no payload codec registered
    let bytes = [0, 1, 0, 14, 0, 0, 0, 5, 0, 1, 0, 1, b'a', 0, 1, 0, 1, b'x'];
    let err = codec.decode_bytes(&bytes).unwrap_err();
    assert!(matches!(err, CodecError::UnknownType(t) if t == tid("3.1.1")));
}

#[test]
fn test_unrecognized_nested_type_is_unknown_field() {
    let codec = InterestCodec::default();

    // Interest { Name "/a", type 0x0009 "x" }
    let bytes = [0, 1, 0, 14, 0, 0, 0, 5, 0, 1, 0, 1, b'a', 0, 9, 0, 1, b'x'];
    match codec.decode_bytes(&bytes) {
        Err(CodecError::UnknownField { tid: t, offset }) => {
            assert_eq!(t, tid("3.1.9"));
            assert_eq!(offset, 13);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_registration_fails_after_freeze() {
    let registry = CodecRegistry::from_config(&RegistryConfig::default()).unwrap();
    assert!(registry.is_frozen());
    let err = registry
        .register(tid("3.1.9"), Arc::new(PayloadCodec))
        .unwrap_err();
    assert!(matches!(err, CodecError::RegistryFrozen(t) if t == tid("3.1.9")));
}

#[test]
fn test_open_registry_from_config() {
    let config = RegistryConfig {
        duplicate_policy: DuplicatePolicy::KeepFirst,
        freeze_after_init: false,
    };
    let registry = CodecRegistry::from_config(&config).unwrap();
    assert!(!registry.is_frozen());
    assert_eq!(registry.policy(), DuplicatePolicy::KeepFirst);

    // Keeps the standard name codec
    registry
        .register(tid("3.1.0"), Arc::new(PayloadCodec))
        .unwrap();
    assert_eq!(registry.lookup(&tid("3.1.0")).unwrap().name(), "NameCodec");

    registry
        .register(tid("3.1.9"), Arc::new(PayloadCodec))
        .unwrap();
    assert!(registry.contains(&tid("3.1.9")).unwrap());
}

#[test]
fn test_print_through_registry() {
    let registry = ccnx_codec::global_registry();
    let codec = registry.lookup(&tid("3.2.0")).unwrap();
    let mut text = String::new();
    codec
        .print(&Field::Name(Name::parse("/parc/Chunk=1")), &mut text)
        .unwrap();
    assert_eq!(text, "ccnx:/parc/Chunk=1");
}
