//! Integration tests for signed packet bodies and verifiers

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use ccnx_codec::codec::{global_registry, PacketBodyCodec};
use ccnx_codec::config::CodecConfig;
use ccnx_codec::crypto::{
    verifier_for_suite, Crc32cSigner, Crc32cVerifier, EcdsaSecp256k1Signer, HmacSha256Signer,
    HmacSha256Verifier, Key, Signer, Verifier,
};
use ccnx_codec::error::CodecError;
use ccnx_codec::protocol::{
    ContentObject, CryptoSuite, Interest, KeyId, Message, Name, PacketBody, PayloadType,
};

fn object() -> Message {
    Message::ContentObject(
        ContentObject::new(Name::parse("/parc/doc"))
            .with_payload_type(PayloadType::Data)
            .with_payload(&b"content"[..]),
    )
}

fn codec_with(mutator: impl FnOnce(&mut CodecConfig)) -> PacketBodyCodec {
    PacketBodyCodec::from_config(global_registry(), &CodecConfig::default_with_overrides(mutator))
}

#[test]
fn test_crc32c_body_verifies_and_detects_corruption() {
    let codec = PacketBodyCodec::default();
    let bytes = codec.encode_signed(&object(), &Crc32cSigner).unwrap();
    assert!(codec.verify(&bytes, &Crc32cVerifier).unwrap());

    // Flip one payload byte inside the protected region
    let mut corrupted = bytes.to_vec();
    let index = corrupted
        .windows(7)
        .position(|w| w == b"content")
        .expect("payload present");
    corrupted[index] ^= 0x01;
    assert!(!codec.verify(&corrupted, &Crc32cVerifier).unwrap());
}

#[test]
fn test_protected_region_excludes_signature() {
    let codec = codec_with(|c| c.signing.include_signing_time = false);
    let bytes = codec.encode_signed(&object(), &Crc32cSigner).unwrap();
    let region = codec.protected_region(&bytes).unwrap();

    // Validation payload: 4 byte header plus the 4 byte CRC
    assert_eq!(region.len(), bytes.len() - 8);
    assert_eq!(&bytes[..region.len()], region);
}

#[test]
fn test_hmac_key_mismatch() {
    let codec = PacketBodyCodec::default();
    let signer = HmacSha256Signer::new(b"alpha".to_vec()).unwrap();
    let bytes = codec.encode_signed(&object(), &signer).unwrap();

    let mut verifier = HmacSha256Verifier::new();
    verifier.add_key(Key::symmetric(b"bravo".to_vec())).unwrap();
    assert!(!codec.verify(&bytes, &verifier).unwrap());

    verifier.add_key(Key::symmetric(b"alpha".to_vec())).unwrap();
    assert!(codec.verify(&bytes, &verifier).unwrap());
}

#[test]
fn test_duplicate_key_is_ignored() {
    let mut verifier = HmacSha256Verifier::new();
    assert!(verifier.add_key(Key::symmetric(b"k".to_vec())).unwrap());
    assert!(!verifier.add_key(Key::symmetric(b"k".to_vec())).unwrap());
}

#[test]
fn test_crc32c_verifier_rejects_keys() {
    let mut verifier = Crc32cVerifier;
    assert!(matches!(
        verifier.add_key(Key::symmetric(b"k".to_vec())),
        Err(CodecError::InvalidKey(_))
    ));
}

#[test]
fn test_public_key_not_embedded_when_disabled() {
    let codec = codec_with(|c| c.signing.embed_public_key = false);
    let signer = EcdsaSecp256k1Signer::generate();
    let bytes = codec.encode_signed(&object(), &signer).unwrap();

    let alg = codec.decode(&bytes).unwrap().validation.unwrap();
    assert!(alg.public_key().is_none());
    assert_eq!(alg.key_id(), signer.key_id());
}

#[test]
fn test_signed_interest() {
    let codec = PacketBodyCodec::default();
    let signer = HmacSha256Signer::new(b"secret".to_vec()).unwrap();
    let interest = Message::Interest(Interest::new(Name::parse("/ask")));
    let bytes = codec.encode_signed(&interest, &signer).unwrap();

    let body = codec.decode(&bytes).unwrap();
    assert_eq!(body.message, interest);
    assert_eq!(
        body.validation.as_ref().map(|a| a.crypto_suite()),
        Some(CryptoSuite::HmacSha256)
    );
    assert_eq!(
        body.validation.and_then(|a| a.key_id().cloned()),
        Some(KeyId::from_key_bytes(b"secret"))
    );
}

#[test]
fn test_reencode_decoded_body_is_identical() {
    let codec = PacketBodyCodec::default();
    let signer = EcdsaSecp256k1Signer::generate();
    let bytes = codec.encode_signed(&object(), &signer).unwrap();
    let body = codec.decode(&bytes).unwrap();
    assert_eq!(codec.encode(&body).unwrap(), bytes);
}

#[test]
fn test_unsigned_body_does_not_verify() {
    let codec = PacketBodyCodec::default();
    let bytes = codec.encode(&PacketBody::unsigned(object())).unwrap();
    assert!(!codec.verify(&bytes, &Crc32cVerifier).unwrap());
}

#[test]
fn test_vmac_has_no_verifier() {
    assert!(matches!(
        verifier_for_suite(CryptoSuite::Vmac128),
        Err(CodecError::UnsupportedCryptoSuite(CryptoSuite::Vmac128))
    ));
}

#[test]
fn test_wrong_digest_length() {
    let verifier = HmacSha256Verifier::new();
    let err = verifier
        .verify(
            None,
            &[0u8; 4],
            CryptoSuite::HmacSha256,
            &ccnx_codec::protocol::Signature::new(vec![0u8; 32]),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        CodecError::InvalidDigestLength {
            expected: 32,
            actual: 4,
            ..
        }
    ));
}

#[test]
fn test_signer_trait_objects() {
    let signers: Vec<Box<dyn Signer>> = vec![
        Box::new(Crc32cSigner),
        Box::new(HmacSha256Signer::new(b"s".to_vec()).unwrap()),
        Box::new(EcdsaSecp256k1Signer::generate()),
    ];
    let codec = PacketBodyCodec::default();
    for signer in &signers {
        let bytes = codec.encode_signed(&object(), signer.as_ref()).unwrap();
        let body = codec.decode(&bytes).unwrap();
        assert_eq!(
            body.validation.map(|a| a.crypto_suite()),
            Some(signer.crypto_suite())
        );
    }
}
