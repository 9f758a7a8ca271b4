//! CRC32C integrity check. Keyless: the "signature" is the CRC of the
//! protected region.

use crate::crypto::{check_digest, Hasher, Key, Signer, Verifier};
use crate::error::{constants, CodecError, Result};
use crate::protocol::validation::{CryptoSuite, KeyId, PublicKey, Signature};
use bytes::Bytes;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct Crc32cSigner;

impl Signer for Crc32cSigner {
    fn crypto_suite(&self) -> CryptoSuite {
        CryptoSuite::Crc32c
    }

    fn signature_hasher(&self) -> Hasher {
        Hasher::Crc32c
    }

    fn key_id(&self) -> Option<&KeyId> {
        None
    }

    fn public_key(&self) -> Option<&PublicKey> {
        None
    }

    fn sign_digest(&self, digest: &[u8]) -> Result<Signature> {
        check_digest(CryptoSuite::Crc32c, Hasher::Crc32c, digest)?;
        Ok(Signature::new(Bytes::copy_from_slice(digest)))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Crc32cVerifier;

impl Verifier for Crc32cVerifier {
    fn crypto_suite(&self) -> CryptoSuite {
        CryptoSuite::Crc32c
    }

    fn add_key(&mut self, _key: Key) -> Result<bool> {
        Err(CodecError::InvalidKey(constants::ERR_KEYLESS_SUITE))
    }

    fn signature_hasher(&self) -> Hasher {
        Hasher::Crc32c
    }

    fn verify(
        &self,
        _key_id: Option<&KeyId>,
        digest: &[u8],
        suite: CryptoSuite,
        signature: &Signature,
    ) -> Result<bool> {
        if suite != CryptoSuite::Crc32c {
            debug!(%suite, "suite mismatch");
            return Ok(false);
        }
        check_digest(suite, Hasher::Crc32c, digest)?;
        Ok(signature.as_bytes() == digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let digest = Hasher::Crc32c.digest(b"protected");
        let signature = Crc32cSigner.sign_digest(&digest).unwrap();
        assert!(Crc32cVerifier
            .verify(None, &digest, CryptoSuite::Crc32c, &signature)
            .unwrap());

        let other = Hasher::Crc32c.digest(b"tampered");
        assert!(!Crc32cVerifier
            .verify(None, &other, CryptoSuite::Crc32c, &signature)
            .unwrap());
    }

    #[test]
    fn test_keys_refused() {
        let mut verifier = Crc32cVerifier;
        assert!(matches!(
            verifier.add_key(Key::symmetric(&b"k"[..])),
            Err(CodecError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_other_suite_is_false() {
        let digest = [0u8; 4];
        let signature = Signature::new(vec![0u8; 4]);
        assert!(!Crc32cVerifier
            .verify(None, &digest, CryptoSuite::HmacSha256, &signature)
            .unwrap());
    }
}
