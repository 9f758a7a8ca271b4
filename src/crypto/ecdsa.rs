//! ECDSA over secp256k1 (SHA-256) and secp384r1 (SHA-384).
//!
//! Public keys are SEC1 compressed points. Signatures are the fixed-size
//! `r || s` encoding.

use crate::crypto::{check_digest, Hasher, Key, KeyKind, KeyStore, Signer, Verifier};
use crate::error::{constants, CodecError, Result};
use crate::protocol::validation::{CryptoSuite, KeyId, PublicKey, Signature};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use rand_core::OsRng;
use tracing::debug;

pub struct EcdsaSecp256k1Signer {
    signing_key: k256::ecdsa::SigningKey,
    public_key: PublicKey,
    key_id: KeyId,
}

impl EcdsaSecp256k1Signer {
    pub fn generate() -> Self {
        Self::from_signing_key(k256::ecdsa::SigningKey::random(&mut OsRng))
    }

    pub fn from_signing_key(signing_key: k256::ecdsa::SigningKey) -> Self {
        let point = signing_key.verifying_key().to_encoded_point(true);
        let public_key = PublicKey::new(point.as_bytes().to_vec());
        Self {
            key_id: public_key.key_id(),
            public_key,
            signing_key,
        }
    }
}

impl Signer for EcdsaSecp256k1Signer {
    fn crypto_suite(&self) -> CryptoSuite {
        CryptoSuite::EcSecp256k1
    }

    fn signature_hasher(&self) -> Hasher {
        Hasher::Sha256
    }

    fn key_id(&self) -> Option<&KeyId> {
        Some(&self.key_id)
    }

    fn public_key(&self) -> Option<&PublicKey> {
        Some(&self.public_key)
    }

    fn sign_digest(&self, digest: &[u8]) -> Result<Signature> {
        check_digest(CryptoSuite::EcSecp256k1, Hasher::Sha256, digest)?;
        let signature: k256::ecdsa::Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| CodecError::SigningFailure(e.to_string()))?;
        Ok(Signature::new(signature.to_bytes().to_vec()))
    }
}

#[derive(Default)]
pub struct EcdsaSecp256k1Verifier {
    keys: KeyStore<k256::ecdsa::VerifyingKey>,
}

impl EcdsaSecp256k1Verifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Verifier for EcdsaSecp256k1Verifier {
    fn crypto_suite(&self) -> CryptoSuite {
        CryptoSuite::EcSecp256k1
    }

    fn add_key(&mut self, key: Key) -> Result<bool> {
        if key.kind() != KeyKind::Public {
            return Err(CodecError::InvalidKey(constants::ERR_KEY_KIND));
        }
        let verifying_key = k256::ecdsa::VerifyingKey::from_sec1_bytes(key.bytes())
            .map_err(|_| CodecError::InvalidKey(constants::ERR_KEY_ENCODING))?;
        Ok(self.keys.insert(key.key_id().clone(), verifying_key))
    }

    fn signature_hasher(&self) -> Hasher {
        Hasher::Sha256
    }

    fn verify(
        &self,
        key_id: Option<&KeyId>,
        digest: &[u8],
        suite: CryptoSuite,
        signature: &Signature,
    ) -> Result<bool> {
        if suite != CryptoSuite::EcSecp256k1 {
            debug!(%suite, "suite mismatch");
            return Ok(false);
        }
        check_digest(suite, Hasher::Sha256, digest)?;
        let Ok(signature) = k256::ecdsa::Signature::from_slice(signature.as_bytes()) else {
            return Ok(false);
        };
        Ok(self
            .keys
            .candidates(key_id)
            .into_iter()
            .any(|key| key.verify_prehash(digest, &signature).is_ok()))
    }
}

pub struct EcdsaSecp384r1Signer {
    signing_key: p384::ecdsa::SigningKey,
    public_key: PublicKey,
    key_id: KeyId,
}

impl EcdsaSecp384r1Signer {
    pub fn generate() -> Self {
        Self::from_signing_key(p384::ecdsa::SigningKey::random(&mut OsRng))
    }

    pub fn from_signing_key(signing_key: p384::ecdsa::SigningKey) -> Self {
        let point = signing_key.verifying_key().to_encoded_point(true);
        let public_key = PublicKey::new(point.as_bytes().to_vec());
        Self {
            key_id: public_key.key_id(),
            public_key,
            signing_key,
        }
    }
}

impl Signer for EcdsaSecp384r1Signer {
    fn crypto_suite(&self) -> CryptoSuite {
        CryptoSuite::EcSecp384r1
    }

    fn signature_hasher(&self) -> Hasher {
        Hasher::Sha384
    }

    fn key_id(&self) -> Option<&KeyId> {
        Some(&self.key_id)
    }

    fn public_key(&self) -> Option<&PublicKey> {
        Some(&self.public_key)
    }

    fn sign_digest(&self, digest: &[u8]) -> Result<Signature> {
        check_digest(CryptoSuite::EcSecp384r1, Hasher::Sha384, digest)?;
        let signature: p384::ecdsa::Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| CodecError::SigningFailure(e.to_string()))?;
        Ok(Signature::new(signature.to_bytes().to_vec()))
    }
}

#[derive(Default)]
pub struct EcdsaSecp384r1Verifier {
    keys: KeyStore<p384::ecdsa::VerifyingKey>,
}

impl EcdsaSecp384r1Verifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Verifier for EcdsaSecp384r1Verifier {
    fn crypto_suite(&self) -> CryptoSuite {
        CryptoSuite::EcSecp384r1
    }

    fn add_key(&mut self, key: Key) -> Result<bool> {
        if key.kind() != KeyKind::Public {
            return Err(CodecError::InvalidKey(constants::ERR_KEY_KIND));
        }
        let verifying_key = p384::ecdsa::VerifyingKey::from_sec1_bytes(key.bytes())
            .map_err(|_| CodecError::InvalidKey(constants::ERR_KEY_ENCODING))?;
        Ok(self.keys.insert(key.key_id().clone(), verifying_key))
    }

    fn signature_hasher(&self) -> Hasher {
        Hasher::Sha384
    }

    fn verify(
        &self,
        key_id: Option<&KeyId>,
        digest: &[u8],
        suite: CryptoSuite,
        signature: &Signature,
    ) -> Result<bool> {
        if suite != CryptoSuite::EcSecp384r1 {
            debug!(%suite, "suite mismatch");
            return Ok(false);
        }
        check_digest(suite, Hasher::Sha384, digest)?;
        let Ok(signature) = p384::ecdsa::Signature::from_slice(signature.as_bytes()) else {
            return Ok(false);
        };
        Ok(self
            .keys
            .candidates(key_id)
            .into_iter()
            .any(|key| key.verify_prehash(digest, &signature).is_ok()))
    }
}
