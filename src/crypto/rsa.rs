//! RSA-SHA256 with PKCS#1 v1.5 padding. Public keys travel as DER
//! SubjectPublicKeyInfo.

use crate::crypto::{check_digest, Hasher, Key, KeyKind, KeyStore, Signer, Verifier};
use crate::error::{constants, CodecError, Result};
use crate::protocol::validation::{CryptoSuite, KeyId, PublicKey, Signature};
use ::rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use ::rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use rand_core::OsRng;
use sha2::Sha256;
use tracing::debug;

fn padding() -> Pkcs1v15Sign {
    Pkcs1v15Sign::new::<Sha256>()
}

pub struct RsaSha256Signer {
    private_key: RsaPrivateKey,
    public_key: PublicKey,
    key_id: KeyId,
}

impl RsaSha256Signer {
    /// Generates a fresh key pair of `bits` size.
    pub fn generate(bits: usize) -> Result<Self> {
        let private_key = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| CodecError::SigningFailure(e.to_string()))?;
        Self::from_private_key(private_key)
    }

    pub fn from_private_key(private_key: RsaPrivateKey) -> Result<Self> {
        let der = RsaPublicKey::from(&private_key)
            .to_public_key_der()
            .map_err(|_| CodecError::InvalidKey(constants::ERR_KEY_ENCODING))?;
        let public_key = PublicKey::new(der.as_bytes().to_vec());
        Ok(Self {
            key_id: public_key.key_id(),
            public_key,
            private_key,
        })
    }
}

impl Signer for RsaSha256Signer {
    fn crypto_suite(&self) -> CryptoSuite {
        CryptoSuite::RsaSha256
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
        check_digest(CryptoSuite::RsaSha256, Hasher::Sha256, digest)?;
        let signature = self
            .private_key
            .sign(padding(), digest)
            .map_err(|e| CodecError::SigningFailure(e.to_string()))?;
        Ok(Signature::new(signature))
    }
}

#[derive(Default)]
pub struct RsaSha256Verifier {
    keys: KeyStore<RsaPublicKey>,
}

impl RsaSha256Verifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Verifier for RsaSha256Verifier {
    fn crypto_suite(&self) -> CryptoSuite {
        CryptoSuite::RsaSha256
    }

    fn add_key(&mut self, key: Key) -> Result<bool> {
        if key.kind() != KeyKind::Public {
            return Err(CodecError::InvalidKey(constants::ERR_KEY_KIND));
        }
        let public_key = RsaPublicKey::from_public_key_der(key.bytes())
            .map_err(|_| CodecError::InvalidKey(constants::ERR_KEY_ENCODING))?;
        Ok(self.keys.insert(key.key_id().clone(), public_key))
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
        if suite != CryptoSuite::RsaSha256 {
            debug!(%suite, "suite mismatch");
            return Ok(false);
        }
        check_digest(suite, Hasher::Sha256, digest)?;
        Ok(self
            .keys
            .candidates(key_id)
            .into_iter()
            .any(|key| key.verify(padding(), digest, signature.as_bytes()).is_ok()))
    }
}
