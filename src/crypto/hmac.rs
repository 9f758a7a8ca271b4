//! HMAC-SHA256 over the SHA-256 digest of the protected region.

use crate::crypto::{check_digest, Hasher, Key, KeyKind, KeyStore, Signer, Verifier};
use crate::error::{constants, CodecError, Result};
use crate::protocol::validation::{CryptoSuite, KeyId, PublicKey, Signature};
use ::hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

fn mac(secret: &[u8], digest: &[u8]) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|_| CodecError::InvalidKey(constants::ERR_KEY_ENCODING))?;
    mac.update(digest);
    Ok(mac)
}

/// Signs with a shared secret. The KeyId is the SHA-256 of the secret.
pub struct HmacSha256Signer {
    key_id: KeyId,
    secret: Zeroizing<Vec<u8>>,
}

impl HmacSha256Signer {
    pub fn new(secret: Vec<u8>) -> Result<Self> {
        if secret.is_empty() {
            return Err(CodecError::InvalidKey(constants::ERR_EMPTY_SECRET));
        }
        Ok(Self {
            key_id: KeyId::from_key_bytes(&secret),
            secret: Zeroizing::new(secret),
        })
    }
}

impl Signer for HmacSha256Signer {
    fn crypto_suite(&self) -> CryptoSuite {
        CryptoSuite::HmacSha256
    }

    fn signature_hasher(&self) -> Hasher {
        Hasher::Sha256
    }

    fn key_id(&self) -> Option<&KeyId> {
        Some(&self.key_id)
    }

    fn public_key(&self) -> Option<&PublicKey> {
        None
    }

    fn sign_digest(&self, digest: &[u8]) -> Result<Signature> {
        check_digest(CryptoSuite::HmacSha256, Hasher::Sha256, digest)?;
        let tag = mac(&self.secret, digest)?.finalize().into_bytes();
        Ok(Signature::new(tag.to_vec()))
    }
}

/// Verifies HMAC-SHA256 tags against registered shared secrets.
#[derive(Default)]
pub struct HmacSha256Verifier {
    keys: KeyStore<Zeroizing<Vec<u8>>>,
}

impl HmacSha256Verifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Verifier for HmacSha256Verifier {
    fn crypto_suite(&self) -> CryptoSuite {
        CryptoSuite::HmacSha256
    }

    fn add_key(&mut self, key: Key) -> Result<bool> {
        if key.kind() != KeyKind::Symmetric {
            return Err(CodecError::InvalidKey(constants::ERR_KEY_KIND));
        }
        if key.bytes().is_empty() {
            return Err(CodecError::InvalidKey(constants::ERR_EMPTY_SECRET));
        }
        Ok(self
            .keys
            .insert(key.key_id().clone(), Zeroizing::new(key.bytes().to_vec())))
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
        if suite != CryptoSuite::HmacSha256 {
            debug!(%suite, "suite mismatch");
            return Ok(false);
        }
        check_digest(suite, Hasher::Sha256, digest)?;
        for secret in self.keys.candidates(key_id) {
            if mac(secret, digest)?.verify_slice(signature.as_bytes()).is_ok() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
