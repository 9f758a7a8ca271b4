//! # Signing and Verification
//!
//! Pluggable signers and verifiers keyed by crypto suite.
//!
//! A [`Verifier`] only answers whether a signature matches a digest under a
//! known key. It holds no trust policy: deciding which keys to add is up to
//! the caller.
//!
//! ## Suites
//! - **CRC32C**: keyless integrity check
//! - **HMAC-SHA256**: shared secret MAC (`hmac`, `sha2`)
//! - **RSA-SHA256**: PKCS#1 v1.5 signatures (`rsa`)
//! - **EC-SECP-256K1**: ECDSA over SHA-256 (`k256`)
//! - **EC-SECP-384R1**: ECDSA over SHA-384 (`p384`)
//!
//! VMAC-128 can be described by a `ValidationAlgorithm` but has no
//! implementation here.
//!
//! ## Example Usage
//! ```rust
//! use ccnx_codec::crypto::{HmacSha256Signer, Key, Signer, Verifier, verifier_for_suite};
//! use ccnx_codec::protocol::CryptoSuite;
//!
//! # fn main() -> ccnx_codec::error::Result<()> {
//! let signer = HmacSha256Signer::new(b"shared secret".to_vec())?;
//! let digest = signer.signature_hasher().digest(b"protected bytes");
//! let signature = signer.sign_digest(&digest)?;
//!
//! let mut verifier = verifier_for_suite(CryptoSuite::HmacSha256)?;
//! verifier.add_key(Key::symmetric(b"shared secret".to_vec()))?;
//! assert!(verifier.verify(signer.key_id(), &digest, CryptoSuite::HmacSha256, &signature)?);
//! # Ok(())
//! # }
//! ```

pub mod crc32c;
pub mod ecdsa;
pub mod hasher;
pub mod hmac;
pub mod key;
pub mod rsa;

use crate::error::{CodecError, Result};
use crate::protocol::validation::{
    CryptoSuite, KeyId, PublicKey, Signature, SigningTime, ValidationAlgorithm,
};

pub use self::crc32c::{Crc32cSigner, Crc32cVerifier};
pub use self::ecdsa::{
    EcdsaSecp256k1Signer, EcdsaSecp256k1Verifier, EcdsaSecp384r1Signer, EcdsaSecp384r1Verifier,
};
pub use self::hmac::{HmacSha256Signer, HmacSha256Verifier};
pub use self::rsa::{RsaSha256Signer, RsaSha256Verifier};
pub use hasher::Hasher;
pub use key::{Key, KeyKind, KeyStore};

/// Produces signatures for one crypto suite.
pub trait Signer: Send + Sync {
    fn crypto_suite(&self) -> CryptoSuite;

    fn signature_hasher(&self) -> Hasher;

    /// KeyId placed in the validation algorithm, if the suite carries one.
    fn key_id(&self) -> Option<&KeyId>;

    /// Encoded public key that can be embedded in the validation algorithm.
    fn public_key(&self) -> Option<&PublicKey>;

    /// Signs a digest produced by [`signature_hasher`](Signer::signature_hasher).
    fn sign_digest(&self, digest: &[u8]) -> Result<Signature>;

    /// Validation metadata describing signatures from this signer.
    fn validation_algorithm(
        &self,
        embed_public_key: bool,
        signing_time: Option<SigningTime>,
    ) -> Result<ValidationAlgorithm> {
        let public_key = if embed_public_key {
            self.public_key().cloned()
        } else {
            None
        };
        ValidationAlgorithm::new(
            self.crypto_suite(),
            self.key_id().cloned(),
            public_key,
            signing_time,
        )
    }
}

/// Mechanical signature check for one crypto suite.
pub trait Verifier: Send + Sync {
    fn crypto_suite(&self) -> CryptoSuite;

    /// Adds a key. Returns `Ok(false)` if its KeyId is already present.
    ///
    /// # Errors
    /// `InvalidKey` if the key cannot be used with this suite.
    fn add_key(&mut self, key: Key) -> Result<bool>;

    fn signature_hasher(&self) -> Hasher;

    /// Checks `signature` over `digest`.
    ///
    /// Returns `Ok(false)` for a suite other than this verifier's, an unknown
    /// KeyId or a signature that does not match.
    ///
    /// # Errors
    /// `InvalidDigestLength` if `digest` is not the hasher's output length.
    fn verify(
        &self,
        key_id: Option<&KeyId>,
        digest: &[u8],
        suite: CryptoSuite,
        signature: &Signature,
    ) -> Result<bool>;
}

/// Checks the digest length expected by `hasher` for `suite`.
pub(crate) fn check_digest(suite: CryptoSuite, hasher: Hasher, digest: &[u8]) -> Result<()> {
    if digest.len() != hasher.output_len() {
        return Err(CodecError::InvalidDigestLength {
            suite,
            expected: hasher.output_len(),
            actual: digest.len(),
        });
    }
    Ok(())
}

/// Empty verifier for `suite`.
///
/// # Errors
/// `UnsupportedCryptoSuite` for VMAC-128.
pub fn verifier_for_suite(suite: CryptoSuite) -> Result<Box<dyn Verifier>> {
    match suite {
        CryptoSuite::Crc32c => Ok(Box::new(Crc32cVerifier)),
        CryptoSuite::HmacSha256 => Ok(Box::new(HmacSha256Verifier::new())),
        CryptoSuite::RsaSha256 => Ok(Box::new(RsaSha256Verifier::new())),
        CryptoSuite::EcSecp256k1 => Ok(Box::new(EcdsaSecp256k1Verifier::new())),
        CryptoSuite::EcSecp384r1 => Ok(Box::new(EcdsaSecp384r1Verifier::new())),
        CryptoSuite::Vmac128 => Err(CodecError::UnsupportedCryptoSuite(suite)),
    }
}
