//! Validation metadata carried alongside a message.
//!
//! A [`ValidationAlgorithm`] only describes how a packet was protected: the
//! crypto suite, which key was used and when. Checking a signature is the job
//! of a [`Verifier`](crate::crypto::Verifier) selected by the suite.
//!
//! ## Suite Shapes
//! | Suite          | KeyId     | Public key |
//! |----------------|-----------|------------|
//! | CRC32C         | never     | never      |
//! | HMAC-SHA256    | optional  | never      |
//! | VMAC-128       | optional  | never      |
//! | RSA-SHA256     | required  | optional   |
//! | EC-SECP-256K1  | required  | optional   |
//! | EC-SECP-384R1  | required  | optional   |

use crate::core::schema::TID_VALIDATION_ALG;
use crate::core::tid::TypeIdentifier;
use crate::error::{constants, CodecError, Result};
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// CCNx 1.0 crypto suites, numbered by their TLV type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CryptoSuite {
    Crc32c,
    HmacSha256,
    Vmac128,
    RsaSha256,
    EcSecp256k1,
    EcSecp384r1,
}

/// Broad family of a crypto suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteKind {
    /// Integrity check without a key.
    Checksum,
    /// Shared-secret MAC.
    Symmetric,
    /// Asymmetric signature.
    PublicKey,
}

impl CryptoSuite {
    pub const ALL: [CryptoSuite; 6] = [
        CryptoSuite::Crc32c,
        CryptoSuite::HmacSha256,
        CryptoSuite::Vmac128,
        CryptoSuite::RsaSha256,
        CryptoSuite::EcSecp256k1,
        CryptoSuite::EcSecp384r1,
    ];

    pub fn tlv_type(self) -> u16 {
        match self {
            CryptoSuite::Crc32c => 2,
            CryptoSuite::HmacSha256 => 4,
            CryptoSuite::Vmac128 => 5,
            CryptoSuite::RsaSha256 => 6,
            CryptoSuite::EcSecp256k1 => 7,
            CryptoSuite::EcSecp384r1 => 8,
        }
    }

    pub fn from_tlv_type(tlv_type: u16) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|suite| suite.tlv_type() == tlv_type)
            .ok_or(CodecError::UnknownCryptoSuite(tlv_type))
    }

    /// Codec TID of this suite's validation algorithm TLV (`3.3.<n>`).
    pub fn tid(self) -> TypeIdentifier {
        TID_VALIDATION_ALG.child(u32::from(self.tlv_type()))
    }

    pub fn kind(self) -> SuiteKind {
        match self {
            CryptoSuite::Crc32c => SuiteKind::Checksum,
            CryptoSuite::HmacSha256 | CryptoSuite::Vmac128 => SuiteKind::Symmetric,
            CryptoSuite::RsaSha256 | CryptoSuite::EcSecp256k1 | CryptoSuite::EcSecp384r1 => {
                SuiteKind::PublicKey
            }
        }
    }
}

impl fmt::Display for CryptoSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CryptoSuite::Crc32c => "CRC32C",
            CryptoSuite::HmacSha256 => "HMAC-SHA256",
            CryptoSuite::Vmac128 => "VMAC-128",
            CryptoSuite::RsaSha256 => "RSA-SHA256",
            CryptoSuite::EcSecp256k1 => "EC-SECP-256K1",
            CryptoSuite::EcSecp384r1 => "EC-SECP-384R1",
        };
        f.write_str(name)
    }
}

/// Identifier of a key, normally the SHA-256 of its encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyId(Bytes);

impl KeyId {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// KeyId derived from encoded key material.
    pub fn from_key_bytes(key: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(&Sha256::digest(key)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

/// Encoded public key (DER SubjectPublicKeyInfo for RSA, SEC1 for EC).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey(Bytes);

impl PublicKey {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn key_id(&self) -> KeyId {
        KeyId::from_key_bytes(&self.0)
    }
}

/// Signature or MAC carried in the validation payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(Bytes);

impl Signature {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Signing time in milliseconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SigningTime(u64);

impl SigningTime {
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn millis(&self) -> u64 {
        self.0
    }

    /// Current wall clock time.
    ///
    /// # Errors
    /// Returns `CodecError::SigningFailure` if the system time is earlier than UNIX_EPOCH
    pub fn now() -> Result<Self> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| Self(d.as_millis() as u64))
            .map_err(|_| CodecError::SigningFailure(constants::ERR_SYSTEM_TIME.into()))
    }
}

/// Immutable description of how a packet is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationAlgorithm {
    suite: CryptoSuite,
    key_id: Option<KeyId>,
    public_key: Option<PublicKey>,
    signature: Option<Signature>,
    signing_time: Option<SigningTime>,
}

impl ValidationAlgorithm {
    /// Builds validation metadata, rejecting shapes the suite cannot carry.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidField` naming the suite's TID when a KeyId
    /// or public key is present where the suite forbids it, or when a public
    /// key suite has no KeyId.
    pub fn new(
        suite: CryptoSuite,
        key_id: Option<KeyId>,
        public_key: Option<PublicKey>,
        signing_time: Option<SigningTime>,
    ) -> Result<Self> {
        let invalid = |reason| CodecError::InvalidField {
            tid: suite.tid(),
            reason,
        };
        match suite.kind() {
            SuiteKind::Checksum => {
                if key_id.is_some() {
                    return Err(invalid(constants::ERR_KEYID_NOT_ALLOWED));
                }
                if public_key.is_some() {
                    return Err(invalid(constants::ERR_PUBLIC_KEY_NOT_ALLOWED));
                }
            }
            SuiteKind::Symmetric => {
                if public_key.is_some() {
                    return Err(invalid(constants::ERR_PUBLIC_KEY_NOT_ALLOWED));
                }
            }
            SuiteKind::PublicKey => {
                if key_id.is_none() {
                    return Err(invalid(constants::ERR_KEYID_REQUIRED));
                }
            }
        }
        Ok(Self {
            suite,
            key_id,
            public_key,
            signature: None,
            signing_time,
        })
    }

    /// CRC32C integrity check.
    pub fn crc32c() -> Self {
        Self {
            suite: CryptoSuite::Crc32c,
            key_id: None,
            public_key: None,
            signature: None,
            signing_time: None,
        }
    }

    /// Copy of this algorithm carrying `signature`.
    pub fn with_signature(&self, signature: Signature) -> Self {
        Self {
            signature: Some(signature),
            ..self.clone()
        }
    }

    pub fn crypto_suite(&self) -> CryptoSuite {
        self.suite
    }

    /// TID under which the codec for this algorithm is registered.
    pub fn codec_tid(&self) -> TypeIdentifier {
        self.suite.tid()
    }

    pub fn has_key_id(&self) -> bool {
        self.key_id.is_some()
    }

    pub fn key_id(&self) -> Option<&KeyId> {
        self.key_id.as_ref()
    }

    pub fn public_key(&self) -> Option<&PublicKey> {
        self.public_key.as_ref()
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn signing_time(&self) -> Option<SigningTime> {
        self.signing_time
    }
}
