use std::fmt;

/// Bytes of the hash value that carry the digest; the rest is padding.
pub const HASH_VALUE_MIN_LEN: usize = 8;

/// Length of the canonical byte form: the 8-byte digest plus 24 bytes of zero
/// padding, so restrictions occupy the same space as a SHA-256 digest.
pub const HASH_VALUE_WIRE_LEN: usize = 32;

/// 64-bit digest used for KeyId and ContentObjectHash restrictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HashValue(u64);

impl HashValue {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Canonical byte form: big-endian value followed by zero padding.
    pub fn to_bytes(&self) -> [u8; HASH_VALUE_WIRE_LEN] {
        let mut out = [0u8; HASH_VALUE_WIRE_LEN];
        out[..HASH_VALUE_MIN_LEN].copy_from_slice(&self.0.to_be_bytes());
        out
    }
}

impl From<u64> for HashValue {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
