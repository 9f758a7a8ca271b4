use sha2::{Digest, Sha256, Sha384};
use std::fmt;

/// Digest function applied to the protected region before signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hasher {
    /// CRC-32C (Castagnoli), 4 bytes big-endian.
    Crc32c,
    Sha256,
    Sha384,
}

impl Hasher {
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Hasher::Crc32c => crc32c::crc32c(data).to_be_bytes().to_vec(),
            Hasher::Sha256 => Sha256::digest(data).to_vec(),
            Hasher::Sha384 => Sha384::digest(data).to_vec(),
        }
    }

    pub fn output_len(&self) -> usize {
        match self {
            Hasher::Crc32c => 4,
            Hasher::Sha256 => 32,
            Hasher::Sha384 => 48,
        }
    }
}

impl fmt::Display for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hasher::Crc32c => f.write_str("CRC32C"),
            Hasher::Sha256 => f.write_str("SHA-256"),
            Hasher::Sha384 => f.write_str("SHA-384"),
        }
    }
}
