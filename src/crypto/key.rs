use crate::protocol::validation::{KeyId, PublicKey};
use bytes::Bytes;
use std::collections::HashMap;

/// Whether key bytes are a shared secret or an encoded public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Symmetric,
    Public,
}

/// Key material handed to a verifier.
#[derive(Clone, PartialEq, Eq)]
pub struct Key {
    key_id: KeyId,
    kind: KeyKind,
    bytes: Bytes,
}

impl Key {
    pub fn new(key_id: KeyId, kind: KeyKind, bytes: impl Into<Bytes>) -> Self {
        Self {
            key_id,
            kind,
            bytes: bytes.into(),
        }
    }

    /// Shared secret identified by the SHA-256 of its bytes.
    pub fn symmetric(secret: impl Into<Bytes>) -> Self {
        let bytes = secret.into();
        Self {
            key_id: KeyId::from_key_bytes(&bytes),
            kind: KeyKind::Symmetric,
            bytes,
        }
    }

    /// Public key identified by the SHA-256 of its encoding.
    pub fn public(key: &PublicKey) -> Self {
        Self {
            key_id: key.key_id(),
            kind: KeyKind::Public,
            bytes: Bytes::copy_from_slice(key.as_bytes()),
        }
    }

    pub fn key_id(&self) -> &KeyId {
        &self.key_id
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

// Symmetric secrets stay out of logs.
impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key")
            .field("key_id", &self.key_id.to_string())
            .field("kind", &self.kind)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// KeyId to key map that never replaces an existing entry.
#[derive(Debug)]
pub struct KeyStore<K> {
    keys: HashMap<KeyId, K>,
}

impl<K> Default for KeyStore<K> {
    fn default() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }
}

impl<K> KeyStore<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key` unless `key_id` is already present. Returns whether it was added.
    pub fn insert(&mut self, key_id: KeyId, key: K) -> bool {
        match self.keys.entry(key_id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(key);
                true
            }
        }
    }

    pub fn get(&self, key_id: &KeyId) -> Option<&K> {
        self.keys.get(key_id)
    }

    /// Keys to try for a signature: the named key, or every key when the
    /// packet names none.
    pub fn candidates(&self, key_id: Option<&KeyId>) -> Vec<&K> {
        match key_id {
            Some(id) => self.keys.get(id).into_iter().collect(),
            None => self.keys.values().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_if_absent() {
        let mut store = KeyStore::new();
        let id = KeyId::new(vec![1u8]);
        assert!(store.insert(id.clone(), "first"));
        assert!(!store.insert(id.clone(), "second"));
        assert_eq!(store.get(&id), Some(&"first"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_candidates() {
        let mut store = KeyStore::new();
        store.insert(KeyId::new(vec![1u8]), 1);
        store.insert(KeyId::new(vec![2u8]), 2);
        assert_eq!(store.candidates(Some(&KeyId::new(vec![2u8]))), vec![&2]);
        assert!(store.candidates(Some(&KeyId::new(vec![3u8]))).is_empty());
        assert_eq!(store.candidates(None).len(), 2);
    }

    #[test]
    fn test_symmetric_key_id_is_sha256() {
        let key = Key::symmetric(&b"secret"[..]);
        assert_eq!(key.key_id(), &KeyId::from_key_bytes(b"secret"));
        assert_eq!(key.kind(), KeyKind::Symmetric);
        assert!(!format!("{key:?}").contains("secret"));
    }
}
