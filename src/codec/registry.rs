//! Type identifier to codec dispatch table.
//!
//! The registry has two phases. During initialization codecs are registered;
//! after [`CodecRegistry::freeze`] the table is read-only and further
//! registrations fail with `RegistryFrozen`. Lookups take a shared read lock,
//! so a frozen registry can be used from any number of threads.

use crate::codec::{
    FieldCodec, HashValueCodec, NameCodec, PayloadCodec, PayloadTypeCodec, TimestampCodec,
    ValidationAlgorithmCodec,
};
use crate::config::RegistryConfig;
use crate::core::schema::{
    TID_INTEREST_HASH_REST, TID_INTEREST_KEYID_REST, TID_INTEREST_NAME, TID_INTEREST_PAYLOAD,
    TID_OBJECT_EXPIRY, TID_OBJECT_NAME, TID_OBJECT_PAYLOAD, TID_OBJECT_PAYLOAD_TYPE,
    TID_VALIDATION_PAYLOAD,
};
use crate::core::tid::TypeIdentifier;
use crate::error::{constants, CodecError, Result};
use crate::protocol::validation::CryptoSuite;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// What to do when a TID is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateRegistration`.
    #[default]
    Reject,
    /// Keep the codec registered first and ignore the new one.
    KeepFirst,
}

/// Maps type identifiers to field codecs.
#[derive(Debug)]
pub struct CodecRegistry {
    codecs: RwLock<HashMap<TypeIdentifier, Arc<dyn FieldCodec>>>,
    frozen: AtomicBool,
    policy: DuplicatePolicy,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecRegistry {
    /// Empty registry rejecting duplicate registrations.
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::Reject)
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            codecs: RwLock::new(HashMap::new()),
            frozen: AtomicBool::new(false),
            policy,
        }
    }

    /// Registry holding every CCNx 1.0 codec, still open for registration.
    pub fn with_standard_codecs(policy: DuplicatePolicy) -> Result<Self> {
        let registry = Self::with_policy(policy);
        for (tid, codec) in standard_codecs() {
            registry.register(tid, codec)?;
        }
        Ok(registry)
    }

    /// Builds the standard registry and freezes it if the configuration asks to.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let registry = Self::with_standard_codecs(config.duplicate_policy)?;
        if config.freeze_after_init {
            registry.freeze();
        }
        Ok(registry)
    }

    /// Registers `codec` for `tid`.
    ///
    /// # Errors
    /// - `RegistryFrozen` once [`freeze`](Self::freeze) has been called
    /// - `DuplicateRegistration` if `tid` is taken and the policy is `Reject`
    pub fn register(&self, tid: TypeIdentifier, codec: Arc<dyn FieldCodec>) -> Result<()> {
        let mut codecs = self
            .codecs
            .write()
            .map_err(|_| CodecError::LockPoisoned(constants::ERR_REGISTRY_WRITE_LOCK))?;

        if self.frozen.load(Ordering::Acquire) {
            warn!(%tid, codec = codec.name(), "registration on frozen registry");
            return Err(CodecError::RegistryFrozen(tid));
        }

        if let Some(existing) = codecs.get(&tid) {
            return match self.policy {
                DuplicatePolicy::Reject => {
                    warn!(%tid, existing = existing.name(), "duplicate codec registration");
                    Err(CodecError::DuplicateRegistration(tid))
                }
                DuplicatePolicy::KeepFirst => {
                    debug!(%tid, kept = existing.name(), ignored = codec.name(), "keeping first codec");
                    Ok(())
                }
            };
        }

        debug!(%tid, codec = codec.name(), "registered codec");
        codecs.insert(tid, codec);
        Ok(())
    }

    /// Codec registered for `tid`.
    pub fn lookup(&self, tid: &TypeIdentifier) -> Result<Arc<dyn FieldCodec>> {
        let codecs = self
            .codecs
            .read()
            .map_err(|_| CodecError::LockPoisoned(constants::ERR_REGISTRY_READ_LOCK))?;
        codecs
            .get(tid)
            .cloned()
            .ok_or_else(|| CodecError::UnknownType(tid.clone()))
    }

    pub fn contains(&self, tid: &TypeIdentifier) -> Result<bool> {
        let codecs = self
            .codecs
            .read()
            .map_err(|_| CodecError::LockPoisoned(constants::ERR_REGISTRY_READ_LOCK))?;
        Ok(codecs.contains_key(tid))
    }

    pub fn len(&self) -> Result<usize> {
        let codecs = self
            .codecs
            .read()
            .map_err(|_| CodecError::LockPoisoned(constants::ERR_REGISTRY_READ_LOCK))?;
        Ok(codecs.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Registered TIDs in ascending order.
    pub fn tids(&self) -> Result<Vec<TypeIdentifier>> {
        let codecs = self
            .codecs
            .read()
            .map_err(|_| CodecError::LockPoisoned(constants::ERR_REGISTRY_READ_LOCK))?;
        let mut tids: Vec<_> = codecs.keys().cloned().collect();
        tids.sort();
        Ok(tids)
    }

    /// Ends the registration phase. Idempotent.
    pub fn freeze(&self) {
        // Taking the write lock orders the flag after any in-flight registration.
        let _guard = self.codecs.write();
        self.frozen.store(true, Ordering::Release);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }
}

/// The CCNx 1.0 codec table.
pub(crate) fn standard_codecs() -> Vec<(TypeIdentifier, Arc<dyn FieldCodec>)> {
    let name: Arc<dyn FieldCodec> = Arc::new(NameCodec);
    let payload: Arc<dyn FieldCodec> = Arc::new(PayloadCodec);
    let hash: Arc<dyn FieldCodec> = Arc::new(HashValueCodec);
    let payload_type: Arc<dyn FieldCodec> = Arc::new(PayloadTypeCodec);
    let timestamp: Arc<dyn FieldCodec> = Arc::new(TimestampCodec);
    let validation: Arc<dyn FieldCodec> = Arc::new(ValidationAlgorithmCodec);

    let mut table: Vec<(TypeIdentifier, Arc<dyn FieldCodec>)> = vec![
        (TID_INTEREST_NAME.clone(), name.clone()),
        (TID_INTEREST_PAYLOAD.clone(), payload.clone()),
        (TID_INTEREST_KEYID_REST.clone(), hash.clone()),
        (TID_INTEREST_HASH_REST.clone(), hash),
        (TID_OBJECT_NAME.clone(), name),
        (TID_OBJECT_PAYLOAD.clone(), payload.clone()),
        (TID_OBJECT_PAYLOAD_TYPE.clone(), payload_type),
        (TID_OBJECT_EXPIRY.clone(), timestamp),
        (TID_VALIDATION_PAYLOAD.clone(), payload),
    ];
    table.extend(
        CryptoSuite::ALL
            .into_iter()
            .map(|suite| (suite.tid(), validation.clone())),
    );
    table
}

static GLOBAL_REGISTRY: Lazy<Arc<CodecRegistry>> = Lazy::new(|| {
    let registry = CodecRegistry::new();
    if let Ok(mut codecs) = registry.codecs.write() {
        codecs.extend(standard_codecs());
    }
    registry.freeze();
    Arc::new(registry)
});

/// Process-wide registry with the standard codecs, built on first use and frozen.
pub fn global_registry() -> Arc<CodecRegistry> {
    Arc::clone(&GLOBAL_REGISTRY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(s: &str) -> TypeIdentifier {
        s.parse().unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = CodecRegistry::new();
        registry
            .register(tid("3.1.2"), Arc::new(HashValueCodec))
            .unwrap();
        assert_eq!(registry.lookup(&tid("3.1.2")).unwrap().name(), "HashValueCodec");
        assert!(matches!(
            registry.lookup(&tid("3.1.7")),
            Err(CodecError::UnknownType(_))
        ));
    }

    #[test]
    fn test_duplicate_rejected_by_default() {
        let registry = CodecRegistry::new();
        registry.register(tid("3.1.0"), Arc::new(NameCodec)).unwrap();
        let err = registry
            .register(tid("3.1.0"), Arc::new(PayloadCodec))
            .unwrap_err();
        assert!(matches!(err, CodecError::DuplicateRegistration(_)));
        assert_eq!(registry.lookup(&tid("3.1.0")).unwrap().name(), "NameCodec");
    }

    #[test]
    fn test_keep_first_policy() {
        let registry = CodecRegistry::with_policy(DuplicatePolicy::KeepFirst);
        registry.register(tid("3.1.0"), Arc::new(NameCodec)).unwrap();
        registry.register(tid("3.1.0"), Arc::new(PayloadCodec)).unwrap();
        assert_eq!(registry.lookup(&tid("3.1.0")).unwrap().name(), "NameCodec");
        assert_eq!(registry.len().unwrap(), 1);
    }

    #[test]
    fn test_frozen_registry_rejects_registration() {
        let registry = CodecRegistry::new();
        registry.freeze();
        assert!(registry.is_frozen());
        assert!(matches!(
            registry.register(tid("9"), Arc::new(PayloadCodec)),
            Err(CodecError::RegistryFrozen(_))
        ));
    }

    #[test]
    fn test_standard_table() {
        let registry = CodecRegistry::with_standard_codecs(DuplicatePolicy::Reject).unwrap();
        assert_eq!(registry.len().unwrap(), 15);
        assert!(!registry.is_frozen());
        for suite in CryptoSuite::ALL {
            assert!(registry.contains(&suite.tid()).unwrap());
        }
        let tids = registry.tids().unwrap();
        assert_eq!(tids.first().map(|t| t.to_string()), Some("3.1.0".to_string()));
        assert_eq!(tids.last().map(|t| t.to_string()), Some("3.4".to_string()));
    }

    #[test]
    fn test_poisoned_lock_reported_by_every_reader() {
        let registry = Arc::new(CodecRegistry::new());
        let poisoner = Arc::clone(&registry);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.codecs.write().unwrap();
            panic!("poison registry lock");
        })
        .join();

        assert!(matches!(registry.contains(&tid("3.1.0")), Err(CodecError::LockPoisoned(_))));
        assert!(matches!(registry.len(), Err(CodecError::LockPoisoned(_))));
        assert!(matches!(registry.is_empty(), Err(CodecError::LockPoisoned(_))));
        assert!(matches!(registry.lookup(&tid("3.1.0")), Err(CodecError::LockPoisoned(_))));
        assert!(matches!(registry.tids(), Err(CodecError::LockPoisoned(_))));
    }

    #[test]
    fn test_global_registry_is_frozen_and_shared() {
        let a = global_registry();
        let b = global_registry();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_frozen());
        assert_eq!(a.len().unwrap(), 15);
    }
}
