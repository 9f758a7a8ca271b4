//! Shared registry and codec use across threads

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ccnx_codec::codec::{global_registry, CodecRegistry, PacketBodyCodec, PayloadCodec};
use ccnx_codec::core::tid::TypeIdentifier;
use ccnx_codec::crypto::{HmacSha256Signer, HmacSha256Verifier, Key, Verifier};
use ccnx_codec::protocol::{ContentObject, Interest, Message, Name, PacketBody};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn concurrent_encode_decode_heavy() {
    let iterations = 2_000usize;
    let payload_sizes = [0usize, 64, 512, 4096, 16384];
    let codec = Arc::new(PacketBodyCodec::default());

    let handles: Vec<_> = payload_sizes
        .iter()
        .map(|&size| {
            let codec = Arc::clone(&codec);
            thread::spawn(move || {
                for i in 0..iterations {
                    let name = Name::parse(&format!("/bench/{size}/Chunk={i}"));
                    let payload = vec![((i + size) & 0xFF) as u8; size];
                    let body = PacketBody::unsigned(Message::ContentObject(
                        ContentObject::new(name).with_payload(payload),
                    ));
                    let bytes = codec.encode(&body).unwrap();
                    assert_eq!(codec.decode(&bytes).unwrap(), body);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn concurrent_sign_verify_shared_verifier() {
    let codec = Arc::new(PacketBodyCodec::default());
    let signer = Arc::new(HmacSha256Signer::new(b"shared secret".to_vec()).unwrap());
    let mut verifier = HmacSha256Verifier::new();
    verifier
        .add_key(Key::symmetric(b"shared secret".to_vec()))
        .unwrap();
    let verifier = Arc::new(verifier);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let codec = Arc::clone(&codec);
            let signer = Arc::clone(&signer);
            let verifier = Arc::clone(&verifier);
            thread::spawn(move || {
                for i in 0..200 {
                    let interest =
                        Message::Interest(Interest::new(Name::parse(&format!("/t{t}/{i}"))));
                    let bytes = codec.encode_signed(&interest, signer.as_ref()).unwrap();
                    assert!(codec.verify(&bytes, verifier.as_ref()).unwrap());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn global_registry_initialized_once_across_threads() {
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                global_registry()
            })
        })
        .collect();

    let registries: Vec<Arc<CodecRegistry>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();
    for registry in &registries[1..] {
        assert!(Arc::ptr_eq(&registries[0], registry));
    }
    assert!(registries[0].is_frozen());
}

#[test]
fn registration_races_with_freeze() {
    let registry = Arc::new(CodecRegistry::new());
    let barrier = Arc::new(Barrier::new(5));

    let writers: Vec<_> = (0..4u32)
        .map(|n| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..100u32)
                    .filter(|i| {
                        let tid = TypeIdentifier::new(100 + n).child(*i);
                        registry.register(tid, Arc::new(PayloadCodec)).is_ok()
                    })
                    .count()
            })
        })
        .collect();

    barrier.wait();
    registry.freeze();

    let accepted: usize = writers.into_iter().map(|h| h.join().unwrap()).sum();
    // Every accepted registration is visible and nothing lands after freeze
    assert_eq!(registry.len().unwrap(), accepted);
    assert!(registry.is_frozen());
}
