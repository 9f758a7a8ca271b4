use ccnx_codec::codec::{InterestCodec, PacketBodyCodec, PacketHeaderCodec};
use ccnx_codec::core::tid::TypeIdentifier;
use ccnx_codec::crypto::{Crc32cSigner, Crc32cVerifier, EcdsaSecp256k1Signer, HmacSha256Signer};
use ccnx_codec::protocol::hash_value::HashValue;
use ccnx_codec::protocol::{ContentObject, Interest, Message, Name, PacketBody, PayloadType};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

fn object(size: usize) -> Message {
    Message::ContentObject(
        ContentObject::new(Name::parse("/parc/bench/Version=1/Chunk=0"))
            .with_payload_type(PayloadType::Data)
            .with_expiry(1_700_000_000_000)
            .with_payload(vec![0xA5; size]),
    )
}

#[allow(clippy::unwrap_used)]
fn bench_body_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("body_encode_decode");
    let codec = PacketBodyCodec::default();
    let payload_sizes = [64usize, 512, 4096, 32768];

    for &size in &payload_sizes {
        let body = PacketBody::unsigned(object(size));
        let bytes = codec.encode(&body).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_function(format!("encode_{size}b"), |b| {
            b.iter(|| codec.encode(black_box(&body)).unwrap())
        });
        group.bench_function(format!("decode_{size}b"), |b| {
            b.iter(|| codec.decode(black_box(&bytes)).unwrap())
        });
    }
    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_interest(c: &mut Criterion) {
    let codec = InterestCodec::default();
    let interest = Interest::new(Name::parse("/parc/bench/a/b/c/d"))
        .with_keyid_restriction(HashValue::new(1))
        .with_hash_restriction(HashValue::new(2));
    let bytes = codec.encode_to_bytes(&interest).unwrap();

    c.bench_function("interest_encode", |b| {
        b.iter(|| codec.encode_to_bytes(black_box(&interest)).unwrap())
    });
    c.bench_function("interest_decode", |b| {
        b.iter(|| codec.decode_bytes(black_box(&bytes)).unwrap())
    });
}

#[allow(clippy::unwrap_used)]
fn bench_signing(c: &mut Criterion) {
    let mut group = c.benchmark_group("signing");
    let codec = PacketBodyCodec::default();
    let message = object(1024);

    let hmac = HmacSha256Signer::new(b"bench secret".to_vec()).unwrap();
    let ecdsa = EcdsaSecp256k1Signer::generate();

    group.bench_function("crc32c_sign", |b| {
        b.iter(|| codec.encode_signed(black_box(&message), &Crc32cSigner).unwrap())
    });
    group.bench_function("hmac_sha256_sign", |b| {
        b.iter(|| codec.encode_signed(black_box(&message), &hmac).unwrap())
    });
    group.bench_function("secp256k1_sign", |b| {
        b.iter(|| codec.encode_signed(black_box(&message), &ecdsa).unwrap())
    });

    let signed = codec.encode_signed(&message, &Crc32cSigner).unwrap();
    group.bench_function("crc32c_verify", |b| {
        b.iter(|| codec.verify(black_box(&signed), &Crc32cVerifier).unwrap())
    });
    group.finish();
}

fn bench_tid(c: &mut Criterion) {
    c.bench_function("tid_parse", |b| {
        b.iter_batched(
            || "3.3.8.15",
            |s| s.parse::<TypeIdentifier>(),
            BatchSize::SmallInput,
        )
    });
    let base = TypeIdentifier::new(3).child(1);
    c.bench_function("tid_child", |b| b.iter(|| black_box(&base).child(0)));
}

criterion_group!(
    benches,
    bench_body_encode_decode,
    bench_interest,
    bench_signing,
    bench_tid
);
criterion_main!(benches);
