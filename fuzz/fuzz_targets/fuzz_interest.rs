#![no_main]

use ccnx_codec::codec::{InterestCodec, PacketHeaderCodec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let codec = InterestCodec::default();
    let _ = codec.decode_bytes(data);
});
