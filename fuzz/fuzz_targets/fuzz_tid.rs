#![no_main]

use ccnx_codec::TypeIdentifier;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(tid) = text.parse::<TypeIdentifier>() {
            // Leading zeros are accepted, so compare parsed values
            let reparsed: TypeIdentifier = tid.to_string().parse().expect("canonical form parses");
            assert_eq!(reparsed, tid);
        }
    }
});
