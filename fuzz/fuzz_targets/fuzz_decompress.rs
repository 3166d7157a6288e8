#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary containers may fail to parse or decode - that's OK
    // We're looking for panics/crashes, not errors
    let _ = rlehuff::decompress(data);
});
