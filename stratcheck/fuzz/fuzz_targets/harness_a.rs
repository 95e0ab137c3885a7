#![no_main]

use stratcheck::{InputBuffer, Verdict, HARNESS_A};

use libfuzzer_sys::fuzz_target;

// Same decision procedure as the harness-a binary, fed by libFuzzer instead of stdin.
fuzz_target!(|data: &[u8]| {
    let buffer = InputBuffer::from_bytes(&HARNESS_A, data);
    if let Verdict::Crash(predicate) = HARNESS_A.evaluate(&buffer) {
        panic!("{} matched", predicate);
    }
});
