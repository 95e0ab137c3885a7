#![no_main]

use stratcheck::{InputBuffer, Verdict, HARNESS_B};

use libfuzzer_sys::fuzz_target;

// Same decision procedure as the harness-b binary, fed by libFuzzer instead of stdin.
fuzz_target!(|data: &[u8]| {
    let buffer = InputBuffer::from_bytes(&HARNESS_B, data);
    if let Verdict::Crash(predicate) = HARNESS_B.evaluate(&buffer) {
        panic!("{} matched", predicate);
    }
});
