pub mod buffer;
pub mod dict;
pub mod harness;
pub mod predicate;

pub use buffer::InputBuffer;
pub use harness::{run, Harness, Verdict, HARNESSES, HARNESS_A, HARNESS_B};
pub use predicate::{Check, Predicate, Strategy, Width};

/// Environment variable that turns on harness diagnostics on stderr.
pub const DEBUG_ENV: &str = "STRATCHECK_DEBUG";

pub fn debug_enabled() -> bool {
    std::env::var_os(DEBUG_ENV).is_some()
}
