use stratcheck::{debug_enabled, run, HARNESS_B};

fn main() {
    let stdin = std::io::stdin();
    run(&HARNESS_B, &mut stdin.lock(), debug_enabled());
}
