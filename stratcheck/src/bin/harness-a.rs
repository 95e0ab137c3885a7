use stratcheck::{debug_enabled, run, HARNESS_A};

fn main() {
    let stdin = std::io::stdin();
    run(&HARNESS_A, &mut stdin.lock(), debug_enabled());
}
