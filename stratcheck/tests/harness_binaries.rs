use std::io::Write;
use std::process::{Command, ExitStatus, Stdio};

fn run_binary(path: &str, input: &[u8]) -> ExitStatus {
    let mut child = Command::new(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .env_remove("STRATCHECK_DEBUG")
        .spawn()
        .expect("Failed to spawn harness");

    {
        let mut stdin = child.stdin.take().expect("stdin is piped");
        // The harness may exit before consuming everything.
        let _ = stdin.write_all(input);
    }

    child.wait().expect("Failed to wait for harness")
}

// Stdin is a directory, so every read fails with EISDIR.
#[cfg(unix)]
fn run_with_unreadable_stdin(path: &str) -> ExitStatus {
    let dir = std::fs::File::open(env!("CARGO_MANIFEST_DIR")).expect("Failed to open directory");
    Command::new(path)
        .stdin(Stdio::from(dir))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .env_remove("STRATCHECK_DEBUG")
        .status()
        .expect("Failed to run harness")
}

fn harness_a(input: &[u8]) -> ExitStatus {
    run_binary(env!("CARGO_BIN_EXE_harness-a"), input)
}

fn harness_b(input: &[u8]) -> ExitStatus {
    run_binary(env!("CARGO_BIN_EXE_harness-b"), input)
}

fn padded(prefix: &[u8], len: usize) -> Vec<u8> {
    let mut bytes = prefix.to_vec();
    bytes.resize(len, 0);
    bytes
}

#[cfg(unix)]
fn assert_aborted(status: ExitStatus) {
    use std::os::unix::process::ExitStatusExt;
    assert_eq!(status.signal(), Some(6), "expected SIGABRT, got {:?}", status);
}

#[cfg(not(unix))]
fn assert_aborted(status: ExitStatus) {
    assert!(!status.success(), "expected abnormal exit, got {:?}", status);
}

fn assert_clean(status: ExitStatus) {
    assert_eq!(status.code(), Some(0), "expected exit 0, got {:?}", status);
}

#[test]
fn test_harness_a_crashes() {
    assert_aborted(harness_a(&padded(b"CA\0\0", 50)));
    assert_aborted(harness_a(&padded(b"AK\0\0", 50)));
    assert_aborted(harness_a(&padded(b"AA\0\0", 50)));
    assert_aborted(harness_a(&padded(b"ABCD", 50)));
}

#[test]
fn test_harness_a_clean() {
    assert_clean(harness_a(b"AAAA"));
    assert_clean(harness_a(&[0u8; 50]));
    assert_clean(harness_a(b""));
}

#[test]
fn test_harness_b_crashes() {
    let mut splice = vec![0u8; 64];
    splice[44..48].copy_from_slice(&[0xFF; 4]);
    assert_aborted(harness_b(&splice));

    let mut extras = vec![0u8; 100];
    extras[50..54].copy_from_slice(b"ABCD");
    assert_aborted(harness_b(&extras));

    let mut arith = vec![0u8; 64];
    arith[16..20].copy_from_slice(&[0x00, 0x00, 0x01, 0x00]);
    assert_aborted(harness_b(&arith));
}

#[test]
fn test_harness_b_clean() {
    assert_clean(harness_b(&[0u8; 64]));
    assert_clean(harness_b(&[0xFFu8; 64]));
    assert_clean(harness_b(&[0u8; 128]));
}

#[test]
fn test_harness_b_short_input() {
    let mut splice = vec![0u8; 63];
    splice[44..48].copy_from_slice(&[0xFF; 4]);
    assert_clean(harness_b(&splice));
    assert_clean(harness_b(&[0x01; 10]));
}

#[cfg(unix)]
#[test]
fn test_unreadable_stdin_exits_normally() {
    assert_clean(run_with_unreadable_stdin(env!("CARGO_BIN_EXE_harness-a")));
    assert_clean(run_with_unreadable_stdin(env!("CARGO_BIN_EXE_harness-b")));
}
