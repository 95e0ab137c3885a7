use std::io::Read;

use crate::buffer::InputBuffer;
use crate::dict::Entry;
use crate::predicate::{Check, Predicate, Strategy, Width};

/// A seed input the driver is expected to start from.
#[derive(Debug, Clone, Copy)]
pub struct Seed {
    pub name: &'static str,
    pub bytes: &'static [u8],
}

/// A token the driver is expected to load as a user dictionary entry.
#[derive(Debug, Clone, Copy)]
pub struct DictToken {
    pub name: &'static str,
    pub value: &'static [u8],
}

/// A fixed decision procedure over one input buffer.
#[derive(Debug)]
pub struct Harness {
    pub name: &'static str,
    pub capacity: usize,
    pub read_len: usize,
    pub min_len: Option<usize>,
    pub seeds: &'static [Seed],
    pub tokens: &'static [DictToken],
    pub predicates: &'static [Predicate],
}

#[derive(Debug, Clone, Copy)]
pub enum Verdict<'h> {
    /// Fewer bytes than `min_len` were read, nothing was evaluated.
    TooShort,
    /// No predicate holds.
    Clean,
    /// The first predicate in chain order that holds.
    Crash(&'h Predicate),
}

impl Harness {
    pub fn admits(&self, buffer: &InputBuffer) -> bool {
        self.min_len.map_or(true, |min| buffer.filled() >= min)
    }

    pub fn first_match(&self, buffer: &InputBuffer) -> Option<&Predicate> {
        if !self.admits(buffer) {
            return None;
        }
        self.predicates.iter().find(|p| p.holds(buffer))
    }

    /// Every predicate that holds, in chain order. Only the first one decides the crash.
    pub fn matches(&self, buffer: &InputBuffer) -> Vec<&Predicate> {
        if !self.admits(buffer) {
            return Vec::new();
        }
        self.predicates.iter().filter(|p| p.holds(buffer)).collect()
    }

    pub fn evaluate(&self, buffer: &InputBuffer) -> Verdict<'_> {
        if !self.admits(buffer) {
            return Verdict::TooShort;
        }
        match self.predicates.iter().find(|p| p.holds(buffer)) {
            Some(predicate) => Verdict::Crash(predicate),
            None => Verdict::Clean,
        }
    }

    /// All-zero input of `read_len` bytes (or `min_len`, whichever is larger).
    pub fn baseline(&self) -> Vec<u8> {
        vec![0u8; self.read_len.max(self.min_len.unwrap_or(0))]
    }

    /// The harness tokens as dictionary entries, ready for `dict::encode_dictionary`.
    pub fn dictionary(&self) -> Vec<Entry> {
        self.tokens
            .iter()
            .map(|token| Entry {
                name: Some(token.name.to_string()),
                value: token.value.to_vec(),
            })
            .collect()
    }

    /// Harness tokens whose value is not among `values`, e.g. from `dict::load_tokens`.
    pub fn missing_tokens(&self, values: &[Vec<u8>]) -> Vec<&DictToken> {
        self.tokens
            .iter()
            .filter(|token| !values.iter().any(|v| v.as_slice() == token.value))
            .collect()
    }

    pub fn by_name(name: &str) -> Option<&'static Harness> {
        HARNESSES
            .iter()
            .copied()
            .find(|h| h.name.eq_ignore_ascii_case(name))
    }
}

pub static HARNESSES: &[&Harness] = &[&HARNESS_A, &HARNESS_B];

/// Four predicates over the first four bytes, seeded with "AAAA".
pub static HARNESS_A: Harness = Harness {
    name: "a",
    capacity: 100,
    read_len: 50,
    min_len: None,
    seeds: &[Seed {
        name: "aaaa",
        bytes: b"AAAA",
    }],
    tokens: &[DictToken {
        name: "abcd",
        value: b"ABCD",
    }],
    predicates: &[
        // 'A' -> 'C' flips bit 1.
        Predicate {
            name: "a-bitflip",
            strategy: Strategy::BitFlip { bits: 1 },
            trigger: &[Check::Byte(0, b'C')],
            guard: &[],
        },
        // 'A' + 10
        Predicate {
            name: "a-arith",
            strategy: Strategy::Arith(Width::W8),
            trigger: &[Check::Byte(1, b'K')],
            guard: &[],
        },
        Predicate {
            name: "a-interest",
            strategy: Strategy::Interest(Width::W8),
            trigger: &[Check::Byte(2, 0x00)],
            guard: &[Check::Byte(0, b'A'), Check::Byte(1, b'A')],
        },
        Predicate {
            name: "a-extras",
            strategy: Strategy::Dictionary,
            trigger: &[Check::Literal(0, b"ABCD")],
            guard: &[],
        },
    ],
};

const UNTOUCHED: &[Check] = &[Check::Byte(0, 0x00)];

/// Fifteen predicates at disjoint offsets, seeded with 64 bytes of 0x00 and 64 bytes of 0xFF.
pub static HARNESS_B: Harness = Harness {
    name: "b",
    capacity: 128,
    read_len: 100,
    min_len: Some(64),
    seeds: &[
        Seed {
            name: "zeros",
            bytes: &[0x00; 64],
        },
        Seed {
            name: "ones",
            bytes: &[0xFF; 64],
        },
    ],
    tokens: &[DictToken {
        name: "abcd",
        value: b"ABCD",
    }],
    predicates: &[
        // Also reachable by arith +1, ruled out by byte 1 staying zero.
        Predicate {
            name: "b-bitflip-1",
            strategy: Strategy::BitFlip { bits: 1 },
            trigger: &[Check::Byte(0, 0x01)],
            guard: &[Check::Byte(1, 0x00)],
        },
        Predicate {
            name: "b-bitflip-2",
            strategy: Strategy::BitFlip { bits: 2 },
            trigger: &[Check::Byte(1, 0x03)],
            guard: UNTOUCHED,
        },
        Predicate {
            name: "b-bitflip-4",
            strategy: Strategy::BitFlip { bits: 4 },
            trigger: &[Check::Byte(2, 0x0F)],
            guard: UNTOUCHED,
        },
        Predicate {
            name: "b-byteflip-1",
            strategy: Strategy::ByteFlip { bytes: 1 },
            trigger: &[Check::Byte(3, 0xFF)],
            guard: UNTOUCHED,
        },
        Predicate {
            name: "b-byteflip-2",
            strategy: Strategy::ByteFlip { bytes: 2 },
            trigger: &[Check::Word(4, 0xFFFF)],
            guard: UNTOUCHED,
        },
        Predicate {
            name: "b-byteflip-4",
            strategy: Strategy::ByteFlip { bytes: 4 },
            trigger: &[Check::Dword(6, 0xFFFF_FFFF)],
            guard: UNTOUCHED,
        },
        // 0x0a needs two bit flips, so a single walking flip cannot land here.
        Predicate {
            name: "b-arith-8",
            strategy: Strategy::Arith(Width::W8),
            trigger: &[Check::Byte(10, 0x0A)],
            guard: UNTOUCHED,
        },
        // +256 carries into the high byte: 00 01 in memory.
        Predicate {
            name: "b-arith-16",
            strategy: Strategy::Arith(Width::W16),
            trigger: &[Check::Word(12, 0x0100)],
            guard: UNTOUCHED,
        },
        Predicate {
            name: "b-arith-32",
            strategy: Strategy::Arith(Width::W32),
            trigger: &[Check::Dword(16, 0x0001_0000)],
            guard: UNTOUCHED,
        },
        // 0x80 is one bit away from zero, 0x7f is seven.
        Predicate {
            name: "b-interest-8",
            strategy: Strategy::Interest(Width::W8),
            trigger: &[Check::Byte(20, 0x7F)],
            guard: UNTOUCHED,
        },
        // 0x8000 would be found by a single bit flip; -2 is fifteen flips away.
        Predicate {
            name: "b-interest-16",
            strategy: Strategy::Interest(Width::W16),
            trigger: &[Check::Word(22, 0xFFFE)],
            guard: UNTOUCHED,
        },
        Predicate {
            name: "b-interest-32",
            strategy: Strategy::Interest(Width::W32),
            trigger: &[Check::Dword(26, 0x7FFF_FFFF)],
            guard: UNTOUCHED,
        },
        Predicate {
            name: "b-havoc",
            strategy: Strategy::Havoc,
            trigger: &[Check::Literal(30, b"HVC")],
            guard: UNTOUCHED,
        },
        // Zeros seed up to 44, ones seed after. Byte 0 is irrelevant here.
        Predicate {
            name: "b-splice",
            strategy: Strategy::Splice,
            trigger: &[Check::Dword(40, 0x0000_0000), Check::Dword(44, 0xFFFF_FFFF)],
            guard: &[],
        },
        Predicate {
            name: "b-extras",
            strategy: Strategy::Dictionary,
            trigger: &[Check::Literal(50, b"ABCD")],
            guard: UNTOUCHED,
        },
    ],
};

/// Acquire input from `reader`, evaluate it, and abort the process if a predicate holds.
///
/// Returns the verdict when the run ends normally. A failing reader counts as a short input, so
/// the only outcomes are a normal return and an abort. Set `debug` to log the outcome to stderr.
pub fn run<'h, R: Read>(harness: &'h Harness, reader: &mut R, debug: bool) -> Verdict<'h> {
    let buffer = InputBuffer::read_from(reader, harness);

    let verdict = harness.evaluate(&buffer);
    match verdict {
        Verdict::Crash(predicate) => {
            if debug {
                eprintln!("harness {}: {} matched, aborting", harness.name, predicate);
            }
            std::process::abort();
        }
        Verdict::TooShort => {
            if debug {
                eprintln!(
                    "harness {}: read {} bytes, need at least {}",
                    harness.name,
                    buffer.filled(),
                    harness.min_len.unwrap_or(0)
                );
            }
        }
        Verdict::Clean => {
            if debug {
                eprintln!("harness {}: no predicate matched", harness.name);
            }
        }
    }

    verdict
}
