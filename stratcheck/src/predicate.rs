use crate::buffer::InputBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W8,
    W16,
    W32,
}

impl Width {
    pub fn bits(&self) -> u32 {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
        }
    }
}

/// The class of mutation a predicate is built to detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Walking flip of `bits` consecutive bits (1, 2 or 4).
    BitFlip { bits: u8 },
    /// Walking flip of `bytes` whole bytes (1, 2 or 4).
    ByteFlip { bytes: u8 },
    Arith(Width),
    Interest(Width),
    Havoc,
    Splice,
    Dictionary,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::BitFlip { bits } => write!(f, "bitflip {}/1", bits),
            Strategy::ByteFlip { bytes } => write!(f, "bitflip {}/8", *bytes as u32 * 8),
            Strategy::Arith(width) => write!(f, "arith {}/8", width.bits()),
            Strategy::Interest(width) => write!(f, "interest {}/8", width.bits()),
            Strategy::Havoc => write!(f, "havoc"),
            Strategy::Splice => write!(f, "splice"),
            Strategy::Dictionary => write!(f, "user extras"),
        }
    }
}

/// A single comparison against the buffer. Multi-byte integers are little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Byte(usize, u8),
    Word(usize, u16),
    Dword(usize, u32),
    Literal(usize, &'static [u8]),
}

impl Check {
    pub fn holds(&self, buffer: &InputBuffer) -> bool {
        match *self {
            Check::Byte(offset, value) => buffer.byte(offset) == Some(value),
            Check::Word(offset, value) => buffer.u16_le(offset) == Some(value),
            Check::Dword(offset, value) => buffer.u32_le(offset) == Some(value),
            Check::Literal(offset, literal) => buffer.slice(offset, literal.len()) == Some(literal),
        }
    }

    /// The byte range this check reads.
    pub fn range(&self) -> std::ops::Range<usize> {
        match *self {
            Check::Byte(offset, _) => offset..offset + 1,
            Check::Word(offset, _) => offset..offset + 2,
            Check::Dword(offset, _) => offset..offset + 4,
            Check::Literal(offset, literal) => offset..offset + literal.len(),
        }
    }

    /// The bytes this check expects to find at `range()`.
    pub fn expected_bytes(&self) -> Vec<u8> {
        match *self {
            Check::Byte(_, value) => vec![value],
            Check::Word(_, value) => value.to_le_bytes().to_vec(),
            Check::Dword(_, value) => value.to_le_bytes().to_vec(),
            Check::Literal(_, literal) => literal.to_vec(),
        }
    }

    /// Write the expected bytes into `bytes`, growing it if needed.
    pub fn apply(&self, bytes: &mut Vec<u8>) {
        let range = self.range();
        if bytes.len() < range.end {
            bytes.resize(range.end, 0);
        }
        bytes[range].copy_from_slice(&self.expected_bytes());
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Check::Byte(offset, value) => write!(f, "[{}] == 0x{:02x}", offset, value),
            Check::Word(offset, value) => write!(f, "u16le[{}] == 0x{:04x}", offset, value),
            Check::Dword(offset, value) => write!(f, "u32le[{}] == 0x{:08x}", offset, value),
            Check::Literal(offset, literal) => write!(
                f,
                "[{}..{}] == 0x{}",
                offset,
                offset + literal.len(),
                hex::encode(literal)
            ),
        }
    }
}

/// One entry of a harness's predicate chain.
///
/// `trigger` holds the checks on the bytes the strategy is expected to change. `guard` holds
/// read-only checks that rule out a different strategy producing the same trigger bytes, e.g.
/// requiring a neighbouring byte to still be at its seed value.
#[derive(Debug, Clone, Copy)]
pub struct Predicate {
    pub name: &'static str,
    pub strategy: Strategy,
    pub trigger: &'static [Check],
    pub guard: &'static [Check],
}

impl Predicate {
    pub fn holds(&self, buffer: &InputBuffer) -> bool {
        self.trigger.iter().all(|check| check.holds(buffer))
            && self.guard.iter().all(|check| check.holds(buffer))
    }

    /// Byte offsets inspected by the trigger checks, sorted and deduplicated.
    pub fn trigger_offsets(&self) -> Vec<usize> {
        let mut offsets: Vec<usize> = self.trigger.iter().flat_map(|c| c.range()).collect();
        offsets.sort_unstable();
        offsets.dedup();
        offsets
    }

    /// Build an input that satisfies this predicate, starting from `base`.
    ///
    /// Guard checks are applied first so the trigger always wins when both touch the same byte.
    pub fn instantiate(&self, base: &[u8]) -> Vec<u8> {
        let mut bytes = base.to_vec();
        for check in self.guard.iter().chain(self.trigger) {
            check.apply(&mut bytes);
        }
        bytes
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.strategy)
    }
}
