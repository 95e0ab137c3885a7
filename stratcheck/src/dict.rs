//! Dictionary files in the `name="value"` format AFL-style drivers load with `-x`.
//!
//! Loading goes through libafl's `Tokens`; libafl has no writer, so encoding lives here.

use std::path::Path;

use libafl::mutators::Tokens;

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: Option<String>,
    pub value: Vec<u8>,
}

/// Load the token values of a dictionary file, deduplicated in file order.
pub fn load_tokens<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<u8>>, String> {
    let path = path.as_ref();
    let mut tokens = Tokens::new();
    tokens
        .add_from_file(path)
        .map_err(|e| format!("Failed to load dictionary {}: {}", path.display(), e))?;
    Ok(tokens.tokens().to_vec())
}

pub fn encode_value(value: &[u8]) -> String {
    let mut result = String::with_capacity(value.len() + 2);
    result.push('"');
    for &b in value {
        if b == b'"' || b == b'\\' || !(b == b' ' || b.is_ascii_graphic()) {
            result.push_str(&format!("\\x{:02x}", b));
        } else {
            result.push(b as char);
        }
    }
    result.push('"');
    result
}

pub fn encode_dictionary(entries: &[Entry]) -> String {
    let mut out = String::new();
    for entry in entries {
        if let Some(name) = &entry.name {
            out.push_str(name);
            out.push('=');
        }
        out.push_str(&encode_value(&entry.value));
        out.push('\n');
    }
    out
}
