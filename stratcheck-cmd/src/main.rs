use std::fs;
use std::io::{self, Read};
use std::path::Path;

use stratcheck::{
    dict::{encode_dictionary, load_tokens},
    Harness, InputBuffer, Predicate, Verdict,
};

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    version = "0.1.0",
    about = "stratcheck command line tool",
    long_about = "Inspect the mutation strategy harnesses and prepare seeds and dictionaries for a fuzzing campaign."
)]
struct Cmd {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the predicate chain of a harness
    List {
        #[arg(help = "The harness to list (a or b).")]
        harness: String,
    },
    /// Report which predicates an input from stdin matches, without crashing
    Classify {
        #[arg(help = "The harness to evaluate against (a or b).")]
        harness: String,

        /// Treat stdin as raw bytes instead of hex
        #[arg(long)]
        raw: bool,
    },
    /// Write the seed corpus of a harness to a directory
    Seeds {
        #[arg(help = "The harness whose seeds to write (a or b).")]
        harness: String,

        #[arg(help = "Output directory, created if missing.")]
        dir: String,
    },
    /// Print the dictionary of a harness, or check a dictionary file against it
    Dict {
        #[arg(help = "The harness whose dictionary to use (a or b).")]
        harness: String,

        /// Dictionary file that must contain every harness token
        #[arg(long)]
        check: Option<String>,
    },
}

fn lookup(name: &str) -> Result<&'static Harness, String> {
    Harness::by_name(name).ok_or_else(|| format!("Unknown harness '{}' (expected a or b)", name))
}

fn main() -> Result<(), String> {
    let cli = Cmd::parse();

    match cli.command {
        Some(Commands::List { harness }) => list(lookup(&harness)?),
        Some(Commands::Classify { harness, raw }) => {
            let harness = lookup(&harness)?;

            let mut input = Vec::new();
            io::stdin()
                .read_to_end(&mut input)
                .map_err(|e| format!("Failed to read from stdin: {}", e))?;

            let bytes = if raw {
                input
            } else {
                let text = String::from_utf8(input)
                    .map_err(|e| format!("Hex input is not valid UTF-8: {}", e))?;
                hex::decode(text.trim())
                    .map_err(|e| format!("Failed to decode hex input: {}", e))?
            };

            classify(harness, &bytes);
            Ok(())
        }
        Some(Commands::Seeds { harness, dir }) => write_seeds(lookup(&harness)?, Path::new(&dir)),
        Some(Commands::Dict { harness, check }) => {
            let harness = lookup(&harness)?;
            match check {
                None => {
                    print!("{}", encode_dictionary(&harness.dictionary()));
                    Ok(())
                }
                Some(path) => check_dictionary(harness, &path),
            }
        }
        None => {
            println!("No valid subcommand was used");
            Ok(())
        }
    }
}

fn describe(index: usize, predicate: &Predicate) -> String {
    let trigger: Vec<String> = predicate.trigger.iter().map(|c| c.to_string()).collect();
    let mut line = format!(
        "[{}] {} {}: {}",
        index,
        predicate.name,
        predicate.strategy,
        trigger.join(" && ")
    );
    if !predicate.guard.is_empty() {
        let guard: Vec<String> = predicate.guard.iter().map(|c| c.to_string()).collect();
        line.push_str(&format!(" (guard: {})", guard.join(" && ")));
    }
    line
}

fn list(harness: &Harness) -> Result<(), String> {
    print!(
        "harness {}: reads up to {} bytes into {}",
        harness.name, harness.read_len, harness.capacity
    );
    match harness.min_len {
        Some(min) => println!(", needs at least {}", min),
        None => println!(),
    }

    for (i, predicate) in harness.predicates.iter().enumerate() {
        println!("  {}", describe(i, predicate));
    }

    for seed in harness.seeds {
        println!("  seed {}: 0x{}", seed.name, hex::encode(seed.bytes));
    }
    Ok(())
}

fn classify(harness: &Harness, bytes: &[u8]) {
    for line in classify_lines(harness, bytes) {
        println!("{}", line);
    }
}

// The predicate that would crash is marked with '*'.
fn classify_lines(harness: &Harness, bytes: &[u8]) -> Vec<String> {
    let buffer = InputBuffer::from_bytes(harness, bytes);

    match harness.evaluate(&buffer) {
        Verdict::TooShort => vec![format!(
            "too short: {} bytes, need at least {}",
            buffer.filled(),
            harness.min_len.unwrap_or(0)
        )],
        Verdict::Clean => vec!["clean".to_string()],
        Verdict::Crash(first) => harness
            .predicates
            .iter()
            .enumerate()
            .filter(|(_, p)| p.holds(&buffer))
            .map(|(i, p)| {
                let marker = if p.name == first.name { "*" } else { " " };
                format!("{} {}", marker, describe(i, p))
            })
            .collect(),
    }
}

fn write_seeds(harness: &Harness, dir: &Path) -> Result<(), String> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;

    for seed in harness.seeds {
        let path = dir.join(seed.name);
        fs::write(&path, seed.bytes)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        eprintln!("Wrote {} ({} bytes)", path.display(), seed.bytes.len());
    }
    Ok(())
}

fn check_dictionary(harness: &Harness, path: &str) -> Result<(), String> {
    let tokens = load_tokens(path)?;

    let missing = harness.missing_tokens(&tokens);
    if missing.is_empty() {
        println!(
            "{}: {} tokens, all {} harness tokens present",
            path,
            tokens.len(),
            harness.tokens.len()
        );
        return Ok(());
    }

    let names: Vec<String> = missing
        .iter()
        .map(|t| format!("{}=0x{}", t.name, hex::encode(t.value)))
        .collect();
    Err(format!("{} is missing harness tokens: {}", path, names.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratcheck::{HARNESS_A, HARNESS_B};

    #[test]
    fn test_classify_reports_chain_index() {
        // Two predicates hold, only the first one is marked.
        let mut data = vec![0u8; 64];
        data[0] = 0x01;
        data[44..48].copy_from_slice(&[0xFF; 4]);
        let lines = classify_lines(&HARNESS_B, &data);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("* [0] b-bitflip-1 bitflip 1/1"), "{}", lines[0]);
        assert!(lines[1].starts_with("  [13] b-splice splice"), "{}", lines[1]);

        let mut data = vec![0u8; 64];
        data[50..54].copy_from_slice(b"ABCD");
        let lines = classify_lines(&HARNESS_B, &data);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("* [14] b-extras user extras"), "{}", lines[0]);

        let lines = classify_lines(&HARNESS_A, b"AK");
        assert!(lines[0].starts_with("* [1] a-arith"), "{}", lines[0]);
    }

    #[test]
    fn test_classify_clean_and_short() {
        assert_eq!(classify_lines(&HARNESS_A, b"AAAA"), vec!["clean"]);
        assert_eq!(
            classify_lines(&HARNESS_B, &[0x01; 10]),
            vec!["too short: 10 bytes, need at least 64"]
        );
    }
}
