//! `bencode` CLI — decode, encode, and inspect Bencode data from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Decode a .torrent file to pretty-printed JSON (one document per top-level value)
//! bencode decode -i ubuntu.torrent
//!
//! # Reject non-canonical input (leading zeros, unsorted or duplicate keys)
//! bencode decode --strict -i ubuntu.torrent
//!
//! # Encode JSON (stdin → stdout) into canonical Bencode
//! echo '{"b":2,"a":[1,"x"]}' | bencode encode
//!
//! # Count values by kind
//! bencode stats -i ubuntu.torrent
//! ```
//!
//! Set `RUST_LOG` (or pass `-v`, `-vv`) to see decoder diagnostics on stderr.

use anyhow::{Context, Result};
use bencode_core::json::{from_json, to_json};
use bencode_core::{decode_all_with, encode_to_vec, DecodeOptions, Value};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::io::{self, Read, Write};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bencode", version, about = "Bencode encoder/decoder CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode Bencode into pretty-printed JSON
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        decode: DecodeArgs,
    },
    /// Encode JSON into canonical Bencode
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show value counts and sizes for Bencode input
    Stats {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[command(flatten)]
        decode: DecodeArgs,
    },
}

#[derive(Args)]
struct DecodeArgs {
    /// Reject non-canonical input (leading zeros, -0, unsorted or duplicate keys)
    #[arg(long)]
    strict: bool,
    /// Maximum nesting depth of lists and dictionaries
    #[arg(long, default_value_t = bencode_core::decoder::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl DecodeArgs {
    fn options(&self) -> DecodeOptions {
        DecodeOptions::default()
            .with_strict(self.strict)
            .with_max_depth(self.max_depth)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Decode {
            input,
            output,
            decode,
        } => {
            let bytes = read_input(input.as_deref())?;
            let outcome = decode_all_with(bytes.as_slice(), decode.options());

            let mut rendered = Vec::new();
            for value in &outcome.values {
                serde_json::to_writer_pretty(&mut rendered, &to_json(value))?;
                rendered.push(b'\n');
            }
            write_output(output.as_deref(), &rendered)?;

            if let Some(err) = outcome.error {
                if !outcome.values.is_empty() {
                    warn!(
                        decoded = outcome.values.len(),
                        "input ended with a malformed value"
                    );
                }
                return Err(err).context("Failed to decode Bencode");
            }
        }
        Commands::Encode { input, output } => {
            let json = read_input(input.as_deref())?;
            let mut encoded = Vec::new();
            let documents =
                serde_json::Deserializer::from_slice(&json).into_iter::<serde_json::Value>();
            for document in documents {
                let document = document.context("Failed to parse JSON input")?;
                let value = from_json(&document).context("Failed to encode JSON to Bencode")?;
                encoded.extend(encode_to_vec(&value)?);
            }
            debug!(bytes = encoded.len(), "encoded");
            write_output(output.as_deref(), &encoded)?;
        }
        Commands::Stats { input, decode } => {
            let bytes = read_input(input.as_deref())?;
            let values = decode_all_with(bytes.as_slice(), decode.options())
                .into_result()
                .context("Failed to decode Bencode")?;

            let mut stats = Stats::default();
            for value in &values {
                stats.visit(value, 1);
            }
            println!("Input size:    {} bytes", bytes.len());
            println!("Top-level:     {}", values.len());
            println!("Integers:      {}", stats.integers);
            println!("Byte strings:  {} ({} bytes)", stats.strings, stats.string_bytes);
            println!("Lists:         {}", stats.lists);
            println!("Dictionaries:  {}", stats.dictionaries);
            println!("Max depth:     {}", stats.max_depth);
        }
    }

    Ok(())
}

/// Per-kind counters accumulated over a value tree.
#[derive(Default)]
struct Stats {
    integers: usize,
    strings: usize,
    string_bytes: usize,
    lists: usize,
    dictionaries: usize,
    max_depth: usize,
}

impl Stats {
    /// `depth` is 1 for a top-level value; scalars count toward depth too.
    fn visit(&mut self, value: &Value, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
        match value {
            Value::Integer(_) => self.integers += 1,
            Value::ByteString(bytes) => {
                self.strings += 1;
                self.string_bytes += bytes.len();
            }
            Value::List(items) => {
                self.lists += 1;
                for item in items {
                    self.visit(item, depth + 1);
                }
            }
            Value::Dictionary(dict) => {
                self.dictionaries += 1;
                for (key, child) in dict {
                    self.strings += 1;
                    self.string_bytes += key.len();
                    self.visit(child, depth + 1);
                }
            }
        }
    }
}

/// Logs go to stderr so they never mix with encoded output on stdout.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    let bytes = match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path))?
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    info!(bytes = bytes.len(), source = path.unwrap_or("stdin"), "read input");
    Ok(bytes)
}

fn write_output(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content).context("Failed to write to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
