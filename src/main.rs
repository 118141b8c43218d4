//! cconv CLI - convert text tokens between classifications
//!
//! # Usage
//!
//! ```bash
//! cconv -t iso3 "Czech Republic"        # -> CZE
//! cconv -t name_en AFG DZA              # one result per line
//! echo "côte d'ivoire" | cconv -t iso2  # stdin, one token per line
//! cconv --info                          # metadata and sources records
//! cconv --dump                          # classification records
//! cconv -t name_en --list               # all English names, sorted
//! cconv -s my_table.json -t code "..."  # user-supplied table
//! ```
//!
//! Exit codes: 0 on success, 1 on missing arguments or any core error.
//! SIGINT keeps its default disposition, so an interrupt exits with 130.

use clap::Parser;
use convertu::{cconv, ConvertRequest, Outcome, TextInput};
use serde_json::Value;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "cconv", version)]
#[command(about = "Convert from/to the desired classification", long_about = None)]
struct Cli {
    /// Path to the classification JSON file (default: bundled ISO 3166-1)
    #[arg(short, long, value_name = "PATH")]
    source: Option<PathBuf>,

    /// Target field, e.g. iso3, iso2, name_en (required unless --info/--dump)
    #[arg(short, long, value_name = "FIELD")]
    to: Option<String>,

    /// Show the metadata and sources records
    #[arg(long)]
    info: bool,

    /// Show the classification records
    #[arg(long)]
    dump: bool,

    /// List the sorted values of the target field
    #[arg(short, long)]
    list: bool,

    /// Input text(s) to convert (e.g., cconv -t iso3 'Czech Republic')
    #[arg(value_name = "TEXT")]
    text: Vec<String>,
}

fn main() -> ExitCode {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    // --list needs a field to list; only --info/--dump stand alone
    let needs_to = !cli.info && !cli.dump;
    if needs_to && cli.to.is_none() {
        eprintln!("error: --to/-t is required unless using --info or --dump");
        return Ok(ExitCode::FAILURE);
    }

    let introspection = cli.info || cli.dump || cli.list;
    let text = if introspection {
        TextInput::None
    } else {
        let mut inputs = cli.text;
        if inputs.is_empty() && !io::stdin().is_terminal() {
            inputs = read_stdin_tokens()?;
        }
        if inputs.is_empty() {
            eprintln!("error: provide at least one input text (arguments or STDIN)");
            return Ok(ExitCode::FAILURE);
        }
        // preserve shape: single token -> string, multiple -> sequence
        if inputs.len() == 1 {
            TextInput::One(inputs.remove(0))
        } else {
            TextInput::Many(inputs)
        }
    };

    let outcome = cconv(ConvertRequest {
        data: None,
        source: cli.source,
        info: cli.info,
        dump: cli.dump,
        list: cli.list,
        to: cli.to.unwrap_or_default(),
        text,
    })?;

    let printed = match &outcome {
        Outcome::Info(records) | Outcome::Dump(records) => print_pretty(records),
        Outcome::Listed(values) => print_lines(values.iter().map(String::as_str)),
        Outcome::Converted(output) => print_lines(output.lines().into_iter()),
        Outcome::Saved(path) => {
            eprintln!("💾 Table written to: {}", path.display());
            Ok(())
        }
    };

    match printed {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // a closed stdout (e.g. `cconv ... | head`) is a normal way to finish
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(ExitCode::SUCCESS),
        Err(e) => Err(e.into()),
    }
}

/// Pretty-print records as indented JSON with non-ASCII characters preserved.
fn print_pretty(records: &[Value]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(records).map_err(io::Error::other)?;
    let mut out = io::stdout().lock();
    writeln!(out, "{}", json)
}

/// Print one item per line.
fn print_lines<'a>(lines: impl Iterator<Item = &'a str>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Read input tokens from stdin, one per non-empty line, auto-detecting the
/// byte encoding.
fn read_stdin_tokens() -> io::Result<Vec<String>> {
    let mut bytes = Vec::new();
    io::stdin().lock().read_to_end(&mut bytes)?;

    let encoding = detect_encoding(&bytes);
    let content = decode_content(&bytes, &encoding);

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Detect the encoding of raw bytes using chardet.
fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the detected encoding.
fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding {
        "iso-8859-1" | "windows-1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        // utf-8 and anything unrecognized: lossy UTF-8
        _ => String::from_utf8_lossy(bytes).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_encoding_utf8() {
        assert_eq!(detect_encoding("plain ascii".as_bytes()), "utf-8");
        assert_eq!(detect_encoding("Curaçao, Åland".as_bytes()), "utf-8");
    }

    #[test]
    fn test_decode_latin1() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_decode_unknown_falls_back_to_lossy_utf8() {
        let decoded = decode_content("Türkiye".as_bytes(), "shift-jis");
        assert_eq!(decoded, "Türkiye");
    }
}
