//! refcard — parse API reference cards into a structured symbol model.
//!
//! Reads semi-formatted reference card text (section headers, C-style
//! signatures, parameter enumerations) and emits the recovered structure
//! as canonical text or JSON. Supports two modes:
//!
//! - **stdin mode**: `refcard < card.txt`
//! - **file mode**: `refcard -o out/ cards/*.txt`

mod cache;
mod expand;
mod model;
mod parser;
mod preprocess;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "refcard",
    about = "Parse API reference card text into a structured symbol model"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: text (default), json
    #[arg(short = 'f', long, default_value = "text")]
    format: String,

    /// JSON cache of manual line fix-ups, consulted when a line fails to parse
    #[arg(long)]
    cache: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let fixups = match cli.cache {
        Some(ref path) => Some(cache::FixupCache::load(path)?),
        None => None,
    };

    if cli.files.is_empty() {
        return stdin_mode(&cli, fixups.as_ref());
    }

    file_mode(&cli, fixups.as_ref())
}

/// stdin mode: read from stdin, write the rendered document to stdout.
/// Malformed lines are reported on stderr.
fn stdin_mode(cli: &Cli, fixups: Option<&cache::FixupCache>) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let lines = preprocess::preprocess(&input);
    let parsed = parser::document::parse_document(&lines, fixups);
    report_malformed("<stdin>", &parsed.malformed);

    let renderer = render::create_renderer(&cli.format)?;
    print!("{}", renderer.render(&parsed.document));
    Ok(())
}

/// file mode: process multiple files, write one output file per input.
fn file_mode(cli: &Cli, fixups: Option<&cache::FixupCache>) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = expand_globs(&cli.files)?;

    let renderer = render::create_renderer(&cli.format)?;
    let ext = renderer.file_extension();

    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let lines = preprocess::preprocess(&content);
        let parsed = parser::document::parse_document(&lines, fixups);
        report_malformed(&path.to_string_lossy(), &parsed.malformed);

        let name = derive_output_name(&path.to_string_lossy());
        let out_path = output_dir.join(format!("{}.{}", name, ext));
        fs::write(&out_path, renderer.render(&parsed.document))
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    Ok(())
}

/// Print the malformed-line report for one input on stderr.
fn report_malformed(source: &str, malformed: &[parser::ParseError]) {
    if malformed.is_empty() {
        return;
    }
    eprintln!("{}: {} line(s) could not be parsed:", source, malformed.len());
    for (i, err) in malformed.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, err);
    }
}

/// File extensions recognized as reference card sources.
const SUPPORTED_EXTENSIONS: &[&str] = &["txt"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                        if SUPPORTED_EXTENSIONS.contains(&ext) {
                            files.push(p);
                        }
                    }
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Derive the output file name (without extension) from a source path.
/// "cards/gl45.txt" → "gl45"
fn derive_output_name(source: &str) -> String {
    let filename = source.rsplit('/').next().unwrap_or(source);
    filename
        .strip_suffix(".txt")
        .unwrap_or(filename)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_from_txt() {
        assert_eq!(derive_output_name("cards/gl45.txt"), "gl45");
        assert_eq!(derive_output_name("gl45.txt"), "gl45");
    }

    #[test]
    fn output_name_no_extension() {
        assert_eq!(derive_output_name("README"), "README");
    }
}
