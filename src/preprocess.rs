//! Line stitcher — joins raw multi-line card text into single logical lines
//! before structural parsing begins.
//!
//! Reference cards wrap long prototypes and value lists across physical
//! lines. Two passes undo that: the first joins everything from a `(` to the
//! matching `)` into one line, the second accumulates wrapped enumeration
//! text, flushing whenever a line starts a new unit (`(` or `:`) or carries
//! an inline section-number bracket.

use regex::Regex;
use std::sync::LazyLock;

// Section-number brackets as they appear mid-line, e.g. "[2.5]" or "[6, 6.7]".
static RE_SECTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+\.)*\d+]|\d-\d]|\[\d, \d").unwrap());

fn should_separate(line: &str) -> bool {
    line.contains('(') || line.contains(':')
}

fn should_inline(line: &str) -> bool {
    RE_SECTION_LINE.is_match(line)
}

/// Join wrapped prototypes: everything from the line containing `(` through
/// the line containing `)` becomes one logical line.
pub fn stitch_signatures(lines: &[String]) -> Vec<String> {
    let mut result = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();
    let mut in_signature = false;

    for line in lines {
        if line.contains('(') {
            in_signature = true;
        }
        if in_signature {
            buffer.push(line);
        } else {
            result.push(line.clone());
        }
        if in_signature && line.contains(')') {
            in_signature = false;
            result.push(buffer.concat());
            buffer.clear();
        }
    }
    // An unterminated prototype at the end of input is kept as-is for the
    // parser to report.
    if !buffer.is_empty() {
        result.push(buffer.concat());
    }
    result
}

/// Re-flow wrapped enumeration text into logical lines.
pub fn stitch_enumerations(lines: &[String]) -> Vec<String> {
    let mut result = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();

    let mut flush = |buffer: &mut Vec<&str>, result: &mut Vec<String>| {
        if !buffer.is_empty() {
            result.push(buffer.join(" "));
            buffer.clear();
        }
    };

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if should_inline(line) {
            flush(&mut buffer, &mut result);
            result.push(line.to_string());
        } else if should_separate(line) {
            flush(&mut buffer, &mut result);
            buffer.push(line);
        } else {
            buffer.push(line);
        }
    }
    flush(&mut buffer, &mut result);
    result
}

/// Full stitching pipeline over raw card text.
pub fn preprocess(raw: &str) -> Vec<String> {
    let lines: Vec<String> = raw.lines().map(str::to_string).collect();
    stitch_enumerations(&stitch_signatures(&lines))
}
