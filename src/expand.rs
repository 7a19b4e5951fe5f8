//! Enumeration micro-syntax expansion.
//!
//! Reference cards compress families of names into a combinatorial notation:
//! `{a, b}` enumerates every entry, `[a, b]` additionally allows the empty
//! string, and groups nest (`SKIP_{IMAGES, PIXELS, ROWS}`). This module finds
//! the top-level groups of a fragment, expands each one recursively, and
//! re-interleaves the cartesian product with the literal text around them.

use crate::parser::ParseError;
use std::fmt;

/// Delimiter pair that opened an enumeration group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// `{...}` — every comma-separated entry is a variant.
    All,
    /// `[...]` — entries plus the empty string, empty string first.
    Optional,
}

impl GroupKind {
    fn from_open(c: char) -> Option<GroupKind> {
        match c {
            '{' => Some(GroupKind::All),
            '[' => Some(GroupKind::Optional),
            _ => None,
        }
    }

    fn from_close(c: char) -> Option<GroupKind> {
        match c {
            '}' => Some(GroupKind::All),
            ']' => Some(GroupKind::Optional),
            _ => None,
        }
    }
}

/// Byte range of one top-level group, inclusive of both delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupRange {
    pub kind: GroupKind,
    pub start: usize,
    pub end: usize,
}

/// Scan a fragment for its top-level enumeration groups, left to right.
///
/// Nested groups are folded into the enclosing range. A close that does not
/// match the kind that opened the group, a stray close, or an unclosed open
/// is a parse failure carrying the whole fragment.
pub fn enumeration_ranges(fragment: &str) -> Result<Vec<GroupRange>, ParseError> {
    let mut ranges = Vec::new();
    let mut depth = 0usize;
    let mut open: Option<(GroupKind, usize)> = None;

    for (index, c) in fragment.char_indices() {
        if let Some(kind) = GroupKind::from_open(c) {
            if depth == 0 {
                open = Some((kind, index));
            }
            depth += 1;
        } else if let Some(kind) = GroupKind::from_close(c) {
            if depth == 0 {
                return Err(ParseError::new("enumeration", fragment)
                    .with_note(format!("unmatched '{}' at byte {}", c, index)));
            }
            depth -= 1;
            if depth == 0 {
                if let Some((open_kind, start)) = open.take() {
                    if open_kind != kind {
                        return Err(ParseError::new("enumeration", fragment)
                            .with_note(format!("mismatched '{}' at byte {}", c, index)));
                    }
                    ranges.push(GroupRange {
                        kind,
                        start,
                        end: index,
                    });
                }
            }
        }
    }

    if depth != 0 {
        return Err(ParseError::new("enumeration", fragment).with_note("unclosed group"));
    }
    Ok(ranges)
}

/// Literal segments strictly between/around the given ranges.
///
/// Always one longer than the range list; empty segments are kept so the
/// product can be re-interleaved positionally.
pub fn static_parts<'a>(fragment: &'a str, ranges: &[GroupRange]) -> Vec<&'a str> {
    let mut parts = Vec::with_capacity(ranges.len() + 1);
    let mut cursor = 0;
    for range in ranges {
        parts.push(&fragment[cursor..range.start]);
        cursor = range.end + 1;
    }
    parts.push(&fragment[cursor..]);
    parts
}

/// Split on `sep` at nesting depth zero; `{}`, `[]` and `()` all nest.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (index, c) in text.char_indices() {
        match c {
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth -= 1,
            _ if c == sep && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Expand one group's inner text (delimiters stripped) into its variants.
///
/// Entries are split on top-level commas, trimmed, and recursively expanded;
/// an `Optional` group gets the empty string prepended.
pub fn group_variants(kind: GroupKind, inner: &str) -> Result<Vec<String>, ParseError> {
    let mut variants = Vec::new();
    if kind == GroupKind::Optional {
        variants.push(String::new());
    }
    for entry in split_top_level(inner, ',') {
        variants.extend(expand(entry.trim())?);
    }
    Ok(variants)
}

/// Expand a fragment into the full list of concrete strings.
///
/// The cartesian product runs in source order with the right-most group
/// varying fastest; a fragment without groups expands to itself.
pub fn expand(fragment: &str) -> Result<Vec<String>, ParseError> {
    let ranges = enumeration_ranges(fragment)?;
    let mut groups = Vec::with_capacity(ranges.len());
    for range in &ranges {
        let inner = &fragment[range.start + 1..range.end];
        groups.push(group_variants(range.kind, inner)?);
    }
    Ok(interleave_product(
        &static_parts(fragment, &ranges),
        &groups,
    ))
}

/// Expand a comma-separated list of fragments (an `All` group without its
/// delimiters), flattening the per-entry expansions in order.
pub fn expand_list(text: &str) -> Result<Vec<String>, ParseError> {
    group_variants(GroupKind::All, text)
}

/// Concatenate `static[0] tuple[0] static[1] ... tuple[n-1] static[n]` for
/// every tuple of the cartesian product of `groups`.
fn interleave_product(statics: &[&str], groups: &[Vec<String>]) -> Vec<String> {
    let mut tuples: Vec<Vec<&str>> = vec![Vec::new()];
    for group in groups {
        let mut next = Vec::with_capacity(tuples.len() * group.len());
        for tuple in &tuples {
            for variant in group {
                let mut extended = tuple.clone();
                extended.push(variant.as_str());
                next.push(extended);
            }
        }
        tuples = next;
    }

    tuples
        .into_iter()
        .map(|tuple| {
            let mut out = String::new();
            for (index, part) in statics.iter().enumerate() {
                out.push_str(part);
                if let Some(variant) = tuple.get(index) {
                    out.push_str(variant);
                }
            }
            out
        })
        .collect()
}

/// Identifier with embedded enumeration groups, e.g. `Uniform{1234}{i f d ui}`.
///
/// Expansion is lazy: the raw spelling is stored and [`MultiIdent::idents`]
/// materializes the concrete names on demand. Group contents are either
/// space-separated alternatives (`i f d ui`) or, without a space, a character
/// sequence iterated one alternative per character (`1234`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiIdent {
    pub name: String,
}

impl MultiIdent {
    pub fn new(name: impl Into<String>) -> MultiIdent {
        MultiIdent { name: name.into() }
    }

    /// Every concrete identifier this name stands for.
    pub fn idents(&self) -> Result<Vec<String>, ParseError> {
        let ranges = enumeration_ranges(&self.name)?;
        let mut groups = Vec::with_capacity(ranges.len());
        for range in &ranges {
            let inner = &self.name[range.start + 1..range.end];
            let alternatives: Vec<String> = if inner.contains(' ') {
                inner.split(' ').map(str::to_string).collect()
            } else {
                inner.chars().map(String::from).collect()
            };
            groups.push(alternatives);
        }
        Ok(interleave_product(
            &static_parts(&self.name, &ranges),
            &groups,
        ))
    }
}

impl fmt::Display for MultiIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_top_level_only() {
        let ranges = enumeration_ranges("A{B,{C,D}}E[F]").unwrap();
        assert_eq!(
            ranges,
            vec![
                GroupRange {
                    kind: GroupKind::All,
                    start: 1,
                    end: 9
                },
                GroupRange {
                    kind: GroupKind::Optional,
                    start: 11,
                    end: 13
                },
            ]
        );
    }

    #[test]
    fn statics_one_longer_than_ranges() {
        let fragment = "A{B,C}D{E,F}";
        let ranges = enumeration_ranges(fragment).unwrap();
        let parts = static_parts(fragment, &ranges);
        assert_eq!(parts.len(), ranges.len() + 1);
        assert_eq!(parts, vec!["A", "D", ""]);
    }

    #[test]
    fn expand_product_rightmost_fastest() {
        assert_eq!(
            expand("A{B,C}D{E,F}").unwrap(),
            vec!["ABDE", "ABDF", "ACDE", "ACDF"]
        );
    }

    #[test]
    fn expand_without_groups_is_identity() {
        assert_eq!(expand("PLAIN_NAME").unwrap(), vec!["PLAIN_NAME"]);
    }

    #[test]
    fn optional_group_starts_empty() {
        assert_eq!(expand("[X, Y]").unwrap(), vec!["", "X", "Y"]);
        assert_eq!(
            expand("[UN]PACK").unwrap(),
            vec!["PACK", "UNPACK"]
        );
    }

    #[test]
    fn expand_nested_groups() {
        let variants = expand(
            "[UN]PACK_{SWAP_BYTES, LSB_FIRST, ROW_LENGTH, SKIP_{IMAGES, PIXELS, ROWS}, \
             ALIGNMENT, IMAGE_HEIGHT, COMPRESSED_BLOCK_WIDTH, \
             COMPRESSED_BLOCK_{HEIGHT, DEPTH, SIZE}}",
        )
        .unwrap();
        let expected = [
            "PACK_SWAP_BYTES",
            "PACK_LSB_FIRST",
            "PACK_ROW_LENGTH",
            "PACK_SKIP_IMAGES",
            "PACK_SKIP_PIXELS",
            "PACK_SKIP_ROWS",
            "PACK_ALIGNMENT",
            "PACK_IMAGE_HEIGHT",
            "PACK_COMPRESSED_BLOCK_WIDTH",
            "PACK_COMPRESSED_BLOCK_HEIGHT",
            "PACK_COMPRESSED_BLOCK_DEPTH",
            "PACK_COMPRESSED_BLOCK_SIZE",
            "UNPACK_SWAP_BYTES",
            "UNPACK_LSB_FIRST",
            "UNPACK_ROW_LENGTH",
            "UNPACK_SKIP_IMAGES",
            "UNPACK_SKIP_PIXELS",
            "UNPACK_SKIP_ROWS",
            "UNPACK_ALIGNMENT",
            "UNPACK_IMAGE_HEIGHT",
            "UNPACK_COMPRESSED_BLOCK_WIDTH",
            "UNPACK_COMPRESSED_BLOCK_HEIGHT",
            "UNPACK_COMPRESSED_BLOCK_DEPTH",
            "UNPACK_COMPRESSED_BLOCK_SIZE",
        ];
        assert_eq!(variants, expected);
    }

    #[test]
    fn unmatched_open_is_failure() {
        let err = expand("TESS_{CONTROL").unwrap_err();
        assert_eq!(err.text, "TESS_{CONTROL");
        assert_eq!(err.construct, "enumeration");
    }

    #[test]
    fn mismatched_close_is_failure() {
        assert!(expand("{A]").is_err());
        assert!(expand("A}B").is_err());
    }

    #[test]
    fn split_top_level_respects_nesting() {
        assert_eq!(
            split_top_level("a, b{c, d}, e(f, g)", ','),
            vec!["a", " b{c, d}", " e(f, g)"]
        );
    }

    #[test]
    fn multi_ident_chars_and_spaces() {
        let idents = MultiIdent::new("Uniform{1234}{i f d ui}").idents().unwrap();
        assert_eq!(idents.len(), 16);
        for digit in ["1", "2", "3", "4"] {
            for suffix in ["i", "f", "d", "ui"] {
                let name = format!("Uniform{}{}", digit, suffix);
                assert!(idents.contains(&name), "missing {}", name);
            }
        }
    }

    #[test]
    fn multi_ident_without_groups() {
        assert_eq!(
            MultiIdent::new("DrawRangeElements").idents().unwrap(),
            vec!["DrawRangeElements"]
        );
    }
}
