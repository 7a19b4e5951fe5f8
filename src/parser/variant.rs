//! Parameter value grammar — the variant node constructs and their
//! priority-ordered resolution.
//!
//! The bracket token `[` is overloaded: inside a value fragment it opens an
//! optional enumeration group, at the head of a value list it opens a table
//! reference. Disambiguation is purely lexical and lives in the fixed
//! candidate order of [`parse_variant`]; the plain enumeration check runs
//! first because its character class would also accept bitwise flag lists.

use crate::expand::{expand_list, MultiIdent};
use crate::model::{
    Bitwise, LodLevel, PlainVariantList, SectionComponent, SectionNumber, SectionNumbers,
    SeeDelegation, SeeParamDelegation, TableDelegation, VariantNode,
};
use crate::parser::{GrammarNode, ParseError};
use regex::Regex;
use std::sync::LazyLock;

// Uppercase names, separators, and group delimiters — nothing else.
static RE_PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z_, {}\[\]]*$").unwrap());

static RE_SECTION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+(-\d+)?)*$").unwrap());

impl GrammarNode for PlainVariantList {
    const CONSTRUCT: &'static str = "variant list";
    type Ir = String;

    fn check(text: &str) -> Option<String> {
        RE_PLAIN.is_match(text).then(|| text.to_string())
    }

    fn assemble(text: String) -> Result<PlainVariantList, ParseError> {
        Ok(PlainVariantList {
            variants: expand_list(&text)?,
        })
    }
}

impl GrammarNode for SeeDelegation {
    const CONSTRUCT: &'static str = "see delegation";
    type Ir = Vec<String>;

    fn check(text: &str) -> Option<Vec<String>> {
        let tokens: Vec<String> = text.split(' ').map(str::to_string).collect();
        if tokens.len() != 2 || tokens[0] != "See" {
            return None;
        }
        Some(tokens)
    }

    fn assemble(mut tokens: Vec<String>) -> Result<SeeDelegation, ParseError> {
        Ok(SeeDelegation {
            target: MultiIdent::new(tokens.remove(1)),
        })
    }
}

impl GrammarNode for SeeParamDelegation {
    const CONSTRUCT: &'static str = "see param delegation";
    type Ir = Vec<String>;

    fn check(text: &str) -> Option<Vec<String>> {
        let tokens: Vec<String> = text.split(' ').map(str::to_string).collect();
        if tokens.len() != 4 || tokens[0] != "See" || tokens[2] != "for" {
            return None;
        }
        Some(tokens)
    }

    fn assemble(mut tokens: Vec<String>) -> Result<SeeParamDelegation, ParseError> {
        let target = tokens.remove(3);
        let param = tokens.remove(1);
        Ok(SeeParamDelegation {
            param: MultiIdent::new(param),
            target: MultiIdent::new(target),
        })
    }
}

impl GrammarNode for SectionNumber {
    const CONSTRUCT: &'static str = "section number";
    type Ir = String;

    fn check(text: &str) -> Option<String> {
        RE_SECTION_NUMBER.is_match(text).then(|| text.to_string())
    }

    fn assemble(text: String) -> Result<SectionNumber, ParseError> {
        let mut path = Vec::new();
        for stage in text.split('.') {
            path.push(parse_component(stage)?);
        }
        Ok(SectionNumber { path })
    }
}

fn parse_component(stage: &str) -> Result<SectionComponent, ParseError> {
    let number = |digits: &str| {
        digits
            .parse::<u32>()
            .map_err(|_| SectionNumber::mismatch(stage))
    };
    match stage.split('-').collect::<Vec<_>>()[..] {
        [single] => Ok(SectionComponent::Single(number(single)?)),
        [start, end] => Ok(SectionComponent::Range(number(start)?, number(end)?)),
        _ => Err(SectionNumber::mismatch(stage)),
    }
}

impl GrammarNode for SectionNumbers {
    const CONSTRUCT: &'static str = "section numbers";
    type Ir = Vec<String>;

    fn check(text: &str) -> Option<Vec<String>> {
        let parts: Vec<String> = text.split(", ").map(str::to_string).collect();
        if parts.iter().any(|part| SectionNumber::check(part).is_none()) {
            return None;
        }
        Some(parts)
    }

    fn assemble(parts: Vec<String>) -> Result<SectionNumbers, ParseError> {
        let mut numbers = Vec::with_capacity(parts.len());
        for part in parts {
            numbers.push(SectionNumber::assemble(part)?);
        }
        Ok(SectionNumbers { numbers })
    }
}

impl GrammarNode for TableDelegation {
    const CONSTRUCT: &'static str = "table delegation";
    type Ir = String;

    fn check(text: &str) -> Option<String> {
        (text.starts_with("[Table") && text.ends_with(']')).then(|| text.to_string())
    }

    fn assemble(text: String) -> Result<TableDelegation, ParseError> {
        // "[Tables " vs "[Table " prefix.
        let trim = if text.starts_with("[Tables") { 8 } else { 7 };
        let inner = text.get(trim..text.len() - 1).unwrap_or("");
        match SectionNumbers::process(inner)? {
            Some(numbers) => Ok(TableDelegation { numbers }),
            None => Err(ParseError::new(SectionNumbers::CONSTRUCT, text)),
        }
    }
}

impl GrammarNode for Bitwise {
    const CONSTRUCT: &'static str = "bitwise";
    type Ir = String;

    fn check(text: &str) -> Option<String> {
        text.starts_with("bitwise OR of").then(|| text.to_string())
    }

    fn assemble(text: String) -> Result<Bitwise, ParseError> {
        let mut inner = text.strip_prefix("bitwise OR of ").unwrap_or(&text);
        let mut all_flag = None;
        if let Some(rest) = inner.strip_prefix("all ") {
            match rest.find(" specific ") {
                Some(pos) => {
                    all_flag = Some(rest[..pos].to_string());
                    inner = &rest[pos + " specific ".len()..];
                }
                None => {
                    return Err(Bitwise::mismatch(text.as_str())
                        .with_note("missing 'specific' after the all-flag"))
                }
            }
        }
        match PlainVariantList::process(inner)? {
            Some(list) => Ok(Bitwise {
                all_flag,
                flags: list.variants,
            }),
            None => Err(Bitwise::mismatch(text)),
        }
    }
}

impl GrammarNode for LodLevel {
    const CONSTRUCT: &'static str = "lod level";
    type Ir = ();

    fn check(text: &str) -> Option<()> {
        (text == "LOD level").then_some(())
    }

    fn assemble(_: ()) -> Result<LodLevel, ParseError> {
        Ok(LodLevel)
    }
}

/// Resolve one value fragment against the candidate constructs in priority
/// order; the first structural match wins. `Ok(None)` means no candidate
/// even matched structurally.
pub fn parse_variant(text: &str) -> Result<Option<VariantNode>, ParseError> {
    if let Some(node) = PlainVariantList::process(text)? {
        return Ok(Some(VariantNode::Plain(node)));
    }
    if let Some(node) = SeeParamDelegation::process(text)? {
        return Ok(Some(VariantNode::SeeParam(node)));
    }
    if let Some(node) = SeeDelegation::process(text)? {
        return Ok(Some(VariantNode::See(node)));
    }
    if let Some(node) = TableDelegation::process(text)? {
        return Ok(Some(VariantNode::Table(node)));
    }
    if let Some(node) = Bitwise::process(text)? {
        return Ok(Some(VariantNode::Bitwise(node)));
    }
    if let Some(node) = LodLevel::process(text)? {
        return Ok(Some(VariantNode::Lod(node)));
    }
    Ok(None)
}

/// Parse the value side of a parameter enumeration line.
///
/// A leading `[Table ...]` reference (everything up to the first `]`) is
/// peeled off first; the remainder splits on top-level commas and each piece
/// resolves through [`parse_variant`].
pub fn parse_variant_list(text: &str) -> Result<Vec<VariantNode>, ParseError> {
    let mut nodes = Vec::new();
    let mut rest = text;
    if let Some(close) = text.find(']') {
        if let Some(table) = TableDelegation::process(&text[..=close])? {
            nodes.push(VariantNode::Table(table));
            // Drop the separator right after the bracket as well.
            rest = text.get(close + 2..).unwrap_or("");
        }
    }
    for part in crate::expand::split_top_level(rest, ',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match parse_variant(part)? {
            Some(node) => nodes.push(node),
            None => return Err(ParseError::new("variant", part)),
        }
    }
    Ok(nodes)
}
