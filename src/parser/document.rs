//! Document driver — sequences section and function recognition over
//! stitched logical lines.
//!
//! A section is a header line (`Name [6, 6.7]`), free-text description lines,
//! then function groups: a signature followed by its parameter enumeration
//! lines and an optional `Enable/Disable/IsEnabled` line. A parse failure
//! inside a section is recorded and the driver resynchronizes at the next
//! recognizable section header; the fix-up cache, when present, gets one
//! chance to substitute a hand-corrected line first.

use crate::cache::FixupCache;
use crate::model::{
    AssociatedGet, Document, Function, ParameterEnumeration, Section, SectionDescription,
    SectionHeader, SectionNumbers, Signature,
};
use crate::parser::{GrammarNode, ParseError};

impl GrammarNode for SectionHeader {
    const CONSTRUCT: &'static str = "section header";
    type Ir = (String, String);

    fn check(text: &str) -> Option<(String, String)> {
        let open = text.find('[')?;
        if open < 1 || !text.ends_with(']') {
            return None;
        }
        let numbers = &text[open + 1..text.len() - 1];
        SectionNumbers::check(numbers)?;
        let name = text[..open].trim_end();
        if name.is_empty() {
            return None;
        }
        Some((name.to_string(), numbers.to_string()))
    }

    fn assemble((name, numbers): (String, String)) -> Result<SectionHeader, ParseError> {
        match SectionNumbers::process(&numbers)? {
            Some(numbers) => Ok(SectionHeader { name, numbers }),
            None => Err(ParseError::new(SectionNumbers::CONSTRUCT, numbers)),
        }
    }
}

impl GrammarNode for SectionDescription {
    const CONSTRUCT: &'static str = "section description";
    type Ir = String;

    // Catch-all: any line that reaches the description slot is kept verbatim.
    fn check(text: &str) -> Option<String> {
        Some(text.to_string())
    }

    fn assemble(text: String) -> Result<SectionDescription, ParseError> {
        Ok(SectionDescription { text })
    }
}

/// Result of driving a whole card: the model plus every failure the driver
/// recovered from.
#[derive(Debug, Default)]
pub struct ParsedCard {
    pub document: Document,
    pub malformed: Vec<ParseError>,
}

/// Parse stitched logical lines into a document.
///
/// Never fails as a whole: unparseable stretches are recorded in
/// `malformed` and skipped up to the next section header.
pub fn parse_document(lines: &[String], cache: Option<&FixupCache>) -> ParsedCard {
    let mut sections = Vec::new();
    let mut malformed = Vec::new();
    let mut cursor = 0;

    while cursor < lines.len() {
        match parse_section(lines, &mut cursor, cache) {
            Ok(section) => sections.push(section),
            Err(err) => {
                malformed.push(err);
                cursor += 1;
                while cursor < lines.len() && SectionHeader::check(&lines[cursor]).is_none() {
                    cursor += 1;
                }
            }
        }
    }

    ParsedCard {
        document: Document { sections },
        malformed,
    }
}

fn parse_section(
    lines: &[String],
    cursor: &mut usize,
    cache: Option<&FixupCache>,
) -> Result<Section, ParseError> {
    let line = &lines[*cursor];
    let header = match SectionHeader::process(line)? {
        Some(header) => {
            *cursor += 1;
            header
        }
        None => return Err(SectionHeader::mismatch(line.clone())),
    };

    let mut description = Vec::new();
    while *cursor < lines.len() {
        let line = &lines[*cursor];
        if Signature::check(line).is_some() || SectionHeader::check(line).is_some() {
            break;
        }
        if let Some(desc) = SectionDescription::process(line)? {
            description.push(desc);
        }
        *cursor += 1;
    }

    let functions = parse_functions(lines, cursor, cache)?;

    Ok(Section {
        header,
        description,
        functions,
    })
}

fn parse_functions(
    lines: &[String],
    cursor: &mut usize,
    cache: Option<&FixupCache>,
) -> Result<Vec<Function>, ParseError> {
    let mut functions = Vec::new();

    while *cursor < lines.len() {
        let line = &lines[*cursor];
        // The get line also ends in `);` and would pass the signature check.
        if Signature::check(line).is_none() || AssociatedGet::check(line).is_some() {
            break;
        }
        let signature = parse_signature_line(line, cache)?;
        *cursor += 1;

        let mut enumerations = Vec::new();
        let mut associated_get = None;
        while *cursor < lines.len() {
            let line = &lines[*cursor];
            if AssociatedGet::check(line).is_some() {
                if associated_get.is_some() {
                    break;
                }
                match AssociatedGet::process(line)? {
                    Some(node) => {
                        associated_get = Some(node);
                        *cursor += 1;
                        continue;
                    }
                    None => break,
                }
            }
            if Signature::check(line).is_some() {
                break;
            }
            match parse_enumeration_line(line, cache)? {
                Some(node) => {
                    enumerations.push(node);
                    *cursor += 1;
                    continue;
                }
                None => {}
            }
            break;
        }

        functions.push(Function {
            signature,
            enumerations,
            associated_get,
        });
    }

    Ok(functions)
}

/// Parse a line the signature check already accepted, consulting the fix-up
/// cache when assembly fails.
fn parse_signature_line(
    line: &str,
    cache: Option<&FixupCache>,
) -> Result<Signature, ParseError> {
    match Signature::process(line) {
        Ok(Some(signature)) => Ok(signature),
        Ok(None) => Err(Signature::mismatch(line)),
        Err(err) => match cache.and_then(|c| c.replacement(line)) {
            Some(fixed) => match Signature::process(fixed)? {
                Some(signature) => Ok(signature),
                None => Err(err),
            },
            None => Err(err),
        },
    }
}

/// `Ok(None)` means the line is not an enumeration line at all; an assembly
/// failure is only surfaced after the fix-up cache had its chance.
fn parse_enumeration_line(
    line: &str,
    cache: Option<&FixupCache>,
) -> Result<Option<ParameterEnumeration>, ParseError> {
    match ParameterEnumeration::process(line) {
        Ok(node) => Ok(node),
        Err(err) => match cache.and_then(|c| c.replacement(line)) {
            Some(fixed) => match ParameterEnumeration::process(fixed)? {
                Some(node) => Ok(Some(node)),
                None => Err(err),
            },
            None => Err(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn section_header_node() {
        let header = SectionHeader::process("Buffer Object Queries [6, 6.7]")
            .unwrap()
            .unwrap();
        assert_eq!(header.name, "Buffer Object Queries");
        assert_eq!(header.numbers.to_string(), "6, 6.7");
        assert_eq!(header.to_string(), "Buffer Object Queries [6, 6.7]");
    }

    #[test]
    fn section_header_rejects_prose_brackets() {
        assert!(SectionHeader::check("values are listed in [Table 2.1]").is_none());
        assert!(SectionHeader::check("no brackets at all").is_none());
    }

    #[test]
    fn document_with_one_section() {
        let input = lines(&[
            "Vertex Arrays [10.3]",
            "Vertex data may be sourced from arrays.",
            "void DrawRangeElements(enum mode, uint start, uint end, sizei count, enum type, const void *indices);",
            "mode: POINTS, LINE_{STRIP, LOOP}, TRIANGLES",
        ]);
        let parsed = parse_document(&input, None);
        assert!(parsed.malformed.is_empty());

        let sections = &parsed.document.sections;
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].header.name, "Vertex Arrays");
        assert_eq!(sections[0].description.len(), 1);
        assert_eq!(sections[0].functions.len(), 1);
        assert_eq!(sections[0].functions[0].enumerations.len(), 1);
    }

    #[test]
    fn document_with_two_sections() {
        let input = lines(&[
            "Vertex Arrays [10.3]",
            "void Finish(T arg);",
            "Buffer Objects [6]",
            "void BindBuffer(enum target, uint buffer);",
            "target: ARRAY_BUFFER, ELEMENT_ARRAY_BUFFER",
        ]);
        let parsed = parse_document(&input, None);
        assert!(parsed.malformed.is_empty());
        assert_eq!(parsed.document.sections.len(), 2);
        assert_eq!(parsed.document.sections[1].functions.len(), 1);
    }

    #[test]
    fn associated_get_attaches_to_function() {
        let input = lines(&[
            "Rasterization [14]",
            "void PointSize(float size);",
            "Enable/Disable/IsEnabled(PROGRAM_POINT_SIZE);",
        ]);
        let parsed = parse_document(&input, None);
        let function = &parsed.document.sections[0].functions[0];
        assert_eq!(
            function.associated_get.as_ref().unwrap().param,
            "PROGRAM_POINT_SIZE"
        );
    }

    #[test]
    fn resync_after_malformed_section() {
        let input = lines(&[
            "Vertex Arrays [10.3]",
            "void Broken(enum mode, {unclosed);",
            "stray line between sections",
            "Buffer Objects [6]",
            "void BindBuffer(enum target, uint buffer);",
        ]);
        let parsed = parse_document(&input, None);
        assert_eq!(parsed.malformed.len(), 1);
        assert_eq!(parsed.malformed[0].construct, "declaration");
        // The broken section is dropped; parsing resumes at the next header.
        assert_eq!(parsed.document.sections.len(), 1);
        assert_eq!(parsed.document.sections[0].header.name, "Buffer Objects");
    }

    #[test]
    fn fixup_cache_rescues_a_line() {
        let cache = FixupCache::from_entries(vec![(
            "void Broken(enum mode, {unclosed);".to_string(),
            "void Broken(enum mode, uint count);".to_string(),
        )]);
        let input = lines(&[
            "Vertex Arrays [10.3]",
            "void Broken(enum mode, {unclosed);",
        ]);
        let parsed = parse_document(&input, Some(&cache));
        assert!(parsed.malformed.is_empty());
        let function = &parsed.document.sections[0].functions[0];
        assert_eq!(function.signature.declarator.ident.name, "Broken");
        assert_eq!(function.signature.params.len(), 2);
    }
}
