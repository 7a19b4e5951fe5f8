//! Canonical text renderer — one logical line per model node.
//!
//! The output is the model's own `Display` form, which the grammar accepts
//! back: rendering and re-parsing a document yields the same model.

use crate::model::Document;
use crate::render::Renderer;

pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, doc: &Document) -> String {
        let mut out = String::new();
        for section in &doc.sections {
            out.push_str(&section.header.to_string());
            out.push('\n');
            for description in &section.description {
                out.push_str(&description.to_string());
                out.push('\n');
            }
            for function in &section.functions {
                out.push_str(&function.signature.to_string());
                out.push('\n');
                for enumeration in &function.enumerations {
                    out.push_str(&enumeration.to_string());
                    out.push('\n');
                }
                if let Some(ref get) = function.associated_get {
                    out.push_str(&get.to_string());
                    out.push('\n');
                }
            }
        }
        out
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::document::parse_document;

    #[test]
    fn rendered_text_reparses_to_the_same_model() {
        let input: Vec<String> = [
            "Vertex Arrays [10.3]",
            "void DrawRangeElements(enum mode, uint start, uint end, sizei count, enum type, const void *indices);",
            "mode: POINTS, LINE_{STRIP, LOOP}, TRIANGLES",
            "Enable/Disable/IsEnabled(PRIMITIVE_RESTART);",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let first = parse_document(&input, None);
        assert!(first.malformed.is_empty());

        let rendered = TextRenderer.render(&first.document);
        let lines: Vec<String> = rendered.lines().map(str::to_string).collect();
        let second = parse_document(&lines, None);
        assert!(second.malformed.is_empty());

        assert_eq!(TextRenderer.render(&second.document), rendered);
    }
}
