//! JSON renderer — structured output for tooling integration.
//!
//! Serializes the symbol model directly, with multi-identifiers expanded to
//! their concrete names so consumers need no knowledge of the `{...}`
//! micro-syntax.

use crate::model::{Document, Function, Parameter, Section, VariantNode};
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &Document) -> String {
        let mut out = String::new();
        out.push_str("{\n  \"sections\": [\n");
        for (i, section) in doc.sections.iter().enumerate() {
            out.push_str(&render_section_json(section));
            if i < doc.sections.len() - 1 {
                out.push_str(",\n");
            } else {
                out.push('\n');
            }
        }
        out.push_str("  ]\n}\n");
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn render_section_json(section: &Section) -> String {
    let mut out = String::new();
    out.push_str("    {\n");
    out.push_str(&format!(
        "      \"name\": \"{}\",\n",
        json_escape(&section.header.name)
    ));
    out.push_str(&format!(
        "      \"numbers\": \"{}\",\n",
        json_escape(&section.header.numbers.to_string())
    ));

    let description: Vec<String> = section
        .description
        .iter()
        .map(|d| d.text.clone())
        .collect();
    out.push_str(&render_string_array("description", &description, 6));

    out.push_str("      \"functions\": [\n");
    for (i, function) in section.functions.iter().enumerate() {
        out.push_str(&render_function_json(function));
        if i < section.functions.len() - 1 {
            out.push_str(",\n");
        } else {
            out.push('\n');
        }
    }
    out.push_str("      ]\n");
    out.push_str("    }");
    out
}

fn render_function_json(function: &Function) -> String {
    let mut out = String::new();
    out.push_str("        {\n");
    out.push_str(&format!(
        "          \"signature\": \"{}\",\n",
        json_escape(&function.signature.to_string())
    ));

    // Expand the (possibly multi-variant) function name; on a malformed
    // spelling fall back to the raw text rather than dropping the entry.
    let ident = &function.signature.declarator.ident;
    let names = ident
        .idents()
        .unwrap_or_else(|_| vec![ident.name.clone()]);
    out.push_str(&render_string_array("names", &names, 10));

    out.push_str(&format!(
        "          \"return_type\": \"{}\",\n",
        json_escape(&function.signature.return_type.name)
    ));

    let parameters: Vec<String> = function
        .signature
        .params
        .iter()
        .map(|param| match param {
            Parameter::Typed(declaration) => declaration.to_string(),
            Parameter::Values(values) => values.to_string(),
        })
        .collect();
    out.push_str(&render_string_array("parameters", &parameters, 10));

    out.push_str("          \"enumerations\": [\n");
    for (i, enumeration) in function.enumerations.iter().enumerate() {
        out.push_str("            {\n");
        out.push_str(&render_string_array("params", &enumeration.params, 14));
        // Plain lists flatten to one entry per concrete name; delegations
        // and the other node kinds stay one entry each.
        let mut values = Vec::new();
        for variant in &enumeration.variants {
            match variant {
                VariantNode::Plain(list) => values.extend(list.variants.iter().cloned()),
                other => values.push(other.to_string()),
            }
        }
        let mut values_field = render_string_array("values", &values, 14);
        // Last field of the object: strip the trailing comma.
        strip_trailing_comma(&mut values_field);
        out.push_str(&values_field);
        out.push_str("            }");
        if i < function.enumerations.len() - 1 {
            out.push_str(",\n");
        } else {
            out.push('\n');
        }
    }
    out.push_str("          ]");

    if let Some(ref get) = function.associated_get {
        out.push_str(&format!(
            ",\n          \"associated_get\": \"{}\"\n",
            json_escape(&get.param)
        ));
    } else {
        out.push('\n');
    }
    out.push_str("        }");
    out
}

/// `"key": ["a", "b"],` with the given indentation.
fn render_string_array(key: &str, values: &[String], indent: usize) -> String {
    let pad = " ".repeat(indent);
    let items: Vec<String> = values
        .iter()
        .map(|value| format!("\"{}\"", json_escape(value)))
        .collect();
    format!("{}\"{}\": [{}],\n", pad, key, items.join(", "))
}

fn strip_trailing_comma(field: &mut String) {
    if field.ends_with(",\n") {
        field.truncate(field.len() - 2);
        field.push('\n');
    }
}

fn json_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::document::parse_document;

    #[test]
    fn json_output_is_well_formed() {
        let input: Vec<String> = [
            "Shaders and Programs [7]",
            "void Uniform{1 2 3 4}{i f d ui}(int location, T value);",
            "location: See UseProgram",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let parsed = parse_document(&input, None);
        assert!(parsed.malformed.is_empty());

        let rendered = JsonRenderer.render(&parsed.document);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        let function = &value["sections"][0]["functions"][0];
        assert_eq!(function["return_type"], "void");
        assert_eq!(function["names"].as_array().unwrap().len(), 16);
        assert_eq!(
            function["enumerations"][0]["values"][0],
            "See UseProgram"
        );
    }

    #[test]
    fn escape_quotes_and_control_chars() {
        assert_eq!(json_escape("a\"b"), "a\\\"b");
        assert_eq!(json_escape("a\\b"), "a\\\\b");
        assert_eq!(json_escape("line\nbreak"), "line\\nbreak");
    }
}
