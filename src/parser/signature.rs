//! Prototype grammar — qualifiers, declarators, declarations, signatures,
//! and the parameter enumeration lines that follow a prototype.
//!
//! The grammar covers only the restricted prototype subset reference cards
//! use: `[const|volatile] type *... name(p1, p2, ...);` where a parameter is
//! either a typed declaration or an inline list of legal enum values.

use crate::expand::{split_top_level, MultiIdent};
use crate::model::{
    AssociatedGet, Declaration, Declarator, Parameter, ParameterEnumeration, PlainVariantList,
    Pointer, Qualifier, Signature,
};
use crate::parser::variant::parse_variant_list;
use crate::parser::{GrammarNode, ParseError};

impl GrammarNode for Qualifier {
    const CONSTRUCT: &'static str = "qualifier";
    type Ir = Qualifier;

    fn check(text: &str) -> Option<Qualifier> {
        match text {
            "const" => Some(Qualifier::Const),
            "volatile" => Some(Qualifier::Volatile),
            _ => None,
        }
    }

    fn assemble(qualifier: Qualifier) -> Result<Qualifier, ParseError> {
        Ok(qualifier)
    }
}

impl GrammarNode<[String]> for Declarator {
    const CONSTRUCT: &'static str = "declarator";
    type Ir = Vec<String>;

    fn check(tokens: &[String]) -> Option<Vec<String>> {
        if tokens.is_empty() {
            return None;
        }
        Some(tokens.to_vec())
    }

    fn assemble(mut tokens: Vec<String>) -> Result<Declarator, ParseError> {
        let pointers = parse_pointers(&mut tokens);
        if tokens.len() != 1 {
            return Err(Declarator::mismatch(tokens.join(" ")));
        }
        Ok(Declarator {
            pointers,
            ident: MultiIdent::new(tokens.remove(0)),
        })
    }
}

/// Consume leading `*`-introduced pointer levels; each level greedily takes
/// the qualifier keywords that follow it.
fn parse_pointers(tokens: &mut Vec<String>) -> Vec<Pointer> {
    let mut pointers = Vec::new();
    while tokens.first().map(String::as_str) == Some("*") {
        tokens.remove(0);
        let mut qualifiers = Vec::new();
        while let Some(qualifier) = tokens.first().and_then(|token| Qualifier::check(token)) {
            qualifiers.push(qualifier);
            tokens.remove(0);
        }
        pointers.push(Pointer { qualifiers });
    }
    pointers
}

impl Declaration {
    /// Split on whitespace and `*`, discarding empty tokens and keeping `*`
    /// as its own token.
    pub fn tokenize(code: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        for c in code.chars() {
            if c.is_whitespace() || c == '*' {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                if c == '*' {
                    tokens.push("*".to_string());
                }
            } else {
                current.push(c);
            }
        }
        if !current.is_empty() {
            tokens.push(current);
        }
        tokens
    }
}

impl GrammarNode<[String]> for Declaration {
    const CONSTRUCT: &'static str = "declaration";
    type Ir = Vec<String>;

    fn check(tokens: &[String]) -> Option<Vec<String>> {
        if tokens.len() > 1 {
            return Some(tokens.to_vec());
        }
        None
    }

    fn assemble(mut tokens: Vec<String>) -> Result<Declaration, ParseError> {
        let qualifier = Qualifier::check(&tokens[0]);
        if qualifier.is_some() {
            tokens.remove(0);
        }
        let type_name = MultiIdent::new(tokens.remove(0));
        match Declarator::process(&tokens[..])? {
            Some(declarator) => Ok(Declaration {
                qualifier,
                type_name,
                declarator,
            }),
            None => Err(ParseError::new(Declarator::CONSTRUCT, tokens.join(" "))),
        }
    }
}

impl GrammarNode for Signature {
    const CONSTRUCT: &'static str = "signature";
    type Ir = (String, String);

    fn check(text: &str) -> Option<(String, String)> {
        if !text.ends_with(");") {
            return None;
        }
        let open = text.find('(')?;
        let prefix = text[..open].to_string();
        let params = text[open + 1..text.len() - 2].to_string();
        Some((prefix, params))
    }

    fn assemble((prefix, params): (String, String)) -> Result<Signature, ParseError> {
        // Split the prefix on top-level spaces only: a multi-ident name like
        // `Uniform{1 2 3 4}{i f d ui}` keeps spaces inside its groups.
        let prefix_tokens: Vec<String> = split_top_level(&prefix, ' ')
            .into_iter()
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();
        let return_decl = match Declaration::process(&prefix_tokens[..])? {
            Some(declaration) => declaration,
            None => return Err(ParseError::new(Declaration::CONSTRUCT, prefix)),
        };

        let mut parsed = Vec::new();
        if !params.trim().is_empty() {
            for param in split_top_level(&params, ',') {
                let param = param.trim();
                let tokens = Declaration::tokenize(param);
                if let Some(declaration) = Declaration::process(&tokens[..])? {
                    parsed.push(Parameter::Typed(declaration));
                } else if let Some(values) = PlainVariantList::process(param)? {
                    parsed.push(Parameter::Values(values));
                } else {
                    return Err(ParseError::new(Declaration::CONSTRUCT, param));
                }
            }
        }

        Ok(Signature {
            qualifier: return_decl.qualifier,
            return_type: return_decl.type_name,
            declarator: return_decl.declarator,
            params: parsed,
        })
    }
}

impl GrammarNode for ParameterEnumeration {
    const CONSTRUCT: &'static str = "parameter enumeration";
    type Ir = String;

    fn check(text: &str) -> Option<String> {
        text.contains(':').then(|| text.to_string())
    }

    fn assemble(text: String) -> Result<ParameterEnumeration, ParseError> {
        let Some((names, values)) = text.split_once(": ") else {
            return Err(ParameterEnumeration::mismatch(text));
        };
        let params = names.split(", ").map(str::to_string).collect();
        let variants = parse_variant_list(values)?;
        Ok(ParameterEnumeration { params, variants })
    }
}

impl GrammarNode for AssociatedGet {
    const CONSTRUCT: &'static str = "associated get";
    type Ir = String;

    fn check(text: &str) -> Option<String> {
        text.starts_with("Enable/Disable/IsEnabled")
            .then(|| text.to_string())
    }

    fn assemble(text: String) -> Result<AssociatedGet, ParseError> {
        let (Some(open), Some(close)) = (text.find('('), text.rfind(')')) else {
            return Err(AssociatedGet::mismatch(text));
        };
        if open + 1 > close {
            return Err(AssociatedGet::mismatch(text));
        }
        Ok(AssociatedGet {
            param: text[open + 1..close].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration(code: &str) -> Result<Option<Declaration>, ParseError> {
        Declaration::process(&Declaration::tokenize(code)[..])
    }

    #[test]
    fn declaration_basic() {
        let decl = declaration("int foo").unwrap().unwrap();
        assert_eq!(decl.qualifier, None);
        assert_eq!(decl.type_name.name, "int");
        assert_eq!(decl.declarator.ident.name, "foo");
        assert!(decl.declarator.pointers.is_empty());
    }

    #[test]
    fn declaration_const_qualifier() {
        let decl = declaration("const int foo").unwrap().unwrap();
        assert_eq!(decl.qualifier, Some(Qualifier::Const));
        assert_eq!(decl.type_name.name, "int");
    }

    #[test]
    fn declaration_pointer() {
        let decl = declaration("int* foo").unwrap().unwrap();
        assert_eq!(decl.declarator.pointers, vec![Pointer::default()]);
        assert_eq!(decl.declarator.ident.name, "foo");
    }

    #[test]
    fn declaration_const_pointer() {
        let decl = declaration("const int *const foo").unwrap().unwrap();
        assert_eq!(decl.qualifier, Some(Qualifier::Const));
        assert_eq!(
            decl.declarator.pointers,
            vec![Pointer {
                qualifiers: vec![Qualifier::Const]
            }]
        );
        assert_eq!(decl.declarator.ident.name, "foo");
    }

    #[test]
    fn declaration_multiple_pointer_levels() {
        let decl = declaration("const int *const **foo").unwrap().unwrap();
        let pointers = &decl.declarator.pointers;
        assert_eq!(pointers.len(), 3);
        assert_eq!(pointers[0].qualifiers, vec![Qualifier::Const]);
        assert!(pointers[1].qualifiers.is_empty());
        assert!(pointers[2].qualifiers.is_empty());
    }

    #[test]
    fn declarator_rejects_trailing_tokens() {
        let tokens = Declaration::tokenize("int foo bar");
        let err = Declaration::process(&tokens[..]).unwrap_err();
        assert_eq!(err.construct, "declarator");
    }

    #[test]
    fn signature_draw_range_elements() {
        let sig = Signature::process(
            "void DrawRangeElements(enum mode, uint start, uint end, sizei count, enum type, \
             const void *indices);",
        )
        .unwrap()
        .unwrap();
        assert_eq!(sig.return_type.name, "void");
        assert_eq!(sig.declarator.ident.name, "DrawRangeElements");
        assert_eq!(sig.params.len(), 6);

        let expected = [
            (None, "enum", "mode", 0),
            (None, "uint", "start", 0),
            (None, "uint", "end", 0),
            (None, "sizei", "count", 0),
            (None, "enum", "type", 0),
            (Some(Qualifier::Const), "void", "indices", 1),
        ];
        for (param, (qualifier, type_name, ident, pointer_count)) in
            sig.params.iter().zip(expected)
        {
            let Parameter::Typed(decl) = param else {
                panic!("expected typed parameter, got {:?}", param);
            };
            assert_eq!(decl.qualifier, qualifier);
            assert_eq!(decl.type_name.name, type_name);
            assert_eq!(decl.declarator.ident.name, ident);
            assert_eq!(decl.declarator.pointers.len(), pointer_count);
        }
    }

    #[test]
    fn signature_enumerated_parameter() {
        let sig = Signature::process("void GetIntegerv(TIMESTAMP, int *data);")
            .unwrap()
            .unwrap();
        let Parameter::Values(values) = &sig.params[0] else {
            panic!("expected value-list parameter");
        };
        assert_eq!(values.variants, vec!["TIMESTAMP"]);

        let Parameter::Typed(decl) = &sig.params[1] else {
            panic!("expected typed parameter");
        };
        assert_eq!(decl.type_name.name, "int");
        assert_eq!(decl.declarator.ident.name, "data");
        assert_eq!(decl.declarator.pointers.len(), 1);
    }

    #[test]
    fn signature_multi_ident_name() {
        let sig = Signature::process("void Uniform{1 2 3 4}{i f d ui}(int location, T value);")
            .unwrap()
            .unwrap();
        assert_eq!(sig.declarator.ident.name, "Uniform{1 2 3 4}{i f d ui}");
        let idents = sig.declarator.ident.idents().unwrap();
        assert_eq!(idents.len(), 16);
        assert!(idents.contains(&"Uniform1i".to_string()));
        assert!(idents.contains(&"Uniform4ui".to_string()));
    }

    #[test]
    fn signature_without_parameters() {
        let sig = Signature::process("void Flush();").unwrap().unwrap();
        assert!(sig.params.is_empty());
    }

    #[test]
    fn signature_rejects_plain_text() {
        assert!(Signature::process("Buffer Object Queries").unwrap().is_none());
    }

    #[test]
    fn signature_unparseable_parameter_fails_assembly() {
        // One lowercase token: neither a typed declaration nor a value list.
        let err = Signature::process("void Foo(lowercase);").unwrap_err();
        assert_eq!(err.construct, "declaration");
        assert_eq!(err.text, "lowercase");
    }

    #[test]
    fn signature_round_trip() {
        let sig = Signature::process(
            "void DrawRangeElements(enum mode, uint start, const void *indices);",
        )
        .unwrap()
        .unwrap();
        // Canonical form separates pointer levels from the identifier.
        assert_eq!(
            sig.to_string(),
            "void DrawRangeElements(enum mode, uint start, const void * indices);"
        );
        let reparsed = Signature::process(&sig.to_string()).unwrap().unwrap();
        assert_eq!(sig, reparsed);
    }

    #[test]
    fn parameter_enumeration_line() {
        let line = "mode: POINTS, LINE_{STRIP, LOOP}, TRIANGLES";
        let node = ParameterEnumeration::process(line).unwrap().unwrap();
        assert_eq!(node.params, vec!["mode"]);
        assert_eq!(node.variants.len(), 3);
        let crate::model::VariantNode::Plain(second) = &node.variants[1] else {
            panic!("expected plain list");
        };
        assert_eq!(second.variants, vec!["LINE_STRIP", "LINE_LOOP"]);
    }

    #[test]
    fn parameter_enumeration_multiple_names() {
        let node = ParameterEnumeration::process("internalformat, format: See TexImage2D")
            .unwrap()
            .unwrap();
        assert_eq!(node.params, vec!["internalformat", "format"]);
    }

    #[test]
    fn associated_get_line() {
        let node = AssociatedGet::process("Enable/Disable/IsEnabled(PRIMITIVE_RESTART);")
            .unwrap()
            .unwrap();
        assert_eq!(node.param, "PRIMITIVE_RESTART");
        assert_eq!(
            node.to_string(),
            "Enable/Disable/IsEnabled(PRIMITIVE_RESTART);"
        );
    }
}
