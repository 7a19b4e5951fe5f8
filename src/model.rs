//! Symbol model for a parsed reference card — grammar-agnostic.
//!
//! Every node is an immutable value object built in a single pass by the
//! parser family. `Display` produces the canonical textual form, which the
//! grammar accepts back (round-trip), except that a declarator identifier
//! keeps its compact `{...}` spelling rather than its expanded variants.

use crate::expand::MultiIdent;
use std::fmt;

/// Complete parsed reference card.
#[derive(Debug, Default)]
pub struct Document {
    pub sections: Vec<Section>,
}

/// One section of the card: header, free-text description, functions.
#[derive(Debug)]
pub struct Section {
    pub header: SectionHeader,
    pub description: Vec<SectionDescription>,
    pub functions: Vec<Function>,
}

/// Section header line, e.g. `Buffer Object Queries [6, 6.7]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub name: String,
    pub numbers: SectionNumbers,
}

/// Free-text description line inside a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDescription {
    pub text: String,
}

/// A function prototype with the parameter value lists that follow it.
#[derive(Debug)]
pub struct Function {
    pub signature: Signature,
    pub enumerations: Vec<ParameterEnumeration>,
    pub associated_get: Option<AssociatedGet>,
}

/// `Enable/Disable/IsEnabled(CAP);` line associated with a function group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociatedGet {
    pub param: String,
}

// -- Parameter value grammar --------------------------------------------------

/// One description of a parameter's legal values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantNode {
    Plain(PlainVariantList),
    SeeParam(SeeParamDelegation),
    See(SeeDelegation),
    Table(TableDelegation),
    Bitwise(Bitwise),
    Lod(LodLevel),
}

/// Fully expanded enumeration of concrete value names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainVariantList {
    pub variants: Vec<String>,
}

/// `See X` — values are listed under another entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeeDelegation {
    pub target: MultiIdent,
}

/// `See P for T` — values for parameter P follow target T.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeeParamDelegation {
    pub param: MultiIdent,
    pub target: MultiIdent,
}

/// `[Table 6.7]` / `[Tables 6, 6.7]` — values live in the named tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDelegation {
    pub numbers: SectionNumbers,
}

/// `bitwise OR of [all FLAG specific] a, b, c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitwise {
    pub all_flag: Option<String>,
    pub flags: Vec<String>,
}

/// Literal `LOD level` marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LodLevel;

/// One component of a dotted section number: `7` or `4-5`.
///
/// The hyphenated form keeps exactly the digits as written; consumers treat
/// it as the half-open range `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionComponent {
    Single(u32),
    Range(u32, u32),
}

/// Hierarchical section number such as `6.7` or `3.4-5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionNumber {
    pub path: Vec<SectionComponent>,
}

/// Non-empty comma-space separated list of section numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionNumbers {
    pub numbers: Vec<SectionNumber>,
}

// -- Declaration grammar ------------------------------------------------------

/// Type qualifier keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    Const,
    Volatile,
}

/// One pointer level with its own qualifiers, e.g. `*const`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pointer {
    pub qualifiers: Vec<Qualifier>,
}

/// Pointer levels (outermost first) followed by one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarator {
    pub pointers: Vec<Pointer>,
    pub ident: MultiIdent,
}

/// `[qualifier] type declarator`, e.g. `const void *indices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub qualifier: Option<Qualifier>,
    pub type_name: MultiIdent,
    pub declarator: Declarator,
}

/// A signature parameter: either typed, or an inline list of legal values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    Typed(Declaration),
    Values(PlainVariantList),
}

/// Full `ReturnDecl Name(p1, p2, ...);` prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub qualifier: Option<Qualifier>,
    pub return_type: MultiIdent,
    pub declarator: Declarator,
    pub params: Vec<Parameter>,
}

/// `p1, p2: values` line naming parameters and their legal values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterEnumeration {
    pub params: Vec<String>,
    pub variants: Vec<VariantNode>,
}

// -- Canonical text form ------------------------------------------------------

impl fmt::Display for SectionHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.numbers)
    }
}

impl fmt::Display for SectionDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Display for AssociatedGet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Enable/Disable/IsEnabled({});", self.param)
    }
}

impl fmt::Display for VariantNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantNode::Plain(node) => node.fmt(f),
            VariantNode::SeeParam(node) => node.fmt(f),
            VariantNode::See(node) => node.fmt(f),
            VariantNode::Table(node) => node.fmt(f),
            VariantNode::Bitwise(node) => node.fmt(f),
            VariantNode::Lod(node) => node.fmt(f),
        }
    }
}

impl fmt::Display for PlainVariantList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.variants.join(", "))
    }
}

impl fmt::Display for SeeDelegation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "See {}", self.target)
    }
}

impl fmt::Display for SeeParamDelegation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "See {} for {}", self.param, self.target)
    }
}

impl fmt::Display for TableDelegation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.numbers.numbers.len() > 1 {
            write!(f, "[Tables {}]", self.numbers)
        } else {
            write!(f, "[Table {}]", self.numbers)
        }
    }
}

impl fmt::Display for Bitwise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("bitwise OR of ")?;
        if let Some(ref all_flag) = self.all_flag {
            write!(f, "all {} specific ", all_flag)?;
        }
        f.write_str(&self.flags.join(", "))
    }
}

impl fmt::Display for LodLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LOD level")
    }
}

impl fmt::Display for SectionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionComponent::Single(n) => write!(f, "{}", n),
            SectionComponent::Range(start, end) => write!(f, "{}-{}", start, end),
        }
    }
}

impl fmt::Display for SectionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.path.iter().map(|c| c.to_string()).collect();
        f.write_str(&parts.join("."))
    }
}

impl fmt::Display for SectionNumbers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.numbers.iter().map(|n| n.to_string()).collect();
        f.write_str(&parts.join(", "))
    }
}

impl Qualifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Qualifier::Const => "const",
            Qualifier::Volatile => "volatile",
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("*")?;
        let quals: Vec<&str> = self.qualifiers.iter().map(|q| q.as_str()).collect();
        f.write_str(&quals.join(" "))
    }
}

impl fmt::Display for Declarator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pointer in &self.pointers {
            write!(f, "{} ", pointer)?;
        }
        write!(f, "{}", self.ident)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(qualifier) = self.qualifier {
            write!(f, "{} ", qualifier)?;
        }
        write!(f, "{} {}", self.type_name, self.declarator)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Typed(declaration) => declaration.fmt(f),
            Parameter::Values(values) => values.fmt(f),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(qualifier) = self.qualifier {
            write!(f, "{} ", qualifier)?;
        }
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        write!(
            f,
            "{} {}({});",
            self.return_type,
            self.declarator,
            params.join(", ")
        )
    }
}

impl fmt::Display for ParameterEnumeration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variants: Vec<String> = self.variants.iter().map(|v| v.to_string()).collect();
        write!(f, "{}: {}", self.params.join(", "), variants.join(", "))
    }
}
