//! Grammar node family — every construct follows the same three-stage
//! recognition contract.
//!
//! `check` is a cheap structural extractor: it either rejects the input
//! (`None`, a normal negative result used to try the next candidate) or
//! hands an intermediate representation to `assemble`, which builds the
//! immutable node or fails with a classified [`ParseError`]. `process`
//! composes the two. Only assembly failures are errors; a fragment is
//! resolved against an ordered candidate list and the first `process`
//! returning a node wins.

pub mod document;
pub mod signature;
pub mod variant;

use std::error::Error;
use std::fmt;

/// The sole grammar failure kind: a construct recognized the shape of its
/// input but a required sub-parse failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Name of the construct that failed to assemble.
    pub construct: &'static str,
    /// The offending original text.
    pub text: String,
    /// Optional diagnostic note.
    pub note: Option<String>,
}

impl ParseError {
    pub fn new(construct: &'static str, text: impl Into<String>) -> ParseError {
        ParseError {
            construct,
            text: text.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> ParseError {
        self.note = Some(note.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, found: '{}'", self.construct, self.text)?;
        if let Some(ref note) = self.note {
            write!(f, ". note: {}", note)?;
        }
        Ok(())
    }
}

impl Error for ParseError {}

/// Three-stage recognition contract over a text fragment or, for composite
/// constructs, a list of already-tokenized fragments.
pub trait GrammarNode<Input: ?Sized = str>: Sized {
    /// Construct name used in parse failures.
    const CONSTRUCT: &'static str;

    /// Intermediate representation handed from `check` to `assemble`.
    type Ir;

    /// Structural predicate/extractor. `None` means "no match", not an error.
    fn check(input: &Input) -> Option<Self::Ir>;

    /// Build the node from the intermediate representation.
    fn assemble(ir: Self::Ir) -> Result<Self, ParseError>;

    /// `check` then `assemble`: `Ok(None)` for a structural rejection,
    /// `Err` only for an assembly-stage failure.
    fn process(input: &Input) -> Result<Option<Self>, ParseError> {
        match Self::check(input) {
            Some(ir) => Self::assemble(ir).map(Some),
            None => Ok(None),
        }
    }

    /// Parse failure naming this construct.
    fn mismatch(text: impl Into<String>) -> ParseError {
        ParseError::new(Self::CONSTRUCT, text)
    }
}
