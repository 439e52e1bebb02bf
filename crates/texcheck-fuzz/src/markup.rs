//! The serializer and parser under test.
//!
//! The checker talks to both through these traits so a campaign can run
//! against the bundled LaTeX pair or against a substitute.

use std::fmt;

use texcheck_core::Expr;
use texcheck_latex::{parse_latex, to_latex, ParseError, PrintError};

/// Renders expressions as markup.
pub trait MarkupSerializer {
    /// Why an expression could not be rendered.
    type Error: fmt::Display;

    /// Renders `expr`.
    ///
    /// # Errors
    ///
    /// Fails for expressions that have no markup form.
    fn serialize(&self, expr: &Expr) -> Result<String, Self::Error>;
}

/// Reads markup back into expressions.
pub trait MarkupParser {
    /// Why markup could not be parsed.
    type Error: fmt::Display;

    /// Parses `markup`.
    ///
    /// # Errors
    ///
    /// Fails for markup the parser does not accept.
    fn parse(&self, markup: &str) -> Result<Expr, Self::Error>;
}

/// The bundled LaTeX printer and parser.
#[derive(Clone, Copy, Debug, Default)]
pub struct Latex;

impl MarkupSerializer for Latex {
    type Error = PrintError;

    fn serialize(&self, expr: &Expr) -> Result<String, PrintError> {
        to_latex(expr)
    }
}

impl MarkupParser for Latex {
    type Error = ParseError;

    fn parse(&self, markup: &str) -> Result<Expr, ParseError> {
        parse_latex(markup)
    }
}
