//! # texcheck-latex
//!
//! LaTeX math markup for `texcheck-core` expressions.
//!
//! - [`to_latex`] renders an expression as math-mode markup
//! - [`parse_latex`] reads markup back into an expression
//!
//! The two are meant to be inverses. Where they are not, the round-trip
//! checker in `texcheck-fuzz` is expected to notice.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
mod lexer;
pub mod parser;
pub mod printer;

#[cfg(test)]
mod proptests;

pub use error::{ParseError, PrintError};
pub use parser::parse_latex;
pub use printer::{to_latex, MAX_DEPTH};
