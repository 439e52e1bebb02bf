//! Serializer and parser errors.

use texcheck_core::ConstructError;
use thiserror::Error;

use crate::printer::MAX_DEPTH;

/// The serializer could not render an expression.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PrintError {
    /// The expression nests deeper than the printer supports.
    #[error("expression depth {0} exceeds the printer limit of {max}", max = MAX_DEPTH)]
    TooDeep(usize),

    /// The expression contains a node with no markup form.
    #[error("cannot print {0}")]
    Unsupported(String),
}

/// The parser could not turn markup into an expression.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character that starts no token.
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedCharacter {
        /// The character.
        ch: char,
        /// Byte offset in the input.
        offset: usize,
    },

    /// A token that does not fit the grammar at this point.
    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken {
        /// Description of the token.
        found: String,
        /// Byte offset in the input.
        offset: usize,
    },

    /// The input ended in the middle of an expression.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A function name not followed by a parenthesized argument.
    #[error("expected `(` after `\\{function}`, found {found}")]
    ExpectedFunctionArgument {
        /// The function command.
        function: String,
        /// Description of what followed it.
        found: String,
    },

    /// A command the parser does not know.
    #[error("unknown command \\{0}")]
    UnknownCommand(String),

    /// A malformed numeric literal.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    /// The parsed operands could not be combined.
    #[error(transparent)]
    Construct(#[from] ConstructError),
}
