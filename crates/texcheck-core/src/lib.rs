//! # texcheck-core
//!
//! The symbolic expression library exercised by the round-trip checker.
//!
//! This crate provides:
//! - Immutable, cheaply clonable expression trees with structural equality
//! - Exact integers and rationals (via `dashu`) and decimal float literals
//! - Operator construction in evaluated and unevaluated modes
//! - Introspection used for diagnostics: atoms and class chains
//!
//! ## Construction
//!
//! Construction never panics on unsupported operands. Operators that cannot
//! build an expression for a given combination return a [`ConstructError`],
//! which callers drawing random operands treat as "no expression".

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod construct;
mod diff;
pub mod error;
pub mod expr;
pub mod number;

#[cfg(test)]
mod proptests;

pub use construct::{BinaryOp, Evaluation, TernaryOp, UnaryOp};
pub use error::ConstructError;
pub use expr::{Expr, ExprNode, Function, RelOp};
pub use number::{Float, Number};
