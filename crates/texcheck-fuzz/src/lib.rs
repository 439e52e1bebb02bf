//! # texcheck-fuzz
//!
//! Property-based round-trip checking for a markup serializer and its parser.
//!
//! A campaign runs this pipeline, leaf-first:
//!
//! 1. [`atoms`]: symbols and float literals
//! 2. [`operators`]: operator tables and the construction fallback
//! 3. [`strategy`]: the recursive expression generator
//! 4. [`printable`]: drops expressions the serializer refuses
//! 5. [`oracle`]: drops markup an external document compiler refuses
//! 6. [`differential`]: parses the markup and compares with the original
//! 7. [`report`]: prints what went wrong
//!
//! Anything that fails construction, serialization or compilation is a
//! rejected draw and never reaches the differential test. Only parse failures
//! and mismatches become [`FailureReport`]s.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod atoms;
pub mod campaign;
pub mod config;
pub mod differential;
pub mod error;
pub mod markup;
pub mod operators;
pub mod oracle;
pub mod printable;
pub mod report;
pub mod strategy;

#[cfg(test)]
mod proptests;

pub use campaign::{round_trip, Campaign, Outcome};
pub use config::{CampaignConfig, GeneratorConfig};
pub use differential::{DifferentialTest, FailureReport, RoundTripCase};
pub use error::{CampaignError, CompileError};
pub use markup::{Latex, MarkupParser, MarkupSerializer};
pub use operators::Operator;
pub use oracle::{Artifact, CompilerConfig, DocumentCompiler, LatexCompiler, OracleCase};
pub use printable::GenerationCase;
pub use report::Reporter;
