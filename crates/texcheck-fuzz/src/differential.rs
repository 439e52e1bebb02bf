//! The round-trip comparison.

use texcheck_core::Expr;
use tracing::debug;

use crate::markup::MarkupParser;
use crate::oracle::{Artifact, OracleCase};
use crate::printable::GenerationCase;

/// A case the differential test can check.
///
/// Implemented for [`OracleCase`], which always carries its compiled
/// artifact, and for [`GenerationCase`], used when running without ground
/// truth.
pub trait RoundTripCase {
    /// The expression and its markup.
    fn generation(&self) -> &GenerationCase;

    /// The compiled document, if the case went through the oracle.
    fn artifact(&self) -> Option<&Artifact>;
}

impl RoundTripCase for GenerationCase {
    fn generation(&self) -> &GenerationCase {
        self
    }

    fn artifact(&self) -> Option<&Artifact> {
        None
    }
}

impl RoundTripCase for OracleCase {
    fn generation(&self) -> &GenerationCase {
        &self.case
    }

    fn artifact(&self) -> Option<&Artifact> {
        Some(&self.artifact)
    }
}

/// Everything known about one disagreement between serializer and parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureReport {
    /// The generated expression.
    pub original: Expr,
    /// What the parser produced, absent when it failed.
    pub parsed: Option<Expr>,
    /// The parser's error message when it failed.
    pub parse_error: Option<String>,
    /// The markup that was parsed.
    pub markup: String,
    /// The compiled document, when the case had ground truth.
    pub artifact: Option<Artifact>,
}

/// Parses each case's markup and compares the result with the original.
#[derive(Clone, Debug, Default)]
pub struct DifferentialTest<P> {
    parser: P,
}

impl<P: MarkupParser> DifferentialTest<P> {
    /// Creates a test around the parser under test.
    pub fn new(parser: P) -> Self {
        Self { parser }
    }

    /// Checks one case.
    ///
    /// # Errors
    ///
    /// Returns a [`FailureReport`] when the parser fails or produces an
    /// expression different from the original.
    pub fn check<C: RoundTripCase>(&self, case: &C) -> Result<(), FailureReport> {
        let GenerationCase { expr, markup } = case.generation();
        let (parsed, parse_error) = match self.parser.parse(markup) {
            Ok(parsed) if parsed == *expr => return Ok(()),
            Ok(parsed) => (Some(parsed), None),
            Err(err) => (None, Some(err.to_string())),
        };
        debug!(original = %expr, %markup, "round trip disagrees");
        Err(FailureReport {
            original: expr.clone(),
            parsed,
            parse_error,
            markup: markup.clone(),
            artifact: case.artifact().cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{Latex, MarkupSerializer};
    use texcheck_core::{Evaluation, UnaryOp};

    fn latex_case(expr: Expr) -> GenerationCase {
        let markup = Latex.serialize(&expr).unwrap();
        GenerationCase { expr, markup }
    }

    #[test]
    fn test_symbol_round_trips() {
        let test = DifferentialTest::new(Latex);
        assert_eq!(test.check(&latex_case(Expr::symbol("A"))), Ok(()));
    }

    #[test]
    fn test_sine_is_a_known_failure() {
        let sin = UnaryOp::Sin
            .apply(&Expr::symbol("A"), Evaluation::Unevaluated)
            .unwrap();
        let case = latex_case(sin.clone());
        let report = DifferentialTest::new(Latex).check(&case).unwrap_err();
        assert_eq!(report.original, sin);
        assert_eq!(report.parsed, None);
        assert!(report.parse_error.is_some());
        assert_eq!(report.markup, "\\sin{\\left(A \\right)}");
        assert_eq!(report.artifact, None);
    }

    #[test]
    fn test_mismatch_keeps_parsed_expression() {
        let case = GenerationCase {
            expr: Expr::symbol("A"),
            markup: "B".to_string(),
        };
        let report = DifferentialTest::new(Latex).check(&case).unwrap_err();
        assert_eq!(report.parsed, Some(Expr::symbol("B")));
        assert_eq!(report.parse_error, None);
    }

    #[test]
    fn test_oracle_case_carries_artifact() {
        let case = OracleCase {
            case: GenerationCase {
                expr: Expr::symbol("A"),
                markup: "B".to_string(),
            },
            artifact: Artifact::new(vec![1, 2, 3], "pdf"),
        };
        let report = DifferentialTest::new(Latex).check(&case).unwrap_err();
        assert_eq!(report.artifact.map(|a| a.len()), Some(3));
    }
}
