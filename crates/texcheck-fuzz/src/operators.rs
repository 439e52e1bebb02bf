//! Operator tables and the construction fallback.

use texcheck_core::{BinaryOp, ConstructError, Evaluation, Expr, RelOp, TernaryOp, UnaryOp};
use tracing::debug;

/// Single-operand operators the generator composes with.
pub const UNARY: &[UnaryOp] = &UnaryOp::ALL;

/// Two-operand operators the generator composes with.
pub const BINARY: &[BinaryOp] = &BinaryOp::ALL;

/// Three-operand operators the generator composes with.
pub const TERNARY: &[TernaryOp] = &TernaryOp::ALL;

/// Relational operators used at the top level.
pub const RELATIONAL: &[RelOp] = &RelOp::ALL;

/// Construction modes tried in order; the first success wins.
const ATTEMPTS: [Evaluation; 2] = [Evaluation::Unevaluated, Evaluation::Evaluated];

/// An operator of any arity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    /// A function or other single-operand operator.
    Unary(UnaryOp),
    /// A two-operand operator.
    Binary(BinaryOp),
    /// A three-operand operator.
    Ternary(TernaryOp),
    /// A relation between two expressions.
    Relational(RelOp),
}

impl Operator {
    /// Number of operands the operator takes.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Operator::Unary(_) => 1,
            Operator::Binary(_) | Operator::Relational(_) => 2,
            Operator::Ternary(_) => 3,
        }
    }

    /// Builds the expression for `operands`, trying unevaluated construction
    /// first and evaluating construction second.
    ///
    /// Returns `None` when every attempt is refused or the operand count does
    /// not match the arity. Never panics.
    #[must_use]
    pub fn construct(self, operands: &[Expr]) -> Option<Expr> {
        for mode in ATTEMPTS {
            match self.apply(operands, mode) {
                Ok(expr) => return Some(expr),
                Err(err) => debug!(operator = ?self, ?mode, reason = %err, "construction rejected"),
            }
        }
        None
    }

    fn apply(self, operands: &[Expr], mode: Evaluation) -> Result<Expr, ConstructError> {
        match (self, operands) {
            (Operator::Unary(op), [a]) => op.apply(a, mode),
            (Operator::Binary(op), [a, b]) => op.apply(a, b, mode),
            (Operator::Ternary(op), [a, b, c]) => op.apply(a, b, c, mode),
            (Operator::Relational(op), [a, b]) => Ok(op.apply(a, b, mode)),
            _ => Err(ConstructError::Unsupported(format!(
                "{self:?} takes {} operands, got {}",
                self.arity(),
                operands.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Expr {
        Expr::symbol(name)
    }

    #[test]
    fn test_tables_cover_every_operator() {
        assert_eq!(UNARY.len(), 11);
        assert_eq!(BINARY.len(), 6);
        assert_eq!(TERNARY.len(), 1);
        assert_eq!(RELATIONAL.len(), 6);
    }

    #[test]
    fn test_unevaluated_attempt_wins() {
        let two = Expr::integer(2);
        let sum = Operator::Binary(BinaryOp::Add).construct(&[two.clone(), two]).unwrap();
        assert_eq!(sum.class_chain()[0], "Add");
    }

    #[test]
    fn test_falls_back_to_evaluated() {
        let half = Operator::Binary(BinaryOp::Rational)
            .construct(&[Expr::integer(1), Expr::integer(2)])
            .unwrap();
        assert_eq!(half.class_chain()[0], "Rational");
    }

    #[test]
    fn test_unsupported_operands_give_no_expression() {
        assert_eq!(
            Operator::Binary(BinaryOp::Rational).construct(&[sym("A"), sym("B")]),
            None
        );
        let c = Expr::float(1.5, 3).unwrap();
        assert_eq!(Operator::Binary(BinaryOp::Derivative).construct(&[sym("A"), c]), None);
    }

    #[test]
    fn test_arity_mismatch_gives_no_expression() {
        assert_eq!(Operator::Unary(UnaryOp::Sin).construct(&[]), None);
        assert_eq!(Operator::Ternary(TernaryOp::Limit).construct(&[sym("A")]), None);
        assert_eq!(Operator::Relational(RelOp::Lt).arity(), 2);
    }
}
