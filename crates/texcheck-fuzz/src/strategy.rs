//! The recursive expression generator.
//!
//! Compound nodes are drawn by picking an operator from the tables and
//! operands from the recursive strategy itself, then constructing with the
//! library. Draws the library cannot build are rejected and redrawn; they are
//! never passed on as failures.

use proptest::prelude::*;
use proptest::sample::select;
use texcheck_core::Expr;

use crate::atoms::{floats, symbols};
use crate::config::GeneratorConfig;
use crate::operators::{Operator, BINARY, RELATIONAL, TERNARY, UNARY};

/// Expressions of bounded depth.
///
/// Leaves come first in every union, so shrinking moves toward atoms.
pub fn expressions(config: &GeneratorConfig) -> BoxedStrategy<Expr> {
    let leaf = prop_oneof![symbols(), floats()];
    leaf.prop_recursive(
        config.depth,
        config.desired_size,
        config.expected_branch,
        |inner| {
            prop_oneof![
                3 => unary(inner.clone()),
                3 => binary(inner.clone()),
                1 => ternary(inner),
            ]
        },
    )
    .boxed()
}

fn unary(inner: BoxedStrategy<Expr>) -> impl Strategy<Value = Expr> {
    (select(UNARY), inner).prop_filter_map("unsupported unary construction", |(op, a)| {
        Operator::Unary(op).construct(&[a])
    })
}

fn binary(inner: BoxedStrategy<Expr>) -> impl Strategy<Value = Expr> {
    (select(BINARY), inner.clone(), inner).prop_filter_map(
        "unsupported binary construction",
        |(op, a, b)| Operator::Binary(op).construct(&[a, b]),
    )
}

fn ternary(inner: BoxedStrategy<Expr>) -> impl Strategy<Value = Expr> {
    (select(TERNARY), inner.clone(), inner.clone(), inner).prop_filter_map(
        "unsupported ternary construction",
        |(op, a, b, c)| Operator::Ternary(op).construct(&[a, b, c]),
    )
}

/// Relations between two generated expressions.
///
/// Relations only appear at the top level; they are never operands.
pub fn relations(config: &GeneratorConfig) -> BoxedStrategy<Expr> {
    let side = expressions(config);
    (select(RELATIONAL), side.clone(), side)
        .prop_filter_map("unsupported relation", |(op, lhs, rhs)| {
            Operator::Relational(op).construct(&[lhs, rhs])
        })
        .boxed()
}

/// Everything handed to the printable filter: expressions, plus relations
/// when enabled.
pub fn subjects(config: &GeneratorConfig) -> BoxedStrategy<Expr> {
    if config.relations {
        prop_oneof![3 => expressions(config), 1 => relations(config)].boxed()
    } else {
        expressions(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;

    #[test]
    fn test_depth_zero_draws_atoms() {
        let config = GeneratorConfig {
            depth: 0,
            relations: false,
            ..GeneratorConfig::default()
        };
        let strategy = subjects(&config);
        let mut runner = TestRunner::deterministic();
        for _ in 0..64 {
            let expr = strategy.new_tree(&mut runner).unwrap().current();
            assert!(expr.is_atom(), "{expr:?}");
        }
    }

    #[test]
    fn test_depth_is_bounded() {
        let config = GeneratorConfig::default();
        let strategy = expressions(&config);
        let mut runner = TestRunner::deterministic();
        for _ in 0..64 {
            let expr = strategy.new_tree(&mut runner).unwrap().current();
            // A root adds two levels per step: `Pow(x, Pow(n, -1))`.
            assert!(expr.depth() <= 2 * config.depth as usize + 1, "{expr:?}");
        }
    }
}
