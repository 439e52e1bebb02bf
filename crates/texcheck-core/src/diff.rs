//! Symbolic differentiation for evaluated derivatives.

use dashu::integer::IBig;
use dashu::rational::RBig;

use crate::construct::{add, function, mul, neg, pow, Evaluation};
use crate::error::ConstructError;
use crate::expr::{Expr, ExprNode, Function};

const EVAL: Evaluation = Evaluation::Evaluated;

/// Differentiates `expr` with respect to the symbol `var`.
///
/// Nodes without a closed-form rule (absolute values, factorials, nested
/// derivatives and limits) stay as unevaluated derivatives.
pub(crate) fn differentiate(expr: &Expr, var: &str) -> Result<Expr, ConstructError> {
    if !expr.has_symbol(var) {
        return match expr.node() {
            ExprNode::Relation { .. } | ExprNode::Boolean(_) => {
                Err(ConstructError::unsupported("cannot differentiate a relation"))
            }
            _ => Ok(Expr::integer(0)),
        };
    }

    match expr.node() {
        ExprNode::Symbol(_) => Ok(Expr::integer(1)),
        ExprNode::Add(terms) => {
            let parts = terms
                .iter()
                .map(|t| differentiate(t, var))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(add(parts, EVAL))
        }
        ExprNode::Mul(factors) => {
            let mut parts = Vec::with_capacity(factors.len());
            for (i, factor) in factors.iter().enumerate() {
                let d = differentiate(factor, var)?;
                let others = factors
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, f)| f.clone());
                parts.push(mul(std::iter::once(d).chain(others), EVAL));
            }
            Ok(add(parts, EVAL))
        }
        ExprNode::Pow { base, exp } => differentiate_pow(base, exp, var),
        ExprNode::Function { func, arg } => {
            let du = differentiate(arg, var)?;
            let outer = match func {
                Function::Sin => function(Function::Cos, arg, EVAL)?,
                Function::Cos => neg(&function(Function::Sin, arg, EVAL)?),
                Function::Tan => {
                    let tan = function(Function::Tan, arg, EVAL)?;
                    add([Expr::integer(1), pow(&tan, &Expr::integer(2), EVAL)?], EVAL)
                }
                Function::Asin | Function::Acos => {
                    let square = pow(arg, &Expr::integer(2), EVAL)?;
                    let radicand = add([Expr::integer(1), neg(&square)], EVAL);
                    let inv_sqrt = pow(&radicand, &Expr::rational(minus_half()), EVAL)?;
                    if *func == Function::Acos {
                        neg(&inv_sqrt)
                    } else {
                        inv_sqrt
                    }
                }
                Function::Atan => {
                    let denom = add([Expr::integer(1), pow(arg, &Expr::integer(2), EVAL)?], EVAL);
                    pow(&denom, &Expr::integer(-1), EVAL)?
                }
                Function::Exp => function(Function::Exp, arg, EVAL)?,
                Function::Log => pow(arg, &Expr::integer(-1), EVAL)?,
                Function::Abs | Function::Factorial => return Ok(unevaluated(expr, var)),
            };
            Ok(mul([outer, du], EVAL))
        }
        ExprNode::Derivative { .. } | ExprNode::Limit { .. } => Ok(unevaluated(expr, var)),
        ExprNode::Relation { .. } | ExprNode::Boolean(_) => {
            Err(ConstructError::unsupported("cannot differentiate a relation"))
        }
        ExprNode::Integer(_) | ExprNode::Rational(_) | ExprNode::Float(_) => Ok(Expr::integer(0)),
    }
}

fn differentiate_pow(base: &Expr, exp: &Expr, var: &str) -> Result<Expr, ConstructError> {
    let power = pow(base, exp, EVAL)?;
    if !exp.has_symbol(var) {
        // d(b^e) = e * b^(e-1) * db
        let lowered = pow(base, &add([exp.clone(), Expr::integer(-1)], EVAL), EVAL)?;
        let db = differentiate(base, var)?;
        return Ok(mul([exp.clone(), lowered, db], EVAL));
    }

    let log_base = function(Function::Log, base, EVAL)?;
    let de = differentiate(exp, var)?;
    if !base.has_symbol(var) {
        // d(b^e) = b^e * log(b) * de
        return Ok(mul([power, log_base, de], EVAL));
    }

    // d(b^e) = b^e * (de * log(b) + e * db / b)
    let db = differentiate(base, var)?;
    let inv_base = pow(base, &Expr::integer(-1), EVAL)?;
    let inner = add(
        [
            mul([de, log_base], EVAL),
            mul([exp.clone(), db, inv_base], EVAL),
        ],
        EVAL,
    );
    Ok(mul([power, inner], EVAL))
}

fn unevaluated(expr: &Expr, var: &str) -> Expr {
    Expr::from_node(ExprNode::Derivative {
        expr: expr.clone(),
        var: Expr::symbol(var),
    })
}

fn minus_half() -> RBig {
    RBig::from_parts(IBig::from(-1), 2u8.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polynomial() {
        let x = Expr::symbol("x");
        // d/dx x^3 = 3 x^2
        let cube = pow(&x, &Expr::integer(3), EVAL).unwrap();
        let expected = mul([Expr::integer(3), pow(&x, &Expr::integer(2), EVAL).unwrap()], EVAL);
        assert_eq!(differentiate(&cube, "x").unwrap(), expected);
    }

    #[test]
    fn test_constant_and_sum() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        assert_eq!(differentiate(&y, "x").unwrap(), Expr::integer(0));
        let sum = add([x.clone(), y], EVAL);
        assert_eq!(differentiate(&sum, "x").unwrap(), Expr::integer(1));
    }

    #[test]
    fn test_chain_rule() {
        let x = Expr::symbol("x");
        let sin = function(Function::Sin, &x, EVAL).unwrap();
        assert_eq!(
            differentiate(&sin, "x").unwrap(),
            function(Function::Cos, &x, EVAL).unwrap()
        );
    }

    #[test]
    fn test_abs_stays_unevaluated() {
        let x = Expr::symbol("x");
        let abs = function(Function::Abs, &x, EVAL).unwrap();
        assert_eq!(differentiate(&abs, "x").unwrap().class_chain()[0], "Derivative");
    }
}
