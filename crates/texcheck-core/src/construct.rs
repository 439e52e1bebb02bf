//! Building compound expressions.
//!
//! Every operator can be applied in two modes. [`Evaluation::Unevaluated`]
//! builds the node exactly as requested; [`Evaluation::Evaluated`] applies the
//! library's automatic folding (flattening, numeric folding, identities,
//! differentiation). Some operators only exist in one of the two modes, and
//! some operand combinations are rejected outright; both situations are
//! reported as a [`ConstructError`].

use dashu::base::Signed as DashuSigned;
use dashu::integer::IBig;
use dashu::rational::RBig;
use smallvec::SmallVec;

use crate::diff::differentiate;
use crate::error::ConstructError;
use crate::expr::{Args, Expr, ExprNode, Function, RelOp};
use crate::number::Number;

/// Whether construction applies automatic folding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Evaluation {
    /// Build the node as given.
    Unevaluated,
    /// Build the node and fold it.
    Evaluated,
}

/// Largest integer exponent folded for exact powers.
const MAX_FOLDED_EXPONENT: u32 = 64;

/// Largest argument folded for factorials.
const MAX_FOLDED_FACTORIAL: u32 = 170;

/// Single-operand operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnaryOp {
    /// `sin(x)`
    Sin,
    /// `cos(x)`
    Cos,
    /// `tan(x)`
    Tan,
    /// `asin(x)`
    Asin,
    /// `acos(x)`
    Acos,
    /// `atan(x)`
    Atan,
    /// `|x|`
    Abs,
    /// `x^(1/2)`
    Sqrt,
    /// `x!`
    Factorial,
    /// `exp(x)`
    Exp,
    /// `log(x)`
    Log,
}

impl UnaryOp {
    /// Every unary operator.
    pub const ALL: [UnaryOp; 11] = [
        UnaryOp::Sin,
        UnaryOp::Cos,
        UnaryOp::Tan,
        UnaryOp::Asin,
        UnaryOp::Acos,
        UnaryOp::Atan,
        UnaryOp::Abs,
        UnaryOp::Sqrt,
        UnaryOp::Factorial,
        UnaryOp::Exp,
        UnaryOp::Log,
    ];

    /// Applies the operator.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError`] when the operand is not supported in this mode.
    pub fn apply(self, arg: &Expr, mode: Evaluation) -> Result<Expr, ConstructError> {
        let func = match self {
            UnaryOp::Sqrt => return sqrt(arg, mode),
            UnaryOp::Sin => Function::Sin,
            UnaryOp::Cos => Function::Cos,
            UnaryOp::Tan => Function::Tan,
            UnaryOp::Asin => Function::Asin,
            UnaryOp::Acos => Function::Acos,
            UnaryOp::Atan => Function::Atan,
            UnaryOp::Abs => Function::Abs,
            UnaryOp::Factorial => Function::Factorial,
            UnaryOp::Exp => Function::Exp,
            UnaryOp::Log => Function::Log,
        };
        function(func, arg, mode)
    }
}

/// Two-operand operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BinaryOp {
    /// `a + b`
    Add,
    /// `a * b`
    Mul,
    /// `a ^ b`
    Pow,
    /// The exact rational `a / b` of two numbers.
    Rational,
    /// The `b`-th root of `a`.
    Root,
    /// The derivative of `a` with respect to the symbol `b`.
    Derivative,
}

impl BinaryOp {
    /// Every binary operator.
    pub const ALL: [BinaryOp; 6] = [
        BinaryOp::Add,
        BinaryOp::Mul,
        BinaryOp::Pow,
        BinaryOp::Rational,
        BinaryOp::Root,
        BinaryOp::Derivative,
    ];

    /// Applies the operator.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError`] when the operands are not supported in this mode.
    pub fn apply(self, lhs: &Expr, rhs: &Expr, mode: Evaluation) -> Result<Expr, ConstructError> {
        match self {
            BinaryOp::Add => Ok(add([lhs.clone(), rhs.clone()], mode)),
            BinaryOp::Mul => Ok(mul([lhs.clone(), rhs.clone()], mode)),
            BinaryOp::Pow => pow(lhs, rhs, mode),
            BinaryOp::Rational => rational(lhs, rhs, mode),
            BinaryOp::Root => root(lhs, rhs, mode),
            BinaryOp::Derivative => derivative(lhs, rhs, mode),
        }
    }
}

/// Three-operand operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TernaryOp {
    /// The limit of the first operand as the second (a symbol) approaches the third.
    Limit,
}

impl TernaryOp {
    /// Every ternary operator.
    pub const ALL: [TernaryOp; 1] = [TernaryOp::Limit];

    /// Applies the operator.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError`] when the operands are not supported in this mode.
    pub fn apply(
        self,
        first: &Expr,
        second: &Expr,
        third: &Expr,
        mode: Evaluation,
    ) -> Result<Expr, ConstructError> {
        match self {
            TernaryOp::Limit => limit(first, second, third, mode),
        }
    }
}

impl RelOp {
    /// Every relational operator.
    pub const ALL: [RelOp; 6] = [RelOp::Gt, RelOp::Ge, RelOp::Lt, RelOp::Le, RelOp::Eq, RelOp::Ne];

    /// Builds the relation `lhs op rhs`.
    ///
    /// Evaluated relations between numbers, and equalities between identical
    /// sides, collapse to a truth value.
    #[must_use]
    pub fn apply(self, lhs: &Expr, rhs: &Expr, mode: Evaluation) -> Expr {
        if mode == Evaluation::Evaluated {
            if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
                let ordering = a.to_rational().cmp(&b.to_rational());
                return Expr::boolean(match self {
                    RelOp::Gt => ordering.is_gt(),
                    RelOp::Ge => ordering.is_ge(),
                    RelOp::Lt => ordering.is_lt(),
                    RelOp::Le => ordering.is_le(),
                    RelOp::Eq => ordering.is_eq(),
                    RelOp::Ne => ordering.is_ne(),
                });
            }
            if lhs == rhs {
                match self {
                    RelOp::Eq => return Expr::boolean(true),
                    RelOp::Ne => return Expr::boolean(false),
                    _ => {}
                }
            }
        }
        Expr::from_node(ExprNode::Relation {
            op: self,
            lhs: lhs.clone(),
            rhs: rhs.clone(),
        })
    }
}

// === Builders ===

/// Builds a sum.
#[must_use]
pub fn add(args: impl IntoIterator<Item = Expr>, mode: Evaluation) -> Expr {
    let args: Vec<Expr> = args.into_iter().collect();
    match mode {
        Evaluation::Unevaluated => assoc(args, ExprNode::Add, || Expr::integer(0)),
        Evaluation::Evaluated => {
            let terms = flatten(args, |node| match node {
                ExprNode::Add(args) => Some(args),
                _ => None,
            });
            let folded = fold_numbers(terms, Number::checked_add, |n| n.is_exact_zero());
            assoc(folded, ExprNode::Add, || Expr::integer(0))
        }
    }
}

/// Builds a product.
#[must_use]
pub fn mul(args: impl IntoIterator<Item = Expr>, mode: Evaluation) -> Expr {
    let args: Vec<Expr> = args.into_iter().collect();
    match mode {
        Evaluation::Unevaluated => assoc(args, ExprNode::Mul, || Expr::integer(1)),
        Evaluation::Evaluated => {
            let factors = flatten(args, |node| match node {
                ExprNode::Mul(args) => Some(args),
                _ => None,
            });
            let folded = fold_numbers(factors, Number::checked_mul, |n| n.is_exact_one());
            if folded
                .iter()
                .any(|f| f.as_number().is_some_and(|n| n.is_exact_zero()))
            {
                return Expr::integer(0);
            }
            assoc(folded, ExprNode::Mul, || Expr::integer(1))
        }
    }
}

/// Builds `-expr` as the evaluated product `-1 * expr`.
#[must_use]
pub fn neg(expr: &Expr) -> Expr {
    mul([Expr::integer(-1), expr.clone()], Evaluation::Evaluated)
}

/// Builds a power.
///
/// # Errors
///
/// Evaluated construction rejects exact zero raised to a negative power.
pub fn pow(base: &Expr, exp: &Expr, mode: Evaluation) -> Result<Expr, ConstructError> {
    let node = || {
        Expr::from_node(ExprNode::Pow {
            base: base.clone(),
            exp: exp.clone(),
        })
    };
    if mode == Evaluation::Unevaluated {
        return Ok(node());
    }

    let base_num = base.as_number();
    let exp_num = exp.as_number();
    if exp_num.as_ref().is_some_and(Number::is_exact_zero) {
        return Ok(Expr::integer(1));
    }
    if exp_num.as_ref().is_some_and(Number::is_exact_one) {
        return Ok(base.clone());
    }
    if base_num.as_ref().is_some_and(Number::is_exact_one) {
        return Ok(Expr::integer(1));
    }

    if let (Some(Number::Exact(b)), Some(e)) =
        (&base_num, exp_num.as_ref().and_then(Number::as_integer))
    {
        let negative = DashuSigned::is_negative(&e);
        if b.is_zero() {
            return if negative {
                Err(ConstructError::unsupported("division by zero"))
            } else {
                Ok(Expr::integer(0))
            };
        }
        let magnitude = u32::try_from(if negative { -e } else { e }).ok();
        if let Some(k) = magnitude.filter(|k| *k <= MAX_FOLDED_EXPONENT) {
            let value = b.pow(k as usize);
            let value = if negative { RBig::ONE / value } else { value };
            return Ok(Expr::rational(value));
        }
    }

    Ok(node())
}

/// Builds a square root as `x^(1/2)`.
///
/// # Errors
///
/// Propagates errors from [`pow`].
pub fn sqrt(arg: &Expr, mode: Evaluation) -> Result<Expr, ConstructError> {
    let half = Expr::rational(RBig::from_parts(IBig::ONE, 2u8.into()));
    pow(arg, &half, mode)
}

/// Builds the `index`-th root of `radicand` as `radicand^(index^-1)`.
///
/// # Errors
///
/// Evaluated construction rejects an exact zero index.
pub fn root(radicand: &Expr, index: &Expr, mode: Evaluation) -> Result<Expr, ConstructError> {
    let reciprocal = pow(index, &Expr::integer(-1), mode)?;
    pow(radicand, &reciprocal, mode)
}

/// Builds the exact rational `numerator / denominator` of two numbers.
///
/// # Errors
///
/// There is no unevaluated form; evaluated construction needs two numbers and
/// a nonzero denominator.
pub fn rational(
    numerator: &Expr,
    denominator: &Expr,
    mode: Evaluation,
) -> Result<Expr, ConstructError> {
    if mode == Evaluation::Unevaluated {
        return Err(ConstructError::UnevaluatedUnsupported("rational"));
    }
    let (Some(p), Some(q)) = (numerator.as_number(), denominator.as_number()) else {
        return Err(ConstructError::unsupported("rational needs two numbers"));
    };
    let q = q.to_rational();
    if q.is_zero() {
        return Err(ConstructError::unsupported("zero denominator"));
    }
    Ok(Expr::rational(p.to_rational() / q))
}

/// Applies a named function.
///
/// # Errors
///
/// Evaluated construction rejects values where the function has a pole:
/// the factorial of a negative integer and the logarithm of zero.
pub fn function(func: Function, arg: &Expr, mode: Evaluation) -> Result<Expr, ConstructError> {
    let node = || {
        Expr::from_node(ExprNode::Function {
            func,
            arg: arg.clone(),
        })
    };
    if mode == Evaluation::Unevaluated {
        return Ok(node());
    }

    let Some(value) = arg.as_number() else {
        return Ok(node());
    };
    let zero = value.is_exact_zero();
    let one = value.is_exact_one();
    match func {
        Function::Sin | Function::Tan | Function::Asin | Function::Atan if zero => {
            Ok(Expr::integer(0))
        }
        Function::Cos | Function::Exp if zero => Ok(Expr::integer(1)),
        Function::Acos | Function::Log if one => Ok(Expr::integer(0)),
        Function::Log if zero => Err(ConstructError::unsupported("logarithm of zero")),
        Function::Abs => Ok(Expr::from_number(value.abs())),
        Function::Factorial => match value.as_integer() {
            Some(n) if DashuSigned::is_negative(&n) => {
                Err(ConstructError::unsupported("factorial of a negative integer"))
            }
            Some(n) => match u32::try_from(n) {
                Ok(k) if k <= MAX_FOLDED_FACTORIAL => {
                    let product = (2..=k).fold(IBig::ONE, |acc, i| acc * IBig::from(i));
                    Ok(Expr::rational(RBig::from(product)))
                }
                _ => Ok(node()),
            },
            None => Ok(node()),
        },
        _ => Ok(node()),
    }
}

/// Builds the derivative of `expr` with respect to the symbol `var`.
///
/// # Errors
///
/// Rejects a variable that is not a symbol, and evaluated differentiation of
/// relations.
pub fn derivative(expr: &Expr, var: &Expr, mode: Evaluation) -> Result<Expr, ConstructError> {
    let Some(name) = var.as_symbol() else {
        return Err(ConstructError::unsupported("derivative variable must be a symbol"));
    };
    match mode {
        Evaluation::Unevaluated => Ok(Expr::from_node(ExprNode::Derivative {
            expr: expr.clone(),
            var: var.clone(),
        })),
        Evaluation::Evaluated => differentiate(expr, name),
    }
}

/// Builds the limit of `expr` as the symbol `var` approaches `point`.
///
/// # Errors
///
/// Rejects a variable that is not a symbol. Evaluated construction only
/// succeeds when `expr` does not depend on `var`.
pub fn limit(
    expr: &Expr,
    var: &Expr,
    point: &Expr,
    mode: Evaluation,
) -> Result<Expr, ConstructError> {
    let Some(name) = var.as_symbol() else {
        return Err(ConstructError::unsupported("limit variable must be a symbol"));
    };
    match mode {
        Evaluation::Unevaluated => Ok(Expr::from_node(ExprNode::Limit {
            expr: expr.clone(),
            var: var.clone(),
            point: point.clone(),
        })),
        Evaluation::Evaluated if !expr.has_symbol(name) => Ok(expr.clone()),
        Evaluation::Evaluated => Err(ConstructError::unsupported("limit cannot be evaluated")),
    }
}

// === Helpers ===

fn assoc(mut args: Vec<Expr>, make: fn(Args) -> ExprNode, empty: fn() -> Expr) -> Expr {
    match args.len() {
        0 => empty(),
        1 => args.swap_remove(0),
        _ => {
            args.sort();
            Expr::from_node(make(SmallVec::from_vec(args)))
        }
    }
}

fn flatten(args: Vec<Expr>, nested: impl Fn(&ExprNode) -> Option<&Args>) -> Vec<Expr> {
    let mut out = Vec::with_capacity(args.len());
    let mut stack: Vec<Expr> = args.into_iter().rev().collect();
    while let Some(arg) = stack.pop() {
        match nested(arg.node()) {
            Some(inner) => stack.extend(inner.iter().rev().cloned()),
            None => out.push(arg),
        }
    }
    out
}

/// Folds the numeric operands with `combine`, keeping numbers that do not
/// combine exactly. The folded constant is dropped when `is_identity` holds.
fn fold_numbers(
    args: Vec<Expr>,
    combine: fn(&Number, &Number) -> Option<Number>,
    is_identity: fn(&Number) -> bool,
) -> Vec<Expr> {
    let mut rest = Vec::with_capacity(args.len());
    let mut constant: Option<Number> = None;
    for arg in args {
        let Some(n) = arg.as_number() else {
            rest.push(arg);
            continue;
        };
        constant = match constant {
            None => Some(n),
            Some(acc) => match combine(&acc, &n) {
                Some(folded) => Some(folded),
                None => {
                    rest.push(arg);
                    Some(acc)
                }
            },
        };
    }
    match constant {
        Some(c) if !(is_identity(&c) && !rest.is_empty()) => rest.push(Expr::from_number(c)),
        _ => {}
    }
    rest
}
