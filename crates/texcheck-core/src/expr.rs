//! Expression node types.
//!
//! An [`Expr`] is an immutable, reference-counted tree. Cloning is cheap and
//! two expressions compare equal when they are structurally identical; the
//! operands of sums and products are kept in canonical order, so equality does
//! not depend on the order they were supplied in.

use dashu::integer::IBig;
use dashu::rational::RBig;
use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::error::ConstructError;
use crate::number::{Float, Number};

/// Argument storage for sums and products.
pub type Args = SmallVec<[Expr; 4]>;

/// A single-argument function known to the library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Function {
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Inverse sine.
    Asin,
    /// Inverse cosine.
    Acos,
    /// Inverse tangent.
    Atan,
    /// Absolute value.
    Abs,
    /// Factorial.
    Factorial,
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Log,
}

impl Function {
    /// The function's name in string form.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Abs => "Abs",
            Function::Factorial => "factorial",
            Function::Exp => "exp",
            Function::Log => "log",
        }
    }

    /// Returns true for the trigonometric functions and their inverses.
    #[must_use]
    pub fn is_trigonometric(self) -> bool {
        matches!(
            self,
            Function::Sin
                | Function::Cos
                | Function::Tan
                | Function::Asin
                | Function::Acos
                | Function::Atan
        )
    }
}

/// A relational operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelOp {
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `=`
    Eq,
    /// `!=`
    Ne,
}

impl RelOp {
    /// The operator in string form.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
        }
    }
}

/// An expression node.
///
/// The variant order is also the canonical order used to sort the operands
/// of sums and products: numbers first, then symbols, then compound nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExprNode {
    // === Atoms ===
    /// An exact integer.
    Integer(IBig),

    /// An exact rational with denominator greater than one.
    Rational(RBig),

    /// A decimal float literal.
    Float(Float),

    /// A named variable.
    Symbol(String),

    /// A truth value, produced by evaluating a relation.
    Boolean(bool),

    // === Compound Expressions ===
    /// Sum of two or more expressions, in canonical order.
    Add(Args),

    /// Product of two or more expressions, in canonical order.
    Mul(Args),

    /// Power expression: base^exp.
    Pow {
        /// The base.
        base: Expr,
        /// The exponent.
        exp: Expr,
    },

    /// A function application.
    Function {
        /// The function.
        func: Function,
        /// Its argument.
        arg: Expr,
    },

    /// An unevaluated derivative `d/d var expr`. `var` is always a symbol.
    Derivative {
        /// The differentiated expression.
        expr: Expr,
        /// The variable of differentiation.
        var: Expr,
    },

    /// An unevaluated limit of `expr` as `var` approaches `point`.
    Limit {
        /// The expression.
        expr: Expr,
        /// The limit variable, always a symbol.
        var: Expr,
        /// The point approached.
        point: Expr,
    },

    /// A relation between two expressions.
    Relation {
        /// The operator.
        op: RelOp,
        /// Left-hand side.
        lhs: Expr,
        /// Right-hand side.
        rhs: Expr,
    },
}

/// An immutable symbolic expression.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Expr(Arc<ExprNode>);

impl Expr {
    pub(crate) fn from_node(node: ExprNode) -> Self {
        Self(Arc::new(node))
    }

    /// Returns the node at the root of this expression.
    #[must_use]
    pub fn node(&self) -> &ExprNode {
        &self.0
    }

    // === Atom constructors ===

    /// Creates a symbol.
    #[must_use]
    pub fn symbol(name: &str) -> Self {
        Self::from_node(ExprNode::Symbol(name.to_string()))
    }

    /// Creates an integer.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::from_node(ExprNode::Integer(IBig::from(value)))
    }

    /// Creates an exact rational; integral values become integers.
    #[must_use]
    pub fn rational(value: RBig) -> Self {
        if value.denominator().is_one() {
            Self::from_node(ExprNode::Integer(value.numerator().clone()))
        } else {
            Self::from_node(ExprNode::Rational(value))
        }
    }

    /// Creates a float literal from a machine float and a precision in digits.
    ///
    /// # Errors
    ///
    /// Fails when the precision is out of range or the value is not finite.
    pub fn float(value: f64, precision: u32) -> Result<Self, ConstructError> {
        Float::from_f64(value, precision).map(Self::from_float)
    }

    /// Wraps an existing float literal.
    #[must_use]
    pub fn from_float(value: Float) -> Self {
        Self::from_node(ExprNode::Float(value))
    }

    /// Creates a truth value.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::from_node(ExprNode::Boolean(value))
    }

    pub(crate) fn from_number(number: Number) -> Self {
        match number {
            Number::Exact(r) => Self::rational(r),
            Number::Float(x) => Self::from_float(x),
        }
    }

    // === Introspection ===

    /// Returns the numeric value if this is a number literal.
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self.node() {
            ExprNode::Integer(n) => Some(Number::Exact(RBig::from(n.clone()))),
            ExprNode::Rational(r) => Some(Number::Exact(r.clone())),
            ExprNode::Float(x) => Some(Number::Float(x.clone())),
            _ => None,
        }
    }

    /// Returns the name if this is a symbol.
    #[must_use]
    pub fn as_symbol(&self) -> Option<&str> {
        match self.node() {
            ExprNode::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Returns true if this node has no children.
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(
            self.node(),
            ExprNode::Integer(_)
                | ExprNode::Rational(_)
                | ExprNode::Float(_)
                | ExprNode::Symbol(_)
                | ExprNode::Boolean(_)
        )
    }

    /// Returns true if this is a number literal.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(
            self.node(),
            ExprNode::Integer(_) | ExprNode::Rational(_) | ExprNode::Float(_)
        )
    }

    /// Returns the children of this node.
    #[must_use]
    pub fn children(&self) -> Args {
        match self.node() {
            ExprNode::Integer(_)
            | ExprNode::Rational(_)
            | ExprNode::Float(_)
            | ExprNode::Symbol(_)
            | ExprNode::Boolean(_) => SmallVec::new(),
            ExprNode::Add(args) | ExprNode::Mul(args) => args.clone(),
            ExprNode::Pow { base, exp } => smallvec::smallvec![base.clone(), exp.clone()],
            ExprNode::Function { arg, .. } => smallvec::smallvec![arg.clone()],
            ExprNode::Derivative { expr, var } => smallvec::smallvec![expr.clone(), var.clone()],
            ExprNode::Limit { expr, var, point } => {
                smallvec::smallvec![expr.clone(), var.clone(), point.clone()]
            }
            ExprNode::Relation { lhs, rhs, .. } => smallvec::smallvec![lhs.clone(), rhs.clone()],
        }
    }

    /// Returns the set of leaves (numbers, symbols, truth values) in this expression.
    #[must_use]
    pub fn atoms(&self) -> BTreeSet<Expr> {
        let mut atoms = BTreeSet::new();
        let mut stack = vec![self.clone()];
        while let Some(expr) = stack.pop() {
            if expr.is_atom() {
                atoms.insert(expr);
            } else {
                stack.extend(expr.children());
            }
        }
        atoms
    }

    /// Returns true if the symbol `name` occurs anywhere in this expression.
    #[must_use]
    pub fn has_symbol(&self, name: &str) -> bool {
        match self.node() {
            ExprNode::Symbol(s) => s == name,
            _ => self.children().iter().any(|c| c.has_symbol(name)),
        }
    }

    /// Returns the nesting depth; atoms have depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Expr::depth).max().unwrap_or(0)
    }

    /// The capability categories this expression belongs to, most specific first.
    #[must_use]
    pub fn class_chain(&self) -> &'static [&'static str] {
        match self.node() {
            ExprNode::Integer(_) => &["Integer", "Rational", "Number", "Atom", "Expr"],
            ExprNode::Rational(_) => &["Rational", "Number", "Atom", "Expr"],
            ExprNode::Float(_) => &["Float", "Number", "Atom", "Expr"],
            ExprNode::Symbol(_) => &["Symbol", "Atom", "Expr"],
            ExprNode::Boolean(true) => &["True", "BooleanAtom", "Boolean", "Atom"],
            ExprNode::Boolean(false) => &["False", "BooleanAtom", "Boolean", "Atom"],
            ExprNode::Add(_) => &["Add", "AssocOp", "Expr"],
            ExprNode::Mul(_) => &["Mul", "AssocOp", "Expr"],
            ExprNode::Pow { .. } => &["Pow", "Expr"],
            ExprNode::Function { func, .. } => match func {
                Function::Sin => &["sin", "TrigonometricFunction", "Function", "Expr"],
                Function::Cos => &["cos", "TrigonometricFunction", "Function", "Expr"],
                Function::Tan => &["tan", "TrigonometricFunction", "Function", "Expr"],
                Function::Asin => &["asin", "InverseTrigonometricFunction", "Function", "Expr"],
                Function::Acos => &["acos", "InverseTrigonometricFunction", "Function", "Expr"],
                Function::Atan => &["atan", "InverseTrigonometricFunction", "Function", "Expr"],
                Function::Abs => &["Abs", "Function", "Expr"],
                Function::Factorial => &["factorial", "CombinatorialFunction", "Function", "Expr"],
                Function::Exp => &["exp", "ExpBase", "Function", "Expr"],
                Function::Log => &["log", "Function", "Expr"],
            },
            ExprNode::Derivative { .. } => &["Derivative", "Expr"],
            ExprNode::Limit { .. } => &["Limit", "Expr"],
            ExprNode::Relation { op, .. } => match op {
                RelOp::Gt => &["StrictGreaterThan", "Inequality", "Relational", "Boolean"],
                RelOp::Ge => &["GreaterThan", "Inequality", "Relational", "Boolean"],
                RelOp::Lt => &["StrictLessThan", "Inequality", "Relational", "Boolean"],
                RelOp::Le => &["LessThan", "Inequality", "Relational", "Boolean"],
                RelOp::Eq => &["Equality", "Relational", "Boolean"],
                RelOp::Ne => &["Unequality", "Relational", "Boolean"],
            },
        }
    }

    fn precedence(&self) -> u8 {
        match self.node() {
            ExprNode::Relation { .. } => PREC_RELATION,
            ExprNode::Add(_) => PREC_ADD,
            ExprNode::Mul(_) | ExprNode::Rational(_) => PREC_MUL,
            ExprNode::Integer(n) if n < &IBig::ZERO => PREC_ADD,
            ExprNode::Float(x) if x.is_negative() => PREC_ADD,
            ExprNode::Pow { .. } => PREC_POW,
            _ => PREC_ATOM,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min_prec: u8) -> fmt::Result {
        if self.precedence() < min_prec {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }

    fn fmt_joined(f: &mut fmt::Formatter<'_>, args: &[Expr], sep: &str, prec: u8) -> fmt::Result {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            arg.fmt_operand(f, prec)?;
        }
        Ok(())
    }
}

const PREC_RELATION: u8 = 0;
const PREC_ADD: u8 = 10;
const PREC_MUL: u8 = 20;
const PREC_POW: u8 = 30;
const PREC_ATOM: u8 = 40;

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.node(), f)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            ExprNode::Integer(n) => write!(f, "{n}"),
            ExprNode::Rational(r) => write!(f, "{}/{}", r.numerator(), r.denominator()),
            ExprNode::Float(x) => write!(f, "{x}"),
            ExprNode::Symbol(name) => f.write_str(name),
            ExprNode::Boolean(b) => f.write_str(if *b { "True" } else { "False" }),
            ExprNode::Add(args) => Self::fmt_joined(f, args, " + ", PREC_ADD + 1),
            ExprNode::Mul(args) => Self::fmt_joined(f, args, "*", PREC_MUL + 1),
            ExprNode::Pow { base, exp } => {
                base.fmt_operand(f, PREC_POW + 1)?;
                f.write_str("**")?;
                exp.fmt_operand(f, PREC_POW + 1)
            }
            ExprNode::Function { func, arg } => write!(f, "{}({arg})", func.name()),
            ExprNode::Derivative { expr, var } => write!(f, "Derivative({expr}, {var})"),
            ExprNode::Limit { expr, var, point } => write!(f, "Limit({expr}, {var}, {point})"),
            ExprNode::Relation { op: RelOp::Eq, lhs, rhs } => write!(f, "Eq({lhs}, {rhs})"),
            ExprNode::Relation { op: RelOp::Ne, lhs, rhs } => write!(f, "Ne({lhs}, {rhs})"),
            ExprNode::Relation { op, lhs, rhs } => {
                lhs.fmt_operand(f, PREC_ADD)?;
                write!(f, " {} ", op.symbol())?;
                rhs.fmt_operand(f, PREC_ADD)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_atom() {
        assert!(Expr::integer(42).is_atom());
        assert!(Expr::symbol("x").is_atom());
        assert!(Expr::boolean(true).is_atom());
    }

    #[test]
    fn test_symbols_compare_by_name() {
        assert_eq!(Expr::symbol("A"), Expr::symbol("A"));
        assert_ne!(Expr::symbol("A"), Expr::symbol("a"));
    }

    #[test]
    fn test_rational_normalizes_integers() {
        let four = RBig::from(IBig::from(4));
        assert_eq!(Expr::rational(four), Expr::integer(4));
    }

    #[test]
    fn test_class_chain_most_specific_first() {
        assert_eq!(Expr::symbol("A").class_chain(), &["Symbol", "Atom", "Expr"]);
        let x = Expr::float(2.5, 4).unwrap();
        assert_eq!(x.class_chain()[0], "Float");
        assert_eq!(x.to_string(), "2.5");
    }

    #[test]
    fn test_has_symbol_and_depth() {
        let x = Expr::symbol("x");
        assert!(x.has_symbol("x"));
        assert!(!x.has_symbol("y"));
        assert_eq!(x.depth(), 1);
    }
}
