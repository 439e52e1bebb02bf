//! Rendering expressions as LaTeX math markup.

use dashu::base::Signed as DashuSigned;
use dashu::integer::{IBig, UBig};
use texcheck_core::{Expr, ExprNode, Float, Function, RelOp};

use crate::error::PrintError;

/// Deepest expression the printer accepts.
pub const MAX_DEPTH: usize = 64;

/// Renders `expr` as LaTeX math markup.
///
/// # Errors
///
/// Fails for expressions nested deeper than [`MAX_DEPTH`] and for truth
/// values appearing inside a larger expression.
pub fn to_latex(expr: &Expr) -> Result<String, PrintError> {
    let depth = expr.depth();
    if depth > MAX_DEPTH {
        return Err(PrintError::TooDeep(depth));
    }
    Printer.print(expr, true)
}

struct Printer;

impl Printer {
    fn print(&self, expr: &Expr, top: bool) -> Result<String, PrintError> {
        Ok(match expr.node() {
            ExprNode::Integer(n) => n.to_string(),
            ExprNode::Rational(r) => {
                let p = r.numerator();
                if DashuSigned::is_negative(p) {
                    format!("- \\frac{{{}}}{{{}}}", -p.clone(), r.denominator())
                } else {
                    format!("\\frac{{{p}}}{{{}}}", r.denominator())
                }
            }
            ExprNode::Float(x) => float(x),
            ExprNode::Symbol(name) => name.clone(),
            ExprNode::Boolean(b) if top => {
                format!("\\text{{{}}}", if *b { "True" } else { "False" })
            }
            ExprNode::Boolean(_) => {
                return Err(PrintError::Unsupported("a truth value inside an expression".into()))
            }
            ExprNode::Add(terms) => {
                let mut out = String::new();
                for (i, term) in terms.iter().enumerate() {
                    let s = self.print(term, false)?;
                    match (i, s.strip_prefix('-')) {
                        (0, _) => out.push_str(&s),
                        (_, Some(rest)) => {
                            out.push_str(" - ");
                            out.push_str(rest.trim_start());
                        }
                        (_, None) => {
                            out.push_str(" + ");
                            out.push_str(&s);
                        }
                    }
                }
                out
            }
            ExprNode::Mul(factors) => self.print_mul(factors)?,
            ExprNode::Pow { base, exp } => self.print_pow(base, exp)?,
            ExprNode::Function { func, arg } => self.print_function(*func, arg, None)?,
            ExprNode::Derivative { expr, var } => {
                format!("\\frac{{d}}{{d {}}} {}", self.print(var, false)?, self.operand(expr)?)
            }
            ExprNode::Limit { expr, var, point } => format!(
                "\\lim_{{{} \\to {}}} {}",
                self.print(var, false)?,
                self.print(point, false)?,
                self.operand(expr)?
            ),
            ExprNode::Relation { op, lhs, rhs } => {
                let op = match op {
                    RelOp::Gt => ">",
                    RelOp::Ge => "\\geq",
                    RelOp::Lt => "<",
                    RelOp::Le => "\\leq",
                    RelOp::Eq => "=",
                    RelOp::Ne => "\\neq",
                };
                format!("{} {op} {}", self.print(lhs, false)?, self.print(rhs, false)?)
            }
        })
    }

    fn print_mul(&self, factors: &[Expr]) -> Result<String, PrintError> {
        let mut out = String::new();
        let mut rest = factors;
        if factors.len() > 1 && factors[0] == Expr::integer(-1) {
            out.push_str("- ");
            rest = &factors[1..];
        }
        for (i, factor) in rest.iter().enumerate() {
            let s = if needs_parens_in_product(factor, i == 0) {
                parens(&self.print(factor, false)?)
            } else {
                self.print(factor, false)?
            };
            if i > 0 {
                let numeric = s.starts_with(|c: char| c.is_ascii_digit());
                out.push_str(if numeric { " \\cdot " } else { " " });
            }
            out.push_str(&s);
        }
        Ok(out)
    }

    fn print_pow(&self, base: &Expr, exp: &Expr) -> Result<String, PrintError> {
        if let ExprNode::Rational(r) = exp.node() {
            if *r.numerator() == IBig::ONE {
                let radicand = self.print(base, false)?;
                return Ok(if *r.denominator() == UBig::from(2u8) {
                    format!("\\sqrt{{{radicand}}}")
                } else {
                    format!("\\sqrt[{}]{{{radicand}}}", r.denominator())
                });
            }
        }
        if let ExprNode::Pow { base: index, exp: inv } = exp.node() {
            if *inv == Expr::integer(-1) {
                return Ok(format!(
                    "\\sqrt[{}]{{{}}}",
                    self.print(index, false)?,
                    self.print(base, false)?
                ));
            }
        }
        if *exp == Expr::integer(-1) {
            return Ok(format!("\\frac{{1}}{{{}}}", self.print(base, false)?));
        }
        if let ExprNode::Function { func, arg } = base.node() {
            if func.is_trigonometric() || *func == Function::Log {
                return self.print_function(*func, arg, Some(exp));
            }
        }

        let base = if needs_parens_as_base(base) {
            parens(&self.print(base, false)?)
        } else {
            self.print(base, false)?
        };
        Ok(format!("{base}^{{{}}}", self.print(exp, false)?))
    }

    fn print_function(
        &self,
        func: Function,
        arg: &Expr,
        power: Option<&Expr>,
    ) -> Result<String, PrintError> {
        let inner = self.print(arg, false)?;
        let name = match func {
            Function::Sin => "\\sin",
            Function::Cos => "\\cos",
            Function::Tan => "\\tan",
            Function::Asin => "\\operatorname{asin}",
            Function::Acos => "\\operatorname{acos}",
            Function::Atan => "\\operatorname{atan}",
            Function::Log => "\\log",
            Function::Abs => return Ok(format!("\\left|{{{inner}}}\\right|")),
            Function::Exp => return Ok(format!("e^{{{inner}}}")),
            Function::Factorial if is_plain_atom(arg) => return Ok(format!("{inner}!")),
            Function::Factorial => return Ok(format!("{}!", parens(&inner))),
        };
        let power = match power {
            Some(p) => format!("^{{{}}}", self.print(p, false)?),
            None => String::new(),
        };
        Ok(format!("{name}{power}{{\\left({inner} \\right)}}"))
    }

    /// Prints the operand of a derivative or limit.
    fn operand(&self, expr: &Expr) -> Result<String, PrintError> {
        let s = self.print(expr, false)?;
        let bare = is_plain_atom(expr)
            || matches!(expr.node(), ExprNode::Function { func, .. }
                if !matches!(func, Function::Factorial | Function::Exp));
        Ok(if bare { s } else { parens(&s) })
    }
}

fn float(x: &Float) -> String {
    let (negative, digits, leading) = x.scientific_parts();
    if (-4..15).contains(&leading) {
        return x.to_positional();
    }
    let sign = if negative { "-" } else { "" };
    let (first, rest) = digits.split_at(1);
    let rest = if rest.is_empty() { "0" } else { rest };
    format!("{sign}{first}.{rest} \\cdot 10^{{{leading}}}")
}

fn parens(s: &str) -> String {
    format!("\\left({s}\\right)")
}

fn is_negative_number(expr: &Expr) -> bool {
    match expr.node() {
        ExprNode::Integer(n) => DashuSigned::is_negative(n),
        ExprNode::Rational(r) => DashuSigned::is_negative(r.numerator()),
        ExprNode::Float(x) => x.is_negative(),
        _ => false,
    }
}

/// A symbol or a non-negative number that prints without operators.
fn is_plain_atom(expr: &Expr) -> bool {
    match expr.node() {
        ExprNode::Symbol(_) | ExprNode::Integer(_) => !is_negative_number(expr),
        ExprNode::Float(x) => !x.is_negative() && !float(x).contains("\\cdot"),
        _ => false,
    }
}

fn needs_parens_in_product(factor: &Expr, first: bool) -> bool {
    match factor.node() {
        ExprNode::Add(_) | ExprNode::Relation { .. } => true,
        ExprNode::Derivative { .. } | ExprNode::Limit { .. } => true,
        _ => !first && is_negative_number(factor),
    }
}

fn needs_parens_as_base(base: &Expr) -> bool {
    match base.node() {
        ExprNode::Symbol(_) | ExprNode::Integer(_) | ExprNode::Float(_) => !is_plain_atom(base),
        ExprNode::Function { func, .. } => *func == Function::Exp,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texcheck_core::construct::{add, mul, pow};
    use texcheck_core::{BinaryOp, Evaluation, TernaryOp, UnaryOp};

    const UNEVAL: Evaluation = Evaluation::Unevaluated;

    fn sym(name: &str) -> Expr {
        Expr::symbol(name)
    }

    #[test]
    fn test_atoms() {
        assert_eq!(to_latex(&sym("A")).unwrap(), "A");
        assert_eq!(to_latex(&Expr::integer(-3)).unwrap(), "-3");
        assert_eq!(to_latex(&Expr::float(120.0, 5).unwrap()).unwrap(), "120.0");
        assert_eq!(to_latex(&Expr::float(1.5e20, 2).unwrap()).unwrap(), "1.5 \\cdot 10^{20}");
        assert_eq!(to_latex(&Expr::float(-2.0e-7, 1).unwrap()).unwrap(), "-2.0 \\cdot 10^{-7}");
    }

    #[test]
    fn test_functions() {
        let a = sym("A");
        let sin = UnaryOp::Sin.apply(&a, UNEVAL).unwrap();
        assert_eq!(to_latex(&sin).unwrap(), "\\sin{\\left(A \\right)}");

        let asin = UnaryOp::Asin.apply(&a, UNEVAL).unwrap();
        assert_eq!(to_latex(&asin).unwrap(), "\\operatorname{asin}{\\left(A \\right)}");

        let sin_squared = pow(&sin, &Expr::integer(2), UNEVAL).unwrap();
        assert_eq!(to_latex(&sin_squared).unwrap(), "\\sin^{2}{\\left(A \\right)}");

        let abs = UnaryOp::Abs.apply(&a, UNEVAL).unwrap();
        assert_eq!(to_latex(&abs).unwrap(), "\\left|{A}\\right|");

        let fact = UnaryOp::Factorial.apply(&a, UNEVAL).unwrap();
        assert_eq!(to_latex(&fact).unwrap(), "A!");

        let exp = UnaryOp::Exp.apply(&a, UNEVAL).unwrap();
        assert_eq!(to_latex(&exp).unwrap(), "e^{A}");
    }

    #[test]
    fn test_roots_and_fractions() {
        let a = sym("A");
        let n = sym("n");
        assert_eq!(to_latex(&UnaryOp::Sqrt.apply(&a, UNEVAL).unwrap()).unwrap(), "\\sqrt{A}");
        assert_eq!(
            to_latex(&BinaryOp::Root.apply(&a, &n, UNEVAL).unwrap()).unwrap(),
            "\\sqrt[n]{A}"
        );
        assert_eq!(
            to_latex(&pow(&a, &Expr::integer(-1), UNEVAL).unwrap()).unwrap(),
            "\\frac{1}{A}"
        );
        let half = BinaryOp::Rational
            .apply(&Expr::integer(-1), &Expr::integer(2), Evaluation::Evaluated)
            .unwrap();
        assert_eq!(to_latex(&half).unwrap(), "- \\frac{1}{2}");
    }

    #[test]
    fn test_sums_and_products() {
        let a = sym("A");
        let b = sym("B");
        let sum = add([a.clone(), Expr::integer(-2)], UNEVAL);
        assert_eq!(to_latex(&sum).unwrap(), "-2 + A");

        let neg = mul([Expr::integer(-1), a.clone()], UNEVAL);
        let diff = add([b.clone(), neg], UNEVAL);
        assert_eq!(to_latex(&diff).unwrap(), "B - A");

        let product = mul([add([a.clone(), b.clone()], UNEVAL), a.clone()], UNEVAL);
        assert_eq!(to_latex(&product).unwrap(), "A \\left(A + B\\right)");

        let numbers = mul([Expr::integer(2), Expr::integer(3)], UNEVAL);
        assert_eq!(to_latex(&numbers).unwrap(), "2 \\cdot 3");
    }

    #[test]
    fn test_calculus_and_relations() {
        let a = sym("A");
        let b = sym("B");
        let d = BinaryOp::Derivative.apply(&b, &a, UNEVAL).unwrap();
        assert_eq!(to_latex(&d).unwrap(), "\\frac{d}{d A} B");

        let lim = TernaryOp::Limit
            .apply(&add([a.clone(), b.clone()], UNEVAL), &a, &b, UNEVAL)
            .unwrap();
        assert_eq!(to_latex(&lim).unwrap(), "\\lim_{A \\to B} \\left(A + B\\right)");

        let rel = RelOp::Ge.apply(&a, &b, UNEVAL);
        assert_eq!(to_latex(&rel).unwrap(), "A \\geq B");
    }

    #[test]
    fn test_unprintable() {
        let nested = add([Expr::boolean(true), sym("A")], UNEVAL);
        assert!(matches!(to_latex(&nested), Err(PrintError::Unsupported(_))));
        assert_eq!(to_latex(&Expr::boolean(true)).unwrap(), "\\text{True}");

        let mut deep = sym("A");
        for _ in 0..MAX_DEPTH {
            deep = UnaryOp::Abs.apply(&deep, UNEVAL).unwrap();
        }
        assert_eq!(to_latex(&deep), Err(PrintError::TooDeep(MAX_DEPTH + 1)));
    }
}
