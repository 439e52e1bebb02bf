//! Recursive-descent parser for math-mode markup.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! relation := expr (relop expr)?
//! expr     := term (('+' | '-') term)*
//! term     := unary (('*' | \cdot | \times | '/') unary | power)*
//! unary    := '-' unary | power
//! power    := postfix ('^' script)?
//! postfix  := primary '!'*
//! ```
//!
//! Arithmetic is combined with evaluating construction. Derivatives and limits
//! are kept unevaluated.

use dashu::integer::IBig;
use dashu::rational::RBig;
use texcheck_core::construct::{self, add, mul, neg, pow};
use texcheck_core::{Evaluation, Expr, Float, Function, RelOp};

use crate::error::ParseError;
use crate::lexer::{tokenize, Tok, Token};

const EVAL: Evaluation = Evaluation::Evaluated;

/// Parses math-mode markup into an expression.
///
/// # Errors
///
/// Returns a [`ParseError`] for markup outside the supported grammar, and for
/// operands the expression library refuses to combine.
pub fn parse_latex(input: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser {
        tokens: tokenize(input)?,
        pos: 0,
    };
    let expr = parser.relation()?;
    match parser.peek() {
        None => Ok(expr),
        Some(_) => Err(parser.unexpected()),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Tok> {
        self.tokens.get(self.pos + ahead).map(|t| &t.tok)
    }

    fn advance(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).map(|t| t.tok.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn at_command(&self, name: &str) -> bool {
        matches!(self.peek(), Some(Tok::Command(c)) if c == name)
    }

    fn unexpected(&self) -> ParseError {
        match self.tokens.get(self.pos) {
            Some(t) => ParseError::UnexpectedToken {
                found: t.tok.to_string(),
                offset: t.offset,
            },
            None => ParseError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, tok: &Tok) -> Result<(), ParseError> {
        if self.peek() == Some(tok) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_command(&mut self, name: &str) -> Result<(), ParseError> {
        if self.at_command(name) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn relation(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.expr()?;
        let op = match self.peek() {
            Some(Tok::Gt) => RelOp::Gt,
            Some(Tok::Lt) => RelOp::Lt,
            Some(Tok::Eq) => RelOp::Eq,
            Some(Tok::Command(c)) => match c.as_str() {
                "geq" | "ge" => RelOp::Ge,
                "leq" | "le" => RelOp::Le,
                "neq" | "ne" => RelOp::Ne,
                _ => return Ok(lhs),
            },
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.expr()?;
        Ok(op.apply(&lhs, &rhs, EVAL))
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Tok::Plus) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    acc = add([acc, rhs], EVAL);
                }
                Some(Tok::Minus) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    acc = add([acc, neg(&rhs)], EVAL);
                }
                _ => return Ok(acc),
            }
        }
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut acc = self.unary()?;
        loop {
            let explicit = matches!(self.peek(), Some(Tok::Star))
                || self.at_command("cdot")
                || self.at_command("times");
            if explicit {
                self.pos += 1;
                let rhs = self.unary()?;
                acc = mul([acc, rhs], EVAL);
            } else if self.peek() == Some(&Tok::Slash) {
                self.pos += 1;
                let rhs = self.unary()?;
                acc = mul([acc, pow(&rhs, &Expr::integer(-1), EVAL)?], EVAL);
            } else if self.starts_primary() {
                let rhs = self.power()?;
                acc = mul([acc, rhs], EVAL);
            } else {
                return Ok(acc);
            }
        }
    }

    /// Whether the next token can begin an implicitly multiplied factor.
    fn starts_primary(&self) -> bool {
        match self.peek() {
            Some(Tok::Number(_) | Tok::Letter(_) | Tok::LParen | Tok::LBrace) => true,
            Some(Tok::Command(c)) => {
                matches!(c.as_str(), "frac" | "sqrt" | "left" | "lim" | "text" | "operatorname")
                    || function_command(c).is_some()
            }
            _ => false,
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.peek() == Some(&Tok::Minus) {
            self.pos += 1;
            return Ok(neg(&self.unary()?));
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.postfix()?;
        if self.peek() == Some(&Tok::Caret) {
            self.pos += 1;
            let exp = self.script()?;
            return Ok(pow(&base, &exp, EVAL)?);
        }
        Ok(base)
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        while self.peek() == Some(&Tok::Bang) {
            self.pos += 1;
            expr = construct::function(Function::Factorial, &expr, EVAL)?;
        }
        Ok(expr)
    }

    /// A superscript: a braced group or a single token.
    fn script(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Some(Tok::LBrace) => self.group(),
            Some(Tok::Minus) => {
                self.pos += 1;
                Ok(neg(&self.script()?))
            }
            _ => self.primary(),
        }
    }

    fn group(&mut self) -> Result<Expr, ParseError> {
        self.expect(&Tok::LBrace)?;
        let inner = self.relation()?;
        self.expect(&Tok::RBrace)?;
        Ok(inner)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let Some(tok) = self.advance() else {
            return Err(ParseError::UnexpectedEnd);
        };
        match tok {
            Tok::Number(text) => self.number(&text),
            Tok::Letter('e') if self.peek() == Some(&Tok::Caret) => {
                self.pos += 1;
                let arg = self.script()?;
                Ok(construct::function(Function::Exp, &arg, EVAL)?)
            }
            Tok::Letter(c) => Ok(Expr::symbol(&c.to_string())),
            Tok::LParen => {
                let inner = self.relation()?;
                self.expect(&Tok::RParen)?;
                Ok(inner)
            }
            Tok::LBrace => {
                let inner = self.relation()?;
                self.expect(&Tok::RBrace)?;
                Ok(inner)
            }
            Tok::Pipe => {
                let inner = self.relation()?;
                self.expect(&Tok::Pipe)?;
                Ok(construct::function(Function::Abs, &inner, EVAL)?)
            }
            Tok::Command(name) => self.command(&name),
            _ => {
                self.pos -= 1;
                Err(self.unexpected())
            }
        }
    }

    /// A numeric literal, including the `d.ddd \cdot 10^{e}` scientific form.
    fn number(&mut self, text: &str) -> Result<Expr, ParseError> {
        if !text.contains('.') {
            let value: IBig = text
                .parse()
                .map_err(|_| ParseError::InvalidNumber(text.to_string()))?;
            return Ok(Expr::rational(RBig::from(value)));
        }

        let x = Float::from_decimal_str(text)
            .map_err(|_| ParseError::InvalidNumber(text.to_string()))?;
        let Some(shift) = self.scientific_exponent()? else {
            return Ok(Expr::from_float(x));
        };
        Ok(Expr::from_float(Float::new(
            x.mantissa().clone(),
            x.exponent() + shift,
            x.precision(),
        )))
    }

    /// Consumes a trailing `\cdot 10^{e}` and returns `e`.
    fn scientific_exponent(&mut self) -> Result<Option<i64>, ParseError> {
        let is_ten = matches!(self.peek_at(1), Some(Tok::Number(n)) if n == "10");
        if !(self.at_command("cdot") && is_ten && self.peek_at(2) == Some(&Tok::Caret)) {
            return Ok(None);
        }
        self.pos += 3;
        let braced = self.peek() == Some(&Tok::LBrace);
        if braced {
            self.pos += 1;
        }
        let negative = self.peek() == Some(&Tok::Minus);
        if negative {
            self.pos += 1;
        }
        let digits = match self.advance() {
            Some(Tok::Number(n)) => n,
            Some(_) => {
                self.pos -= 1;
                return Err(self.unexpected());
            }
            None => return Err(ParseError::UnexpectedEnd),
        };
        let magnitude: i64 = digits.parse().map_err(|_| ParseError::InvalidNumber(digits.clone()))?;
        if braced {
            self.expect(&Tok::RBrace)?;
        }
        Ok(Some(if negative { -magnitude } else { magnitude }))
    }

    fn command(&mut self, name: &str) -> Result<Expr, ParseError> {
        if let Some(func) = function_command(name) {
            return self.function_call(func, name);
        }
        match name {
            "left" => self.delimited(),
            "frac" => self.fraction(),
            "sqrt" => {
                let index = if self.peek() == Some(&Tok::LBracket) {
                    self.pos += 1;
                    let index = self.relation()?;
                    self.expect(&Tok::RBracket)?;
                    Some(index)
                } else {
                    None
                };
                let radicand = self.group()?;
                Ok(match index {
                    Some(n) => construct::root(&radicand, &n, EVAL)?,
                    None => construct::sqrt(&radicand, EVAL)?,
                })
            }
            "lim" => {
                self.expect(&Tok::Underscore)?;
                self.expect(&Tok::LBrace)?;
                let var = self.primary()?;
                self.expect_command("to")?;
                let point = self.expr()?;
                self.expect(&Tok::RBrace)?;
                let body = self.power()?;
                Ok(construct::limit(&body, &var, &point, Evaluation::Unevaluated)?)
            }
            "text" => match self.word()?.as_str() {
                "True" => Ok(Expr::boolean(true)),
                "False" => Ok(Expr::boolean(false)),
                other => Err(ParseError::UnknownCommand(format!("text{{{other}}}"))),
            },
            "operatorname" => {
                let word = self.word()?;
                match operator_name(&word) {
                    Some(func) => self.function_call(func, &word),
                    None => Err(ParseError::UnknownCommand(format!("operatorname{{{word}}}"))),
                }
            }
            _ => Err(ParseError::UnknownCommand(name.to_string())),
        }
    }

    /// The body of `\left( .. \right)` or `\left| .. \right|`.
    fn delimited(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            Some(Tok::LParen) => {
                let inner = self.relation()?;
                self.expect_command("right")?;
                self.expect(&Tok::RParen)?;
                Ok(inner)
            }
            Some(Tok::Pipe) => {
                let inner = self.relation()?;
                self.expect_command("right")?;
                self.expect(&Tok::Pipe)?;
                Ok(construct::function(Function::Abs, &inner, EVAL)?)
            }
            Some(_) => {
                self.pos -= 1;
                Err(self.unexpected())
            }
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    /// `\frac{num}{den}`, or `\frac{d}{d x} body` for a derivative.
    fn fraction(&mut self) -> Result<Expr, ParseError> {
        let derivative = [
            Tok::LBrace,
            Tok::Letter('d'),
            Tok::RBrace,
            Tok::LBrace,
            Tok::Letter('d'),
        ]
        .iter()
        .enumerate()
        .all(|(i, tok)| self.peek_at(i) == Some(tok))
            && matches!(self.peek_at(5), Some(Tok::Letter(_)))
            && self.peek_at(6) == Some(&Tok::RBrace);

        if derivative {
            self.pos += 5;
            let var = self.primary()?;
            self.expect(&Tok::RBrace)?;
            let body = self.power()?;
            return Ok(construct::derivative(&body, &var, Evaluation::Unevaluated)?);
        }

        let numerator = self.group()?;
        let denominator = self.group()?;
        let reciprocal = pow(&denominator, &Expr::integer(-1), EVAL)?;
        Ok(mul([numerator, reciprocal], EVAL))
    }

    fn function_call(&mut self, func: Function, name: &str) -> Result<Expr, ParseError> {
        let power = if self.peek() == Some(&Tok::Caret) {
            self.pos += 1;
            Some(self.script()?)
        } else {
            None
        };

        let arg = match self.peek() {
            Some(Tok::LParen) => {
                self.pos += 1;
                let arg = self.relation()?;
                self.expect(&Tok::RParen)?;
                arg
            }
            Some(Tok::Command(c)) if c == "left" && self.peek_at(1) == Some(&Tok::LParen) => {
                self.pos += 1;
                self.delimited()?
            }
            found => {
                return Err(ParseError::ExpectedFunctionArgument {
                    function: name.to_string(),
                    found: found.map_or_else(|| "end of input".to_string(), ToString::to_string),
                })
            }
        };

        let applied = construct::function(func, &arg, EVAL)?;
        match power {
            Some(p) => Ok(pow(&applied, &p, EVAL)?),
            None => Ok(applied),
        }
    }

    /// The letters of a braced word such as `{True}`.
    fn word(&mut self) -> Result<String, ParseError> {
        self.expect(&Tok::LBrace)?;
        let mut word = String::new();
        while let Some(Tok::Letter(c)) = self.peek() {
            word.push(*c);
            self.pos += 1;
        }
        self.expect(&Tok::RBrace)?;
        Ok(word)
    }
}

fn function_command(name: &str) -> Option<Function> {
    Some(match name {
        "sin" => Function::Sin,
        "cos" => Function::Cos,
        "tan" => Function::Tan,
        "arcsin" => Function::Asin,
        "arccos" => Function::Acos,
        "arctan" => Function::Atan,
        "log" | "ln" => Function::Log,
        "exp" => Function::Exp,
        _ => return None,
    })
}

fn operator_name(name: &str) -> Option<Function> {
    match name {
        "asin" => Some(Function::Asin),
        "acos" => Some(Function::Acos),
        "atan" => Some(Function::Atan),
        other => function_command(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texcheck_core::{BinaryOp, UnaryOp};

    fn sym(name: &str) -> Expr {
        Expr::symbol(name)
    }

    #[test]
    fn test_symbol() {
        assert_eq!(parse_latex("A").unwrap(), sym("A"));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_latex("42").unwrap(), Expr::integer(42));
        assert_eq!(parse_latex("-3").unwrap(), Expr::integer(-3));
        assert_eq!(parse_latex("120.0").unwrap(), Expr::float(120.0, 4).unwrap());
        assert_eq!(
            parse_latex("1.5 \\cdot 10^{20}").unwrap(),
            Expr::float(1.5e20, 2).unwrap()
        );
        assert_eq!(
            parse_latex("-2.0 \\cdot 10^{-7}").unwrap(),
            Expr::float(-2.0e-7, 2).unwrap()
        );
        assert_eq!(parse_latex("\\frac{1}{2}").unwrap().class_chain()[0], "Rational");
    }

    #[test]
    fn test_arithmetic_folds() {
        assert_eq!(parse_latex("2 \\cdot 3").unwrap(), Expr::integer(6));
        assert_eq!(parse_latex("1 + 2 + x").unwrap(), add([Expr::integer(3), sym("x")], EVAL));
        assert_eq!(
            parse_latex("B - A").unwrap(),
            add([sym("B"), mul([Expr::integer(-1), sym("A")], EVAL)], EVAL)
        );
        assert_eq!(
            parse_latex("A \\left(A + B\\right)").unwrap(),
            mul([sym("A"), add([sym("A"), sym("B")], EVAL)], EVAL)
        );
    }

    #[test]
    fn test_powers_and_roots() {
        let a = sym("A");
        assert_eq!(parse_latex("A^{2}").unwrap(), pow(&a, &Expr::integer(2), EVAL).unwrap());
        assert_eq!(parse_latex("\\sqrt{A}").unwrap(), UnaryOp::Sqrt.apply(&a, EVAL).unwrap());
        assert_eq!(
            parse_latex("\\sqrt[n]{A}").unwrap(),
            BinaryOp::Root.apply(&a, &sym("n"), EVAL).unwrap()
        );
        assert_eq!(
            parse_latex("\\frac{1}{A}").unwrap(),
            pow(&a, &Expr::integer(-1), EVAL).unwrap()
        );
        assert_eq!(parse_latex("e^{A}").unwrap(), UnaryOp::Exp.apply(&a, EVAL).unwrap());
        assert_eq!(
            parse_latex("\\left|{A}\\right|").unwrap(),
            UnaryOp::Abs.apply(&a, EVAL).unwrap()
        );
        assert_eq!(parse_latex("A!").unwrap(), UnaryOp::Factorial.apply(&a, EVAL).unwrap());
    }

    #[test]
    fn test_parenthesized_function_calls() {
        let a = sym("A");
        assert_eq!(parse_latex("\\sin(A)").unwrap(), UnaryOp::Sin.apply(&a, EVAL).unwrap());
        assert_eq!(
            parse_latex("\\cos\\left(A\\right)").unwrap(),
            UnaryOp::Cos.apply(&a, EVAL).unwrap()
        );
        assert_eq!(parse_latex("\\sin(0)").unwrap(), Expr::integer(0));
    }

    #[test]
    fn test_braced_function_argument_is_rejected() {
        let err = parse_latex("\\sin{\\left(A \\right)}").unwrap_err();
        assert_eq!(
            err,
            ParseError::ExpectedFunctionArgument {
                function: "sin".into(),
                found: "`{`".into(),
            }
        );
    }

    #[test]
    fn test_calculus_is_unevaluated() {
        let a = sym("A");
        let b = sym("B");
        assert_eq!(
            parse_latex("\\frac{d}{d A} B").unwrap(),
            BinaryOp::Derivative.apply(&b, &a, Evaluation::Unevaluated).unwrap()
        );
        let lim = parse_latex("\\lim_{A \\to B} A").unwrap();
        assert_eq!(lim.class_chain()[0], "Limit");
    }

    #[test]
    fn test_relations() {
        let a = sym("A");
        let b = sym("B");
        assert_eq!(parse_latex("A \\geq B").unwrap(), RelOp::Ge.apply(&a, &b, EVAL));
        assert_eq!(parse_latex("1 < 2").unwrap(), Expr::boolean(true));
        assert_eq!(parse_latex("\\text{False}").unwrap(), Expr::boolean(false));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_latex(""), Err(ParseError::UnexpectedEnd));
        assert_eq!(parse_latex("A +"), Err(ParseError::UnexpectedEnd));
        assert_eq!(parse_latex("\\foo"), Err(ParseError::UnknownCommand("foo".into())));
        assert!(matches!(parse_latex("A )"), Err(ParseError::UnexpectedToken { offset: 2, .. })));
        assert!(matches!(parse_latex("\\frac{1}{0}"), Err(ParseError::Construct(_))));
    }
}
