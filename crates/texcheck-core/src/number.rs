//! Numeric literals.
//!
//! Exact values are `dashu` integers and rationals. Floating-point literals
//! are decimal: a `dashu::IBig` mantissa scaled by a power of ten, so that
//! the digits a literal was built with are exactly the digits it prints.

use dashu::base::{Abs, Signed as DashuSigned};
use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::ConstructError;

/// A decimal floating-point literal `mantissa × 10^exponent`.
///
/// Invariant: the mantissa carries no trailing zeros, and zero is stored with
/// exponent 0. The precision (number of significant digits requested at
/// construction) is metadata and does not take part in equality.
#[derive(Clone)]
pub struct Float {
    mantissa: IBig,
    exponent: i64,
    precision: u32,
}

impl Float {
    /// Largest supported precision, in significant decimal digits.
    pub const MAX_PRECISION: u32 = 35;

    /// Builds a literal from a machine float rounded to `precision` significant digits.
    ///
    /// # Errors
    ///
    /// Fails for a precision outside `1..=MAX_PRECISION` and for non-finite values.
    pub fn from_f64(value: f64, precision: u32) -> Result<Self, ConstructError> {
        if !(1..=Self::MAX_PRECISION).contains(&precision) {
            return Err(ConstructError::Precision(precision));
        }
        if !value.is_finite() {
            return Err(ConstructError::NonFinite);
        }

        // `{:e}` prints exactly `precision` significant digits.
        let formatted = format!("{:.*e}", (precision - 1) as usize, value);
        let (digits, exponent) = formatted
            .split_once('e')
            .ok_or_else(|| ConstructError::unsupported(format!("malformed float {formatted}")))?;
        let exponent: i64 = exponent
            .parse()
            .map_err(|_| ConstructError::unsupported(format!("malformed float {formatted}")))?;
        let fraction_len = digits.split_once('.').map_or(0, |(_, f)| f.len());
        let mantissa: IBig = digits
            .replace('.', "")
            .parse()
            .map_err(|_| ConstructError::unsupported(format!("malformed float {formatted}")))?;

        Ok(Self::new(mantissa, exponent - fraction_len as i64, precision))
    }

    /// Builds a literal from decimal text such as `12.50` or `-0.015`.
    ///
    /// The precision is the number of significant digits in the text,
    /// clamped to the supported range.
    ///
    /// # Errors
    ///
    /// Fails when the text is not a plain decimal number.
    pub fn from_decimal_str(text: &str) -> Result<Self, ConstructError> {
        let invalid = || ConstructError::unsupported(format!("invalid decimal literal {text:?}"));
        let unsigned = text.strip_prefix('-').unwrap_or(text);
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if whole.is_empty() && fraction.is_empty()
            || !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let digits = format!("{whole}{fraction}");
        let significant = digits.trim_start_matches('0').len().max(1);
        let precision = u32::try_from(significant)
            .unwrap_or(Self::MAX_PRECISION)
            .min(Self::MAX_PRECISION);
        let mut mantissa: IBig = digits.parse().map_err(|_| invalid())?;
        if text.starts_with('-') {
            mantissa = -mantissa;
        }

        Ok(Self::new(mantissa, -(fraction.len() as i64), precision))
    }

    /// Builds a normalized literal from its parts.
    #[must_use]
    pub fn new(mut mantissa: IBig, mut exponent: i64, precision: u32) -> Self {
        if mantissa.is_zero() {
            exponent = 0;
        } else {
            let ten = IBig::from(10u8);
            while (&mantissa % &ten).is_zero() {
                mantissa = &mantissa / &ten;
                exponent += 1;
            }
        }
        Self {
            mantissa,
            exponent,
            precision: precision.clamp(1, Self::MAX_PRECISION),
        }
    }

    /// The digits of the literal, without trailing zeros.
    #[must_use]
    pub fn mantissa(&self) -> &IBig {
        &self.mantissa
    }

    /// The power of ten applied to the mantissa.
    #[must_use]
    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    /// The number of significant digits requested at construction.
    #[must_use]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns true if the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Returns true if the value is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.mantissa)
    }

    /// Returns the negated literal.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self::new(-self.mantissa.clone(), self.exponent, self.precision)
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self::new(self.mantissa.clone().abs(), self.exponent, self.precision)
    }

    /// Returns the exact rational value of the literal.
    #[must_use]
    pub fn to_rational(&self) -> RBig {
        if self.exponent >= 0 {
            RBig::from(&self.mantissa * pow10(self.exponent.unsigned_abs()))
        } else {
            RBig::from_parts(
                self.mantissa.clone(),
                UBig::from(10u8).pow(self.exponent.unsigned_abs() as usize),
            )
        }
    }

    /// Splits the literal into sign, significant digits and decimal exponent
    /// of the leading digit (the `e` of `d.ddd × 10^e`).
    #[must_use]
    pub fn scientific_parts(&self) -> (bool, String, i64) {
        let digits = self.mantissa.clone().abs().to_string();
        let leading = self.exponent + digits.len() as i64 - 1;
        (self.is_negative(), digits, leading)
    }

    /// Formats the value as a positional decimal (`120.0`, `0.015`).
    #[must_use]
    pub fn to_positional(&self) -> String {
        let digits = self.mantissa.clone().abs().to_string();
        let sign = if self.is_negative() { "-" } else { "" };
        if self.exponent >= 0 {
            let zeros = "0".repeat(self.exponent as usize);
            return format!("{sign}{digits}{zeros}.0");
        }
        let shift = self.exponent.unsigned_abs() as usize;
        if digits.len() > shift {
            let (whole, fraction) = digits.split_at(digits.len() - shift);
            format!("{sign}{whole}.{fraction}")
        } else {
            let zeros = "0".repeat(shift - digits.len());
            format!("{sign}0.{zeros}{digits}")
        }
    }

    fn add(&self, other: &Self) -> Self {
        let exponent = self.exponent.min(other.exponent);
        let lhs = &self.mantissa * pow10((self.exponent - exponent).unsigned_abs());
        let rhs = &other.mantissa * pow10((other.exponent - exponent).unsigned_abs());
        Self::new(lhs + rhs, exponent, self.precision.max(other.precision))
    }

    fn mul(&self, other: &Self) -> Self {
        Self::new(
            &self.mantissa * &other.mantissa,
            self.exponent + other.exponent,
            self.precision.max(other.precision),
        )
    }

    fn from_integer(value: &IBig, precision: u32) -> Self {
        Self::new(value.clone(), 0, precision)
    }
}

fn pow10(exponent: u64) -> IBig {
    IBig::from(10u8).pow(exponent as usize)
}

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.mantissa == other.mantissa && self.exponent == other.exponent
    }
}

impl Eq for Float {}

impl Hash for Float {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mantissa.hash(state);
        self.exponent.hash(state);
    }
}

impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Float {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_rational().cmp(&other.to_rational())
    }
}

impl fmt::Debug for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Float({}e{}, prec={})", self.mantissa, self.exponent, self.precision)
    }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (negative, digits, leading) = self.scientific_parts();
        if (-4..15).contains(&leading) {
            return f.write_str(&self.to_positional());
        }
        let sign = if negative { "-" } else { "" };
        let (first, rest) = digits.split_at(1);
        let rest = if rest.is_empty() { "0" } else { rest };
        write!(f, "{sign}{first}.{rest}e{leading:+}")
    }
}

/// A numeric value pulled out of an expression for folding.
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    /// An integer or rational.
    Exact(RBig),
    /// A decimal float literal.
    Float(Float),
}

impl Number {
    /// Returns true for an exact zero.
    #[must_use]
    pub fn is_exact_zero(&self) -> bool {
        matches!(self, Number::Exact(r) if r.is_zero())
    }

    /// Returns true for an exact one.
    #[must_use]
    pub fn is_exact_one(&self) -> bool {
        matches!(self, Number::Exact(r) if *r == RBig::ONE)
    }

    /// Returns the exact integer value, if this is an integer.
    #[must_use]
    pub fn as_integer(&self) -> Option<IBig> {
        match self {
            Number::Exact(r) if r.denominator().is_one() => Some(r.numerator().clone()),
            _ => None,
        }
    }

    /// Returns the exact rational value. Floats convert without rounding.
    #[must_use]
    pub fn to_rational(&self) -> RBig {
        match self {
            Number::Exact(r) => r.clone(),
            Number::Float(x) => x.to_rational(),
        }
    }

    /// Adds two numbers when the sum is representable without rounding.
    ///
    /// A float combines exactly with an integer or another float; a float and a
    /// non-integer rational do not fold.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Some(Number::Exact(a + b)),
            (Number::Float(a), Number::Float(b)) => Some(Number::Float(a.add(b))),
            (Number::Float(x), exact) | (exact, Number::Float(x)) => {
                let n = exact.as_integer()?;
                Some(Number::Float(x.add(&Float::from_integer(&n, x.precision()))))
            }
        }
    }

    /// Multiplies two numbers when the product is representable without rounding.
    #[must_use]
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => Some(Number::Exact(a * b)),
            (Number::Float(a), Number::Float(b)) => Some(Number::Float(a.mul(b))),
            (Number::Float(x), exact) | (exact, Number::Float(x)) => {
                let n = exact.as_integer()?;
                Some(Number::Float(x.mul(&Float::from_integer(&n, x.precision()))))
            }
        }
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        match self {
            Number::Exact(r) => Number::Exact(r.clone().abs()),
            Number::Float(x) => Number::Float(x.abs()),
        }
    }
}
