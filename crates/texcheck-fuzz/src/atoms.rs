//! Leaf generators: symbols and float literals.

use proptest::prelude::*;
use texcheck_core::{Expr, Float};
use tracing::debug;

/// Highest precision drawn for float literals, one below the library ceiling.
pub const MAX_DRAW_PRECISION: u32 = Float::MAX_PRECISION - 1;

/// Single-letter symbols, `[a-zA-Z]`.
pub fn symbols() -> impl Strategy<Value = Expr> {
    "[a-zA-Z]".prop_map(|name| Expr::symbol(&name))
}

/// Float literals from arbitrary machine floats at a random precision.
///
/// Draws the library refuses (NaN, infinities) are rejected.
pub fn floats() -> impl Strategy<Value = Expr> {
    (any::<f64>(), 1..=MAX_DRAW_PRECISION)
        .prop_filter_map("unsupported float literal", |(value, precision)| {
            float_atom(value, precision)
        })
}

/// Builds a float literal, or `None` when the library rejects the inputs.
#[must_use]
pub fn float_atom(value: f64, precision: u32) -> Option<Expr> {
    match Expr::float(value, precision) {
        Ok(expr) => Some(expr),
        Err(err) => {
            debug!(value, precision, reason = %err, "float literal rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_precision_is_rejected() {
        assert!(float_atom(1.5, 0).is_none());
        assert!(float_atom(1.5, Float::MAX_PRECISION + 1).is_none());
        assert!(float_atom(f64::NAN, 3).is_none());
        assert!(float_atom(1.5, MAX_DRAW_PRECISION).is_some());
    }
}
