//! Property-based tests for expression construction.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::construct::{add, mul};
    use crate::{BinaryOp, Evaluation, Expr, Float, RelOp};

    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    fn symbol() -> impl Strategy<Value = Expr> {
        "[a-zA-Z]".prop_map(|name| Expr::symbol(&name))
    }

    fn mode() -> impl Strategy<Value = Evaluation> {
        prop_oneof![Just(Evaluation::Unevaluated), Just(Evaluation::Evaluated)]
    }

    proptest! {
        #[test]
        fn sum_is_commutative(a in symbol(), b in symbol(), mode in mode()) {
            prop_assert_eq!(add([a.clone(), b.clone()], mode), add([b, a], mode));
        }

        #[test]
        fn product_is_commutative(a in symbol(), b in symbol(), mode in mode()) {
            prop_assert_eq!(mul([a.clone(), b.clone()], mode), mul([b, a], mode));
        }

        #[test]
        fn evaluated_sum_matches_integer_addition(a in small_int(), b in small_int()) {
            let sum = add([Expr::integer(a), Expr::integer(b)], Evaluation::Evaluated);
            prop_assert_eq!(sum, Expr::integer(a + b));
        }

        #[test]
        fn evaluated_product_matches_integer_multiplication(a in small_int(), b in small_int()) {
            let product = mul([Expr::integer(a), Expr::integer(b)], Evaluation::Evaluated);
            prop_assert_eq!(product, Expr::integer(a * b));
        }

        #[test]
        fn float_positional_text_reparses(value in -1.0e12f64..1.0e12f64, precision in 1u32..=17) {
            let x = Float::from_f64(value, precision).unwrap();
            let reparsed = Float::from_decimal_str(&x.to_positional()).unwrap();
            prop_assert_eq!(reparsed, x);
        }

        #[test]
        fn construction_never_panics(a in small_int(), b in small_int(), mode in mode()) {
            let a = Expr::integer(a);
            let b = Expr::integer(b);
            for op in BinaryOp::ALL {
                let _ = op.apply(&a, &b, mode);
            }
            for op in RelOp::ALL {
                let _ = op.apply(&a, &b, mode);
            }
        }
    }
}
