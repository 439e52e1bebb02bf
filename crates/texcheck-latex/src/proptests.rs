//! Property-based tests for the printer and parser.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{parse_latex, to_latex};
    use texcheck_core::construct::{add, mul};
    use texcheck_core::{Evaluation, Expr};

    fn symbol() -> impl Strategy<Value = Expr> {
        "[a-zA-Z]".prop_map(|name| Expr::symbol(&name))
    }

    proptest! {
        #[test]
        fn symbols_round_trip(s in symbol()) {
            // `e` alone is still a symbol; only `e^` reads as the exponential.
            prop_assert_eq!(parse_latex(&to_latex(&s).unwrap()).unwrap(), s);
        }

        #[test]
        fn integers_round_trip(n in any::<i64>()) {
            let e = Expr::integer(n);
            prop_assert_eq!(parse_latex(&to_latex(&e).unwrap()).unwrap(), e);
        }

        #[test]
        fn positional_floats_round_trip(value in -1.0e12f64..1.0e12f64, precision in 1u32..=15) {
            let e = Expr::float(value, precision).unwrap();
            prop_assert_eq!(parse_latex(&to_latex(&e).unwrap()).unwrap(), e);
        }

        #[test]
        fn scientific_floats_round_trip(
            mantissa in 1.0f64..10.0,
            exponent in 20i32..200,
            precision in 1u32..=15,
        ) {
            let e = Expr::float(mantissa * 10f64.powi(exponent), precision).unwrap();
            prop_assert_eq!(parse_latex(&to_latex(&e).unwrap()).unwrap(), e);
        }

        #[test]
        fn evaluated_symbol_sums_round_trip(a in symbol(), b in symbol()) {
            let sum = add([a, b], Evaluation::Evaluated);
            prop_assert_eq!(parse_latex(&to_latex(&sum).unwrap()).unwrap(), sum);
        }

        #[test]
        fn evaluated_symbol_products_round_trip(a in symbol(), b in symbol()) {
            let product = mul([a, b], Evaluation::Evaluated);
            prop_assert_eq!(parse_latex(&to_latex(&product).unwrap()).unwrap(), product);
        }

        #[test]
        fn parser_never_panics(input in "[-+*/^_!(){}|a-z0-9 \\\\]{0,24}") {
            let _ = parse_latex(&input);
        }
    }
}
