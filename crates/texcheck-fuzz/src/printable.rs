//! Filtering generated expressions down to those that serialize.

use proptest::prelude::*;
use texcheck_core::Expr;
use tracing::debug;

use crate::markup::MarkupSerializer;

/// An expression together with the markup it serialized to.
///
/// The markup is produced once, here, and never recomputed downstream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationCase {
    /// The generated expression.
    pub expr: Expr,
    /// Its serialized form; never empty.
    pub markup: String,
}

/// Serializes each subject, rejecting those the serializer refuses or
/// renders as empty markup.
pub fn printable<S>(
    subjects: impl Strategy<Value = Expr>,
    serializer: S,
) -> impl Strategy<Value = GenerationCase>
where
    S: MarkupSerializer + 'static,
{
    subjects.prop_filter_map("unprintable expression", move |expr| {
        print_case(&serializer, expr)
    })
}

/// Serializes a single expression, or returns `None` when it is unprintable.
pub fn print_case<S: MarkupSerializer>(serializer: &S, expr: Expr) -> Option<GenerationCase> {
    match serializer.serialize(&expr) {
        Ok(markup) if markup.trim().is_empty() => {
            debug!(%expr, "serializer produced empty markup");
            None
        }
        Ok(markup) => Some(GenerationCase { expr, markup }),
        Err(err) => {
            debug!(%expr, reason = %err, "expression is unprintable");
            None
        }
    }
}
