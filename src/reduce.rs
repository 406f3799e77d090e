//! Generic post-order reduction over a pest concrete syntax tree.
//!
//! [`fold`] walks a CST bottom-up: for each node it first reduces every child
//! that itself has at least one child, collecting the results in child order,
//! then hands the node and its child results to a single dispatch callback.
//! Leaf terminals with no sub-pairs are skipped; they carry no payload of
//! their own and are inspected by their parent through the pair's accessors.
//!
//! The framework performs no I/O and cannot fail on its own; every error
//! originates in the dispatch callback and aborts the whole reduction.

use pest::iterators::Pair;
use pest::RuleType;

use crate::errors::{unsupported_node, Result};

/// Reduce `pair` to a single value using the per-rule dispatch callback.
pub fn fold<R, T, F>(pair: Pair<R>, reduce: &mut F) -> Result<T>
where
    R: RuleType,
    F: FnMut(Pair<R>, Vec<T>) -> Result<T>,
{
    let mut children = Vec::new();
    for inner in pair.clone().into_inner() {
        if has_children(&inner) {
            children.push(fold(inner, reduce)?);
        }
    }
    reduce(pair, children)
}

/// True when the pair wraps at least one sub-pair, i.e. it is not a bare
/// terminal token.
pub fn has_children<R: RuleType>(pair: &Pair<R>) -> bool {
    pair.clone().into_inner().next().is_some()
}

/// Default dispatch arm for rules without a specific reduction: a single
/// child result passes through unchanged; anything else is a fatal error
/// naming the rule and its source text, so extending a grammar without
/// updating the dispatch rules fails loudly instead of dropping data.
pub fn passthrough<R, T>(source_name: &str, source: &str, pair: &Pair<R>, children: Vec<T>) -> Result<T>
where
    R: RuleType,
{
    let mut results = children.into_iter();
    match (results.next(), results.next()) {
        (Some(only), None) => Ok(only),
        _ => Err(unsupported_node(source_name, source, pair)),
    }
}
