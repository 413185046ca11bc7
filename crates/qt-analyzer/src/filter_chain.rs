//! Filter step planning for AND-chain predicates
//!
//! A merged filter evaluates all of its conjuncts in one step. When a
//! conjunct guards another (`x != 0 AND intDiv(1, x) > 0`) the guarded
//! conjunct must not run for rows the guard rejects, so the chain is split
//! into one filter step per conjunct, in source order.

use crate::tree::QueryTreeNode;
use qt_core::BuildPipelineSettings;

/// Plan the filter steps for a predicate.
///
/// With `enable_multiple_filters_transforms_for_and_chain` set, a (possibly
/// nested) `and` chain becomes one step per conjunct, left to right.
/// Otherwise the predicate is a single step.
pub fn split_and_chain(
    predicate: &QueryTreeNode,
    settings: &BuildPipelineSettings,
) -> Vec<QueryTreeNode> {
    if !settings.enable_multiple_filters_transforms_for_and_chain {
        return vec![predicate.clone()];
    }

    let mut conjuncts = Vec::new();
    let mut stack = vec![predicate];
    while let Some(node) = stack.pop() {
        match node.as_function() {
            Some(function) if function.name() == "and" => {
                stack.extend(function.arguments().iter().rev());
            }
            _ => conjuncts.push(node.clone()),
        }
    }

    log::debug!("Split AND-chain into {} filter steps", conjuncts.len());
    conjuncts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{func, ident, int, pipeline_settings};

    fn guarded_predicate() -> QueryTreeNode {
        // x != 0 AND intDiv(1, x) > 0
        func(
            "and",
            vec![
                func("notEquals", vec![ident("x"), int(0)]),
                func(
                    "greater",
                    vec![func("intDiv", vec![int(1), ident("x")]), int(0)],
                ),
            ],
        )
    }

    #[test]
    fn test_split_keeps_guard_first() {
        let steps = split_and_chain(&guarded_predicate(), &pipeline_settings(true));
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], func("notEquals", vec![ident("x"), int(0)]));
        assert_eq!(steps[1].as_function().unwrap().name(), "greater");
    }

    #[test]
    fn test_disabled_keeps_single_step() {
        let predicate = guarded_predicate();
        let steps = split_and_chain(&predicate, &pipeline_settings(false));
        assert_eq!(steps, vec![predicate]);
    }

    #[test]
    fn test_nested_chain_flattened_in_order() {
        let predicate = func(
            "and",
            vec![
                func("and", vec![ident("a"), ident("b")]),
                func("and", vec![ident("c"), ident("d")]),
            ],
        );
        let steps = split_and_chain(&predicate, &pipeline_settings(true));
        assert_eq!(steps, vec![ident("a"), ident("b"), ident("c"), ident("d")]);
    }

    #[test]
    fn test_or_is_not_split() {
        let predicate = func("or", vec![ident("a"), ident("b")]);
        let steps = split_and_chain(&predicate, &pipeline_settings(true));
        assert_eq!(steps, vec![predicate]);
    }
}
