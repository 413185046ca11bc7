//! Structural identity of query trees
//!
//! Two trees are equal when they have the same shape, the same node types in
//! the same positions and equal per-node scalar fields. The hash folds in the
//! same information in a fixed order, so equal trees always hash equal.
//! Both walks use an explicit work stack and do not recurse.

use super::node::{QueryTreeNode, QueryTreeNodeType};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Structural fingerprint of a query tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeHash(pub u64);

impl std::fmt::Display for TreeHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Accumulator for a `TreeHash`.
///
/// Stable within one build of the crate. Not suitable for persisting.
#[derive(Debug, Default)]
pub struct TreeHashState {
    hasher: DefaultHasher,
}

impl TreeHashState {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a hashable value into the state
    pub fn update<T: Hash + ?Sized>(&mut self, value: &T) {
        value.hash(&mut self.hasher);
    }

    /// Fold a node type tag into the state
    pub fn update_tag(&mut self, node_type: QueryTreeNodeType) {
        node_type.hash(&mut self.hasher);
    }

    /// Finish and return the fingerprint
    pub fn finish(&self) -> TreeHash {
        TreeHash(self.hasher.finish())
    }
}

/// Compare two fixed child-slot sequences pairwise, in order.
///
/// An absent slot is equal only to an absent slot.
pub fn children_equal(lhs: &[Option<&QueryTreeNode>], rhs: &[Option<&QueryTreeNode>]) -> bool {
    lhs.len() == rhs.len()
        && lhs.iter().zip(rhs).all(|pair| match pair {
            (Some(l), Some(r)) => trees_equal(l, r),
            (None, None) => true,
            _ => false,
        })
}

/// Iterative structural equality
pub(crate) fn trees_equal(lhs: &QueryTreeNode, rhs: &QueryTreeNode) -> bool {
    let mut stack = vec![(lhs, rhs)];

    while let Some((l, r)) = stack.pop() {
        if std::ptr::eq(l, r) {
            continue;
        }
        if l.node_type() != r.node_type() || !l.scalars_equal(r) {
            return false;
        }

        let l_children = l.children();
        let r_children = r.children();
        if l_children.len() != r_children.len() {
            return false;
        }
        for pair in l_children.into_iter().zip(r_children) {
            match pair {
                (Some(lc), Some(rc)) => stack.push((lc, rc)),
                (None, None) => {}
                _ => return false,
            }
        }
    }

    true
}

enum HashStep<'a> {
    Node(&'a QueryTreeNode),
    Slot(Option<&'a QueryTreeNode>),
}

/// Iterative structural hash.
///
/// Per node: type tag, scalar fields, child slot count, then for each slot a
/// presence flag followed by the child's own contribution.
pub(crate) fn hash_tree<H: Hasher>(root: &QueryTreeNode, state: &mut H) {
    let mut stack = vec![HashStep::Node(root)];

    while let Some(step) = stack.pop() {
        match step {
            HashStep::Slot(slot) => {
                slot.is_some().hash(state);
                if let Some(child) = slot {
                    stack.push(HashStep::Node(child));
                }
            }
            HashStep::Node(node) => {
                node.node_type().hash(state);
                node.hash_scalars(state);

                let children = node.children();
                children.len().hash(state);
                stack.extend(children.into_iter().rev().map(HashStep::Slot));
            }
        }
    }
}
