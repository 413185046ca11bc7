//! Tree dump formatting

use super::node::QueryTreeNode;

/// Assigns pre-order ids to nodes while a tree is dumped
#[derive(Debug, Default)]
pub struct FormatState {
    next_id: usize,
}

impl FormatState {
    /// Start numbering at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next node id
    pub fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Write the header line prefix `<TYPE> id: <n>`
pub(crate) fn write_header(
    out: &mut String,
    state: &mut FormatState,
    indent: usize,
    node: &QueryTreeNode,
) {
    out.push_str(&format!(
        "{:indent$}{} id: {}",
        "",
        node.node_type(),
        state.next_id()
    ));
}

/// Write a named child section followed by the child dump
pub(crate) fn write_section(
    out: &mut String,
    state: &mut FormatState,
    indent: usize,
    title: &str,
    child: &QueryTreeNode,
) {
    out.push_str(&format!("\n{:width$}{title}\n", "", width = indent + 2));
    child.dump_tree_with_state(out, state, indent + 4);
}
