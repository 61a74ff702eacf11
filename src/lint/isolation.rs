use crate::index::GraphIndex;

use super::Diagnostic;

pub const NODE_ISOLATED: &str = "NODE_ISOLATED";

#[derive(Clone, Debug, Default)]
pub struct IsolationRule;

impl IsolationRule {
    pub fn check(index: &GraphIndex<'_>) -> Vec<Diagnostic> {
        (0..index.len())
            .filter(|&idx| !index.is_connected(idx))
            .map(|idx| {
                let node = index.node(idx);
                Diagnostic::warning(
                    &node.id,
                    NODE_ISOLATED,
                    format!(
                        "{} '{}' is not connected to any other component",
                        node.kind_name(),
                        node.label()
                    ),
                )
            })
            .collect()
    }
}
