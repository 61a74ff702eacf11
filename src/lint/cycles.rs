use crate::index::GraphIndex;

use super::Diagnostic;

pub const CYCLE_DETECTED: &str = "CYCLE_DETECTED";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unseen,
    OnStack,
    Done,
}

/// Depth-first cycle search with an explicit stack.
///
/// Every node is explored at most once across all start points, so the whole
/// check is O(V+E). A back edge reports the node it re-enters; each node is
/// reported at most once even when it closes several cycles.
#[derive(Clone, Debug, Default)]
pub struct CycleRule;

impl CycleRule {
    pub fn check(index: &GraphIndex<'_>) -> Vec<Diagnostic> {
        let mut marks = vec![Mark::Unseen; index.len()];
        let mut reported = vec![false; index.len()];
        let mut diags = Vec::new();

        for root in 0..index.len() {
            if marks[root] != Mark::Unseen {
                continue;
            }
            marks[root] = Mark::OnStack;
            // (node, next outgoing link to follow)
            let mut stack = vec![(root, 0usize)];
            while let Some(frame) = stack.last_mut() {
                let (node, cursor) = *frame;
                let Some(link) = index.outgoing(node).get(cursor) else {
                    marks[node] = Mark::Done;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;
                let next = link.node;
                match marks[next] {
                    Mark::Unseen => {
                        marks[next] = Mark::OnStack;
                        stack.push((next, 0));
                    }
                    Mark::OnStack => {
                        if !reported[next] {
                            reported[next] = true;
                            diags.push(Diagnostic::error(
                                &index.node(next).id,
                                CYCLE_DETECTED,
                                "Circular dependency detected in the workflow",
                            ));
                        }
                    }
                    Mark::Done => {}
                }
            }
        }
        diags
    }
}
