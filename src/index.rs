use std::collections::HashMap;

use crate::model::{Edge, Graph, Node};

/// Read-only adjacency view over a [`Graph`], built once per operation.
///
/// Nodes are addressed by their position in `graph.nodes`. Edges whose
/// endpoints do not resolve are left out of the adjacency lists used for
/// traversal, but still count as incident on whichever endpoint does exist.
#[derive(Debug)]
pub struct GraphIndex<'a> {
    graph: &'a Graph,
    outgoing: Vec<Vec<Link>>,
    incoming: Vec<Vec<Link>>,
    /// Node is the source of some edge, resolved or not.
    is_source: Vec<bool>,
    /// Node is the target of some edge, resolved or not.
    is_target: Vec<bool>,
}

#[derive(Debug, Clone, Copy)]
pub struct Link {
    /// Position of the edge in `graph.edges`.
    pub edge: usize,
    /// Position of the node on the other end.
    pub node: usize,
}

impl<'a> GraphIndex<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        let mut positions = HashMap::with_capacity(graph.nodes.len());
        for (idx, node) in graph.nodes.iter().enumerate() {
            positions.entry(node.id.as_str()).or_insert(idx);
        }

        let mut outgoing = vec![Vec::new(); graph.nodes.len()];
        let mut incoming = vec![Vec::new(); graph.nodes.len()];
        let mut is_source = vec![false; graph.nodes.len()];
        let mut is_target = vec![false; graph.nodes.len()];
        for (edge_idx, edge) in graph.edges.iter().enumerate() {
            let source = positions.get(edge.source.as_str()).copied();
            let target = positions.get(edge.target.as_str()).copied();
            if let Some(source) = source {
                is_source[source] = true;
            }
            if let Some(target) = target {
                is_target[target] = true;
            }
            let (Some(source), Some(target)) = (source, target) else {
                continue;
            };
            outgoing[source].push(Link {
                edge: edge_idx,
                node: target,
            });
            incoming[target].push(Link {
                edge: edge_idx,
                node: source,
            });
        }

        GraphIndex {
            graph,
            outgoing,
            incoming,
            is_source,
            is_target,
        }
    }

    pub fn len(&self) -> usize {
        self.graph.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.nodes.is_empty()
    }

    pub fn node(&self, idx: usize) -> &'a Node {
        &self.graph.nodes[idx]
    }

    pub fn edge(&self, link: Link) -> &'a Edge {
        &self.graph.edges[link.edge]
    }

    /// Outgoing links in edge-array order.
    pub fn outgoing(&self, idx: usize) -> &[Link] {
        &self.outgoing[idx]
    }

    /// Incoming links in edge-array order.
    pub fn incoming(&self, idx: usize) -> &[Link] {
        &self.incoming[idx]
    }

    /// True when some edge targets the node, even one whose source is missing.
    pub fn has_incoming(&self, idx: usize) -> bool {
        self.is_target[idx]
    }

    /// True when the node is the source or target of at least one edge.
    pub fn is_connected(&self, idx: usize) -> bool {
        self.is_source[idx] || self.is_target[idx]
    }

    /// Positions of nodes without an incoming edge, in node-array order.
    pub fn sources(&self) -> Vec<usize> {
        (0..self.len()).filter(|&idx| !self.has_incoming(idx)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AgentProps, NodeKind, TaskProps};

    fn agent(id: &str) -> Node {
        Node::new(id, NodeKind::Agent(AgentProps::default()))
    }

    #[test]
    fn dangling_edges_are_not_traversed() {
        let graph = Graph::new(
            vec![agent("a"), Node::new("t", NodeKind::Task(TaskProps::default()))],
            vec![Edge::new("e1", "a", "ghost"), Edge::new("e2", "a", "t")],
        );
        let index = GraphIndex::new(&graph);
        let out = index.outgoing(0);
        assert_eq!(out.len(), 1);
        assert_eq!(index.edge(out[0]).id, "e2");
        assert_eq!(index.sources(), vec![0]);
    }

    #[test]
    fn dangling_edges_still_count_as_incident() {
        let graph = Graph::new(
            vec![agent("a"), Node::new("t", NodeKind::Task(TaskProps::default()))],
            vec![Edge::new("e1", "a", "ghost"), Edge::new("e2", "ghost", "t")],
        );
        let index = GraphIndex::new(&graph);
        assert!(index.is_connected(0));
        assert!(index.is_connected(1));
        assert!(index.has_incoming(1));
        assert!(index.incoming(1).is_empty());
        assert!(index.outgoing(0).is_empty());
        assert_eq!(index.sources(), vec![0]);
    }

    #[test]
    fn self_loop_counts_as_incoming() {
        let graph = Graph::new(vec![agent("a")], vec![Edge::new("e1", "a", "a")]);
        let index = GraphIndex::new(&graph);
        assert!(index.has_incoming(0));
        assert!(index.sources().is_empty());
    }
}
