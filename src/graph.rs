use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Outcome of inserting an edge into a [`Network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    Added,
    /// The pair was already connected; the edge collapsed into the existing one.
    Duplicate,
    /// Both endpoints were the same node; the edge was dropped.
    SelfLoop,
}

/// Undirected, unweighted graph keyed by string node identifiers.
///
/// Parallel edges collapse and self-loops are dropped, so every edge is an
/// unordered pair of distinct nodes that both exist in the node set.
#[derive(Debug, Clone, Default)]
pub struct Network {
    graph: UnGraph<String, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

impl Network {
    pub fn new() -> Self {
        Network {
            graph: UnGraph::new_undirected(),
            node_indices: HashMap::new(),
        }
    }

    /// Build a network from `(source, target)` pairs.
    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut network = Network::new();
        for (a, b) in edges {
            network.add_edge(a, b);
        }
        network
    }

    /// Insert a node if it is not present and return its index.
    pub fn add_node(&mut self, id: impl Into<String>) -> NodeIndex {
        let id = id.into();
        if let Some(&index) = self.node_indices.get(&id) {
            return index;
        }
        let index = self.graph.add_node(id.clone());
        self.node_indices.insert(id, index);
        index
    }

    /// Connect two nodes, inserting missing endpoints first.
    pub fn add_edge(&mut self, a: impl Into<String>, b: impl Into<String>) -> EdgeInsert {
        let a = self.add_node(a);
        let b = self.add_node(b);
        self.add_edge_by_index(a, b)
    }

    pub(crate) fn add_edge_by_index(&mut self, a: NodeIndex, b: NodeIndex) -> EdgeInsert {
        if a == b {
            return EdgeInsert::SelfLoop;
        }
        if self.graph.find_edge(a, b).is_some() {
            EdgeInsert::Duplicate
        } else {
            self.graph.add_edge(a, b, ());
            EdgeInsert::Added
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    pub fn label(&self, index: NodeIndex) -> Option<&str> {
        self.graph.node_weight(index).map(String::as_str)
    }

    /// Node identifiers in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_weights().map(String::as_str)
    }

    /// Edges as identifier pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.graph
            .edge_references()
            .map(move |edge| (self.graph[edge.source()].as_str(), self.graph[edge.target()].as_str()))
    }

    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(a), Some(b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    pub fn neighbors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(index)
    }

    pub fn degree(&self, index: NodeIndex) -> usize {
        self.graph.neighbors(index).count()
    }

    /// Borrow the underlying petgraph structure.
    pub fn graph(&self) -> &UnGraph<String, ()> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut network = Network::new();
        assert_eq!(network.add_edge("a", "b"), EdgeInsert::Added);
        assert_eq!(network.add_edge("b", "a"), EdgeInsert::Duplicate);
        assert_eq!(network.add_edge("a", "b"), EdgeInsert::Duplicate);
        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.node_count(), 2);
    }

    #[test]
    fn test_self_loop_dropped_but_node_kept() {
        let mut network = Network::new();
        assert_eq!(network.add_edge("x", "x"), EdgeInsert::SelfLoop);
        assert_eq!(network.node_count(), 1);
        assert_eq!(network.edge_count(), 0);
        assert!(!network.is_empty());
    }

    #[test]
    fn test_edge_membership_is_symmetric() {
        let network = Network::from_edges([("1", "2"), ("2", "3")]);
        assert!(network.contains_edge("1", "2"));
        assert!(network.contains_edge("2", "1"));
        assert!(!network.contains_edge("1", "3"));
        assert!(!network.contains_edge("1", "missing"));
    }

    #[test]
    fn test_endpoints_exist_in_node_set() {
        let network = Network::from_edges([("a", "b"), ("c", "a"), ("d", "e")]);
        let nodes: Vec<&str> = network.nodes().collect();
        for (a, b) in network.edges() {
            assert!(nodes.contains(&a));
            assert!(nodes.contains(&b));
        }
        assert_eq!(nodes, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_degree() {
        let network = Network::from_edges([("hub", "1"), ("hub", "2"), ("hub", "3")]);
        let hub = network.index_of("hub").unwrap();
        assert_eq!(network.degree(hub), 3);
        assert_eq!(network.label(hub), Some("hub"));
    }
}
