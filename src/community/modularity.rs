use super::Partition;
use crate::error::CommunityError;
use crate::graph::Network;
use petgraph::visit::EdgeRef;
use std::collections::BTreeMap;

/// Weighted undirected graph over dense indices, used while optimising and
/// scoring partitions. Self-loops are kept apart from the adjacency lists.
#[derive(Debug, Clone)]
pub(crate) struct LevelGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
}

impl LevelGraph {
    pub(crate) fn from_network(network: &Network) -> Self {
        let graph = network.graph();
        let mut adjacency = vec![Vec::new(); graph.node_count()];
        for edge in graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            adjacency[a].push((b, 1.0));
            adjacency[b].push((a, 1.0));
        }
        LevelGraph {
            self_loops: vec![0.0; adjacency.len()],
            adjacency,
        }
    }

    pub(crate) fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Neighbours of `u` with edge weights, excluding `u` itself.
    pub(crate) fn neighbors(&self, u: usize) -> &[(usize, f64)] {
        &self.adjacency[u]
    }

    /// Weighted degree; a self-loop counts twice.
    pub(crate) fn degree(&self, u: usize) -> f64 {
        self.adjacency[u].iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self.self_loops[u]
    }

    /// Sum of all edge weights, each edge counted once.
    pub(crate) fn total_weight(&self) -> f64 {
        let mut total: f64 = self.self_loops.iter().sum();
        for (u, neighbors) in self.adjacency.iter().enumerate() {
            total += neighbors
                .iter()
                .filter(|&&(v, _)| u < v)
                .map(|&(_, w)| w)
                .sum::<f64>();
        }
        total
    }

    /// Modularity of `membership`, whose labels must lie in `0..community_count`.
    pub(crate) fn modularity(&self, membership: &[usize], community_count: usize, resolution: f64) -> f64 {
        let m = self.total_weight();
        if m == 0.0 {
            return 0.0;
        }

        let mut internal = vec![0.0; community_count];
        let mut degree_sums = vec![0.0; community_count];
        for (u, neighbors) in self.adjacency.iter().enumerate() {
            let c = membership[u];
            degree_sums[c] += self.degree(u);
            internal[c] += self.self_loops[u];
            for &(v, w) in neighbors {
                if u < v && membership[v] == c {
                    internal[c] += w;
                }
            }
        }

        internal
            .iter()
            .zip(&degree_sums)
            .map(|(&l_c, &d_c)| l_c / m - resolution * (d_c / (2.0 * m)).powi(2))
            .sum()
    }

    /// Collapse each community into one node. Edges inside a community
    /// become a self-loop on its node; edges between communities are summed.
    pub(crate) fn aggregate(&self, membership: &[usize], community_count: usize) -> LevelGraph {
        let mut self_loops = vec![0.0; community_count];
        let mut between: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); community_count];

        for (u, neighbors) in self.adjacency.iter().enumerate() {
            let cu = membership[u];
            self_loops[cu] += self.self_loops[u];
            for &(v, w) in neighbors {
                if u >= v {
                    continue;
                }
                let cv = membership[v];
                if cu == cv {
                    self_loops[cu] += w;
                } else {
                    *between[cu].entry(cv).or_insert(0.0) += w;
                    *between[cv].entry(cu).or_insert(0.0) += w;
                }
            }
        }

        LevelGraph {
            adjacency: between
                .into_iter()
                .map(|weights| weights.into_iter().collect())
                .collect(),
            self_loops,
        }
    }
}

/// Modularity of `partition` over `graph` at the given resolution.
///
/// Returns `0.0` for a graph without edges. Fails if the partition does
/// not cover exactly the nodes of `graph`.
pub fn modularity(graph: &Network, partition: &Partition, resolution: f64) -> Result<f64, CommunityError> {
    if partition.node_count() != graph.node_count() {
        return Err(CommunityError::NotAPartition(format!(
            "partition covers {} nodes, graph has {}",
            partition.node_count(),
            graph.node_count()
        )));
    }
    let level = LevelGraph::from_network(graph);
    Ok(level.modularity(partition.membership(), partition.len(), resolution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::NodeIndex;

    fn two_triangles() -> Network {
        Network::from_edges([
            ("a0", "a1"),
            ("a1", "a2"),
            ("a0", "a2"),
            ("b0", "b1"),
            ("b1", "b2"),
            ("b0", "b2"),
            ("a2", "b0"),
        ])
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-12, "{actual} != {expected}");
    }

    #[test]
    fn test_two_triangles_split() {
        let graph = two_triangles();
        let partition = Partition::from_membership(vec![0, 0, 0, 1, 1, 1]);
        // Each side: 3 internal edges, degree sum 7, m = 7.
        let expected = 2.0 * (3.0 / 7.0 - (7.0 / 14.0_f64).powi(2));
        assert_close(modularity(&graph, &partition, 1.0).unwrap(), expected);
    }

    #[test]
    fn test_single_community_is_zero() {
        let graph = two_triangles();
        let partition = Partition::from_membership(vec![0; 6]);
        assert_close(modularity(&graph, &partition, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_resolution_scales_null_model() {
        let graph = two_triangles();
        let partition = Partition::from_membership(vec![0, 0, 0, 1, 1, 1]);
        let expected = 2.0 * (3.0 / 7.0 - 0.5 * 0.25);
        assert_close(modularity(&graph, &partition, 0.5).unwrap(), expected);
    }

    #[test]
    fn test_no_edges() {
        let mut graph = Network::new();
        graph.add_node("lonely");
        assert_eq!(modularity(&graph, &Partition::singletons(1), 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_partition_size_mismatch() {
        let graph = two_triangles();
        let partition = Partition::singletons(5);
        assert!(matches!(
            modularity(&graph, &partition, 1.0),
            Err(CommunityError::NotAPartition(_))
        ));
    }

    #[test]
    fn test_aggregate_preserves_modularity() {
        let graph = two_triangles();
        let level = LevelGraph::from_network(&graph);
        let membership = vec![0, 0, 1, 2, 2, 2];
        let coarse = level.aggregate(&membership, 3);
        assert_eq!(coarse.node_count(), 3);
        assert_close(coarse.total_weight(), level.total_weight());
        assert_close(
            coarse.modularity(&[0, 0, 1], 2, 1.0),
            level.modularity(&[0, 0, 0, 1, 1, 1], 2, 1.0),
        );
        assert_eq!(graph.index_of("a2"), Some(NodeIndex::new(2)));
    }
}
