//! Louvain algorithm for community detection.
//!
//! Multi-level greedy modularity optimisation (Blondel et al. 2008):
//!
//! 1. **Local moving**: visit nodes in a seeded random order and move each
//!    one to the neighbouring community with the largest positive
//!    modularity gain. Repeat full passes until none moves, at most
//!    `max_iter` times.
//! 2. **Aggregation**: collapse every community into a single node; edges
//!    inside a community become a weighted self-loop.
//! 3. **Iterate** on the aggregated graph while a level improves modularity
//!    by more than `threshold`.
//!
//! The random source is created afresh from the seed on every call to
//! [`CommunityDetection::detect`], so equal seeds give equal partitions.

use super::modularity::LevelGraph;
use super::traits::CommunityDetection;
use super::Partition;
use crate::error::CommunityError;
use crate::graph::Network;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Louvain community detection algorithm.
#[derive(Debug, Clone)]
pub struct Louvain {
    /// Resolution parameter (gamma).
    resolution: f64,
    /// Seed for the node visit order.
    seed: u64,
    /// Minimum modularity gain for a level to be kept.
    threshold: f64,
    /// Maximum local-moving passes per level.
    max_iter: usize,
    /// Maximum number of levels, unbounded when `None`.
    max_level: Option<usize>,
}

/// Outcome of one local-moving phase.
struct LevelMove {
    /// Community of each level node, numbered `0..community_count`.
    membership: Vec<usize>,
    community_count: usize,
    improved: bool,
}

impl Louvain {
    /// Create a new Louvain detector with default settings.
    pub fn new() -> Self {
        Self {
            resolution: 1.0,
            seed: 123,
            threshold: 1e-7,
            max_iter: 100,
            max_level: None,
        }
    }

    /// Set resolution parameter.
    ///
    /// Higher values produce smaller communities.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set maximum local-moving passes per level.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Stop after `levels` aggregation levels.
    pub fn with_max_level(mut self, levels: usize) -> Self {
        self.max_level = Some(levels);
        self
    }

    fn validate(&self) -> Result<(), CommunityError> {
        if !self.resolution.is_finite() {
            return Err(CommunityError::InvalidParameter {
                name: "resolution",
                message: "must be finite",
            });
        }
        if self.max_iter == 0 {
            return Err(CommunityError::InvalidParameter {
                name: "max_iter",
                message: "must be positive",
            });
        }
        if self.max_level == Some(0) {
            return Err(CommunityError::InvalidParameter {
                name: "max_level",
                message: "must be positive",
            });
        }
        Ok(())
    }

    /// Phase 1: move nodes between neighbouring communities until a pass
    /// makes no move or `max_iter` passes have run.
    fn local_moving(&self, graph: &LevelGraph, m: f64, rng: &mut StdRng) -> LevelMove {
        let n = graph.node_count();
        let degrees: Vec<f64> = (0..n).map(|u| graph.degree(u)).collect();
        let mut community: Vec<usize> = (0..n).collect();
        let mut totals = degrees.clone();

        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);

        // Scratch space for edge weight from the current node to each community.
        let mut weights = vec![0.0; n];
        let mut seen = vec![false; n];
        let mut touched: Vec<usize> = Vec::new();

        let scale = self.resolution / (2.0 * m * m);
        let mut improved = false;

        for _pass in 0..self.max_iter {
            let mut moves = 0usize;
            for &u in &order {
                for &(v, w) in graph.neighbors(u) {
                    let c = community[v];
                    if !seen[c] {
                        seen[c] = true;
                        touched.push(c);
                    }
                    weights[c] += w;
                }

                let current = community[u];
                let degree = degrees[u];
                totals[current] -= degree;

                let remove_cost = -weights[current] / m + scale * totals[current] * degree;
                let mut best = current;
                let mut best_gain = 0.0;
                for &c in &touched {
                    let gain = remove_cost + weights[c] / m - scale * totals[c] * degree;
                    if gain > best_gain {
                        best_gain = gain;
                        best = c;
                    }
                }
                totals[best] += degree;

                for &c in &touched {
                    weights[c] = 0.0;
                    seen[c] = false;
                }
                touched.clear();

                if best != current {
                    community[u] = best;
                    moves += 1;
                    improved = true;
                }
            }
            if moves == 0 {
                break;
            }
        }

        let partition = Partition::from_membership(community);
        LevelMove {
            community_count: partition.len(),
            membership: partition.membership().to_vec(),
            improved,
        }
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityDetection for Louvain {
    fn detect(&self, graph: &Network) -> Result<Partition, CommunityError> {
        self.validate()?;
        let n = graph.node_count();
        if n == 0 {
            return Err(CommunityError::EmptyGraph);
        }

        let mut level = LevelGraph::from_network(graph);
        let m = level.total_weight();
        if m == 0.0 {
            // No edges: each node is its own community
            return Ok(Partition::singletons(n));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let identity: Vec<usize> = (0..n).collect();
        let mut current_modularity = level.modularity(&identity, n, self.resolution);

        // Maps each original node to its node in the current level.
        let mut to_level = identity;
        let mut moved = self.local_moving(&level, m, &mut rng);
        let mut best;
        let mut depth = 0usize;

        loop {
            best = to_level.iter().map(|&l| moved.membership[l]).collect::<Vec<_>>();
            depth += 1;
            debug!(
                "louvain level {depth}: {} communities over {} level nodes",
                moved.community_count,
                level.node_count()
            );
            if self.max_level.is_some_and(|max| depth >= max) {
                break;
            }

            let next_modularity = level.modularity(&moved.membership, moved.community_count, self.resolution);
            if next_modularity - current_modularity <= self.threshold {
                break;
            }
            current_modularity = next_modularity;

            level = level.aggregate(&moved.membership, moved.community_count);
            to_level = best.clone();
            moved = self.local_moving(&level, m, &mut rng);
            if !moved.improved {
                break;
            }
        }

        Ok(Partition::from_membership(best))
    }

    fn resolution(&self) -> f64 {
        self.resolution
    }
}
