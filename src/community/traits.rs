use super::Partition;
use crate::error::CommunityError;
use crate::graph::Network;

/// Trait for community detection algorithms.
pub trait CommunityDetection {
    /// Partition every node of `graph` into disjoint communities.
    fn detect(&self, graph: &Network) -> Result<Partition, CommunityError>;

    /// Get the resolution parameter (if applicable).
    fn resolution(&self) -> f64 {
        1.0
    }
}
