use crate::error::CommunityError;
use petgraph::graph::NodeIndex;

/// Disjoint communities covering every node of a graph exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    communities: Vec<Vec<NodeIndex>>,
    membership: Vec<usize>,
}

impl Partition {
    /// Every node in its own community.
    pub fn singletons(node_count: usize) -> Self {
        Self::from_membership((0..node_count).collect())
    }

    /// Build from a per-node community label. Labels are renumbered to
    /// `0..len()` in order of first appearance.
    pub fn from_membership(labels: Vec<usize>) -> Self {
        let mut renumber: Vec<Option<usize>> = Vec::new();
        let mut communities: Vec<Vec<NodeIndex>> = Vec::new();
        let mut membership = Vec::with_capacity(labels.len());

        for (node, label) in labels.into_iter().enumerate() {
            if label >= renumber.len() {
                renumber.resize(label + 1, None);
            }
            let community = *renumber[label].get_or_insert_with(|| {
                communities.push(Vec::new());
                communities.len() - 1
            });
            communities[community].push(NodeIndex::new(node));
            membership.push(community);
        }

        Partition {
            communities,
            membership,
        }
    }

    /// Build from explicit node sets, rejecting overlaps, out-of-range
    /// nodes and nodes left uncovered. Empty sets are dropped.
    pub fn from_communities(
        node_count: usize,
        communities: Vec<Vec<NodeIndex>>,
    ) -> Result<Self, CommunityError> {
        let mut labels: Vec<Option<usize>> = vec![None; node_count];
        for (community, nodes) in communities.iter().filter(|c| !c.is_empty()).enumerate() {
            for node in nodes {
                let slot = labels.get_mut(node.index()).ok_or_else(|| {
                    CommunityError::NotAPartition(format!("node {} is not in the graph", node.index()))
                })?;
                if slot.is_some() {
                    return Err(CommunityError::NotAPartition(format!(
                        "node {} belongs to more than one community",
                        node.index()
                    )));
                }
                *slot = Some(community);
            }
        }

        let labels = labels
            .into_iter()
            .enumerate()
            .map(|(node, label)| {
                label.ok_or_else(|| {
                    CommunityError::NotAPartition(format!("node {node} is in no community"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_membership(labels))
    }

    /// Number of communities.
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    /// Number of nodes covered.
    pub fn node_count(&self) -> usize {
        self.membership.len()
    }

    pub fn communities(&self) -> &[Vec<NodeIndex>] {
        &self.communities
    }

    pub fn membership(&self) -> &[usize] {
        &self.membership
    }

    pub fn community_of(&self, node: NodeIndex) -> Option<usize> {
        self.membership.get(node.index()).copied()
    }
}
