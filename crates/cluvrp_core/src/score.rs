//! Cluster-contiguity scoring.
//!
//! A cluster is *broken* when the tour positions of its members do not form
//! one unbroken run. The check treats the tour as strictly linear: members
//! sitting on the last and first positions are counted as broken even though
//! the tour is cyclic. That matches the evaluation baselines this tool is
//! compared against and is deliberately left as-is; see the wraparound test
//! below.

use std::collections::BTreeMap;

use crate::io::clusters::ClusterAssignment;

/// Fixed weight per broken cluster. No partial credit for near-contiguity.
pub const PENALTY_PER_BROKEN_CLUSTER: u64 = 1_000;

/// Outcome of scoring one tour against one cluster assignment.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ContiguityReport {
    /// Ids of clusters whose visit positions have gaps, ascending.
    pub broken_clusters: Vec<usize>,
    pub penalty: u64,
}

impl ContiguityReport {
    pub fn broken_count(&self) -> usize {
        self.broken_clusters.len()
    }
}

/// Scores a filtered tour: every id must already reference a known node.
///
/// Nodes without a cluster assignment contribute to no occurrence list.
/// Clusters with zero or one visit are trivially contiguous. Empty tours
/// score zero.
pub fn score_contiguity(tour: &[usize], clusters: &ClusterAssignment) -> ContiguityReport {
    let mut occurrences: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (position, node) in tour.iter().enumerate() {
        if let Some(cluster) = clusters.cluster_of(*node) {
            occurrences.entry(cluster).or_default().push(position);
        }
    }

    let mut broken_clusters = Vec::new();
    for (cluster, mut positions) in occurrences {
        if positions.len() <= 1 {
            continue;
        }
        positions.sort_unstable();
        let min = positions[0];
        let max = positions[positions.len() - 1];
        if max - min + 1 != positions.len() {
            broken_clusters.push(cluster);
        }
    }

    let penalty = broken_clusters.len() as u64 * PENALTY_PER_BROKEN_CLUSTER;
    ContiguityReport {
        broken_clusters,
        penalty,
    }
}
