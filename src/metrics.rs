use crate::cluster::NOISE;
use std::collections::HashSet;

/// Cluster and noise counts derived from a label sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClusterSummary {
    pub cluster_count: usize,
    pub noise_count: usize,
}

impl ClusterSummary {
    pub fn from_labels(labels: &[i32]) -> Self {
        let cluster_count = labels.iter()
            .filter(|&&l| l != NOISE)
            .collect::<HashSet<_>>()
            .len();
        let noise_count = labels.iter()
            .filter(|&&l| l == NOISE)
            .count();

        Self {
            cluster_count,
            noise_count,
        }
    }
}
