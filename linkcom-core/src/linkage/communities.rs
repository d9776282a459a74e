//! Edge community membership during agglomeration.

use std::collections::HashSet;

use crate::{density::CommunityStats, graph::EdgeGraph};

/// Outcome of joining the communities of two edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Merge {
    pub(super) left: usize,
    pub(super) right: usize,
    pub(super) survivor: usize,
    pub(super) left_stats: CommunityStats,
    pub(super) right_stats: CommunityStats,
    pub(super) merged_stats: CommunityStats,
}

/// Membership index plus edge and node sets for every live community.
///
/// Community ids are the indices of their founding edges. Retired ids keep
/// empty member lists and are never reused.
#[derive(Clone, Debug)]
pub(super) struct Communities {
    membership: Vec<usize>,
    members: Vec<Vec<usize>>,
    nodes: Vec<HashSet<usize>>,
    live: usize,
}

impl Communities {
    pub(super) fn new<N>(graph: &EdgeGraph<N>) -> Self {
        let edges = graph.indexed_edges();
        Self {
            membership: (0..edges.len()).collect(),
            members: (0..edges.len()).map(|edge| vec![edge]).collect(),
            nodes: edges
                .iter()
                .map(|edge| HashSet::from([*edge.source(), *edge.target()]))
                .collect(),
            live: edges.len(),
        }
    }

    /// Returns the community id of every edge, indexed by edge.
    pub(super) fn assignment(&self) -> &[usize] {
        &self.membership
    }

    pub(super) fn into_assignment(self) -> Vec<usize> {
        self.membership
    }

    pub(super) fn live(&self) -> usize {
        self.live
    }

    fn stats(&self, community: usize) -> CommunityStats {
        CommunityStats {
            edges: self.members[community].len(),
            nodes: self.nodes[community].len(),
        }
    }

    /// Joins the communities holding `first` and `second`.
    ///
    /// The community with more edges survives; on a tie the community of
    /// `first` does. Returns `None` when both edges already share a community.
    pub(super) fn merge(&mut self, first: usize, second: usize) -> Option<Merge> {
        let left = self.membership[first];
        let right = self.membership[second];
        if left == right {
            return None;
        }
        let left_stats = self.stats(left);
        let right_stats = self.stats(right);
        let (survivor, retired) = if right_stats.edges > left_stats.edges {
            (right, left)
        } else {
            (left, right)
        };

        let moved = std::mem::take(&mut self.members[retired]);
        for &edge in &moved {
            self.membership[edge] = survivor;
        }
        self.members[survivor].extend(moved);

        let mut absorbed = std::mem::take(&mut self.nodes[retired]);
        if absorbed.len() > self.nodes[survivor].len() {
            std::mem::swap(&mut absorbed, &mut self.nodes[survivor]);
        }
        self.nodes[survivor].extend(absorbed);

        self.live -= 1;
        Some(Merge {
            left,
            right,
            survivor,
            left_stats,
            right_stats,
            merged_stats: self.stats(survivor),
        })
    }
}
