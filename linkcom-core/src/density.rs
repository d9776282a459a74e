//! Partition density bookkeeping.
//!
//! Partition density rewards edge communities whose edge count approaches the
//! maximum possible for their node count:
//!
//! ```text
//! D = (2 / M) * Σ_c m_c (m_c − n_c + 1) / ((n_c − 2)(n_c − 1))
//! ```
//!
//! Communities touching two nodes or fewer contribute nothing. The tracker
//! keeps the running sum so each merge costs O(1) instead of a full rescan.

use crate::result::{BestCut, DensityLevel};

/// Density contribution of a community with `edges` edges over `nodes` nodes.
///
/// # Examples
/// ```
/// use linkcom_core::community_density;
///
/// assert_eq!(community_density(3, 3), 1.5);
/// assert_eq!(community_density(1, 2), 0.0);
/// ```
#[must_use]
pub fn community_density(edges: usize, nodes: usize) -> f64 {
    if nodes <= 2 {
        return 0.0;
    }
    let m = edges as f64;
    let n = nodes as f64;
    m * (m - n + 1.0) / ((n - 2.0) * (n - 1.0))
}

/// Partition density of a whole partition, computed from scratch.
///
/// `communities` yields `(edges, nodes)` per community and `total_edges` is
/// the edge count of the graph. An empty graph has density `0`.
///
/// # Examples
/// ```
/// use linkcom_core::partition_density;
///
/// // A triangle as one community is a clique: density 1.
/// assert!((partition_density([(3, 3)], 3) - 1.0).abs() < 1e-12);
/// assert_eq!(partition_density(std::iter::empty(), 0), 0.0);
/// ```
#[must_use]
pub fn partition_density<I>(communities: I, total_edges: usize) -> f64
where
    I: IntoIterator<Item = (usize, usize)>,
{
    let sum: f64 = communities
        .into_iter()
        .map(|(edges, nodes)| community_density(edges, nodes))
        .sum();
    density_factor(total_edges) * sum
}

fn density_factor(total_edges: usize) -> f64 {
    if total_edges == 0 {
        0.0
    } else {
        2.0 / total_edges as f64
    }
}

/// Edge and node counts of one community.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CommunityStats {
    pub(crate) edges: usize,
    pub(crate) nodes: usize,
}

impl CommunityStats {
    fn contribution(self) -> f64 {
        community_density(self.edges, self.nodes)
    }
}

/// Running partition density plus the best cut seen during one run.
#[derive(Clone, Debug)]
pub(crate) struct DensityTracker {
    factor: f64,
    sum: f64,
    history: Vec<DensityLevel>,
    best: BestCut,
}

impl DensityTracker {
    pub(crate) fn new(total_edges: usize) -> Self {
        Self {
            factor: density_factor(total_edges),
            sum: 0.0,
            history: Vec::new(),
            best: BestCut::initial(),
        }
    }

    /// Replaces the contributions of two merged communities with the
    /// contribution of their union.
    pub(crate) fn update_on_merge(
        &mut self,
        left: CommunityStats,
        right: CommunityStats,
        merged: CommunityStats,
    ) {
        self.sum += merged.contribution() - left.contribution() - right.contribution();
    }

    pub(crate) fn density(&self) -> f64 {
        self.factor * self.sum
    }

    /// Closes a similarity level, appending it to the history.
    ///
    /// Returns `true` when the level becomes the new best cut. Ties favour the
    /// later, lower-similarity level.
    pub(crate) fn record_level(&mut self, similarity: f64, merges: usize) -> bool {
        let density = self.density();
        self.history.push(DensityLevel::new(similarity, density));
        if density >= self.best.density() {
            self.best = BestCut::new(similarity, density, merges);
            return true;
        }
        false
    }

    pub(crate) fn best(&self) -> BestCut {
        self.best
    }

    pub(crate) fn into_history(self) -> Vec<DensityLevel> {
        self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPSILON: f64 = 1e-12;

    #[rstest]
    #[case::single_edge(1, 2, 0.0)]
    #[case::path_of_two(2, 3, 0.0)]
    #[case::triangle(3, 3, 1.5)]
    #[case::star_of_three(3, 4, 0.0)]
    #[case::square_with_diagonal(5, 4, 10.0 / 6.0)]
    #[case::clique_of_four(6, 4, 3.0)]
    fn community_density_matches_closed_form(
        #[case] edges: usize,
        #[case] nodes: usize,
        #[case] expected: f64,
    ) {
        assert!((community_density(edges, nodes) - expected).abs() < EPSILON);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    fn small_communities_contribute_nothing(#[case] nodes: usize) {
        assert_eq!(community_density(7, nodes), 0.0);
    }

    #[test]
    fn tracker_matches_from_scratch_density() {
        // Triangle (0,1,2) built from three singleton edges.
        let single = CommunityStats { edges: 1, nodes: 2 };
        let mut tracker = DensityTracker::new(3);
        let pair = CommunityStats { edges: 2, nodes: 3 };
        tracker.update_on_merge(single, single, pair);
        assert_eq!(tracker.density(), 0.0);
        let triangle = CommunityStats { edges: 3, nodes: 3 };
        tracker.update_on_merge(pair, single, triangle);
        let expected = partition_density([(3, 3)], 3);
        assert!((tracker.density() - expected).abs() < EPSILON);
        assert!((tracker.density() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn record_level_tracks_running_maximum() {
        let single = CommunityStats { edges: 1, nodes: 2 };
        let mut tracker = DensityTracker::new(3);
        assert!(tracker.record_level(1.0, 0));
        tracker.update_on_merge(single, single, CommunityStats { edges: 2, nodes: 3 });
        assert!(tracker.record_level(0.5, 1));
        tracker.update_on_merge(
            CommunityStats { edges: 2, nodes: 3 },
            single,
            CommunityStats { edges: 3, nodes: 3 },
        );
        assert!(tracker.record_level(0.25, 2));

        let best = tracker.best();
        assert_eq!(best.similarity(), 0.25);
        assert_eq!(best.merges(), 2);
        assert_eq!(tracker.into_history().len(), 3);
    }

    #[test]
    fn empty_graph_has_zero_density() {
        let tracker = DensityTracker::new(0);
        assert_eq!(tracker.density(), 0.0);
        assert_eq!(partition_density(std::iter::empty(), 0), 0.0);
    }
}
