//! Result types for link clustering runs.
//!
//! Provides the edge-to-community assignment, density metrics and the
//! aggregate [`LinkClusteringResult`] returned by [`crate::LinkClustering`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::{
    builder::ClusteringMode,
    dendrogram::Dendrogram,
    edge::{Edge, Node},
};

/// Identifier assigned to an edge community.
///
/// Edge `k` of the graph (in canonical sorted order) starts in community `k`;
/// merges keep the surviving community's identifier.
///
/// # Examples
/// ```
/// use linkcom_core::CommunityId;
///
/// let id = CommunityId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CommunityId(usize);

impl CommunityId {
    /// Creates a new community identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: usize) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

/// Partition density observed after all merges at one similarity level.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DensityLevel {
    similarity: f64,
    density: f64,
}

impl DensityLevel {
    pub(crate) const fn new(similarity: f64, density: f64) -> Self {
        Self {
            similarity,
            density,
        }
    }

    /// Similarity of the merges closing this level.
    #[must_use]
    #[rustfmt::skip]
    pub const fn similarity(&self) -> f64 { self.similarity }

    /// Partition density once the level's merges are applied.
    #[must_use]
    #[rustfmt::skip]
    pub const fn density(&self) -> f64 { self.density }
}

/// The cut of the merge history with maximum partition density.
///
/// The cut contains every merge with similarity `>= similarity()`, i.e. the
/// first [`Self::merges`] merge events.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BestCut {
    similarity: f64,
    density: f64,
    merges: usize,
}

impl BestCut {
    pub(crate) const fn new(similarity: f64, density: f64, merges: usize) -> Self {
        Self {
            similarity,
            density,
            merges,
        }
    }

    /// The cut before any merge: every edge alone, density zero.
    pub(crate) const fn initial() -> Self {
        Self::new(1.0, 0.0, 0)
    }

    /// Similarity of the last level included in the cut.
    #[must_use]
    #[rustfmt::skip]
    pub const fn similarity(&self) -> f64 { self.similarity }

    /// Partition density at the cut.
    #[must_use]
    #[rustfmt::skip]
    pub const fn density(&self) -> f64 { self.density }

    /// Number of merges applied up to the cut.
    #[must_use]
    #[rustfmt::skip]
    pub const fn merges(&self) -> usize { self.merges }
}

/// Mapping from canonical edge to community, ordered by edge.
///
/// # Examples
/// ```
/// use linkcom_core::{ClusteringMode, Edge, EdgeGraph, LinkClusteringBuilder};
///
/// let graph = EdgeGraph::from_edges([(1, 2), (2, 3), (1, 3)])?;
/// let result = LinkClusteringBuilder::new()
///     .with_mode(ClusteringMode::BestCut)
///     .build()?
///     .run(&graph)?;
/// let assignment = result.edge_to_community();
/// assert_eq!(assignment.community_count(), 1);
/// assert_eq!(assignment.get(&Edge::new(3, 1)), assignment.get(&Edge::new(1, 2)));
/// # Ok::<(), linkcom_core::LinkcomError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EdgeAssignment<N> {
    entries: Vec<(Edge<N>, CommunityId)>,
}

impl<N: Node> EdgeAssignment<N> {
    /// Pairs `edges` with the community indices in `ids`, position by position.
    pub(crate) fn from_indices(edges: &[Edge<N>], ids: &[usize]) -> Self {
        debug_assert_eq!(edges.len(), ids.len(), "every edge needs a community");
        let entries = edges
            .iter()
            .cloned()
            .zip(ids.iter().copied().map(CommunityId::new))
            .collect();
        Self { entries }
    }

    /// Returns the community of `edge`, if the edge belongs to the graph.
    #[must_use]
    pub fn get(&self, edge: &Edge<N>) -> Option<CommunityId> {
        self.entries
            .binary_search_by(|(candidate, _)| candidate.cmp(edge))
            .ok()
            .map(|index| self.entries[index].1)
    }

    /// Groups edges by community.
    #[must_use]
    pub fn communities(&self) -> BTreeMap<CommunityId, Vec<Edge<N>>> {
        let mut grouped: BTreeMap<CommunityId, Vec<Edge<N>>> = BTreeMap::new();
        for (edge, id) in &self.entries {
            grouped.entry(*id).or_default().push(edge.clone());
        }
        grouped
    }

    /// Collects the nodes touched by each community.
    #[must_use]
    pub fn community_nodes(&self) -> BTreeMap<CommunityId, BTreeSet<N>> {
        let mut grouped: BTreeMap<CommunityId, BTreeSet<N>> = BTreeMap::new();
        for (edge, id) in &self.entries {
            let nodes = grouped.entry(*id).or_default();
            nodes.insert(edge.source().clone());
            nodes.insert(edge.target().clone());
        }
        grouped
    }

    /// Returns the number of distinct communities.
    #[must_use]
    pub fn community_count(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, id)| *id)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Renumbers communities contiguously from `start`, preserving the order
    /// of the original identifiers.
    ///
    /// # Examples
    /// ```
    /// use linkcom_core::{ClusteringMode, CommunityId, EdgeGraph, LinkClusteringBuilder};
    ///
    /// let graph = EdgeGraph::from_edges([(1, 2), (3, 4)])?;
    /// let result = LinkClusteringBuilder::new().build()?.run(&graph)?;
    /// let ids: Vec<_> = result
    ///     .edge_to_community()
    ///     .renumbered(1)
    ///     .iter()
    ///     .map(|(_, id)| id)
    ///     .collect();
    /// assert_eq!(ids, vec![CommunityId::new(1), CommunityId::new(2)]);
    /// # Ok::<(), linkcom_core::LinkcomError>(())
    /// ```
    #[must_use]
    pub fn renumbered(&self, start: usize) -> Self {
        let ordered: BTreeSet<CommunityId> = self.entries.iter().map(|(_, id)| *id).collect();
        let lookup: HashMap<CommunityId, CommunityId> = ordered
            .into_iter()
            .enumerate()
            .map(|(offset, id)| (id, CommunityId::new(start + offset)))
            .collect();
        let entries = self
            .entries
            .iter()
            .map(|(edge, id)| (edge.clone(), lookup[id]))
            .collect();
        Self { entries }
    }

    /// Converts the assignment into a hash map keyed by edge.
    #[must_use]
    pub fn into_map(self) -> HashMap<Edge<N>, CommunityId> {
        self.entries.into_iter().collect()
    }
}

impl<N> EdgeAssignment<N> {
    /// Iterates over `(edge, community)` pairs in edge order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Edge<N>, CommunityId)> + '_ {
        self.entries.iter().map(|(edge, id)| (edge, *id))
    }

    /// Returns the number of assigned edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no edges are assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Represents the output of a [`crate::LinkClustering::run`] invocation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LinkClusteringResult<N> {
    pub(crate) mode: ClusteringMode,
    pub(crate) assignment: EdgeAssignment<N>,
    pub(crate) density: f64,
    pub(crate) best: Option<BestCut>,
    pub(crate) history: Vec<DensityLevel>,
    pub(crate) dendrogram: Option<Dendrogram<N>>,
    pub(crate) merges: usize,
    pub(crate) candidate_pairs: usize,
}

impl<N> LinkClusteringResult<N> {
    /// Mode the run was executed in.
    #[must_use]
    pub fn mode(&self) -> ClusteringMode {
        self.mode
    }

    /// Edge-to-community mapping: the best cut, or the state at the
    /// threshold in [`ClusteringMode::Threshold`].
    #[must_use]
    pub fn edge_to_community(&self) -> &EdgeAssignment<N> {
        &self.assignment
    }

    /// Partition density of [`Self::edge_to_community`].
    #[must_use]
    pub fn partition_density(&self) -> f64 {
        self.density
    }

    /// The maximum-density cut; `None` in threshold mode.
    #[must_use]
    pub fn best_cut(&self) -> Option<BestCut> {
        self.best
    }

    /// Similarity at the best cut; `None` in threshold mode.
    #[must_use]
    pub fn max_similarity(&self) -> Option<f64> {
        self.best.map(|best| best.similarity())
    }

    /// Maximum partition density; `None` in threshold mode.
    #[must_use]
    pub fn max_density(&self) -> Option<f64> {
        self.best.map(|best| best.density())
    }

    /// One entry per similarity level with at least one merge, in strictly
    /// decreasing similarity order.
    #[must_use]
    pub fn density_history(&self) -> &[DensityLevel] {
        &self.history
    }

    /// Merge history, present in [`ClusteringMode::Dendrogram`].
    #[must_use]
    pub fn dendrogram(&self) -> Option<&Dendrogram<N>> {
        self.dendrogram.as_ref()
    }

    /// Total merges performed during the run.
    #[must_use]
    pub fn merge_count(&self) -> usize {
        self.merges
    }

    /// Number of incident edge pairs evaluated.
    #[must_use]
    pub fn candidate_pairs(&self) -> usize {
        self.candidate_pairs
    }

    /// Splits a threshold-mode result into its mapping and density.
    #[must_use]
    pub fn into_threshold_parts(self) -> (EdgeAssignment<N>, f64) {
        (self.assignment, self.density)
    }
}
