//! Merge history of a link clustering run.
//!
//! The history is kept flat: the initial edge-to-community mapping plus the
//! merge events in the order they happened. Intermediate partitions are
//! recovered by replaying a prefix of the events, and [`Dendrogram::tree`]
//! lays the same history out as an index-linked arena.

use crate::{
    edge::{Edge, Node},
    result::{CommunityId, EdgeAssignment},
};

/// One merge of two edge communities.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MergeEvent {
    similarity: f64,
    left: CommunityId,
    right: CommunityId,
    merged: CommunityId,
    size: usize,
}

impl MergeEvent {
    pub(crate) const fn new(
        similarity: f64,
        left: CommunityId,
        right: CommunityId,
        merged: CommunityId,
        size: usize,
    ) -> Self {
        Self {
            similarity,
            left,
            right,
            merged,
            size,
        }
    }

    /// Similarity of the candidate pair that triggered the merge.
    #[must_use]
    #[rustfmt::skip]
    pub const fn similarity(&self) -> f64 { self.similarity }

    /// Community of the first edge of the pair.
    #[must_use]
    #[rustfmt::skip]
    pub const fn left(&self) -> CommunityId { self.left }

    /// Community of the second edge of the pair.
    #[must_use]
    #[rustfmt::skip]
    pub const fn right(&self) -> CommunityId { self.right }

    /// Surviving community; equal to either [`Self::left`] or [`Self::right`].
    #[must_use]
    #[rustfmt::skip]
    pub const fn merged(&self) -> CommunityId { self.merged }

    /// Edge count of the merged community.
    #[must_use]
    #[rustfmt::skip]
    pub const fn size(&self) -> usize { self.size }

    /// The community whose identifier is retired by this merge.
    #[must_use]
    pub fn retired(&self) -> CommunityId {
        if self.merged == self.left {
            self.right
        } else {
            self.left
        }
    }
}

/// Collects merge events while the engine runs.
#[derive(Clone, Debug, Default)]
pub(crate) struct DendrogramRecorder {
    initial: Vec<CommunityId>,
    linkage: Vec<MergeEvent>,
}

impl DendrogramRecorder {
    /// Captures the assignment before the first merge.
    pub(crate) fn snapshot_initial_assignment(&mut self, assignment: &[usize]) {
        self.initial = assignment.iter().copied().map(CommunityId::new).collect();
    }

    pub(crate) fn record(&mut self, event: MergeEvent) {
        self.linkage.push(event);
    }

    pub(crate) fn finish<N>(self, edges: Vec<Edge<N>>) -> Dendrogram<N> {
        debug_assert_eq!(edges.len(), self.initial.len(), "snapshot covers every edge");
        Dendrogram {
            edges,
            initial: self.initial,
            linkage: self.linkage,
        }
    }
}

/// Full merge history of a run in [`crate::ClusteringMode::Dendrogram`].
///
/// # Examples
/// ```
/// use linkcom_core::{ClusteringMode, EdgeGraph, LinkClusteringBuilder};
///
/// let graph = EdgeGraph::from_edges([(1, 2), (2, 3), (1, 3)])?;
/// let result = LinkClusteringBuilder::new()
///     .with_mode(ClusteringMode::Dendrogram)
///     .build()?
///     .run(&graph)?;
/// let dendrogram = result.dendrogram().expect("dendrogram mode records merges");
/// assert_eq!(dendrogram.linkage().len(), 2);
/// assert_eq!(dendrogram.replay(0).community_count(), 3);
/// assert_eq!(&dendrogram.replay(2), result.edge_to_community());
/// # Ok::<(), linkcom_core::LinkcomError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Dendrogram<N> {
    edges: Vec<Edge<N>>,
    initial: Vec<CommunityId>,
    linkage: Vec<MergeEvent>,
}

impl<N> Dendrogram<N> {
    /// Canonical edges, indexed like the initial communities.
    #[must_use]
    pub fn edges(&self) -> &[Edge<N>] {
        &self.edges
    }

    /// Merge events in the order they were applied.
    #[must_use]
    pub fn linkage(&self) -> &[MergeEvent] {
        &self.linkage
    }

    /// Builds the index-linked tree of the history.
    ///
    /// Leaves `0..M` are the initial communities; event `k` creates internal
    /// node `M + k`. Roots are listed in ascending node order, one per
    /// community still live at the end of the run.
    ///
    /// # Examples
    /// ```
    /// use linkcom_core::{ClusteringMode, EdgeGraph, LinkClusteringBuilder};
    ///
    /// let graph = EdgeGraph::from_edges([(1, 2), (2, 3), (1, 3)])?;
    /// let result = LinkClusteringBuilder::new()
    ///     .with_mode(ClusteringMode::Dendrogram)
    ///     .build()?
    ///     .run(&graph)?;
    /// let tree = result.dendrogram().expect("recorded").tree();
    /// assert_eq!(tree.nodes().len(), 5);
    /// assert_eq!(tree.roots(), &[4]);
    /// assert_eq!(tree.nodes()[4].size(), 3);
    /// # Ok::<(), linkcom_core::LinkcomError>(())
    /// ```
    #[must_use]
    pub fn tree(&self) -> DendrogramTree {
        let leaves = self.initial.len();
        let mut nodes = Vec::with_capacity(leaves + self.linkage.len());
        nodes.extend(self.initial.iter().map(|&community| DendrogramNode {
            left: None,
            right: None,
            similarity: None,
            size: 1,
            community: Some(community),
        }));

        let mut component_node: Vec<usize> = (0..leaves).collect();
        let mut retired = vec![false; leaves];
        for event in &self.linkage {
            let new_id = nodes.len();
            nodes.push(DendrogramNode {
                left: Some(component_node[event.left.get()]),
                right: Some(component_node[event.right.get()]),
                similarity: Some(event.similarity),
                size: event.size,
                community: None,
            });
            component_node[event.merged.get()] = new_id;
            retired[event.retired().get()] = true;
        }

        let mut roots: Vec<usize> = (0..leaves)
            .filter(|&community| !retired[community])
            .map(|community| component_node[community])
            .collect();
        roots.sort_unstable();
        DendrogramTree { nodes, roots }
    }
}

impl<N: Node> Dendrogram<N> {
    /// Assignment before any merge.
    #[must_use]
    pub fn initial_assignment(&self) -> EdgeAssignment<N> {
        self.replay(0)
    }

    /// Assignment after applying the first `merges` events.
    ///
    /// Counts beyond the recorded history replay everything.
    #[must_use]
    pub fn replay(&self, merges: usize) -> EdgeAssignment<N> {
        let mut parent: Vec<usize> = (0..self.initial.len()).collect();
        for event in self.linkage.iter().take(merges) {
            parent[event.retired().get()] = event.merged.get();
        }
        let ids: Vec<usize> = self
            .initial
            .iter()
            .map(|community| find(&mut parent, community.get()))
            .collect();
        EdgeAssignment::from_indices(&self.edges, &ids)
    }

    /// Assignment after every event with similarity `>= similarity`.
    ///
    /// # Examples
    /// ```
    /// use linkcom_core::{ClusteringMode, EdgeGraph, LinkClusteringBuilder};
    ///
    /// let graph = EdgeGraph::from_edges([(0, 1), (0, 2), (1, 2), (2, 3), (2, 4), (3, 4)])?;
    /// let result = LinkClusteringBuilder::new()
    ///     .with_mode(ClusteringMode::Dendrogram)
    ///     .build()?
    ///     .run(&graph)?;
    /// let dendrogram = result.dendrogram().expect("recorded");
    /// assert_eq!(dendrogram.cut_at(0.6).community_count(), 2);
    /// assert_eq!(dendrogram.cut_at(0.0).community_count(), 1);
    /// # Ok::<(), linkcom_core::LinkcomError>(())
    /// ```
    #[must_use]
    pub fn cut_at(&self, similarity: f64) -> EdgeAssignment<N> {
        let merges = self
            .linkage
            .partition_point(|event| event.similarity >= similarity);
        self.replay(merges)
    }
}

fn find(parent: &mut [usize], mut node: usize) -> usize {
    let mut root = node;
    while parent[root] != root {
        root = parent[root];
    }
    while parent[node] != root {
        let next = parent[node];
        parent[node] = root;
        node = next;
    }
    root
}

/// A node of [`DendrogramTree`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DendrogramNode {
    left: Option<usize>,
    right: Option<usize>,
    similarity: Option<f64>,
    size: usize,
    community: Option<CommunityId>,
}

impl DendrogramNode {
    /// Child holding the first edge's community; `None` for leaves.
    #[must_use]
    #[rustfmt::skip]
    pub const fn left(&self) -> Option<usize> { self.left }

    /// Child holding the second edge's community; `None` for leaves.
    #[must_use]
    #[rustfmt::skip]
    pub const fn right(&self) -> Option<usize> { self.right }

    /// Merge height; `None` for leaves.
    #[must_use]
    #[rustfmt::skip]
    pub const fn similarity(&self) -> Option<f64> { self.similarity }

    /// Number of edges below this node.
    #[must_use]
    #[rustfmt::skip]
    pub const fn size(&self) -> usize { self.size }

    /// Initial community of a leaf.
    #[must_use]
    #[rustfmt::skip]
    pub const fn community(&self) -> Option<CommunityId> { self.community }

    /// Returns whether the node is a leaf.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.left.is_none()
    }
}

/// Arena of [`DendrogramNode`]s linked by index.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DendrogramTree {
    nodes: Vec<DendrogramNode>,
    roots: Vec<usize>,
}

impl DendrogramTree {
    /// Every node; leaves first, then one internal node per merge.
    #[must_use]
    pub fn nodes(&self) -> &[DendrogramNode] {
        &self.nodes
    }

    /// Nodes without a parent.
    #[must_use]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: usize) -> CommunityId {
        CommunityId::new(raw)
    }

    /// Path of four edges merged as (0,1) then (2,3) then both halves.
    fn recorded() -> Dendrogram<u8> {
        let mut recorder = DendrogramRecorder::default();
        recorder.snapshot_initial_assignment(&[0, 1, 2, 3]);
        recorder.record(MergeEvent::new(0.9, id(0), id(1), id(0), 2));
        recorder.record(MergeEvent::new(0.9, id(2), id(3), id(2), 2));
        recorder.record(MergeEvent::new(0.4, id(2), id(0), id(2), 4));
        recorder.finish(vec![
            Edge::new(0, 1),
            Edge::new(1, 2),
            Edge::new(2, 3),
            Edge::new(3, 4),
        ])
    }

    fn ids(assignment: &EdgeAssignment<u8>) -> Vec<usize> {
        assignment.iter().map(|(_, community)| community.get()).collect()
    }

    #[test]
    fn retired_is_the_non_surviving_side() {
        let event = MergeEvent::new(0.5, id(3), id(1), id(1), 2);
        assert_eq!(event.retired(), id(3));
    }

    #[test]
    fn replay_walks_the_history() {
        let dendrogram = recorded();
        assert_eq!(ids(&dendrogram.initial_assignment()), vec![0, 1, 2, 3]);
        assert_eq!(ids(&dendrogram.replay(1)), vec![0, 0, 2, 3]);
        assert_eq!(ids(&dendrogram.replay(2)), vec![0, 0, 2, 2]);
        assert_eq!(ids(&dendrogram.replay(3)), vec![2, 2, 2, 2]);
        assert_eq!(dendrogram.replay(99), dendrogram.replay(3));
    }

    #[test]
    fn cut_at_keeps_events_at_or_above_the_height() {
        let dendrogram = recorded();
        assert_eq!(dendrogram.cut_at(1.0), dendrogram.replay(0));
        assert_eq!(dendrogram.cut_at(0.9), dendrogram.replay(2));
        assert_eq!(dendrogram.cut_at(0.5), dendrogram.replay(2));
        assert_eq!(dendrogram.cut_at(0.4), dendrogram.replay(3));
    }

    #[test]
    fn tree_links_internal_nodes_by_index() {
        let tree = recorded().tree();
        let nodes = tree.nodes();
        assert_eq!(nodes.len(), 7);
        assert!(nodes[..4].iter().all(DendrogramNode::is_leaf));
        assert_eq!((nodes[4].left(), nodes[4].right()), (Some(0), Some(1)));
        assert_eq!((nodes[5].left(), nodes[5].right()), (Some(2), Some(3)));
        assert_eq!((nodes[6].left(), nodes[6].right()), (Some(5), Some(4)));
        assert_eq!(nodes[6].similarity(), Some(0.4));
        assert_eq!(nodes[6].size(), 4);
        assert_eq!(tree.roots(), &[6]);
    }

    #[test]
    fn tree_without_merges_is_a_forest_of_leaves() {
        let mut recorder = DendrogramRecorder::default();
        recorder.snapshot_initial_assignment(&[0, 1]);
        let tree = recorder
            .finish(vec![Edge::new(0, 1), Edge::new(2, 3)])
            .tree();
        assert_eq!(tree.roots(), &[0, 1]);
        assert_eq!(tree.nodes()[1].community(), Some(id(1)));
    }
}
