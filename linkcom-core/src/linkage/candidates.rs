//! Candidate pairs of incident edges, sorted for agglomeration.

use std::cmp::Ordering;

use tracing::{debug, instrument};

use crate::{
    graph::EdgeGraph,
    similarity::{EdgeSimilarity, IncidentPair},
};

/// Two edges sharing a node, scored by an [`EdgeSimilarity`].
///
/// Edges are referenced by their index in the graph's canonical edge order;
/// `first < second` always holds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CandidatePair {
    similarity: f64,
    first: usize,
    second: usize,
}

impl CandidatePair {
    /// Creates a candidate, ordering the two edge indices.
    #[must_use]
    pub fn new(similarity: f64, a: usize, b: usize) -> Self {
        Self {
            similarity,
            first: a.min(b),
            second: a.max(b),
        }
    }

    /// Similarity of the two edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn similarity(&self) -> f64 { self.similarity }

    /// Index of the smaller edge.
    #[must_use]
    #[rustfmt::skip]
    pub fn first(&self) -> usize { self.first }

    /// Index of the larger edge.
    #[must_use]
    #[rustfmt::skip]
    pub fn second(&self) -> usize { self.second }
}

impl Eq for CandidatePair {}

/// Most similar first; equal similarities fall back to edge order.
impl Ord for CandidatePair {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .similarity
            .total_cmp(&self.similarity)
            .then_with(|| self.first.cmp(&other.first))
            .then_with(|| self.second.cmp(&other.second))
    }
}

impl PartialOrd for CandidatePair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Every pair of incident edges in a graph, in merge order.
///
/// # Examples
/// ```
/// use linkcom_core::{CandidateList, EdgeGraph, Jaccard};
///
/// let graph = EdgeGraph::from_edges([(1, 2), (2, 3), (1, 3)])?;
/// let candidates = CandidateList::from_graph(&graph, &Jaccard::new(&graph));
/// assert_eq!(candidates.len(), 3);
/// assert_eq!(candidates.max_similarity(), Some(1.0));
/// assert_eq!(candidates.levels().count(), 1);
/// # Ok::<(), linkcom_core::LinkcomError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandidateList {
    pairs: Vec<CandidatePair>,
}

impl CandidateList {
    /// Scores every unordered pair of edges sharing a node.
    ///
    /// A node of degree `k` contributes `k (k - 1) / 2` pairs. Two distinct
    /// edges of a simple graph share at most one node, so no pair is
    /// produced twice.
    #[instrument(
        name = "core.similarities",
        skip(graph, similarity),
        fields(nodes = graph.node_count(), edges = graph.edge_count()),
    )]
    pub fn from_graph<N, S>(graph: &EdgeGraph<N>, similarity: &S) -> Self
    where
        S: EdgeSimilarity + ?Sized,
    {
        let incident = incident_edges(graph);
        let mut pairs = Vec::new();
        for (pivot, around) in incident.iter().enumerate() {
            for (offset, &(left, left_edge)) in around.iter().enumerate() {
                for &(right, right_edge) in &around[offset + 1..] {
                    let score = similarity.similarity(IncidentPair { pivot, left, right });
                    pairs.push(CandidatePair::new(score, left_edge, right_edge));
                }
            }
        }
        pairs.sort_unstable();

        #[cfg(feature = "metrics")]
        metrics::counter!("linkcom_candidate_pairs").increment(pairs.len() as u64);
        debug!(candidate_pairs = pairs.len(), "scored incident edge pairs");
        Self { pairs }
    }

    /// Returns the candidates in merge order.
    #[must_use]
    pub fn pairs(&self) -> &[CandidatePair] {
        &self.pairs
    }

    /// Returns the number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns whether no two edges share a node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Highest similarity among the candidates.
    #[must_use]
    pub fn max_similarity(&self) -> Option<f64> {
        self.pairs.first().map(CandidatePair::similarity)
    }

    /// Groups candidates of equal similarity, most similar level first.
    pub fn levels(&self) -> impl Iterator<Item = (f64, &[CandidatePair])> + '_ {
        self.pairs
            .chunk_by(|a, b| a.similarity.total_cmp(&b.similarity).is_eq())
            .filter_map(|level| level.first().map(|head| (head.similarity, level)))
    }
}

/// Lists `(neighbour, edge index)` for every node, sorted by neighbour.
fn incident_edges<N>(graph: &EdgeGraph<N>) -> Vec<Vec<(usize, usize)>> {
    let mut incident = vec![Vec::new(); graph.node_count()];
    for (index, edge) in graph.indexed_edges().iter().enumerate() {
        incident[*edge.source()].push((*edge.target(), index));
        incident[*edge.target()].push((*edge.source(), index));
    }
    for around in &mut incident {
        around.sort_unstable();
    }
    incident
}
