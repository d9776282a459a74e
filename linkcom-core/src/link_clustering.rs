//! Link clustering orchestration.
//!
//! Ties together the similarity measure chosen by [`Weighting`], candidate
//! generation and single-linkage agglomeration, and converts the raw outcome
//! into a [`LinkClusteringResult`].

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::{
    Result,
    builder::{ClusteringMode, Weighting, validate_mode},
    edge::{Edge, Node},
    graph::EdgeGraph,
    linkage::{CandidateList, single_linkage},
    result::{EdgeAssignment, LinkClusteringResult},
    similarity::{EdgeSimilarity, Jaccard, Tanimoto},
};

/// Entry point for running link clustering.
///
/// # Examples
/// ```
/// use linkcom_core::{ClusteringMode, EdgeGraph, LinkClusteringBuilder};
///
/// // Two triangles sharing node 2.
/// let graph = EdgeGraph::from_edges([(0, 1), (0, 2), (1, 2), (2, 3), (2, 4), (3, 4)])?;
/// let result = LinkClusteringBuilder::new()
///     .with_mode(ClusteringMode::BestCut)
///     .build()?
///     .run(&graph)?;
/// assert_eq!(result.edge_to_community().community_count(), 2);
/// assert_eq!(result.max_similarity(), Some(0.6));
/// assert!((result.partition_density() - 1.0).abs() < 1e-12);
/// # Ok::<(), linkcom_core::LinkcomError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkClustering {
    mode: ClusteringMode,
    weighting: Weighting,
}

impl LinkClustering {
    pub(crate) fn new(mode: ClusteringMode, weighting: Weighting) -> Self {
        Self { mode, weighting }
    }

    /// Returns the configured clustering mode.
    #[must_use]
    #[rustfmt::skip]
    pub fn mode(&self) -> ClusteringMode { self.mode }

    /// Returns the configured weighting.
    #[must_use]
    #[rustfmt::skip]
    pub fn weighting(&self) -> Weighting { self.weighting }

    /// Clusters the edges of `graph`.
    ///
    /// An empty graph yields an empty assignment with density `0`.
    ///
    /// # Errors
    /// Returns [`crate::LinkcomError::InconsistentWeights`] when weighted
    /// clustering is requested and any edge lacks a weight.
    #[instrument(
        name = "core.run",
        err,
        skip(self, graph),
        fields(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            mode = ?self.mode,
            weighting = ?self.weighting
        ),
    )]
    pub fn run<N: Node>(&self, graph: &EdgeGraph<N>) -> Result<LinkClusteringResult<N>> {
        let candidates = self.candidates(graph)?;
        let result = finish(graph, &candidates, self.mode);
        info!(
            communities = result.edge_to_community().community_count(),
            density = result.partition_density(),
            merges = result.merge_count(),
            "link clustering completed"
        );
        Ok(result)
    }

    /// Clusters `graph` with a caller-supplied similarity measure.
    ///
    /// The configured [`Weighting`] is ignored.
    ///
    /// # Examples
    /// ```
    /// use linkcom_core::{EdgeGraph, EdgeSimilarity, IncidentPair, LinkClusteringBuilder};
    ///
    /// struct Constant;
    ///
    /// impl EdgeSimilarity for Constant {
    ///     fn similarity(&self, _pair: IncidentPair) -> f64 {
    ///         0.5
    ///     }
    /// }
    ///
    /// let graph = EdgeGraph::from_edges([(1, 2), (2, 3), (3, 4)])?;
    /// let result = LinkClusteringBuilder::new()
    ///     .build()?
    ///     .run_with_similarity(&graph, &Constant);
    /// assert_eq!(result.edge_to_community().community_count(), 1);
    /// # Ok::<(), linkcom_core::LinkcomError>(())
    /// ```
    #[must_use]
    pub fn run_with_similarity<N, S>(
        &self,
        graph: &EdgeGraph<N>,
        similarity: &S,
    ) -> LinkClusteringResult<N>
    where
        N: Node,
        S: EdgeSimilarity + ?Sized,
    {
        let candidates = CandidateList::from_graph(graph, similarity);
        finish(graph, &candidates, self.mode)
    }

    /// Scores every incident edge pair of `graph` with the configured
    /// similarity measure.
    ///
    /// # Errors
    /// Returns [`crate::LinkcomError::InconsistentWeights`] when weighted
    /// clustering is requested and any edge lacks a weight.
    pub fn candidates<N: Node>(&self, graph: &EdgeGraph<N>) -> Result<CandidateList> {
        Ok(match self.weighting {
            Weighting::Unweighted => CandidateList::from_graph(graph, &Jaccard::new(graph)),
            Weighting::Weighted => CandidateList::from_graph(graph, &Tanimoto::new(graph)?),
        })
    }

    /// Runs one threshold-mode clustering per entry of `thresholds`.
    ///
    /// Candidates are scored once and shared by every run. Results are
    /// returned in the order of `thresholds`. The configured mode is
    /// ignored.
    ///
    /// # Errors
    /// Returns [`crate::LinkcomError::InvalidThreshold`] for thresholds
    /// outside `[0, 1]` and the errors of [`Self::candidates`].
    ///
    /// # Examples
    /// ```
    /// use linkcom_core::{EdgeGraph, LinkClusteringBuilder};
    ///
    /// let graph = EdgeGraph::from_edges([(0, 1), (0, 2), (1, 2), (2, 3), (2, 4), (3, 4)])?;
    /// let results = LinkClusteringBuilder::new()
    ///     .build()?
    ///     .sweep_thresholds(&graph, &[1.0, 0.6, 0.0])?;
    /// let counts: Vec<_> = results
    ///     .iter()
    ///     .map(|result| result.edge_to_community().community_count())
    ///     .collect();
    /// assert_eq!(counts, vec![4, 2, 1]);
    /// # Ok::<(), linkcom_core::LinkcomError>(())
    /// ```
    pub fn sweep_thresholds<N>(
        &self,
        graph: &EdgeGraph<N>,
        thresholds: &[f64],
    ) -> Result<Vec<LinkClusteringResult<N>>>
    where
        N: Node + Send + Sync,
    {
        let modes: Vec<ClusteringMode> = thresholds
            .iter()
            .map(|&threshold| {
                let mode = ClusteringMode::Threshold(threshold);
                validate_mode(mode).map(|()| mode)
            })
            .collect::<Result<_>>()?;
        let candidates = self.candidates(graph)?;

        #[cfg(feature = "parallel")]
        let results = modes
            .par_iter()
            .map(|&mode| finish(graph, &candidates, mode))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let results = modes
            .iter()
            .map(|&mode| finish(graph, &candidates, mode))
            .collect();
        Ok(results)
    }
}

fn finish<N: Node>(
    graph: &EdgeGraph<N>,
    candidates: &CandidateList,
    mode: ClusteringMode,
) -> LinkClusteringResult<N> {
    let linkage = single_linkage(graph, candidates, mode);
    let edges: Vec<Edge<N>> = graph.edges().collect();
    let assignment = EdgeAssignment::from_indices(&edges, &linkage.assignment);
    let dendrogram = linkage.recorder.map(|recorder| recorder.finish(edges));
    LinkClusteringResult {
        mode,
        assignment,
        density: linkage.density,
        best: linkage.best,
        history: linkage.history,
        dendrogram,
        merges: linkage.merges,
        candidate_pairs: candidates.len(),
    }
}
