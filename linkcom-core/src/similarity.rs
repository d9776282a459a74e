//! Similarity between incident edges.
//!
//! Two edges `(pivot, left)` and `(pivot, right)` sharing the pivot node are
//! compared through the closed neighbourhoods of their non-pivot endpoints.
//! The orchestration loop is written once against [`EdgeSimilarity`]; the
//! unweighted and weighted measures are interchangeable strategies.

use crate::{
    Result,
    edge::Node,
    error::{LinkcomError, describe},
    graph::EdgeGraph,
};

/// Two incident edges `(pivot, left)` and `(pivot, right)`, as node indices
/// of an [`EdgeGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IncidentPair {
    /// The node shared by both edges.
    pub pivot: usize,
    /// Non-pivot endpoint of the first edge.
    pub left: usize,
    /// Non-pivot endpoint of the second edge.
    pub right: usize,
}

/// Similarity capability driving the single-linkage engine.
///
/// Implementations are only ever asked about edges that share a pivot and
/// must return a value in `(0, 1]` for them.
pub trait EdgeSimilarity {
    /// Scores the pair of incident edges described by `pair`.
    ///
    /// # Panics
    /// The built-in measures panic when `pair.left` or `pair.right` is not a
    /// node index of the graph they were built from.
    fn similarity(&self, pair: IncidentPair) -> f64;
}

/// Jaccard similarity of the closed neighbourhoods `N+(left)` and
/// `N+(right)`.
///
/// # Panics
/// [`EdgeSimilarity::similarity`] panics when an endpoint of the pair is not
/// smaller than the node count of the graph passed to [`Jaccard::new`].
///
/// # Examples
/// ```
/// use linkcom_core::{EdgeGraph, EdgeSimilarity, IncidentPair, Jaccard};
///
/// // Path 0 - 1 - 2: N+(0) = {0, 1}, N+(2) = {1, 2}.
/// let graph = EdgeGraph::from_edges([(0, 1), (1, 2)])?;
/// let jaccard = Jaccard::new(&graph);
/// let score = jaccard.similarity(IncidentPair { pivot: 1, left: 0, right: 2 });
/// assert!((score - 1.0 / 3.0).abs() < 1e-12);
/// # Ok::<(), linkcom_core::LinkcomError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Jaccard {
    closed: Vec<Vec<usize>>,
}

impl Jaccard {
    /// Precomputes the sorted closed neighbourhood of every node.
    #[must_use]
    pub fn new<N>(graph: &EdgeGraph<N>) -> Self {
        let closed = (0..graph.node_count())
            .map(|node| {
                let mut inclusive = graph.neighbours(node).to_vec();
                let at = inclusive.partition_point(|&other| other < node);
                inclusive.insert(at, node);
                inclusive
            })
            .collect();
        Self { closed }
    }
}

impl EdgeSimilarity for Jaccard {
    fn similarity(&self, pair: IncidentPair) -> f64 {
        let left = &self.closed[pair.left];
        let right = &self.closed[pair.right];
        let shared = intersect(left, right).count();
        let union = left.len() + right.len() - shared;
        shared as f64 / union as f64
    }
}

/// Tanimoto coefficient over weighted closed neighbourhoods.
///
/// Each node `x` receives a self weight `A[x, x]`, the mean weight of its
/// incident edges, and `A[x, y] = w(x, y)` for its neighbours. With
/// `|a_x|² = Σ_{y ∈ N+(x)} A[x, y]²` the similarity is
/// `a_i · a_j / (|a_i|² + |a_j|² − a_i · a_j)`, the dot product running over
/// `N+(i) ∩ N+(j)`. Uniform weights reduce it to [`Jaccard`].
///
/// # Panics
/// [`EdgeSimilarity::similarity`] panics when an endpoint of the pair is not
/// smaller than the node count of the graph passed to [`Tanimoto::new`].
///
/// # Examples
/// ```
/// use linkcom_core::{EdgeGraph, EdgeSimilarity, IncidentPair, Jaccard, Tanimoto};
///
/// let graph = EdgeGraph::from_weighted_edges([(0, 1, 3.0), (1, 2, 3.0), (0, 2, 3.0)])?;
/// let pair = IncidentPair { pivot: 0, left: 1, right: 2 };
/// let weighted = Tanimoto::new(&graph)?.similarity(pair);
/// let unweighted = Jaccard::new(&graph).similarity(pair);
/// assert!((weighted - unweighted).abs() < 1e-12);
/// # Ok::<(), linkcom_core::LinkcomError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Tanimoto {
    closed: Vec<Vec<(usize, f64)>>,
    norms: Vec<f64>,
}

impl Tanimoto {
    /// Precomputes weighted closed neighbourhoods and their squared norms.
    ///
    /// # Errors
    /// Returns [`LinkcomError::InconsistentWeights`] when any edge of
    /// `graph` carries no weight.
    pub fn new<N: Node>(graph: &EdgeGraph<N>) -> Result<Self> {
        let mut closed: Vec<Vec<(usize, f64)>> = vec![Vec::new(); graph.node_count()];
        for (index, edge) in graph.indexed_edges().iter().enumerate() {
            let weight = graph.weight(index).ok_or_else(|| {
                LinkcomError::InconsistentWeights {
                    edge: graph
                        .edge(index)
                        .map_or_else(|| describe(&index), |edge| describe(&edge.into_pair())),
                }
            })?;
            closed[*edge.source()].push((*edge.target(), weight));
            closed[*edge.target()].push((*edge.source(), weight));
        }

        let mut norms = Vec::with_capacity(closed.len());
        for (node, weighted) in closed.iter_mut().enumerate() {
            let self_weight = if weighted.is_empty() {
                0.0
            } else {
                weighted.iter().map(|(_, weight)| weight).sum::<f64>() / weighted.len() as f64
            };
            weighted.push((node, self_weight));
            weighted.sort_unstable_by_key(|(other, _)| *other);
            norms.push(weighted.iter().map(|(_, weight)| weight * weight).sum());
        }

        Ok(Self { closed, norms })
    }
}

impl EdgeSimilarity for Tanimoto {
    fn similarity(&self, pair: IncidentPair) -> f64 {
        let left = &self.closed[pair.left];
        let right = &self.closed[pair.right];
        let mut dot = 0.0;
        let (mut i, mut j) = (0, 0);
        while i < left.len() && j < right.len() {
            let (left_node, left_weight) = left[i];
            let (right_node, right_weight) = right[j];
            match left_node.cmp(&right_node) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += left_weight * right_weight;
                    i += 1;
                    j += 1;
                }
            }
        }
        dot / (self.norms[pair.left] + self.norms[pair.right] - dot)
    }
}

/// Iterates over the elements common to two sorted slices.
fn intersect<'a>(left: &'a [usize], right: &'a [usize]) -> impl Iterator<Item = usize> + 'a {
    let (mut i, mut j) = (0, 0);
    std::iter::from_fn(move || {
        while i < left.len() && j < right.len() {
            let (a, b) = (left[i], right[j]);
            if a < b {
                i += 1;
            } else if a > b {
                j += 1;
            } else {
                i += 1;
                j += 1;
                return Some(a);
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::LinkcomErrorCode;

    const EPSILON: f64 = 1e-12;

    fn square_with_diagonal() -> EdgeGraph<u32> {
        EdgeGraph::from_edges([(1, 2), (2, 3), (3, 4), (4, 1), (1, 3)])
            .expect("square with diagonal is simple")
    }

    fn index_of(graph: &EdgeGraph<u32>, node: u32) -> usize {
        graph
            .nodes()
            .binary_search(&node)
            .expect("node must be present")
    }

    fn pair(graph: &EdgeGraph<u32>, pivot: u32, left: u32, right: u32) -> IncidentPair {
        IncidentPair {
            pivot: index_of(graph, pivot),
            left: index_of(graph, left),
            right: index_of(graph, right),
        }
    }

    #[rstest]
    #[case::across_diagonal(2, 1, 3, 1.0)]
    #[case::along_square(1, 2, 3, 0.75)]
    #[case::opposite_corners(1, 2, 4, 0.5)]
    #[case::diagonal_and_side(3, 1, 4, 0.75)]
    fn jaccard_scores_square_with_diagonal(
        #[case] pivot: u32,
        #[case] left: u32,
        #[case] right: u32,
        #[case] expected: f64,
    ) {
        let graph = square_with_diagonal();
        let jaccard = Jaccard::new(&graph);
        let score = jaccard.similarity(pair(&graph, pivot, left, right));
        assert!((score - expected).abs() < EPSILON, "got {score}");
    }

    #[test]
    fn jaccard_is_symmetric() {
        let graph = square_with_diagonal();
        let jaccard = Jaccard::new(&graph);
        let forward = jaccard.similarity(pair(&graph, 1, 2, 4));
        let backward = jaccard.similarity(pair(&graph, 1, 4, 2));
        assert_eq!(forward, backward);
    }

    #[rstest]
    #[case(1.0)]
    #[case(2.5)]
    #[case(0.125)]
    fn uniform_weights_reduce_to_jaccard(#[case] weight: f64) {
        let unweighted = square_with_diagonal();
        let weighted = EdgeGraph::from_weighted_edges(
            unweighted
                .edges()
                .map(|edge| {
                    let (a, b) = edge.into_pair();
                    (a, b, weight)
                })
                .collect::<Vec<_>>(),
        )
        .expect("weighted graph is simple");
        let jaccard = Jaccard::new(&unweighted);
        let tanimoto = Tanimoto::new(&weighted).expect("every edge is weighted");

        for (pivot, left, right) in [(1, 2, 3), (1, 2, 4), (1, 3, 4), (2, 1, 3), (3, 2, 4)] {
            let expected = jaccard.similarity(pair(&unweighted, pivot, left, right));
            let actual = tanimoto.similarity(pair(&weighted, pivot, left, right));
            assert!((expected - actual).abs() < EPSILON, "{expected} != {actual}");
        }
    }

    #[test]
    fn heavier_shared_neighbourhood_raises_similarity() {
        // Pivot 0 joins 1 and 2; both also touch 3. Heavier ties to 3 make the
        // neighbourhoods of 1 and 2 more alike.
        let light = EdgeGraph::from_weighted_edges([
            (0, 1, 1.0),
            (0, 2, 1.0),
            (1, 3, 1.0),
            (2, 3, 1.0),
        ])
        .expect("simple graph");
        let heavy = EdgeGraph::from_weighted_edges([
            (0, 1, 1.0),
            (0, 2, 1.0),
            (1, 3, 4.0),
            (2, 3, 4.0),
        ])
        .expect("simple graph");
        let joined = IncidentPair {
            pivot: 0,
            left: 1,
            right: 2,
        };
        let light_score = Tanimoto::new(&light).expect("weighted").similarity(joined);
        let heavy_score = Tanimoto::new(&heavy).expect("weighted").similarity(joined);
        assert!(heavy_score > light_score);
        assert!(heavy_score <= 1.0);
    }

    #[test]
    fn tanimoto_rejects_unweighted_edges() {
        let graph = square_with_diagonal();
        let err = Tanimoto::new(&graph).expect_err("unweighted graph must be rejected");
        assert_eq!(err.code(), LinkcomErrorCode::InconsistentWeights);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn jaccard_panics_on_foreign_node_index() {
        let graph = square_with_diagonal();
        let jaccard = Jaccard::new(&graph);
        let _score = jaccard.similarity(IncidentPair {
            pivot: 0,
            left: 1,
            right: graph.node_count(),
        });
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn tanimoto_panics_on_foreign_node_index() {
        let graph = EdgeGraph::from_weighted_edges([(0, 1, 1.0), (1, 2, 1.0)])
            .expect("simple graph");
        let tanimoto = Tanimoto::new(&graph).expect("every edge is weighted");
        let _score = tanimoto.similarity(IncidentPair {
            pivot: 1,
            left: graph.node_count(),
            right: 2,
        });
    }

    #[test]
    fn intersect_walks_sorted_slices() {
        let shared: Vec<_> = intersect(&[1, 3, 5, 7], &[2, 3, 4, 7, 9]).collect();
        assert_eq!(shared, vec![3, 7]);
    }
}
