//! Graph adapter: validated adjacency, edge and weight snapshots.
//!
//! Callers describe their graph either edge by edge through
//! [`EdgeGraphBuilder`] or as the adjacency/edge/weight triple accepted by
//! [`EdgeGraph::from_adjacency`]. Both paths reject graphs that are not simple
//! and undirected, so the clustering engine never re-checks shape.
//!
//! Nodes are interned to dense indices assigned in `Ord` order. Index order
//! therefore agrees with node order and the canonical form of an indexed edge
//! matches the canonical form of the original edge.

use std::collections::{HashMap, HashSet};

use crate::{
    Result,
    edge::{Edge, Node, normalize},
    error::{GraphShapeViolation, LinkcomError, describe},
};

/// Immutable snapshot of an undirected simple graph ready for clustering.
///
/// # Examples
/// ```
/// use linkcom_core::{Edge, EdgeGraph};
///
/// let graph = EdgeGraph::from_edges([("b", "a"), ("b", "c")])?;
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.edge(0), Some(Edge::new("a", "b")));
/// # Ok::<(), linkcom_core::LinkcomError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeGraph<N> {
    nodes: Vec<N>,
    adjacency: Vec<Vec<usize>>,
    edges: Vec<Edge<usize>>,
    weights: Vec<Option<f64>>,
}

impl<N: Node> EdgeGraph<N> {
    /// Builds an unweighted graph from an iterator of endpoint pairs.
    ///
    /// # Errors
    /// Returns [`LinkcomError::InvalidGraphShape`] for self-loops and repeated
    /// edges.
    pub fn from_edges<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut builder = EdgeGraphBuilder::new();
        for (a, b) in edges {
            builder.add_edge(a, b)?;
        }
        Ok(builder.build())
    }

    /// Builds a weighted graph from an iterator of `(a, b, weight)` triples.
    ///
    /// # Errors
    /// Returns [`LinkcomError::InvalidGraphShape`] for self-loops and repeated
    /// edges and [`LinkcomError::InvalidWeight`] for non-finite or
    /// non-positive weights.
    pub fn from_weighted_edges<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, N, f64)>,
    {
        let mut builder = EdgeGraphBuilder::new();
        for (a, b, weight) in edges {
            builder.add_weighted_edge(a, b, weight)?;
        }
        Ok(builder.build())
    }

    /// Builds a graph from an adjacency map, a canonical edge set and an
    /// optional weight map.
    ///
    /// Every edge must be stored as `(smaller, larger)`, appear in both
    /// endpoints' neighbour sets, and every neighbour relation must be backed
    /// by an edge. Weights, when given, are looked up by canonical edge; an
    /// edge missing from the map stays unweighted and is reported by weighted
    /// clustering as [`LinkcomError::InconsistentWeights`].
    ///
    /// # Errors
    /// Returns [`LinkcomError::InvalidGraphShape`] when the three structures
    /// disagree or describe a non-simple graph, and
    /// [`LinkcomError::InvalidWeight`] for non-finite or non-positive weights.
    ///
    /// # Examples
    /// ```
    /// use std::collections::{HashMap, HashSet};
    /// use linkcom_core::EdgeGraph;
    ///
    /// let adjacency = HashMap::from([
    ///     (1, HashSet::from([2])),
    ///     (2, HashSet::from([1])),
    /// ]);
    /// let edges = HashSet::from([(1, 2)]);
    /// let graph = EdgeGraph::from_adjacency(&adjacency, &edges, None)?;
    /// assert_eq!(graph.edge_count(), 1);
    /// assert!(!graph.is_weighted());
    /// # Ok::<(), linkcom_core::LinkcomError>(())
    /// ```
    pub fn from_adjacency(
        adjacency: &HashMap<N, HashSet<N>>,
        edges: &HashSet<(N, N)>,
        weights: Option<&HashMap<(N, N), f64>>,
    ) -> Result<Self> {
        let mut sorted: Vec<&(N, N)> = edges.iter().collect();
        sorted.sort_unstable();

        let mut entries = Vec::with_capacity(sorted.len());
        for (a, b) in sorted {
            if a == b {
                return Err(LinkcomError::shape(GraphShapeViolation::SelfLoop {
                    node: describe(a),
                }));
            }
            if a > b {
                return Err(LinkcomError::shape(GraphShapeViolation::NonCanonicalEdge {
                    left: describe(a),
                    right: describe(b),
                }));
            }
            let listed = |x: &N, y: &N| adjacency.get(x).is_some_and(|set| set.contains(y));
            if !listed(a, b) || !listed(b, a) {
                return Err(LinkcomError::shape(GraphShapeViolation::AdjacencyMismatch {
                    left: describe(a),
                    right: describe(b),
                }));
            }
            let weight = match weights.and_then(|map| map.get(&(a.clone(), b.clone()))) {
                Some(&weight) => Some(validate_weight(a, b, weight)?),
                None => None,
            };
            entries.push((Edge::new(a.clone(), b.clone()), weight));
        }

        validate_adjacency(adjacency, edges)?;

        let mut nodes: Vec<N> = adjacency.keys().cloned().collect();
        nodes.sort_unstable();
        Ok(Self::assemble(nodes, entries))
    }

    /// Interns `nodes` together with every endpoint of `entries` and indexes
    /// the already validated edges.
    fn assemble(mut nodes: Vec<N>, entries: Vec<(Edge<N>, Option<f64>)>) -> Self {
        for (edge, _) in &entries {
            nodes.push(edge.source().clone());
            nodes.push(edge.target().clone());
        }
        nodes.sort_unstable();
        nodes.dedup();

        let index: HashMap<&N, usize> = nodes.iter().enumerate().map(|(i, n)| (n, i)).collect();
        let mut indexed: Vec<(Edge<usize>, Option<f64>)> = entries
            .iter()
            .map(|(edge, weight)| {
                (
                    Edge::new(index[edge.source()], index[edge.target()]),
                    *weight,
                )
            })
            .collect();
        indexed.sort_unstable_by(|left, right| left.0.cmp(&right.0));

        let mut adjacency = vec![Vec::new(); nodes.len()];
        for (edge, _) in &indexed {
            adjacency[*edge.source()].push(*edge.target());
            adjacency[*edge.target()].push(*edge.source());
        }
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
        }

        let (edges, weights) = indexed.into_iter().unzip();
        Self {
            nodes,
            adjacency,
            edges,
            weights,
        }
    }

    /// Returns the node stored at `index`.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&N> {
        self.nodes.get(index)
    }

    /// Returns the canonical edge stored at `index`.
    #[must_use]
    pub fn edge(&self, index: usize) -> Option<Edge<N>> {
        self.edges.get(index).map(|edge| self.resolve(*edge))
    }

    /// Iterates over the canonical edges in sorted order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = Edge<N>> + '_ {
        self.edges.iter().map(|edge| self.resolve(*edge))
    }

    /// Returns the weight of `edge`, if the graph carries one for it.
    #[must_use]
    pub fn weight_of(&self, edge: &Edge<N>) -> Option<f64> {
        let source = self.nodes.binary_search(edge.source()).ok()?;
        let target = self.nodes.binary_search(edge.target()).ok()?;
        self.edge_index(source, target)
            .and_then(|index| self.weights[index])
    }

    fn resolve(&self, edge: Edge<usize>) -> Edge<N> {
        Edge::new(
            self.nodes[*edge.source()].clone(),
            self.nodes[*edge.target()].clone(),
        )
    }
}

impl<N> EdgeGraph<N> {
    /// Returns the interned nodes in sorted order.
    #[must_use]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Returns the number of distinct nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the graph has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns whether every edge carries a weight.
    ///
    /// An empty graph is never considered weighted.
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        !self.weights.is_empty() && self.weights.iter().all(Option::is_some)
    }

    pub(crate) fn indexed_edges(&self) -> &[Edge<usize>] {
        &self.edges
    }

    /// Returns the sorted neighbour indices of the node at index `node`.
    ///
    /// # Panics
    /// Panics when `node >= self.node_count()`.
    #[must_use]
    pub fn neighbours(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }

    pub(crate) fn weight(&self, edge: usize) -> Option<f64> {
        self.weights[edge]
    }

    /// Locates the edge joining two node indices.
    pub(crate) fn edge_index(&self, a: usize, b: usize) -> Option<usize> {
        self.edges.binary_search(&Edge::new(a, b)).ok()
    }
}

/// Incrementally collects edges and validates simple-graph shape.
///
/// # Examples
/// ```
/// use linkcom_core::{EdgeGraphBuilder, LinkcomErrorCode};
///
/// let mut builder = EdgeGraphBuilder::new();
/// builder.add_weighted_edge("a", "b", 2.0)?;
/// let err = builder.add_edge("b", "a").expect_err("parallel edge");
/// assert_eq!(err.code(), LinkcomErrorCode::InvalidGraphShape);
/// let graph = builder.build();
/// assert!(graph.is_weighted());
/// # Ok::<(), linkcom_core::LinkcomError>(())
/// ```
#[derive(Clone, Debug)]
pub struct EdgeGraphBuilder<N> {
    seen: HashSet<Edge<N>>,
    entries: Vec<(Edge<N>, Option<f64>)>,
}

impl<N: Node> Default for EdgeGraphBuilder<N> {
    fn default() -> Self {
        Self {
            seen: HashSet::new(),
            entries: Vec::new(),
        }
    }
}

impl<N: Node> EdgeGraphBuilder<N> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unweighted edge.
    ///
    /// # Errors
    /// Returns [`LinkcomError::InvalidGraphShape`] when `a == b` or when the
    /// edge was already added in either orientation.
    pub fn add_edge(&mut self, a: N, b: N) -> Result<&mut Self> {
        let edge = self.check_shape(a, b)?;
        self.insert(edge, None);
        Ok(self)
    }

    /// Adds a weighted edge.
    ///
    /// # Errors
    /// Returns [`LinkcomError::InvalidGraphShape`] as for
    /// [`Self::add_edge`] and [`LinkcomError::InvalidWeight`] when `weight`
    /// is non-finite or not strictly positive.
    pub fn add_weighted_edge(&mut self, a: N, b: N, weight: f64) -> Result<&mut Self> {
        let edge = self.check_shape(a, b)?;
        let weight = validate_weight(edge.source(), edge.target(), weight)?;
        self.insert(edge, Some(weight));
        Ok(self)
    }

    /// Returns whether the canonical form of `(a, b)` was already added.
    #[must_use]
    pub fn contains(&self, a: &N, b: &N) -> bool {
        self.seen.contains(&Edge::new(a.clone(), b.clone()))
    }

    /// Returns the number of edges added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no edges were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freezes the collected edges into an [`EdgeGraph`].
    #[must_use]
    pub fn build(self) -> EdgeGraph<N> {
        EdgeGraph::assemble(Vec::new(), self.entries)
    }

    fn check_shape(&self, a: N, b: N) -> Result<Edge<N>> {
        if a == b {
            return Err(LinkcomError::shape(GraphShapeViolation::SelfLoop {
                node: describe(&a),
            }));
        }
        let edge = Edge::new(a, b);
        if self.seen.contains(&edge) {
            return Err(LinkcomError::shape(GraphShapeViolation::ParallelEdge {
                left: describe(edge.source()),
                right: describe(edge.target()),
            }));
        }
        Ok(edge)
    }

    fn insert(&mut self, edge: Edge<N>, weight: Option<f64>) {
        self.seen.insert(edge.clone());
        self.entries.push((edge, weight));
    }
}

fn validate_weight<N: Node>(a: &N, b: &N, weight: f64) -> Result<f64> {
    if weight.is_finite() && weight > 0.0 {
        Ok(weight)
    } else {
        Err(LinkcomError::InvalidWeight {
            edge: describe(&(a, b)),
            weight,
        })
    }
}

fn validate_adjacency<N: Node>(
    adjacency: &HashMap<N, HashSet<N>>,
    edges: &HashSet<(N, N)>,
) -> Result<()> {
    let mut keys: Vec<&N> = adjacency.keys().collect();
    keys.sort_unstable();
    for node in keys {
        let mut neighbours: Vec<&N> = adjacency[node].iter().collect();
        neighbours.sort_unstable();
        for neighbour in neighbours {
            if neighbour == node {
                return Err(LinkcomError::shape(GraphShapeViolation::SelfLoop {
                    node: describe(node),
                }));
            }
            if !adjacency
                .get(neighbour)
                .is_some_and(|set| set.contains(node))
            {
                return Err(LinkcomError::shape(
                    GraphShapeViolation::AsymmetricAdjacency {
                        node: describe(node),
                        neighbour: describe(neighbour),
                    },
                ));
            }
            if !edges.contains(&normalize(node.clone(), neighbour.clone())) {
                let (left, right) = normalize(node, neighbour);
                return Err(LinkcomError::shape(GraphShapeViolation::AdjacencyMismatch {
                    left: describe(left),
                    right: describe(right),
                }));
            }
        }
    }
    Ok(())
}
