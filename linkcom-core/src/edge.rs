//! Canonical undirected edges.

use std::fmt;
use std::hash::Hash;

/// Node identifiers accepted by the clustering engine.
///
/// Any clonable, hashable, totally ordered type qualifies. The ordering fixes
/// the canonical endpoint order of every edge and therefore the deterministic
/// tie-break between candidate pairs of equal similarity.
pub trait Node: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<T> Node for T where T: Clone + Eq + Hash + Ord + fmt::Debug {}

/// Returns the canonical `(smaller, larger)` ordering of two endpoints.
///
/// # Examples
/// ```
/// use linkcom_core::normalize;
///
/// assert_eq!(normalize(7, 3), (3, 7));
/// assert_eq!(normalize(3, 7), normalize(7, 3));
/// ```
#[must_use]
pub fn normalize<N: Ord>(a: N, b: N) -> (N, N) {
    if a > b { (b, a) } else { (a, b) }
}

/// An undirected edge in canonical form (`source <= target`).
///
/// # Examples
/// ```
/// use linkcom_core::Edge;
///
/// let edge = Edge::new("b", "a");
/// assert_eq!(edge.source(), &"a");
/// assert_eq!(edge.target(), &"b");
/// assert_eq!(edge, Edge::new("a", "b"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Edge<N> {
    source: N,
    target: N,
}

impl<N: Ord> Edge<N> {
    /// Builds the canonical edge joining `a` and `b`.
    #[must_use]
    pub fn new(a: N, b: N) -> Self {
        let (source, target) = normalize(a, b);
        Self { source, target }
    }
}

impl<N> Edge<N> {
    /// Returns the smaller endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> &N { &self.source }

    /// Returns the larger endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> &N { &self.target }

    /// Consumes the edge, returning its endpoints in canonical order.
    #[must_use]
    pub fn into_pair(self) -> (N, N) {
        (self.source, self.target)
    }
}

impl<N: Ord> From<(N, N)> for Edge<N> {
    fn from((a, b): (N, N)) -> Self {
        Self::new(a, b)
    }
}

impl<N: fmt::Display> fmt::Display for Edge<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.source, self.target)
    }
}
