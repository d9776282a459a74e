//! Small graphs with hand-checked clustering outcomes.
//!
//! Fixtures are plain edge lists so every crate can feed them to its own
//! graph constructors.

/// Four-cycle `1-2-3-4` plus the chord `1-3`.
///
/// Canonical edge order: `(1,2) (1,3) (1,4) (2,3) (3,4)`.
#[must_use]
pub fn square_with_diagonal() -> Vec<(u32, u32)> {
    vec![(1, 2), (2, 3), (3, 4), (4, 1), (1, 3)]
}

/// Triangles `0-1-2` and `2-3-4` joined at node `2`.
///
/// Canonical edge order: `(0,1) (0,2) (1,2) (2,3) (2,4) (3,4)`.
#[must_use]
pub fn bowtie() -> Vec<(u32, u32)> {
    vec![(0, 1), (0, 2), (1, 2), (2, 3), (2, 4), (3, 4)]
}

/// Path `0-1-...-len`, `len` edges long.
#[must_use]
pub fn path(len: u32) -> Vec<(u32, u32)> {
    (0..len).map(|node| (node, node + 1)).collect()
}

/// Hub `0` joined to leaves `1..=leaves`.
#[must_use]
pub fn star(leaves: u32) -> Vec<(u32, u32)> {
    (1..=leaves).map(|leaf| (0, leaf)).collect()
}

/// Complete graph on nodes `0..nodes`.
#[must_use]
pub fn clique(nodes: u32) -> Vec<(u32, u32)> {
    (0..nodes)
        .flat_map(|a| (a + 1..nodes).map(move |b| (a, b)))
        .collect()
}

/// Attaches the same `weight` to every edge.
#[must_use]
pub fn uniformly_weighted(edges: &[(u32, u32)], weight: f64) -> Vec<(u32, u32, f64)> {
    edges.iter().map(|&(a, b)| (a, b, weight)).collect()
}

/// Renders edges as a whitespace separated edge list file body.
#[must_use]
pub fn edge_list_text(edges: &[(u32, u32)]) -> String {
    edges.iter().map(|(a, b)| format!("{a} {b}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 0)]
    #[case(4, 6)]
    #[case(5, 10)]
    fn clique_has_all_pairs(#[case] nodes: u32, #[case] edges: usize) {
        assert_eq!(clique(nodes).len(), edges);
    }

    #[test]
    fn path_and_star_sizes() {
        assert_eq!(path(3), vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(star(3), vec![(0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn edge_list_text_writes_one_line_per_edge() {
        assert_eq!(edge_list_text(&[(1, 2), (3, 4)]), "1 2\n3 4\n");
    }
}
