use linkcom_core::{
    ClusteringMode, EdgeGraph, LinkClusteringBuilder, LinkClusteringResult, Weighting,
};

pub const EPSILON: f64 = 1e-12;

pub fn graph(edges: &[(u32, u32)]) -> EdgeGraph<u32> {
    EdgeGraph::from_edges(edges.iter().copied()).expect("fixture graph must be simple")
}

pub fn run(graph: &EdgeGraph<u32>, mode: ClusteringMode) -> LinkClusteringResult<u32> {
    run_weighted(graph, mode, Weighting::Unweighted)
}

pub fn run_weighted(
    graph: &EdgeGraph<u32>,
    mode: ClusteringMode,
    weighting: Weighting,
) -> LinkClusteringResult<u32> {
    LinkClusteringBuilder::new()
        .with_mode(mode)
        .with_weighting(weighting)
        .build()
        .expect("configuration must be valid")
        .run(graph)
        .expect("run must succeed")
}

/// Community ids of every edge, in canonical edge order.
pub fn community_ids(result: &LinkClusteringResult<u32>) -> Vec<usize> {
    result
        .edge_to_community()
        .iter()
        .map(|(_, community)| community.get())
        .collect()
}
