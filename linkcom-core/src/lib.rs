//! Linkcom core library.
//!
//! Hierarchical link community detection: edges of an undirected simple graph
//! are partitioned into communities by single-linkage agglomeration over
//! edge-pair similarities, and the cut with the highest partition density is
//! reported.
//!
//! ```
//! use linkcom_core::{ClusteringMode, EdgeGraph, LinkClusteringBuilder};
//!
//! let graph = EdgeGraph::from_edges([(1, 2), (2, 3), (3, 4), (4, 1), (1, 3)])?;
//! let clustering = LinkClusteringBuilder::new()
//!     .with_mode(ClusteringMode::BestCut)
//!     .build()?;
//! let result = clustering.run(&graph)?;
//! assert_eq!(result.edge_to_community().len(), 5);
//! assert!(result.partition_density() > 0.0);
//! # Ok::<(), linkcom_core::LinkcomError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod density;
mod dendrogram;
mod edge;
mod error;
mod graph;
mod link_clustering;
mod linkage;
mod result;
mod similarity;

pub use crate::{
    builder::{ClusteringMode, LinkClusteringBuilder, Weighting},
    dendrogram::{Dendrogram, DendrogramNode, DendrogramTree, MergeEvent},
    density::{community_density, partition_density},
    edge::{Edge, Node, normalize},
    error::{GraphShapeViolation, LinkcomError, LinkcomErrorCode, Result},
    graph::{EdgeGraph, EdgeGraphBuilder},
    link_clustering::LinkClustering,
    linkage::{CandidateList, CandidatePair},
    result::{BestCut, CommunityId, DensityLevel, EdgeAssignment, LinkClusteringResult},
    similarity::{EdgeSimilarity, IncidentPair, Jaccard, Tanimoto},
};
