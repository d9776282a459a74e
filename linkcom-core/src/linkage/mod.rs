//! Single-linkage agglomeration of edge communities.
//!
//! Candidate pairs are consumed one similarity level at a time. Every pair
//! whose edges still sit in different communities merges them; the partition
//! density is updated per merge and sampled once per level.

mod candidates;
mod communities;

use tracing::{debug, instrument, trace};

use crate::{
    builder::ClusteringMode,
    dendrogram::{DendrogramRecorder, MergeEvent},
    density::DensityTracker,
    graph::EdgeGraph,
    result::{BestCut, CommunityId, DensityLevel},
};

pub use self::candidates::{CandidateList, CandidatePair};

use self::communities::Communities;

/// Raw outcome of one agglomeration, still expressed in edge indices.
#[derive(Clone, Debug)]
pub(crate) struct Linkage {
    pub(crate) assignment: Vec<usize>,
    pub(crate) density: f64,
    pub(crate) best: Option<BestCut>,
    pub(crate) history: Vec<DensityLevel>,
    pub(crate) recorder: Option<DendrogramRecorder>,
    pub(crate) merges: usize,
}

/// Agglomerates the edges of `graph` following `candidates`.
///
/// Threshold mode stops at the first level below the threshold and reports
/// the partition reached there. The other modes run to exhaustion and report
/// the snapshot taken at the level of maximum density.
#[instrument(
    name = "core.single_linkage",
    skip(graph, candidates),
    fields(edges = graph.edge_count(), candidate_pairs = candidates.len(), mode = ?mode),
)]
pub(crate) fn single_linkage<N>(
    graph: &EdgeGraph<N>,
    candidates: &CandidateList,
    mode: ClusteringMode,
) -> Linkage {
    let mut communities = Communities::new(graph);
    let mut tracker = DensityTracker::new(graph.edge_count());
    let threshold = mode.threshold();
    let mut best_assignment = threshold
        .is_none()
        .then(|| communities.assignment().to_vec());
    let mut recorder = matches!(mode, ClusteringMode::Dendrogram).then(|| {
        let mut recorder = DendrogramRecorder::default();
        recorder.snapshot_initial_assignment(communities.assignment());
        recorder
    });

    let mut merges = 0;
    for (similarity, level) in candidates.levels() {
        if threshold.is_some_and(|threshold| similarity < threshold) {
            break;
        }
        let before = merges;
        for pair in level {
            let Some(merge) = communities.merge(pair.first(), pair.second()) else {
                continue;
            };
            tracker.update_on_merge(merge.left_stats, merge.right_stats, merge.merged_stats);
            merges += 1;
            if let Some(recorder) = recorder.as_mut() {
                recorder.record(MergeEvent::new(
                    similarity,
                    CommunityId::new(merge.left),
                    CommunityId::new(merge.right),
                    CommunityId::new(merge.survivor),
                    merge.merged_stats.edges,
                ));
            }
        }
        if merges == before {
            continue;
        }

        #[cfg(feature = "metrics")]
        metrics::counter!("linkcom_merges").increment((merges - before) as u64);
        trace!(
            similarity,
            merges = merges - before,
            density = tracker.density(),
            "closed similarity level"
        );
        if tracker.record_level(similarity, merges)
            && let Some(best) = best_assignment.as_mut()
        {
            best.copy_from_slice(communities.assignment());
        }
        if communities.live() == 1 {
            break;
        }
    }

    debug_assert_eq!(
        communities.live() + merges,
        graph.edge_count(),
        "every merge retires exactly one community"
    );
    debug!(
        merges,
        communities = communities.live(),
        "agglomeration finished"
    );

    let density = tracker.density();
    let best = best_assignment.is_some().then(|| tracker.best());
    let history = tracker.into_history();
    match (best_assignment, best) {
        (Some(assignment), Some(best)) => Linkage {
            assignment,
            density: best.density(),
            best: Some(best),
            history,
            recorder,
            merges,
        },
        _ => Linkage {
            assignment: communities.into_assignment(),
            density,
            best: None,
            history,
            recorder,
            merges,
        },
    }
}
