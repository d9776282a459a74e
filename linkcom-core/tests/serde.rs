//! Serialisation of results behind the `serde` feature.
#![cfg(feature = "serde")]

mod common;

use common::{graph, run};
use linkcom_core::ClusteringMode;
use linkcom_test_support::fixtures;
use serde_json::json;

#[test]
fn best_cut_result_serialises_losslessly() {
    let graph = graph(&fixtures::square_with_diagonal());
    let result = run(&graph, ClusteringMode::BestCut);
    let value = serde_json::to_value(&result).expect("result serialises");

    assert_eq!(value["mode"], json!("BestCut"));
    assert_eq!(value["best"]["similarity"], json!(0.75));
    assert_eq!(value["best"]["merges"], json!(4));
    assert_eq!(value["merges"], json!(4));
    assert_eq!(
        value["assignment"]["entries"][0],
        json!([{ "source": 1, "target": 2 }, 0])
    );
    assert_eq!(value["history"].as_array().map(Vec::len), Some(2));
    assert!(value["dendrogram"].is_null());
}

#[test]
fn threshold_mode_serialises_with_its_threshold() {
    let graph = graph(&fixtures::bowtie());
    let result = run(&graph, ClusteringMode::Threshold(0.6));
    let value = serde_json::to_value(&result).expect("result serialises");
    assert_eq!(value["mode"], json!({ "Threshold": 0.6 }));
    assert!(value["best"].is_null());
}

#[test]
fn dendrogram_serialises_linkage() {
    let graph = graph(&fixtures::bowtie());
    let result = run(&graph, ClusteringMode::Dendrogram);
    let value = serde_json::to_value(&result).expect("result serialises");
    let linkage = value["dendrogram"]["linkage"]
        .as_array()
        .expect("linkage is an array");
    assert_eq!(linkage.len(), 5);
    assert_eq!(linkage[0]["similarity"], json!(1.0));
    assert_eq!(linkage[0]["merged"], json!(1));
}
