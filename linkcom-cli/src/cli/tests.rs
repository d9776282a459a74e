//! Unit tests for the CLI commands, edge list ingestion and result files.

use super::commands::{derive_basename, parse_delimiter, run_command};
use super::{Cli, CliError, Command, OutputFormat, RunCommand, render_summary, run_cli};

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use linkcom_core::{ClusteringMode, LinkcomErrorCode};
use rstest::{fixture, rstest};
use serde_json::Value;
use tempfile::TempDir;

use linkcom_test_support::{fixtures, tracing::RecordingLayer};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[fixture]
fn dir() -> TempDir {
    tempfile::tempdir().expect("create temporary directory")
}

fn write_input(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).expect("write edge list");
    path
}

fn square_input(dir: &TempDir) -> PathBuf {
    write_input(
        dir,
        "square.txt",
        &fixtures::edge_list_text(&fixtures::square_with_diagonal()),
    )
}

fn command(path: PathBuf) -> RunCommand {
    RunCommand {
        path,
        delimiter: None,
        weighted: false,
        threshold: None,
        dendrogram: false,
        basename: None,
        output_dir: None,
        lenient: false,
        format: OutputFormat::Text,
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read result file")
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|path| path.file_name()?.to_str().map(ToOwned::to_owned))
        .collect()
}

#[rstest]
#[case::override_name("/tmp/graph.txt", Some("override"), "override")]
#[case::stem_with_extension("/tmp/graph.txt", None, "graph")]
#[case::stem_without_extension("/tmp/graph", None, "graph")]
#[case::missing_stem("", None, "clustering")]
fn derive_basename_selects_expected_name(
    #[case] raw_path: &str,
    #[case] override_name: Option<&'static str>,
    #[case] expected: &str,
) {
    assert_eq!(derive_basename(Path::new(raw_path), override_name), expected);
}

#[rstest]
#[case("tab", '\t')]
#[case("TAB", '\t')]
#[case("\\t", '\t')]
#[case(",", ',')]
#[case(";", ';')]
fn parse_delimiter_accepts_single_characters(#[case] raw: &str, #[case] expected: char) {
    assert_eq!(parse_delimiter(raw), Ok(expected));
}

#[rstest]
#[case("")]
#[case("::")]
fn parse_delimiter_rejects_other_input(#[case] raw: &str) {
    assert!(parse_delimiter(raw).is_err());
}

#[test]
fn clap_parses_full_run_command() -> TestResult {
    let cli = Cli::try_parse_from([
        "linkcom",
        "run",
        "edges.csv",
        "--delimiter",
        ",",
        "--weighted",
        "--threshold",
        "0.4",
        "--basename",
        "net",
        "--output-dir",
        "out",
        "--lenient",
        "--format",
        "json",
    ])?;
    let Command::Run(run) = cli.command;
    assert_eq!(run.path, PathBuf::from("edges.csv"));
    assert_eq!(run.delimiter, Some(','));
    assert!(run.weighted && run.lenient && !run.dendrogram);
    assert_eq!(run.threshold, Some(0.4));
    assert_eq!(run.basename.as_deref(), Some("net"));
    assert_eq!(run.output_dir, Some(PathBuf::from("out")));
    assert_eq!(run.format, OutputFormat::Json);
    Ok(())
}

#[rstest]
#[case::missing_path(&["linkcom", "run"])]
#[case::threshold_with_dendrogram(&["linkcom", "run", "g.txt", "--threshold", "0.5", "--dendrogram"])]
#[case::non_numeric_threshold(&["linkcom", "run", "g.txt", "--threshold", "high"])]
#[case::long_delimiter(&["linkcom", "run", "g.txt", "--delimiter", "::"])]
#[case::unknown_format(&["linkcom", "run", "g.txt", "--format", "xml"])]
fn clap_rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args.iter().copied()).is_err());
}

#[rstest]
fn best_cut_writes_classic_files(dir: TempDir) -> TestResult {
    let out = dir.path().join("out");
    let summary = run_command(RunCommand {
        output_dir: Some(out.clone()),
        ..command(square_input(&dir))
    })?;

    assert_eq!(summary.source, "square");
    assert_eq!(summary.mode, ClusteringMode::BestCut);
    assert_eq!((summary.nodes, summary.edges, summary.skipped), (4, 5, 0));
    assert_eq!(summary.communities, 1);
    assert_eq!(summary.max_similarity, Some(0.75));
    assert_eq!(summary.merges, 4);
    assert_eq!(
        file_names(&summary.written),
        vec![
            "square_thr_D.txt",
            "square_maxS0.750000_maxD0.666667.edge2comm.txt",
            "square_maxS0.750000_maxD0.666667.comm2edges.txt",
            "square_maxS0.750000_maxD0.666667.comm2nodes.txt",
        ]
    );

    let stem = "square_maxS0.750000_maxD0.666667";
    assert_eq!(
        read(&out.join(format!("{stem}.edge2comm.txt"))),
        "1\t2\t1\n1\t3\t1\n1\t4\t1\n2\t3\t1\n3\t4\t1\n"
    );
    assert_eq!(
        read(&out.join(format!("{stem}.comm2edges.txt"))),
        "1\t1,2\t1,3\t1,4\t2,3\t3,4\n"
    );
    assert_eq!(read(&out.join(format!("{stem}.comm2nodes.txt"))), "1\t1\t2\t3\t4\n");

    let levels = read(&out.join("square_thr_D.txt"));
    let lines: Vec<&str> = levels.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "1 0");
    assert!(lines[1].starts_with("0.75 0.666"), "{}", lines[1]);
    Ok(())
}

#[rstest]
fn threshold_writes_renumbered_assignment(dir: TempDir) -> TestResult {
    let out = dir.path().join("out");
    let summary = run_command(RunCommand {
        threshold: Some(1.0),
        basename: Some("net".into()),
        output_dir: Some(out.clone()),
        ..command(square_input(&dir))
    })?;

    assert_eq!(summary.communities, 3);
    assert_eq!(summary.max_similarity, None);
    assert_eq!(
        file_names(&summary.written),
        vec![
            "net_thrS1.000000_thrD0.000000.edge2comm.txt",
            "net_thrS1.000000_thrD0.000000.comm2edges.txt",
            "net_thrS1.000000_thrD0.000000.comm2nodes.txt",
        ]
    );
    let stem = "net_thrS1.000000_thrD0.000000";
    assert_eq!(
        read(&out.join(format!("{stem}.edge2comm.txt"))),
        "1\t2\t1\n2\t3\t1\n1\t3\t2\n1\t4\t3\n3\t4\t3\n"
    );
    assert_eq!(
        read(&out.join(format!("{stem}.comm2nodes.txt"))),
        "1\t1\t2\t3\n2\t1\t3\n3\t1\t3\t4\n"
    );
    assert!(!out.join("net_thr_D.txt").exists());
    Ok(())
}

#[rstest]
fn dendrogram_writes_initial_communities_and_linkage(dir: TempDir) -> TestResult {
    let out = dir.path().join("out");
    let summary = run_command(RunCommand {
        dendrogram: true,
        output_dir: Some(out.clone()),
        ..command(square_input(&dir))
    })?;

    assert_eq!(summary.written.len(), 6);
    assert_eq!(
        read(&out.join("square_dendro.cid2edge.txt")),
        "0\t1,2\n1\t1,3\n2\t1,4\n3\t2,3\n4\t3,4\n"
    );
    let linkage = read(&out.join("square_dendro.linkage.txt"));
    let rows: Vec<Vec<&str>> = linkage
        .lines()
        .map(|line| line.split('\t').collect())
        .collect();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| row.len() == 5));
    assert_eq!(rows[0][2], "1");
    assert_eq!(rows[3][4], "5");
    Ok(())
}

#[rstest]
fn no_files_without_output_dir(dir: TempDir) -> TestResult {
    let summary = run_command(command(square_input(&dir)))?;
    assert!(summary.written.is_empty());
    assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[rstest]
fn custom_delimiter_and_weights(dir: TempDir) -> TestResult {
    let path = write_input(&dir, "weighted.csv", "a,b,1\nb,c,1\na,c,1\nc,d,1\n");
    let summary = run_command(RunCommand {
        delimiter: Some(','),
        weighted: true,
        ..command(path)
    })?;
    assert_eq!((summary.nodes, summary.edges), (4, 4));
    assert!(summary.result.edge_to_community().community_count() >= 1);
    Ok(())
}

#[rstest]
fn strict_mode_reports_line_of_repeated_edge(dir: TempDir) {
    let path = write_input(&dir, "dup.txt", "a b\nb c\n# note\nb a\n");
    let err = run_command(command(path)).expect_err("repeated edge is rejected");
    assert!(matches!(err, CliError::EdgeList { .. }));
    assert!(err.to_string().contains("line 4"), "{err}");
    assert_eq!(
        err.core().map(|core| core.code()),
        Some(LinkcomErrorCode::InvalidGraphShape)
    );
}

#[rstest]
fn lenient_mode_skips_bad_lines(dir: TempDir) -> TestResult {
    let path = write_input(&dir, "dup.txt", "a b\nb b\nb a\nb c\n");
    let summary = run_command(RunCommand {
        lenient: true,
        ..command(path)
    })?;
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.edges, 2);
    Ok(())
}

#[rstest]
fn weighted_run_requires_weight_column(dir: TempDir) {
    let err = run_command(RunCommand {
        weighted: true,
        ..command(square_input(&dir))
    })
    .expect_err("weights are missing");
    assert!(matches!(err, CliError::EdgeList { .. }));
    assert!(err.core().is_none());
}

#[rstest]
fn missing_input_is_an_io_error(dir: TempDir) {
    let err = run_command(command(dir.path().join("absent.txt"))).expect_err("file is missing");
    assert!(matches!(err, CliError::Io { ref path, .. } if path.ends_with("absent.txt")));
}

#[rstest]
fn invalid_threshold_is_a_core_error(dir: TempDir) {
    let err = run_command(RunCommand {
        threshold: Some(1.5),
        ..command(square_input(&dir))
    })
    .expect_err("threshold out of range");
    assert_eq!(
        err.core().map(|core| core.code()),
        Some(LinkcomErrorCode::InvalidThreshold)
    );
}

#[rstest]
fn unwritable_output_dir_is_a_write_error(dir: TempDir) {
    let blocker = write_input(&dir, "blocker", "");
    let err = run_command(RunCommand {
        output_dir: Some(blocker.join("out")),
        ..command(square_input(&dir))
    })
    .expect_err("output directory cannot be created");
    assert!(matches!(err, CliError::Write { .. }));
}

#[rstest]
fn text_summary_lists_renumbered_edges(dir: TempDir) -> TestResult {
    let summary = run_command(RunCommand {
        threshold: Some(1.0),
        ..command(square_input(&dir))
    })?;
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    let text = String::from_utf8(buffer)?;

    assert!(text.starts_with("source: square\nmode: threshold 1\nnodes: 4\nedges: 5\n"));
    assert!(text.contains("communities: 3\n"));
    assert!(!text.contains("max similarity"));
    assert!(text.ends_with("1\t2\t1\n1\t3\t2\n1\t4\t3\n2\t3\t1\n3\t4\t3\n"));
    Ok(())
}

#[rstest]
fn json_summary_is_machine_readable(dir: TempDir) -> TestResult {
    let summary = run_command(RunCommand {
        format: OutputFormat::Json,
        ..command(square_input(&dir))
    })?;
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    let json: Value = serde_json::from_slice(&buffer)?;

    assert_eq!(json["source"], "square");
    assert_eq!(json["mode"], "BestCut");
    assert_eq!(json["edges"], 5);
    assert_eq!(json["communities"], 1);
    assert_eq!(json["max_similarity"], 0.75);
    assert!(json.get("result").is_none());
    Ok(())
}

#[rstest]
fn run_cli_records_command_spans(dir: TempDir) -> TestResult {
    let path = square_input(&dir);
    let cli = Cli {
        command: Command::Run(command(path)),
    };
    let layer = RecordingLayer::default();
    let summary = layer.capture(|| run_cli(cli))?;
    assert_eq!(summary.communities, 1);

    let run = layer.span("cli.run").ok_or("cli.run span missing")?;
    assert_eq!(run.fields.get("command").map(String::as_str), Some("run"));
    let execute = layer.span("cli.execute").ok_or("cli.execute span missing")?;
    assert_eq!(execute.fields.get("mode").map(String::as_str), Some("BestCut"));
    assert!(layer.span("core.run").is_some());
    assert_eq!(layer.events_with_message("command completed").len(), 1);
    Ok(())
}
