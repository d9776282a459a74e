//! Command implementations and argument parsing for the linkcom CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use linkcom_core::{
    ClusteringMode, LinkClusteringBuilder, LinkClusteringResult, LinkcomError, Weighting,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::edgelist::{EdgeListError, EdgeListOptions, read_edge_list};
use super::output::write_outputs;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "linkcom",
    about = "Find overlapping communities by hierarchically clustering edges."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster the edges of an edge list file.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Edge list, one `a b [w]` edge per line.
    pub path: PathBuf,

    /// Field delimiter (`tab` for a tab); defaults to any whitespace.
    #[arg(long, short = 'd', value_parser = parse_delimiter)]
    pub delimiter: Option<char>,

    /// Read a weight column and use Tanimoto similarity.
    #[arg(long, short = 'w')]
    pub weighted: bool,

    /// Stop merging below this similarity and report that partition.
    #[arg(long, short = 't', conflicts_with = "dendrogram")]
    pub threshold: Option<f64>,

    /// Record the full merge history.
    #[arg(long)]
    pub dendrogram: bool,

    /// Stem for output files (defaults to the input file stem).
    #[arg(long, short = 'b')]
    pub basename: Option<String>,

    /// Directory receiving the result files; nothing is written without it.
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Skip self-loops and repeated edges instead of failing.
    #[arg(long)]
    pub lenient: bool,

    /// Summary format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Summary formats supported by [`render_summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Key/value header followed by one `a<TAB>b<TAB>community` line per edge.
    #[default]
    Text,
    /// A single pretty-printed JSON object.
    Json,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The edge list was malformed.
    #[error("failed to read edge list `{path}`: {source}")]
    EdgeList {
        /// Edge list being read.
        path: PathBuf,
        /// Parse failure with its line number.
        #[source]
        source: EdgeListError,
    },
    /// A result file could not be written.
    #[error("failed to write `{path}`: {source}")]
    Write {
        /// Output path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Core clustering failed.
    #[error(transparent)]
    Core(#[from] LinkcomError),
}

impl CliError {
    /// Returns the core error behind this failure, if any.
    #[must_use]
    pub fn core(&self) -> Option<&LinkcomError> {
        match self {
            Self::Core(core) => Some(core),
            Self::EdgeList { source, .. } => source.core(),
            Self::Io { .. } | Self::Write { .. } => None,
        }
    }
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionSummary {
    /// Name derived from the input file or `--basename`.
    pub source: String,
    /// Mode the engine ran in.
    pub mode: ClusteringMode,
    /// Distinct nodes in the graph.
    pub nodes: usize,
    /// Edges clustered.
    pub edges: usize,
    /// Lines skipped in lenient mode.
    pub skipped: usize,
    /// Communities in the reported partition.
    pub communities: usize,
    /// Partition density of the reported partition.
    pub partition_density: f64,
    /// Similarity at the best cut, absent in threshold mode.
    pub max_similarity: Option<f64>,
    /// Best partition density, absent in threshold mode.
    pub max_density: Option<f64>,
    /// Merges performed.
    pub merges: usize,
    /// Result files written.
    pub written: Vec<PathBuf>,
    /// Full engine output.
    #[serde(skip)]
    pub result: LinkClusteringResult<String>,
    #[serde(skip)]
    format: OutputFormat,
}

impl ExecutionSummary {
    /// Summary format requested on the command line.
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when reading, clustering or writing fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use linkcom_cli::cli::{Cli, run_cli};
/// # use clap::Parser;
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "1 2\n2 3\n1 3\n3 4\n")?;
/// let path = file.path().to_str().ok_or("temporary path is not UTF-8")?;
/// let cli = Cli::try_parse_from(["linkcom", "run", path])?;
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.edges, 4);
/// assert!(summary.written.is_empty());
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(path = field::Empty, mode = field::Empty, weighted = command.weighted),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let mode = clustering_mode(&command);
    let weighting = if command.weighted {
        Weighting::Weighted
    } else {
        Weighting::Unweighted
    };
    let clustering = LinkClusteringBuilder::new()
        .with_mode(mode)
        .with_weighting(weighting)
        .build()?;

    let span = Span::current();
    span.record("path", field::display(command.path.display()));
    span.record("mode", field::debug(mode));

    let options = EdgeListOptions {
        delimiter: command.delimiter,
        weighted: command.weighted,
        lenient: command.lenient,
    };
    let reader = open_edge_list(&command.path)?;
    let list = read_edge_list(reader, options).map_err(|source| CliError::EdgeList {
        path: command.path.clone(),
        source,
    })?;
    let result = clustering.run(&list.graph)?;

    let source = derive_basename(&command.path, command.basename.as_deref());
    let written = match &command.output_dir {
        Some(dir) => write_outputs(dir, &source, &result)?,
        None => Vec::new(),
    };

    let summary = ExecutionSummary {
        source,
        mode,
        nodes: list.graph.node_count(),
        edges: list.graph.edge_count(),
        skipped: list.skipped,
        communities: result.edge_to_community().community_count(),
        partition_density: result.partition_density(),
        max_similarity: result.max_similarity(),
        max_density: result.max_density(),
        merges: result.merge_count(),
        written,
        result,
        format: command.format,
    };
    info!(
        source = summary.source.as_str(),
        communities = summary.communities,
        files = summary.written.len(),
        "command completed"
    );
    Ok(summary)
}

fn clustering_mode(command: &RunCommand) -> ClusteringMode {
    match (command.threshold, command.dendrogram) {
        (Some(threshold), _) => ClusteringMode::Threshold(threshold),
        (None, true) => ClusteringMode::Dendrogram,
        (None, false) => ClusteringMode::BestCut,
    }
}

#[instrument(name = "cli.open_edge_list", err, fields(path = field::Empty))]
pub(super) fn open_edge_list(path: &Path) -> Result<BufReader<File>, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub(super) fn derive_basename(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "clustering".to_owned())
}

pub(super) fn parse_delimiter(raw: &str) -> Result<char, String> {
    if raw.eq_ignore_ascii_case("tab") || raw == "\\t" {
        return Ok('\t');
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(delimiter), None) => Ok(delimiter),
        _ => Err(format!(
            "expected a single character or `tab`, got `{raw}`"
        )),
    }
}

/// Renders `summary` to `writer` in the format chosen on the command line.
///
/// Text output lists edges with communities renumbered from 1.
///
/// # Errors
/// Returns [`io::Error`] if writing or JSON serialisation fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use linkcom_cli::cli::{Cli, render_summary, run_cli};
/// # use clap::Parser;
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "a b\n")?;
/// let path = file.path().to_str().ok_or("temporary path is not UTF-8")?;
/// let summary = run_cli(Cli::try_parse_from(["linkcom", "run", path])?)?;
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert!(String::from_utf8(buffer)?.ends_with("a\tb\t1\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    if summary.format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut writer, summary)?;
        return writeln!(writer);
    }

    writeln!(writer, "source: {}", summary.source)?;
    writeln!(writer, "mode: {}", describe_mode(summary.mode))?;
    writeln!(writer, "nodes: {}", summary.nodes)?;
    writeln!(writer, "edges: {}", summary.edges)?;
    if summary.skipped > 0 {
        writeln!(writer, "skipped: {}", summary.skipped)?;
    }
    writeln!(writer, "communities: {}", summary.communities)?;
    writeln!(writer, "partition density: {:.6}", summary.partition_density)?;
    if let (Some(similarity), Some(density)) = (summary.max_similarity, summary.max_density) {
        writeln!(writer, "max similarity: {similarity:.6}")?;
        writeln!(writer, "max density: {density:.6}")?;
    }
    writeln!(writer, "merges: {}", summary.merges)?;
    for path in &summary.written {
        writeln!(writer, "wrote: {}", path.display())?;
    }
    for (edge, id) in summary.result.edge_to_community().renumbered(1).iter() {
        writeln!(writer, "{}\t{}\t{}", edge.source(), edge.target(), id.get())?;
    }
    Ok(())
}

fn describe_mode(mode: ClusteringMode) -> String {
    match mode {
        ClusteringMode::Threshold(threshold) => format!("threshold {threshold}"),
        ClusteringMode::BestCut => "best cut".to_owned(),
        ClusteringMode::Dendrogram => "dendrogram".to_owned(),
    }
}
