//! Edge list reader.
//!
//! One edge per line: `a<D>b` or, for weighted input, `a<D>b<D>w`. Columns
//! beyond those are ignored. Blank lines and lines starting with `#` are
//! skipped. Without an explicit delimiter fields are split on whitespace.

use std::io::{self, BufRead};
use std::num::ParseFloatError;

use linkcom_core::{EdgeGraph, EdgeGraphBuilder, LinkcomError};
use thiserror::Error;
use tracing::{instrument, warn};

/// How edge list lines are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeListOptions {
    /// Field separator; `None` splits on runs of whitespace.
    pub delimiter: Option<char>,
    /// Whether a third column carries the edge weight.
    pub weighted: bool,
    /// Skip self-loops and repeated edges instead of failing.
    pub lenient: bool,
}

/// Errors raised while reading an edge list.
#[derive(Debug, Error)]
pub enum EdgeListError {
    /// Reading the underlying stream failed.
    #[error("failed to read line {line}: {source}")]
    Io {
        /// One-based line number.
        line: usize,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A line held fewer than two endpoints.
    #[error("line {line}: expected two endpoints")]
    MissingEndpoint {
        /// One-based line number.
        line: usize,
    },
    /// A weighted line lacked its weight column.
    #[error("line {line}: expected a weight after the endpoints")]
    MissingWeight {
        /// One-based line number.
        line: usize,
    },
    /// The weight column did not parse as a number.
    #[error("line {line}: cannot parse weight `{raw}`: {source}")]
    UnparsableWeight {
        /// One-based line number.
        line: usize,
        /// Text of the weight column.
        raw: String,
        /// Parse failure.
        #[source]
        source: ParseFloatError,
    },
    /// The edge was rejected by the graph adapter.
    #[error("line {line}: {source}")]
    Graph {
        /// One-based line number.
        line: usize,
        /// Rejection reason.
        #[source]
        source: LinkcomError,
    },
}

impl EdgeListError {
    /// Returns the core error behind a rejected edge.
    #[must_use]
    pub fn core(&self) -> Option<&LinkcomError> {
        match self {
            Self::Graph { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Graph read from an edge list plus the number of lines dropped in lenient
/// mode.
#[derive(Debug, Clone)]
pub struct EdgeList {
    /// The validated graph.
    pub graph: EdgeGraph<String>,
    /// Self-loops and repeated edges skipped.
    pub skipped: usize,
}

/// Reads an edge list from `reader`.
///
/// # Errors
/// Returns [`EdgeListError`] for I/O failures, malformed lines, invalid
/// weights, and, unless `options.lenient`, self-loops and repeated edges.
///
/// # Examples
/// ```
/// use linkcom_cli::cli::{EdgeListOptions, read_edge_list};
///
/// let text = "# comment\na b\nb c\n\nc a\n";
/// let list = read_edge_list(text.as_bytes(), EdgeListOptions::default())?;
/// assert_eq!(list.graph.edge_count(), 3);
/// assert_eq!(list.skipped, 0);
/// # Ok::<(), linkcom_cli::cli::EdgeListError>(())
/// ```
#[instrument(name = "cli.read_edge_list", err, skip(reader))]
pub fn read_edge_list<R: BufRead>(
    reader: R,
    options: EdgeListOptions,
) -> Result<EdgeList, EdgeListError> {
    let mut builder = EdgeGraphBuilder::new();
    let mut skipped = 0;
    for (index, text) in reader.lines().enumerate() {
        let line = index + 1;
        let text = text.map_err(|source| EdgeListError::Io { line, source })?;
        let Some(parsed) = parse_line(&text, options, line)? else {
            continue;
        };

        if options.lenient && (parsed.a == parsed.b || builder.contains(&parsed.a, &parsed.b)) {
            warn!(line, a = %parsed.a, b = %parsed.b, "skipping self-loop or repeated edge");
            skipped += 1;
            continue;
        }
        let added = match parsed.weight {
            Some(weight) => builder.add_weighted_edge(parsed.a, parsed.b, weight),
            None => builder.add_edge(parsed.a, parsed.b),
        };
        added.map_err(|source| EdgeListError::Graph { line, source })?;
    }
    Ok(EdgeList {
        graph: builder.build(),
        skipped,
    })
}

#[derive(Debug, PartialEq)]
struct ParsedLine {
    a: String,
    b: String,
    weight: Option<f64>,
}

fn parse_line(
    text: &str,
    options: EdgeListOptions,
    line: usize,
) -> Result<Option<ParsedLine>, EdgeListError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let mut fields: Box<dyn Iterator<Item = &str>> = match options.delimiter {
        Some(delimiter) => Box::new(trimmed.split(delimiter).map(str::trim)),
        None => Box::new(trimmed.split_whitespace()),
    };
    let (Some(a), Some(b)) = (fields.next(), fields.next()) else {
        return Err(EdgeListError::MissingEndpoint { line });
    };
    if a.is_empty() || b.is_empty() {
        return Err(EdgeListError::MissingEndpoint { line });
    }
    let weight = if options.weighted {
        let raw = fields
            .next()
            .filter(|raw| !raw.is_empty())
            .ok_or(EdgeListError::MissingWeight { line })?;
        let weight = raw
            .parse::<f64>()
            .map_err(|source| EdgeListError::UnparsableWeight {
                line,
                raw: raw.to_owned(),
                source,
            })?;
        Some(weight)
    } else {
        None
    };
    Ok(Some(ParsedLine {
        a: a.to_owned(),
        b: b.to_owned(),
        weight,
    }))
}
