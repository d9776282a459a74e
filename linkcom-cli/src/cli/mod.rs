//! Command-line interface for link community detection.
//!
//! The `run` command reads an edge list, clusters its edges and optionally
//! writes the assignment, density and dendrogram files next to a summary on
//! stdout.

mod commands;
mod edgelist;
mod output;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, OutputFormat, RunCommand, render_summary, run_cli,
};
pub use edgelist::{EdgeList, EdgeListError, EdgeListOptions, read_edge_list};

#[cfg(test)]
mod tests;
