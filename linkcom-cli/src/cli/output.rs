//! Result file writers.
//!
//! File names and layouts follow the classic link clustering tool so existing
//! downstream scripts keep working. Fields are tab separated.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use linkcom_core::{ClusteringMode, Dendrogram, EdgeAssignment, LinkClusteringResult};
use tracing::{debug, field, instrument};

use super::commands::CliError;

const DELIMITER: char = '\t';

/// Writes every file the result supports into `dir` and returns their paths
/// in write order.
#[instrument(
    name = "cli.write_outputs",
    err,
    skip(result),
    fields(dir = %dir.display(), files = field::Empty),
)]
pub(super) fn write_outputs(
    dir: &Path,
    basename: &str,
    result: &LinkClusteringResult<String>,
) -> Result<Vec<PathBuf>, CliError> {
    fs::create_dir_all(dir).map_err(|source| CliError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    let assignment = result.edge_to_community();
    match (result.mode(), result.best_cut()) {
        (ClusteringMode::Threshold(threshold), _) => {
            let stem = format!(
                "{basename}_thrS{threshold:.6}_thrD{:.6}",
                result.partition_density()
            );
            write_assignment(dir, &stem, assignment, &mut written)?;
        }
        (_, Some(best)) => {
            write_file(dir.join(format!("{basename}_thr_D.txt")), &mut written, |out| {
                for level in result.density_history() {
                    writeln!(out, "{} {}", level.similarity(), level.density())?;
                }
                Ok(())
            })?;
            let stem = format!(
                "{basename}_maxS{:.6}_maxD{:.6}",
                best.similarity(),
                best.density()
            );
            write_assignment(dir, &stem, assignment, &mut written)?;
        }
        (_, None) => {}
    }
    if let Some(dendrogram) = result.dendrogram() {
        write_dendrogram(dir, &format!("{basename}_dendro"), dendrogram, &mut written)?;
    }

    tracing::Span::current().record("files", written.len());
    Ok(written)
}

/// Writes `.edge2comm.txt`, `.comm2edges.txt` and `.comm2nodes.txt` with
/// communities renumbered from 1.
fn write_assignment(
    dir: &Path,
    stem: &str,
    assignment: &EdgeAssignment<String>,
    written: &mut Vec<PathBuf>,
) -> Result<(), CliError> {
    let renumbered = assignment.renumbered(1);
    let communities = renumbered.communities();

    write_file(dir.join(format!("{stem}.edge2comm.txt")), written, |out| {
        for (id, edges) in &communities {
            for edge in edges {
                writeln!(
                    out,
                    "{}{DELIMITER}{}{DELIMITER}{}",
                    edge.source(),
                    edge.target(),
                    id.get()
                )?;
            }
        }
        Ok(())
    })?;

    write_file(dir.join(format!("{stem}.comm2edges.txt")), written, |out| {
        for (id, edges) in &communities {
            write!(out, "{}", id.get())?;
            for edge in edges {
                write!(out, "{DELIMITER}{},{}", edge.source(), edge.target())?;
            }
            writeln!(out)?;
        }
        Ok(())
    })?;

    write_file(dir.join(format!("{stem}.comm2nodes.txt")), written, |out| {
        for (id, nodes) in renumbered.community_nodes() {
            write!(out, "{}", id.get())?;
            for node in nodes {
                write!(out, "{DELIMITER}{node}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    })
}

/// Writes the initial community of every edge and one line per merge event.
fn write_dendrogram(
    dir: &Path,
    stem: &str,
    dendrogram: &Dendrogram<String>,
    written: &mut Vec<PathBuf>,
) -> Result<(), CliError> {
    write_file(dir.join(format!("{stem}.cid2edge.txt")), written, |out| {
        for (id, edges) in dendrogram.initial_assignment().communities() {
            for edge in edges {
                writeln!(
                    out,
                    "{}{DELIMITER}{},{}",
                    id.get(),
                    edge.source(),
                    edge.target()
                )?;
            }
        }
        Ok(())
    })?;

    write_file(dir.join(format!("{stem}.linkage.txt")), written, |out| {
        for event in dendrogram.linkage() {
            writeln!(
                out,
                "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
                event.left().get(),
                event.right().get(),
                event.similarity(),
                event.merged().get(),
                event.size()
            )?;
        }
        Ok(())
    })
}

fn write_file(
    path: PathBuf,
    written: &mut Vec<PathBuf>,
    body: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), CliError> {
    let outcome = File::create(&path).and_then(|file| {
        let mut out = BufWriter::new(file);
        body(&mut out)?;
        out.flush()
    });
    if let Err(source) = outcome {
        return Err(CliError::Write { path, source });
    }
    debug!(path = %path.display(), "wrote result file");
    written.push(path);
    Ok(())
}
