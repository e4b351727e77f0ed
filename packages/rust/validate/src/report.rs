//! Report rendering and side-channel report files.
//!
//! Every validated input `X` gets a sibling `X.report.txt`. When more than
//! one file is validated in a batch, an aggregate `ALL.report.txt` is
//! written to the deepest directory common to all inputs.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use corpuskit_shared::{CorpusError, ErrorItem, Result};

use crate::engine::{BatchReport, FileReport};

const HEAVY_RULE: &str =
    "================================================================================";
const LIGHT_RULE: &str =
    "--------------------------------------------------------------------------------";

/// Sibling report path for one input file.
pub fn report_path_for(input: &Path) -> PathBuf {
    input.with_extension("report.txt")
}

fn push_errors<'a>(out: &mut String, errors: impl Iterator<Item = &'a ErrorItem>) {
    let mut any = false;
    for item in errors {
        let _ = writeln!(out, "{item}");
        any = true;
    }
    if !any {
        out.push_str("[PASS] no errors\n");
    }
}

fn push_summary(out: &mut String, total: usize, passed: usize, pass_rate: f64) {
    let _ = writeln!(
        out,
        "Summary: total={total} passed={passed} pass_rate={pass_rate:.2}%"
    );
}

/// Render the report body for one file.
pub fn render_file_report(report: &FileReport, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Validate Report ({}Z)", now.format("%Y-%m-%dT%H:%M:%S"));
    let _ = writeln!(out, "File: {}", report.path.display());
    let _ = writeln!(out, "{HEAVY_RULE}");
    push_errors(&mut out, report.errors.iter());
    let _ = writeln!(out, "{LIGHT_RULE}");
    push_summary(&mut out, report.total, report.passed, report.pass_rate());
    out
}

/// Render the aggregate report over the whole batch: the union of all
/// per-file findings plus the cross-file ones, with batch-wide totals.
pub fn render_aggregate_report(batch: &BatchReport, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Validate Report ({}Z)", now.format("%Y-%m-%dT%H:%M:%S"));
    out.push_str("Files:\n");
    for file in &batch.files {
        let _ = writeln!(out, "  {}", file.path.display());
    }
    let _ = writeln!(out, "{HEAVY_RULE}");
    push_errors(&mut out, batch.all_errors());
    let _ = writeln!(out, "{LIGHT_RULE}");
    push_summary(&mut out, batch.total(), batch.passed(), batch.pass_rate());
    out
}

/// Deepest directory shared by every input path.
fn common_parent(paths: &[&Path]) -> PathBuf {
    let mut candidate: PathBuf = paths
        .first()
        .and_then(|p| p.parent())
        .map(Path::to_path_buf)
        .unwrap_or_default();
    while !paths.iter().all(|p| p.starts_with(&candidate)) {
        match candidate.parent() {
            Some(parent) => candidate = parent.to_path_buf(),
            None => return PathBuf::new(),
        }
    }
    candidate
}

/// Write the per-file reports, and the aggregate report when the batch has
/// more than one file. Returns every path written.
pub fn write_reports(batch: &BatchReport, now: DateTime<Utc>) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for file in &batch.files {
        let target = report_path_for(&file.path);
        fs::write(&target, render_file_report(file, now))
            .map_err(|e| CorpusError::io(&target, e))?;
        written.push(target);
    }

    if batch.files.len() > 1 {
        let inputs: Vec<&Path> = batch.files.iter().map(|f| f.path.as_path()).collect();
        let target = common_parent(&inputs).join("ALL.report.txt");
        fs::write(&target, render_aggregate_report(batch, now))
            .map_err(|e| CorpusError::io(&target, e))?;
        written.push(target);
    }

    info!(reports = written.len(), "validation reports written");
    Ok(written)
}
