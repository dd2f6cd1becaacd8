use std::fs;
use std::path::Path;

use crate::report::json::render_summary_json;
use crate::report::table::{render_results_text, write_results_csv, write_text};
use crate::report::{ResultRow, RunSummary};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct Stage4Input<'a> {
    pub rows: &'a [ResultRow],
    pub summary: &'a RunSummary,
}

pub fn write_reports(
    input: &Stage4Input<'_>,
    results_path: &Path,
    summary_path: &Path,
) -> Result<(), ReportError> {
    for path in [results_path, summary_path] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
    }

    write_results_csv(results_path, input.rows)?;
    let json = render_summary_json(input.summary)?;
    write_text(summary_path, &json)?;

    tracing::info!(
        "family `{}`: wrote {} rows to {}\n{}",
        input.summary.family,
        input.rows.len(),
        results_path.display(),
        render_results_text(input.rows)
    );
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_report.rs"]
mod tests;
