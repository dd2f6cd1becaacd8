use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::report::{RESULT_COLUMNS, ResultRow, format_f64_6};

pub fn write_results_csv(path: &Path, rows: &[ResultRow]) -> Result<(), csv::Error> {
    let file = BufWriter::new(File::create(path)?);
    let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    w.write_record(RESULT_COLUMNS)?;
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

/// Fixed-width rendering of a results table for the terminal.
pub fn render_results_text(rows: &[ResultRow]) -> String {
    let name_width = rows
        .iter()
        .map(|r| r.classifier.len())
        .chain(std::iter::once("classifier".len()))
        .max()
        .unwrap_or(0);
    let set_width = rows
        .iter()
        .map(|r| r.label_set.len())
        .chain(std::iter::once("label_set".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<name_width$}  {:<set_width$}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}\n",
        "classifier", "label_set", "accuracy", "w_acc", "precision", "recall", "f1"
    ));
    for r in rows {
        out.push_str(&format!(
            "{:<name_width$}  {:<set_width$}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}\n",
            r.classifier,
            r.label_set,
            format_f64_6(r.accuracy),
            format_f64_6(r.weighted_accuracy),
            format_f64_6(r.precision),
            format_f64_6(r.recall),
            format_f64_6(r.f1_score),
        ));
    }
    out
}

pub fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}
