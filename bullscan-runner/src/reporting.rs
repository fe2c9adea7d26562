//! Console lines, result logs and CSV exports.
//!
//! Line formatting is separated from printing so the same text lands on the
//! console and in the verbose log.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use bullscan_core::domain::QualifyingEvent;

use crate::aggregate::OffsetOutcome;
use crate::runner::{PassSummary, RunSummary, ScanProgress};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("flush csv buffer: {0}")]
    Buffer(#[source] std::io::Error),

    #[error("csv output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// `n/a` for a missing value, otherwise four decimals.
pub fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

fn event_line(event: &QualifyingEvent) -> String {
    format!(
        "{} {}, trend {}",
        fmt_opt(event.change_rate),
        event.descriptor(),
        event.strength
    )
}

/// Lines describing one scanned offset: header, events, slice sums, sign split.
pub fn offset_lines(outcome: &OffsetOutcome, with_events: bool) -> Vec<String> {
    let s = &outcome.stats;
    let label = s.variant.label();
    let mut lines = vec![format!(
        "[{label}] offset {} ({}): {} events",
        s.offset,
        s.date.map_or_else(|| "-".to_string(), |d| d.to_string()),
        s.event_count
    )];
    if with_events {
        lines.extend(outcome.ranked.iter().chain(&outcome.unranked).map(event_line));
    }
    lines.push(format!("{label} setback, {:.4}", s.setback_sum));
    lines.push(format!("{label} attack, {:.4}", s.attack_sum));
    lines.push(format!(
        "rising {} avg {}",
        s.split.rising_count,
        fmt_opt(s.split.rising_avg)
    ));
    lines.push(format!(
        "falling {} avg {}",
        s.split.falling_count,
        fmt_opt(s.split.falling_avg)
    ));
    lines.push(format!("average {}", fmt_opt(s.split.overall_avg)));
    lines
}

/// Cross-offset means for one pass.
pub fn pass_lines(pass: &PassSummary) -> Vec<String> {
    let label = pass.variant.label();
    vec![
        format!(
            "[{label}] {} offsets scanned, {} with events, {} events total",
            pass.totals.offsets_scanned,
            pass.totals.offsets_with_events,
            pass.event_count()
        ),
        format!("{label} setback average, {}", fmt_opt(pass.setback_mean)),
        format!("{label} attack average, {}", fmt_opt(pass.attack_mean)),
    ]
}

/// Prints offsets and pass results to stdout as the run progresses.
pub struct ConsoleProgress {
    /// Print every event line, not just the sums.
    pub show_events: bool,
}

impl ScanProgress for ConsoleProgress {
    fn on_offset(&self, outcome: &OffsetOutcome) {
        for line in offset_lines(outcome, self.show_events) {
            println!("{line}");
        }
    }

    fn on_pass_complete(&self, pass: &PassSummary) {
        println!();
        for line in pass_lines(pass) {
            println!("{line}");
        }
        println!();
    }
}

/// Run header printed after the passes; pass means come from the progress callback.
pub fn summary_header_lines(summary: &RunSummary) -> Vec<String> {
    vec![
        "=== Scan Summary ===".to_string(),
        format!("Symbols:       {}", summary.symbols),
        format!("Holdout days:  {}", summary.holdout_days),
        format!("Dataset hash:  {}", summary.dataset_hash),
    ]
}

pub fn print_summary(summary: &RunSummary) {
    for line in summary_header_lines(summary) {
        println!("{line}");
    }
}

/// Summary rows as CSV, one per scanned offset of each pass.
pub fn export_summary_csv(summary: &RunSummary) -> Result<String, ReportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "variant",
        "holdout_days",
        "offset",
        "date",
        "events",
        "ranked",
        "setback_sum",
        "attack_sum",
        "rising",
        "rising_avg",
        "falling",
        "falling_avg",
        "overall_avg",
        "dataset_hash",
    ])?;
    for pass in &summary.passes {
        for s in pass.stats() {
            wtr.write_record([
                &pass.variant.name().to_string(),
                &summary.holdout_days.to_string(),
                &s.offset.to_string(),
                &s.date.map(|d| d.to_string()).unwrap_or_default(),
                &s.event_count.to_string(),
                &s.ranked_count.to_string(),
                &format!("{:.6}", s.setback_sum),
                &format!("{:.6}", s.attack_sum),
                &s.split.rising_count.to_string(),
                &opt_cell(s.split.rising_avg),
                &s.split.falling_count.to_string(),
                &opt_cell(s.split.falling_avg),
                &opt_cell(s.split.overall_avg),
                &summary.dataset_hash,
            ])?;
        }
    }
    finish_csv(wtr)
}

/// Every qualifying event as CSV, in scan and rank order.
pub fn export_events_csv(summary: &RunSummary) -> Result<String, ReportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "variant",
        "offset",
        "rank",
        "symbol",
        "name",
        "date",
        "change_rate",
        "pct_change",
        "prior_pct_change",
        "prior_shrink",
        "slope",
        "trend",
    ])?;
    for pass in &summary.passes {
        for outcome in &pass.offsets {
            let ranks = (1..).map(|r: usize| r.to_string());
            let unranked = std::iter::repeat(String::new());
            let rows = outcome.ranked.iter().zip(ranks).chain(outcome.unranked.iter().zip(unranked));
            for (e, rank) in rows {
                wtr.write_record([
                    &pass.variant.name().to_string(),
                    &e.offset.to_string(),
                    &rank,
                    &e.symbol,
                    &e.name,
                    &e.date.to_string(),
                    &opt_cell(e.change_rate),
                    &format!("{:.4}", e.pct_change),
                    &format!("{:.4}", e.prior_pct_change),
                    &format!("{:.4}", e.prior_shrink),
                    &format!("{:.6}", e.slope),
                    &e.strength.to_string(),
                ])?;
            }
        }
    }
    finish_csv(wtr)
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> Result<String, ReportError> {
    let bytes = wtr.into_inner().map_err(|e| ReportError::Buffer(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn append(path: &Path, content: &str) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)
}

/// Append every offset and pass line of the run to the verbose log.
pub fn write_verbose_log(path: &Path, summary: &RunSummary) -> Result<(), ReportError> {
    let mut text = format!(
        "# run holdout_days={} symbols={} dataset={}\n",
        summary.holdout_days, summary.symbols, summary.dataset_hash
    );
    for pass in &summary.passes {
        for outcome in &pass.offsets {
            for line in offset_lines(outcome, true) {
                text.push_str(&line);
                text.push('\n');
            }
        }
        for line in pass_lines(pass) {
            text.push_str(&line);
            text.push('\n');
        }
    }
    append(path, &text)
}

/// Append the summary rows to a CSV log, writing the header only into a new file.
pub fn write_summary_log(path: &Path, summary: &RunSummary) -> Result<(), ReportError> {
    let has_content = fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
    let csv = export_summary_csv(summary)?;
    let body = if has_content {
        csv.split_once('\n').map_or("", |(_, rest)| rest).to_string()
    } else {
        csv
    };
    append(path, &body)
}

/// Write `summary.csv`, `events.csv` and `passes.json` into `dir`.
pub fn write_report_dir(dir: &Path, summary: &RunSummary) -> Result<(), ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let files = [
        ("summary.csv", export_summary_csv(summary)?),
        ("events.csv", export_events_csv(summary)?),
        ("passes.json", serde_json::to_string_pretty(&summary.records())?),
    ];
    for (name, content) in files {
        let path = dir.join(name);
        fs::write(&path, content).map_err(|source| ReportError::Io { path, source })?;
    }
    Ok(())
}
