//! @ai:module:intent Console rendering of the summary table and run statistics
//! @ai:module:layer presentation
//! @ai:module:public_api render_table, RunStats
//! @ai:module:stateless true

use crate::runner::ExecutionResult;
use crate::table::SummaryRow;
use chrono::{DateTime, Utc};
use std::fmt::Write;

const SUMMARY_PREVIEW_CHARS: usize = 60;

/// @ai:intent Counts gathered over one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Remote calls made across all articles, retries included
    pub attempts: u32,
}

impl RunStats {
    /// @ai:intent Tally outcomes of a batch run
    /// @ai:post total == succeeded + failed
    /// @ai:effects pure
    pub fn from_results(results: &[ExecutionResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.summary.succeeded()).count();

        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            attempts: results.iter().map(|r| r.summary.attempts).sum(),
        }
    }
}

/// @ai:intent Render summary rows as a fixed-width two-column table
/// @ai:effects pure
pub fn render_table(rows: &[SummaryRow]) -> String {
    let id_width = rows
        .iter()
        .map(|r| r.id.chars().count())
        .max()
        .unwrap_or(0)
        .max("id".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<id_width$}  summary", "id");

    for row in rows {
        let _ = writeln!(out, "{:<id_width$}  {}", row.id, preview(&row.summary));
    }

    out
}

/// @ai:intent Render the closing statistics block
/// @ai:effects pure
pub fn render_run_summary(stats: &RunStats, started_at: DateTime<Utc>) -> String {
    let elapsed = Utc::now().signed_duration_since(started_at);

    format!(
        "Run started:   {}\n\
         Articles:      {}\n\
         Succeeded:     {}\n\
         Failed:        {}\n\
         API requests:  {}\n\
         Elapsed:       {:.1}s\n",
        started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        stats.total,
        stats.succeeded,
        stats.failed,
        stats.attempts,
        elapsed.num_milliseconds() as f64 / 1000.0
    )
}

fn preview(s: &str) -> String {
    let flat = s.replace('\n', "\\n");

    if flat.chars().count() <= SUMMARY_PREVIEW_CHARS {
        flat
    } else {
        let head: String = flat.chars().take(SUMMARY_PREVIEW_CHARS).collect();
        format!("{head}...")
    }
}
