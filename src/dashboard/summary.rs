use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::chart::chart_file_name;
use crate::espn::Game;
use crate::excitement::{RankingReport, Verdict};

pub const SUMMARY_FILE: &str = "weekly_summary.json";
pub const DASHBOARD_FILE: &str = "index.html";

/// One ranked game as written to `weekly_summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub date: String,
    pub event_id: String,
    pub matchup: String,
    pub score: f64,
    /// Score scaled to [0, 1] for the intensity meter
    pub score_percent: f64,
    pub verdict: Verdict,
    pub lead_changes: u32,
    pub avg_swing: f64,
    pub max_swing: f64,
    pub close_ratio: f64,
    /// Chart file next to the summary, when charts were written
    pub image: Option<String>,
}

/// Ranked games keyed by ISO date, best game first within each date.
pub type Summary = BTreeMap<String, Vec<SummaryEntry>>;

pub fn date_label(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "undated".to_string())
}

/// Summary rows for every ranked game. With `charts`, each dated row names
/// the chart file the weekly run wrote for it.
pub fn build_summary(report: &RankingReport<Game>, charts: bool) -> Summary {
    report
        .days
        .iter()
        .map(|(date, entries)| {
            let label = date_label(*date);
            let rows = entries
                .iter()
                .map(|e| SummaryEntry {
                    date: label.clone(),
                    event_id: e.game.event_id.clone(),
                    matchup: e.game.matchup(),
                    score: e.analysis.score,
                    score_percent: (e.analysis.score / 10.0).clamp(0.0, 1.0),
                    verdict: e.analysis.verdict,
                    lead_changes: e.analysis.lead_changes,
                    avg_swing: e.analysis.avg_swing,
                    max_swing: e.analysis.max_swing,
                    close_ratio: e.analysis.close_ratio,
                    image: (*date)
                        .filter(|_| charts)
                        .map(|d| chart_file_name(d, &e.game.matchup())),
                })
                .collect();
            (label, rows)
        })
        .collect()
}

/// Write the JSON summary and the HTML dashboard into `dir`, creating it if
/// needed. Returns the two paths written.
pub fn write_outputs(dir: &Path, summary: &Summary, html: &str) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let summary_path = dir.join(SUMMARY_FILE);
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize summary")?;
    std::fs::write(&summary_path, json)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;

    let dashboard_path = dir.join(DASHBOARD_FILE);
    std::fs::write(&dashboard_path, html)
        .with_context(|| format!("Failed to write {}", dashboard_path.display()))?;

    Ok((summary_path, dashboard_path))
}
