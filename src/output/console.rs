use chrono::NaiveDate;

use crate::espn::Game;
use crate::excitement::{ExcitementAnalysis, RankedEntry};

/// Multi-line verdict for a single game.
pub fn format_analysis(analysis: &ExcitementAnalysis) -> String {
    format!(
        "Verdict: {} ({:.2}/10)\nLead changes: {}\nAverage swing: {:.3}\nLargest swing: {:.3}\nTime in toss-up range (45%-55%): {:.2}%",
        analysis.verdict,
        analysis.score,
        analysis.lead_changes,
        analysis.avg_swing,
        analysis.max_swing,
        analysis.close_ratio * 100.0
    )
}

/// Numbered ranking for one date, best game first.
pub fn format_rankings(date: NaiveDate, entries: &[RankedEntry<Game>]) -> String {
    let mut out = format!("Excitement rankings for {}:", date);
    for (idx, entry) in entries.iter().enumerate() {
        let a = &entry.analysis;
        out.push_str(&format!(
            "\n{}. {}: {} - excitement {:.2}/10 (lead changes {}, biggest swing {:.3})",
            idx + 1,
            entry.game.matchup(),
            a.verdict,
            a.score,
            a.lead_changes,
            a.max_swing
        ));
    }
    out
}

/// Bulleted per-game notes collected while gathering a week.
pub fn format_notes(notes: &[String]) -> String {
    let mut out = String::from("Excitement summaries:");
    for note in notes {
        out.push_str("\n - ");
        out.push_str(note);
    }
    out
}
