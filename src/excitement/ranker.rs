use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use super::error::ExcitementError;
use super::models::{ExcitementAnalysis, GameRecords, RankedEntry, SkippedGame};
use super::scorer::ExcitementModel;
use super::validator::validate;

/// Per-date rankings plus every game that could not be scored.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingReport<G> {
    /// Games grouped by date (undated games under `None`), best score first.
    pub days: BTreeMap<Option<NaiveDate>, Vec<RankedEntry<G>>>,
    /// Games left out of the ranking, in the order they were submitted.
    pub skipped: Vec<SkippedGame<G>>,
}

impl<G> Default for RankingReport<G> {
    fn default() -> Self {
        RankingReport {
            days: BTreeMap::new(),
            skipped: Vec::new(),
        }
    }
}

impl<G> RankingReport<G> {
    pub fn ranked_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked_count() == 0
    }

    /// Ranking for a single date, if any game on it was scored.
    pub fn day(&self, date: Option<NaiveDate>) -> &[RankedEntry<G>] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Date groups, most recent first.
    pub fn dates_newest_first(
        &self,
    ) -> impl Iterator<Item = (Option<NaiveDate>, &[RankedEntry<G>])> {
        self.days.iter().rev().map(|(d, e)| (*d, e.as_slice()))
    }

    /// Fold another report in. Groups are re-sorted so the combined order is
    /// the same as ranking all games in one batch.
    pub fn merge(&mut self, other: RankingReport<G>) {
        for (date, entries) in other.days {
            let group = self.days.entry(date).or_default();
            group.extend(entries);
            sort_by_score(group);
        }
        self.skipped.extend(other.skipped);
    }

    /// The same report with every game replaced by `f(game)`.
    pub fn map_games<H>(self, mut f: impl FnMut(G) -> H) -> RankingReport<H> {
        let mut days = BTreeMap::new();
        for (date, entries) in self.days {
            let mapped = entries
                .into_iter()
                .map(|e| RankedEntry {
                    game: f(e.game),
                    analysis: e.analysis,
                })
                .collect();
            days.insert(date, mapped);
        }
        let skipped = self
            .skipped
            .into_iter()
            .map(|s| SkippedGame {
                game: f(s.game),
                date: s.date,
                reason: s.reason,
            })
            .collect();
        RankingReport { days, skipped }
    }
}

/// Validate, score and rank a batch of games.
pub fn rank_games_with<G>(
    model: &ExcitementModel,
    games: impl IntoIterator<Item = GameRecords<G>>,
) -> RankingReport<G> {
    rank_results(games.into_iter().map(|g| {
        let outcome = validate(&g.records).and_then(|series| model.score(&series));
        (g.game, g.date, outcome)
    }))
}

type Outcome<G> = (G, Option<NaiveDate>, Result<ExcitementAnalysis, ExcitementError>);

fn rank_results<G>(outcomes: impl Iterator<Item = Outcome<G>>) -> RankingReport<G> {
    let mut report = RankingReport::default();

    for (game, date, outcome) in outcomes {
        match outcome {
            Ok(analysis) => report
                .days
                .entry(date)
                .or_default()
                .push(RankedEntry { game, analysis }),
            Err(reason) => {
                debug!("Skipping game ({:?}): {}", date, reason);
                report.skipped.push(SkippedGame { game, date, reason });
            }
        }
    }

    for group in report.days.values_mut() {
        sort_by_score(group);
    }
    report
}

// `sort_by` is stable: equal scores keep submission order.
fn sort_by_score<G>(entries: &mut [RankedEntry<G>]) {
    entries.sort_by(|a, b| b.analysis.score.total_cmp(&a.analysis.score));
}
