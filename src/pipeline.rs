//! Gathers games and win probability plays from a [`GameFeed`] and hands
//! them to the ranker.
//!
//! Summary fetches for one date run concurrently, but `buffered` yields
//! results in submission order, so the ranker always sees games in
//! scoreboard order.

use anyhow::Result;
use chrono::NaiveDate;
use futures_util::{stream, StreamExt};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::chart;
use crate::espn::{Game, GameFeed, WinProbability};
use crate::excitement::{rank_games_with, ExcitementModel, GameRecords, RankingReport};

/// Rankings for one or more dates plus a human-readable line per game or
/// date that explains what happened to it.
#[derive(Debug, Default)]
pub struct Harvest {
    pub report: RankingReport<Game>,
    pub notes: Vec<String>,
    /// Games listed on the scoreboards, scored or not
    pub games_found: usize,
}

#[derive(Debug, Clone)]
pub struct GatherOptions {
    /// Summaries fetched in parallel per date
    pub max_concurrent: usize,
    /// Write a win probability chart per ranked game into this directory
    pub chart_dir: Option<PathBuf>,
}

// A game tagged with its scoreboard position, so ranked and skipped results
// map back to their own note even when an event is listed twice.
#[derive(Debug)]
struct Slot {
    index: usize,
    game: Game,
}

/// Fetch and rank every game on `date`.
///
/// Fails if the scoreboard cannot be fetched or a requested chart cannot be
/// written; per-game problems end up in `notes` and `report.skipped`.
pub async fn gather_day(
    feed: &dyn GameFeed,
    model: &ExcitementModel,
    date: NaiveDate,
    options: &GatherOptions,
) -> Result<Harvest> {
    let games = feed.fetch_games(date).await?;
    rank_day(feed, model, date, games, options).await
}

async fn rank_day(
    feed: &dyn GameFeed,
    model: &ExcitementModel,
    date: NaiveDate,
    games: Vec<Game>,
    options: &GatherOptions,
) -> Result<Harvest> {
    let mut harvest = Harvest {
        games_found: games.len(),
        ..Harvest::default()
    };
    if games.is_empty() {
        harvest.notes.push(format!("{}: no games.", date));
        return Ok(harvest);
    }
    info!("{}: {} game(s) on the {} scoreboard", date, games.len(), feed.name());

    let fetched: Vec<(Game, Result<WinProbability>)> = stream::iter(games)
        .map(|game| async move {
            let plays = feed.fetch_win_probability(&game.event_id).await;
            (game, plays)
        })
        .buffered(options.max_concurrent.max(1))
        .collect()
        .await;

    // One note per scoreboard slot; scored and skipped games are filled in
    // after ranking.
    let mut notes: Vec<Option<String>> = vec![None; fetched.len()];
    let mut chart_records: Vec<Option<Vec<Value>>> = vec![None; fetched.len()];
    let mut inputs = Vec::new();
    for (index, (game, plays)) in fetched.into_iter().enumerate() {
        let prefix = format!("{} {}", date, game.matchup());
        match plays {
            Err(e) => {
                warn!("Summary fetch failed for event {}: {:#}", game.event_id, e);
                notes[index] = Some(format!("{}: summary fetch failed ({:#})", prefix, e));
            }
            Ok(WinProbability::Unavailable) => {
                notes[index] = Some(format!("{}: no win probability data.", prefix));
            }
            Ok(WinProbability::Plays(records)) => {
                if options.chart_dir.is_some() {
                    chart_records[index] = Some(records.clone());
                }
                inputs.push(GameRecords {
                    game: Slot { index, game },
                    date: Some(date),
                    records,
                });
            }
        }
    }

    let report = rank_games_with(model, inputs);

    for entry in report.day(Some(date)) {
        let Slot { index, game } = &entry.game;
        let a = &entry.analysis;
        let matchup = game.matchup();
        let note = match (&options.chart_dir, &chart_records[*index]) {
            (Some(dir), Some(records)) => {
                let file = chart::save_game_chart(dir, date, &matchup, a, records)?;
                format!("{} {}: saved {} (score {:.2})", date, matchup, file, a.score)
            }
            _ => format!("{} {}: excitement {:.2} ({})", date, matchup, a.score, a.verdict),
        };
        notes[*index] = Some(note);
    }
    for skipped in &report.skipped {
        let Slot { index, game } = &skipped.game;
        warn!("Skipping event {}: {}", game.event_id, skipped.reason);
        notes[*index] = Some(format!(
            "{} {}: invalid data ({})",
            date,
            game.matchup(),
            skipped.reason
        ));
    }

    harvest.notes = notes.into_iter().flatten().collect();
    harvest.report = report.map_games(|slot| slot.game);
    Ok(harvest)
}

/// Fetch and rank several dates. A date whose scoreboard cannot be fetched
/// is noted and skipped; a chart that cannot be written stops the run.
pub async fn gather_days(
    feed: &dyn GameFeed,
    model: &ExcitementModel,
    dates: &[NaiveDate],
    options: &GatherOptions,
) -> Result<Harvest> {
    let mut total = Harvest::default();
    for &date in dates {
        let games = match feed.fetch_games(date).await {
            Ok(games) => games,
            Err(e) => {
                warn!("{:#}", e);
                total
                    .notes
                    .push(format!("{}: failed to fetch scoreboard ({:#})", date, e));
                continue;
            }
        };
        let day = rank_day(feed, model, date, games, options).await?;
        total.games_found += day.games_found;
        total.notes.extend(day.notes);
        total.report.merge(day.report);
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory feed keyed by date and event ID.
    #[derive(Default)]
    struct FakeFeed {
        scoreboards: HashMap<NaiveDate, Vec<Game>>,
        plays: HashMap<String, Vec<Value>>,
        broken_summaries: Vec<String>,
        /// Summary latency per event
        delays_ms: HashMap<String, u64>,
        /// Served instead of `plays` when an event is fetched a second time
        refetched: HashMap<String, Vec<Value>>,
        seen: Mutex<HashSet<String>>,
    }

    fn records(probabilities: &[f64]) -> Vec<Value> {
        probabilities
            .iter()
            .enumerate()
            .map(|(i, p)| json!({ "playId": format!("10{}", i), "homeWinPercentage": p }))
            .collect()
    }

    fn listing(id: &str) -> Game {
        Game {
            event_id: id.to_string(),
            home_team: format!("Home {}", id),
            away_team: format!("Away {}", id),
        }
    }

    impl FakeFeed {
        fn add_game(&mut self, date: NaiveDate, id: &str, probabilities: &[f64]) {
            self.scoreboards.entry(date).or_default().push(listing(id));
            self.plays.insert(id.to_string(), records(probabilities));
        }
    }

    #[async_trait]
    impl GameFeed for FakeFeed {
        async fn fetch_games(&self, date: NaiveDate) -> Result<Vec<Game>> {
            match self.scoreboards.get(&date) {
                Some(games) => Ok(games.clone()),
                None => anyhow::bail!("scoreboard unavailable"),
            }
        }

        async fn fetch_win_probability(&self, event_id: &str) -> Result<WinProbability> {
            let repeat = !self.seen.lock().unwrap().insert(event_id.to_string());
            if let Some(ms) = self.delays_ms.get(event_id) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.broken_summaries.iter().any(|id| id == event_id) {
                anyhow::bail!("HTTP 500");
            }
            let plays = match self.refetched.get(event_id) {
                Some(p) if repeat => Some(p),
                _ => self.plays.get(event_id),
            };
            Ok(match plays {
                Some(p) if !p.is_empty() => WinProbability::Plays(p.clone()),
                _ => WinProbability::Unavailable,
            })
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn options(max_concurrent: usize) -> GatherOptions {
        GatherOptions {
            max_concurrent,
            chart_dir: None,
        }
    }

    fn ranked_ids(h: &Harvest, d: NaiveDate) -> Vec<String> {
        h.report
            .day(Some(d))
            .iter()
            .map(|e| e.game.event_id.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_gather_day_ranks_and_notes_in_scoreboard_order() {
        let mut feed = FakeFeed::default();
        feed.add_game(date(1), "blowout", &[0.9, 0.95, 0.99]);
        feed.add_game(date(1), "nodata", &[]);
        feed.add_game(date(1), "thriller", &[0.5, 0.1, 0.5, 0.9, 0.5, 0.1, 0.5]);
        feed.add_game(date(1), "broken", &[0.5, 0.6]);
        feed.add_game(date(1), "bad", &[0.5, 1.5]);
        feed.broken_summaries.push("broken".into());

        let h = gather_day(&feed, &ExcitementModel::NBA, date(1), &options(2))
            .await
            .unwrap();

        assert_eq!(h.games_found, 5);
        assert_eq!(ranked_ids(&h, date(1)), vec!["thriller", "blowout"]);
        assert_eq!(h.report.skipped.len(), 1);
        assert_eq!(h.report.skipped[0].game.event_id, "bad");

        assert_eq!(h.notes.len(), 5);
        assert!(h.notes[0].starts_with("2025-11-01 Away blowout at Home blowout: excitement"));
        assert_eq!(
            h.notes[1],
            "2025-11-01 Away nodata at Home nodata: no win probability data."
        );
        assert!(h.notes[2].contains("excitement 10.00 (Exciting)"));
        assert!(h.notes[3].contains("summary fetch failed (HTTP 500)"));
        assert!(h.notes[4]
            .contains("invalid data (winprobability[1].homeWinPercentage must be between 0 and 1"));
    }

    #[tokio::test]
    async fn test_gather_day_order_ignores_fetch_completion_order() {
        let mut feed = FakeFeed::default();
        for (i, id) in ["0", "1", "2", "3"].iter().enumerate() {
            feed.add_game(date(1), id, &[0.6, 0.4, 0.6]);
            // Earlier games answer last.
            feed.delays_ms.insert(id.to_string(), 80 - 20 * i as u64);
        }

        let h = gather_day(&feed, &ExcitementModel::NBA, date(1), &options(4))
            .await
            .unwrap();

        assert_eq!(ranked_ids(&h, date(1)), vec!["0", "1", "2", "3"]);
        let note_order: Vec<&str> = h
            .notes
            .iter()
            .map(|n| n.split(' ').nth(2).unwrap_or(""))
            .collect();
        assert_eq!(note_order, vec!["0", "1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_event_listed_twice_keeps_a_note_per_listing() {
        let mut feed = FakeFeed::default();
        feed.add_game(date(1), "dup", &[0.6, 0.4, 0.6]);
        feed.scoreboards.get_mut(&date(1)).unwrap().push(listing("dup"));
        feed.refetched.insert("dup".into(), records(&[0.5, 1.5]));

        let h = gather_day(&feed, &ExcitementModel::NBA, date(1), &options(1))
            .await
            .unwrap();

        assert_eq!(h.games_found, 2);
        assert_eq!(ranked_ids(&h, date(1)), vec!["dup"]);
        assert_eq!(h.report.skipped.len(), 1);
        assert_eq!(h.notes.len(), 2);
        assert!(h.notes[0].contains("excitement"));
        assert!(h.notes[1].contains("invalid data"));
    }

    #[tokio::test]
    async fn test_gather_day_writes_charts_when_asked() {
        let dir = std::env::temp_dir()
            .join(format!("game-excitement-pipeline-{}", std::process::id()));
        let mut feed = FakeFeed::default();
        feed.add_game(date(1), "7", &[0.5, 0.52, 0.48, 0.9, 0.85]);
        feed.add_game(date(1), "8", &[0.5]);
        let opts = GatherOptions {
            max_concurrent: 2,
            chart_dir: Some(dir.clone()),
        };

        let h = gather_day(&feed, &ExcitementModel::NBA, date(1), &opts).await.unwrap();

        assert_eq!(
            h.notes[0],
            "2025-11-01 Away 7 at Home 7: saved 2025-11-01_Away_7_at_Home_7.svg (score 9.00)"
        );
        assert!(h.notes[1].contains("invalid data"));
        assert!(dir.join("2025-11-01_Away_7_at_Home_7.svg").exists());
        assert!(!dir.join("2025-11-01_Away_8_at_Home_8.svg").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_gather_day_without_games() {
        let mut feed = FakeFeed::default();
        feed.scoreboards.insert(date(2), vec![]);
        let h = gather_day(&feed, &ExcitementModel::NBA, date(2), &options(4))
            .await
            .unwrap();
        assert_eq!(h.games_found, 0);
        assert!(h.report.is_empty());
        assert_eq!(h.notes, vec!["2025-11-02: no games."]);
    }

    #[tokio::test]
    async fn test_gather_day_scoreboard_failure_is_error() {
        let feed = FakeFeed::default();
        let result = gather_day(&feed, &ExcitementModel::NBA, date(3), &options(4)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_gather_days_continues_past_failed_date() {
        let mut feed = FakeFeed::default();
        feed.add_game(date(5), "a", &[0.6, 0.4, 0.6]);
        feed.add_game(date(5), "b", &[0.6, 0.4, 0.6]);
        feed.add_game(date(3), "c", &[0.5, 0.9]);

        let dates = [date(5), date(4), date(3)];
        let h = gather_days(&feed, &ExcitementModel::NBA, &dates, &options(1))
            .await
            .unwrap();

        assert_eq!(h.games_found, 3);
        assert_eq!(ranked_ids(&h, date(5)), vec!["a", "b"]);
        assert_eq!(ranked_ids(&h, date(3)), vec!["c"]);
        assert!(h
            .notes
            .iter()
            .any(|n| n.starts_with("2025-11-04: failed to fetch scoreboard")));
        assert_eq!(h.report.ranked_count(), 3);
    }
}
