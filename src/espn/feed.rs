use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use super::models::{Game, WinProbability};

/// Source of finished games and their win probability plays.
#[async_trait]
pub trait GameFeed: Send + Sync {
    /// All games listed on the scoreboard for `date`.
    async fn fetch_games(&self, date: NaiveDate) -> Result<Vec<Game>>;

    /// Win probability plays for one game.
    async fn fetch_win_probability(&self, event_id: &str) -> Result<WinProbability>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
