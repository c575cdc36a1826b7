use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use url::Url;

use crate::espn::{DEFAULT_SCOREBOARD_URL, DEFAULT_SUMMARY_URL};

/// Rank NBA games by excitement using ESPN win probability data
#[derive(Parser, Debug, Clone)]
#[command(name = "game-excitement", version, about)]
pub struct Config {
    /// ESPN scoreboard endpoint
    #[arg(long, env = "ESPN_SCOREBOARD_URL", default_value = DEFAULT_SCOREBOARD_URL, global = true)]
    pub scoreboard_url: String,

    /// ESPN game summary endpoint
    #[arg(long, env = "ESPN_SUMMARY_URL", default_value = DEFAULT_SUMMARY_URL, global = true)]
    pub summary_url: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "10", global = true)]
    pub http_timeout_secs: u64,

    /// Retries for failed ESPN requests (transport errors and 5xx)
    #[arg(long, env = "MAX_RETRIES", default_value = "2", global = true)]
    pub max_retries: u32,

    /// Game summaries fetched in parallel per date
    #[arg(long, env = "MAX_CONCURRENT_FETCHES", default_value = "4", global = true)]
    pub max_concurrent_fetches: usize,

    /// UTC offset (hours) used to decide what "yesterday" means; -5 is US Eastern
    #[arg(
        long,
        env = "UTC_OFFSET_HOURS",
        default_value = "-5",
        allow_hyphen_values = true,
        global = true
    )]
    pub utc_offset_hours: i32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Rate one game from a JSON file with a top-level 'winprobability' list
    Analyze {
        #[arg(default_value = "box.json")]
        input_file: PathBuf,
    },

    /// Chart one game's win probability from a saved JSON file (reveals the result)
    Plot {
        #[arg(default_value = "box.json")]
        input_file: PathBuf,

        /// SVG file to write
        #[arg(long, short, default_value = "winprobability.svg")]
        output: PathBuf,
    },

    /// Rank one day's games (defaults to yesterday)
    Daily {
        /// ISO date (YYYY-MM-DD) to analyze
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Rank the past N days and build the spoiler-free dashboard
    Weekly {
        /// Number of past days to include
        #[arg(long, default_value = "7")]
        days: u32,

        /// Where weekly_summary.json and index.html are written
        #[arg(long, default_value = "plots")]
        output_dir: PathBuf,

        /// Also write a win probability chart per game (may reveal spoilers)
        #[arg(long)]
        charts: bool,

        /// Serve the dashboard on this address after building it
        #[arg(long)]
        serve: Option<SocketAddr>,
    },
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("scoreboard_url", &self.scoreboard_url),
            ("summary_url", &self.summary_url),
        ] {
            if let Err(e) = Url::parse(value) {
                anyhow::bail!("{} '{}' is not a valid URL: {}", name, value, e);
            }
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("http_timeout_secs must be positive");
        }
        if self.max_concurrent_fetches == 0 {
            anyhow::bail!("max_concurrent_fetches must be at least 1");
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            anyhow::bail!("utc_offset_hours must be between -12 and 14");
        }
        Ok(())
    }

    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or(Utc.fix())
    }

    /// Calendar date at `now` in the configured offset.
    pub fn local_today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset()).date_naive()
    }

    /// Date for `daily`: the explicit one, or yesterday.
    pub fn daily_date(&self, explicit: Option<NaiveDate>, now: DateTime<Utc>) -> NaiveDate {
        explicit.unwrap_or_else(|| self.local_today(now) - Duration::days(1))
    }

    /// The `days` dates before today, newest first. At least one date.
    pub fn weekly_dates(&self, days: u32, now: DateTime<Utc>) -> Vec<NaiveDate> {
        let today = self.local_today(now);
        (1..=i64::from(days.max(1)))
            .map(|offset| today - Duration::days(offset))
            .collect()
    }
}
