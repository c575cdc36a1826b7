pub mod client;
pub mod feed;
pub mod models;
pub mod scoreboard;

pub use client::{EspnClient, DEFAULT_SCOREBOARD_URL, DEFAULT_SUMMARY_URL};
pub use feed::GameFeed;
pub use models::{Game, WinProbability};
