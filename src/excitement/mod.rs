//! Excitement scoring for completed games.
//!
//! Raw `winprobability` records go through [`validate`], the resulting
//! [`models::ProbabilitySeries`] through [`score`], and batches of games
//! through [`rank_games_with`]. Everything here is synchronous and free of I/O.

pub mod error;
pub mod models;
pub mod ranker;
pub mod scorer;
pub mod validator;

pub use models::{ExcitementAnalysis, GameRecords, RankedEntry, Verdict};
pub use ranker::{rank_games_with, RankingReport};
pub use scorer::{score, ExcitementModel};
pub use validator::{validate, PLAY_ID_FIELD};
