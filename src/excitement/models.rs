use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use super::error::ExcitementError;

/// Home-team win probabilities in play order, every value in [0, 1].
///
/// Built by [`super::validate`] (or `TryFrom<Vec<f64>>`); never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilitySeries(Vec<f64>);

impl ProbabilitySeries {
    pub(super) fn from_checked(samples: Vec<f64>) -> Self {
        ProbabilitySeries(samples)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for ProbabilitySeries {
    type Error = ExcitementError;

    fn try_from(samples: Vec<f64>) -> Result<Self, Self::Error> {
        if samples.is_empty() {
            return Err(ExcitementError::EmptyInput);
        }
        if let Some((index, &value)) = samples
            .iter()
            .enumerate()
            .find(|(_, p)| !(0.0..=1.0).contains(*p))
        {
            return Err(ExcitementError::OutOfRange { index, value });
        }
        Ok(ProbabilitySeries(samples))
    }
}

/// Categorical read of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "Exciting")]
    Exciting,
    #[serde(rename = "Worth a look")]
    WorthALook,
    #[serde(rename = "Skip it")]
    SkipIt,
}

impl Verdict {
    pub const EXCITING_THRESHOLD: f64 = 6.5;
    pub const WORTH_A_LOOK_THRESHOLD: f64 = 4.0;

    /// Classify an already clamped score.
    pub fn from_score(score: f64) -> Self {
        if score >= Self::EXCITING_THRESHOLD {
            Verdict::Exciting
        } else if score >= Self::WORTH_A_LOOK_THRESHOLD {
            Verdict::WorthALook
        } else {
            Verdict::SkipIt
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Exciting => "Exciting",
            Verdict::WorthALook => "Worth a look",
            Verdict::SkipIt => "Skip it",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived metrics and composite score for one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcitementAnalysis {
    /// Composite score in [0, 10]
    pub score: f64,
    pub verdict: Verdict,
    pub lead_changes: u32,
    /// Mean absolute change between adjacent samples
    pub avg_swing: f64,
    /// Largest absolute change between adjacent samples
    pub max_swing: f64,
    /// Fraction of samples inside the toss-up band
    pub close_ratio: f64,
}

/// Raw upstream records for one game, as handed to the ranker.
#[derive(Debug, Clone)]
pub struct GameRecords<G> {
    pub game: G,
    pub date: Option<NaiveDate>,
    pub records: Vec<serde_json::Value>,
}

/// A scored game inside one date's ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry<G> {
    pub game: G,
    pub analysis: ExcitementAnalysis,
}

/// A game left out of the ranking and the reason it was left out.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedGame<G> {
    pub game: G,
    pub date: Option<NaiveDate>,
    pub reason: ExcitementError,
}
