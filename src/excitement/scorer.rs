//! Heuristic excitement score built from win probability swings.
//!
//! Four signals each ramp linearly to saturation and are then weighted:
//!
//! | signal        | saturates at | weight |
//! |---------------|--------------|--------|
//! | average swing | 0.04         | 2.5    |
//! | biggest swing | 0.18         | 2.5    |
//! | lead changes  | 3            | 3.0    |
//! | toss-up share | 0.45         | 2.0    |
//!
//! The weights sum to the 10.0 ceiling, so a game that saturates every
//! signal scores exactly 10.

use super::error::ExcitementError;
use super::models::{ExcitementAnalysis, ProbabilitySeries, Verdict};

/// Coefficients of the excitement formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExcitementModel {
    pub avg_swing_saturation: f64,
    pub avg_swing_weight: f64,
    pub max_swing_saturation: f64,
    pub max_swing_weight: f64,
    pub lead_change_saturation: f64,
    pub lead_change_weight: f64,
    pub close_ratio_saturation: f64,
    pub close_ratio_weight: f64,
    /// Samples at or above this value count as home-favored.
    pub lead_threshold: f64,
    /// Closed toss-up band `(low, high)`.
    pub toss_up_band: (f64, f64),
    pub max_score: f64,
}

impl ExcitementModel {
    pub const NBA: ExcitementModel = ExcitementModel {
        avg_swing_saturation: 0.04,
        avg_swing_weight: 2.5,
        max_swing_saturation: 0.18,
        max_swing_weight: 2.5,
        lead_change_saturation: 3.0,
        lead_change_weight: 3.0,
        close_ratio_saturation: 0.45,
        close_ratio_weight: 2.0,
        lead_threshold: 0.5,
        toss_up_band: (0.45, 0.55),
        max_score: 10.0,
    };

    /// Score one game. Needs at least two samples to measure a swing.
    pub fn score(
        &self,
        series: &ProbabilitySeries,
    ) -> Result<ExcitementAnalysis, ExcitementError> {
        let p = series.as_slice();
        if p.len() < 2 {
            return Err(ExcitementError::InsufficientData { samples: p.len() });
        }

        let swings: Vec<f64> = p.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
        let avg_swing = swings.iter().sum::<f64>() / swings.len() as f64;
        let max_swing = swings.iter().copied().fold(0.0, f64::max);

        let lead_changes = p
            .windows(2)
            .filter(|w| self.home_favored(w[0]) != self.home_favored(w[1]))
            .count() as u32;

        let (low, high) = self.toss_up_band;
        let close = p.iter().filter(|&&x| (low..=high).contains(&x)).count();
        let close_ratio = close as f64 / p.len() as f64;

        let raw = ramp(avg_swing, self.avg_swing_saturation) * self.avg_swing_weight
            + ramp(max_swing, self.max_swing_saturation) * self.max_swing_weight
            + ramp(lead_changes as f64, self.lead_change_saturation) * self.lead_change_weight
            + ramp(close_ratio, self.close_ratio_saturation) * self.close_ratio_weight;
        let score = raw.min(self.max_score);

        Ok(ExcitementAnalysis {
            score,
            verdict: Verdict::from_score(score),
            lead_changes,
            avg_swing,
            max_swing,
            close_ratio,
        })
    }

    fn home_favored(&self, p: f64) -> bool {
        p >= self.lead_threshold
    }
}

impl Default for ExcitementModel {
    fn default() -> Self {
        Self::NBA
    }
}

fn ramp(value: f64, saturation: f64) -> f64 {
    (value / saturation).min(1.0)
}

/// Score a series with the default NBA coefficients.
pub fn score(series: &ProbabilitySeries) -> Result<ExcitementAnalysis, ExcitementError> {
    ExcitementModel::NBA.score(series)
}
