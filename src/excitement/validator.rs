use serde_json::Value;

use super::error::ExcitementError;
use super::models::ProbabilitySeries;

/// Key carrying the home-team win probability in each upstream record.
pub const PROBABILITY_FIELD: &str = "homeWinPercentage";

/// Optional display identifier of a play; never used for scoring.
pub const PLAY_ID_FIELD: &str = "playId";

/// Extract and validate home win probabilities from raw play records.
///
/// Stops at the first bad record and reports its index; nothing is coerced
/// or dropped.
pub fn validate(records: &[Value]) -> Result<ProbabilitySeries, ExcitementError> {
    let mut samples = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let raw = record
            .get(PROBABILITY_FIELD)
            .ok_or(ExcitementError::MissingField { index })?;
        let value = to_probability(index, raw)?;
        if !(0.0..=1.0).contains(&value) {
            return Err(ExcitementError::OutOfRange { index, value });
        }
        samples.push(value);
    }

    if samples.is_empty() {
        return Err(ExcitementError::EmptyInput);
    }
    Ok(ProbabilitySeries::from_checked(samples))
}

// Numbers pass through; numeric strings are parsed.
fn to_probability(index: usize, raw: &Value) -> Result<f64, ExcitementError> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ExcitementError::NotNumeric {
        index,
        raw: raw.to_string(),
    })
}
