/// One game from the ESPN scoreboard, without final scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    /// ESPN event ID, used to fetch the game summary
    pub event_id: String,
    pub home_team: String,
    pub away_team: String,
}

impl Game {
    /// "{away} at {home}"
    pub fn matchup(&self) -> String {
        format!("{} at {}", self.away_team, self.home_team)
    }
}

/// Win probability payload pulled out of a game summary.
#[derive(Debug, Clone, PartialEq)]
pub enum WinProbability {
    /// Non-empty `winprobability` list, records left unvalidated
    Plays(Vec<serde_json::Value>),
    /// Summary had no usable `winprobability` list
    Unavailable,
}
