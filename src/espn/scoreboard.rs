use serde_json::Value;

use super::models::{Game, WinProbability};

const UNKNOWN_TEAM: &str = "Unknown";

/// Pull the playable games out of a scoreboard payload.
///
/// Events without an ID, without a competition, or with fewer than two
/// competitors are ignored.
pub fn parse_scoreboard(raw: &Value) -> Vec<Game> {
    let events = match raw["events"].as_array() {
        Some(a) => a,
        None => return vec![],
    };

    events
        .iter()
        .filter_map(|ev| {
            let event_id = event_id(&ev["id"])?;
            let competitors = ev["competitions"].as_array()?.first()?["competitors"].as_array()?;
            if competitors.len() < 2 {
                return None;
            }
            let (home_team, away_team) = teams(competitors);
            Some(Game {
                event_id,
                home_team,
                away_team,
            })
        })
        .collect()
}

// ESPN sends IDs as strings; accept bare numbers too.
fn event_id(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn teams(competitors: &[Value]) -> (String, String) {
    let mut home = UNKNOWN_TEAM.to_string();
    let mut away = UNKNOWN_TEAM.to_string();
    for comp in competitors {
        let team = &comp["team"];
        let name = non_empty_str(&team["displayName"])
            .or_else(|| non_empty_str(&team["name"]))
            .unwrap_or(UNKNOWN_TEAM)
            .to_string();
        match comp["homeAway"].as_str() {
            Some("home") => home = name,
            Some("away") => away = name,
            _ => {}
        }
    }
    (home, away)
}

fn non_empty_str(v: &Value) -> Option<&str> {
    v.as_str().filter(|s| !s.is_empty())
}

/// Extract the `winprobability` list from a game summary payload.
pub fn parse_win_probability(summary: &Value) -> WinProbability {
    match summary["winprobability"].as_array() {
        Some(plays) if !plays.is_empty() => WinProbability::Plays(plays.clone()),
        _ => WinProbability::Unavailable,
    }
}
