//! Win probability charts.
//!
//! These show the whole game curve, so they spoil the result. The weekly
//! run only writes them behind `--charts`.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use plotters::prelude::*;
use serde_json::Value;
use std::path::Path;

use crate::excitement::models::ProbabilitySeries;
use crate::excitement::{validate, ExcitementAnalysis, PLAY_ID_FIELD};

const CHART_SIZE: (u32, u32) = (1000, 450);
const MAX_TICKS: usize = 10;
const EVEN_ODDS: f64 = 50.0;

const HOME_COLOR: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
const AWAY_COLOR: RGBColor = RGBColor(0xd6, 0x27, 0x28);
const EVEN_COLOR: RGBColor = RGBColor(0x66, 0x66, 0x66);

/// X-axis labels: the last three characters of each play ID, or the play
/// index when a record has no ID.
pub fn play_labels(records: &[Value]) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let id = match &record[PLAY_ID_FIELD] {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => index.to_string(),
            };
            let len = id.chars().count();
            id.chars().skip(len.saturating_sub(3)).collect()
        })
        .collect()
}

/// File-name-safe form of a matchup: ASCII alphanumeric runs joined by `_`.
pub fn slugify(value: &str) -> String {
    let slug = value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if slug.is_empty() {
        "game".to_string()
    } else {
        slug
    }
}

pub fn chart_file_name(date: NaiveDate, matchup: &str) -> String {
    format!("{}_{}.svg", date, slugify(matchup))
}

/// Draw the home win probability curve to an SVG file at `path`.
pub fn render_chart(
    path: &Path,
    title: &str,
    series: &ProbabilitySeries,
    labels: &[String],
) -> Result<()> {
    let percent: Vec<f64> = series.as_slice().iter().map(|p| p * 100.0).collect();
    if percent.len() < 2 {
        anyhow::bail!("A chart needs at least two samples, got {}", percent.len());
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create chart directory {}", dir.display()))?;
    }
    let last = (percent.len() - 1) as i32;
    let points = |clamp: fn(f64, f64) -> f64| -> Vec<(i32, f64)> {
        percent
            .iter()
            .enumerate()
            .map(|(i, p)| (i as i32, clamp(*p, EVEN_ODDS)))
            .collect()
    };

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(0..last, 0f64..100f64)
        .map_err(draw_error)?;

    let label_at = |x: &i32| labels.get(*x as usize).cloned().unwrap_or_default();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(MAX_TICKS.min(labels.len()))
        .x_label_formatter(&label_at)
        .x_desc("Play sequence")
        .y_desc("Home win probability (%)")
        .draw()
        .map_err(draw_error)?;

    // Shade home-favored stretches blue and away-favored stretches red.
    chart
        .draw_series(AreaSeries::new(points(f64::max), EVEN_ODDS, HOME_COLOR.mix(0.15)))
        .map_err(draw_error)?;
    chart
        .draw_series(AreaSeries::new(points(f64::min), EVEN_ODDS, AWAY_COLOR.mix(0.15)))
        .map_err(draw_error)?;

    chart
        .draw_series(LineSeries::new(
            vec![(0, EVEN_ODDS), (last, EVEN_ODDS)],
            EVEN_COLOR.stroke_width(1),
        ))
        .map_err(draw_error)?
        .label("Even odds")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], EVEN_COLOR.stroke_width(1))
        });
    chart
        .draw_series(LineSeries::new(
            percent.iter().enumerate().map(|(i, p)| (i as i32, *p)),
            HOME_COLOR.stroke_width(2),
        ))
        .map_err(draw_error)?
        .label("Home win %")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], HOME_COLOR.stroke_width(2))
        });

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerMiddle)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(draw_error)?;

    root.present().map_err(draw_error)?;
    Ok(())
}

/// Chart one ranked game into `dir` and return the file name written.
pub fn save_game_chart(
    dir: &Path,
    date: NaiveDate,
    matchup: &str,
    analysis: &ExcitementAnalysis,
    records: &[Value],
) -> Result<String> {
    let series = validate(records)?;
    let file = chart_file_name(date, matchup);
    let title = format!(
        "{} ({}): excitement {:.2}/10, {}",
        matchup, date, analysis.score, analysis.verdict
    );
    render_chart(&dir.join(&file), &title, &series, &play_labels(records))
        .with_context(|| format!("Failed to chart {} on {}", matchup, date))?;
    Ok(file)
}

fn draw_error<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow::anyhow!("Chart drawing failed: {}", e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("game-excitement-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_play_labels_shorten_ids_and_fall_back_to_index() {
        let records = vec![
            json!({ "playId": "4015850011", "homeWinPercentage": 0.5 }),
            json!({ "playId": "12", "homeWinPercentage": 0.5 }),
            json!({ "playId": 401585013, "homeWinPercentage": 0.5 }),
            json!({ "homeWinPercentage": 0.5 }),
        ];
        assert_eq!(play_labels(&records), vec!["011", "12", "013", "3"]);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(
            slugify("New York Knicks at Boston Celtics"),
            "New_York_Knicks_at_Boston_Celtics"
        );
        assert_eq!(slugify("  76ers -- (home) "), "76ers_home");
        assert_eq!(slugify("???"), "game");
    }

    #[test]
    fn test_chart_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
        assert_eq!(
            chart_file_name(date, "Denver Nuggets at Utah Jazz"),
            "2025-11-01_Denver_Nuggets_at_Utah_Jazz.svg"
        );
    }

    #[test]
    fn test_save_game_chart_writes_svg() {
        let dir = temp_dir("chart");
        let date = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
        let records: Vec<Value> = [0.5, 0.52, 0.48, 0.9, 0.85]
            .iter()
            .enumerate()
            .map(|(i, p)| json!({ "playId": format!("40158500{}", i), "homeWinPercentage": p }))
            .collect();
        let analysis = crate::excitement::score(&validate(&records).unwrap()).unwrap();

        let file = save_game_chart(&dir, date, "Kings at Bucks", &analysis, &records).unwrap();
        assert_eq!(file, "2025-11-01_Kings_at_Bucks.svg");

        let svg = std::fs::read_to_string(dir.join(&file)).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Kings at Bucks (2025-11-01): excitement 9.00/10, Exciting"));
        assert!(svg.contains("Home win %"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_game_chart_rejects_invalid_records() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
        let series = ProbabilitySeries::try_from(vec![0.5, 0.6]).unwrap();
        let analysis = crate::excitement::score(&series).unwrap();
        let records = vec![json!({ "playId": "1" })];
        let result = save_game_chart(&temp_dir("bad-chart"), date, "A at B", &analysis, &records);
        assert!(result.is_err());
    }
}
