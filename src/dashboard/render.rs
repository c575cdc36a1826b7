use crate::espn::Game;
use crate::excitement::RankingReport;

use super::summary::date_label;
use crate::chart::chart_file_name;

/// Render the spoiler-free dashboard: one card per game with an intensity
/// meter, newest date first. Charts are never embedded; with `charts` a
/// card only names the chart file saved next to it.
pub fn render_dashboard(report: &RankingReport<Game>, charts: bool) -> String {
    let mut html = String::from(DASHBOARD_HEAD);

    if report.is_empty() {
        html.push_str("    <p class='empty'>No games with win probability data.</p>\n");
    }

    for (date, entries) in report.dates_newest_first() {
        if entries.is_empty() {
            continue;
        }
        html.push_str("    <section>\n");
        html.push_str(&format!("      <h2>{}</h2>\n", date_label(date)));
        html.push_str("      <div class='grid'>\n");
        for (idx, entry) in entries.iter().enumerate() {
            let a = &entry.analysis;
            let fill = (a.score / 10.0).clamp(0.0, 1.0) * 100.0;
            let chart_chip = match date.filter(|_| charts) {
                Some(d) => format!(
                    "\n              <span class='chip'>Chart saved<strong>{}</strong></span>",
                    escape_html(&chart_file_name(d, &entry.game.matchup()))
                ),
                None => String::new(),
            };
            html.push_str(&format!(
                r#"        <article class='card'>
          <header>
            <h3>{rank}. {matchup}</h3>
            <p>{verdict} &nbsp;&bull;&nbsp; {score:.2}/10 excitement</p>
          </header>
          <div class='meter' role='img' aria-label='Excitement {score:.2} out of 10'>
            <span class='fill' style='width:{fill:.1}%;'></span>
          </div>
          <p class='meter-label'>Intensity meter: {score:.2}/10</p>
          <footer>
            <div class='metrics'>
              <span class='chip'>Lead changes<strong>{lead_changes}</strong></span>
              <span class='chip'>Biggest swing<strong>{max_swing:.3}</strong></span>{chart_chip}
            </div>
            <p class='note'>Higher bars mean more volatile finish-time drama.</p>
          </footer>
        </article>
"#,
                rank = idx + 1,
                matchup = escape_html(&entry.game.matchup()),
                verdict = a.verdict,
                score = a.score,
                fill = fill,
                lead_changes = a.lead_changes,
                max_swing = a.max_swing,
                chart_chip = chart_chip,
            ));
        }
        html.push_str("      </div>\n");
        html.push_str("    </section>\n");
    }

    html.push_str(DASHBOARD_TAIL);
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

const DASHBOARD_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Weekly NBA Excitement Dashboard</title>
<style>
  :root {
    color-scheme: dark;
    --bg: #0c1116;
    --card: #121a21;
    --border: rgba(128,222,234,0.18);
    --accent: #80deea;
    --text: #e3f2fd;
    --muted: #90a4ae;
  }
  * { box-sizing: border-box; }
  body { background: var(--bg); color: var(--text); font-family: 'Inter', 'Segoe UI', Arial, sans-serif; margin: 0; }
  body > header { padding: 28px 34px 22px; background: linear-gradient(135deg,#1a237e,#0d47a1 40%,#26a69a); }
  body > header h1 { margin: 0; font-size: 30px; color: #fff; }
  body > header p { margin: 10px 0 0; color: #bbdefb; max-width: 720px; line-height: 1.45; }
  main { padding: 28px 34px 56px; }
  section { margin-bottom: 52px; }
  section h2 { font-size: 24px; margin: 0 0 18px; color: var(--accent); }
  .grid { display: grid; gap: 26px; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); }
  .card { background: var(--card); border-radius: 16px; border: 1px solid var(--border); overflow: hidden; display: flex; flex-direction: column; }
  .card header { padding: 20px 22px 18px; border-bottom: 1px solid var(--border); }
  .card header h3 { margin: 0; font-size: 19px; color: #fff; }
  .card header p { margin: 6px 0 0; color: #b0bec5; font-size: 14px; text-transform: uppercase; }
  .meter { margin: 22px 22px 0; height: 18px; background: #0f1419; border-radius: 999px; overflow: hidden; border: 1px solid var(--border); }
  .meter .fill { display: block; height: 100%; border-radius: 999px; background: linear-gradient(90deg,#ef5350,#ffa726,#ffee58,#66bb6a,#26a69a); }
  .meter-label { margin: 12px 22px 0; font-size: 13px; text-transform: uppercase; }
  .card footer { padding: 14px 22px 20px; color: #cfd8dc; font-size: 13px; border-top: 1px solid var(--border); }
  .metrics { margin: 10px 0 0; display: flex; flex-wrap: wrap; gap: 12px; font-size: 12px; text-transform: uppercase; }
  .chip { background: rgba(12,97,109,0.45); padding: 7px 12px; border-radius: 999px; border: 1px solid var(--border); color: var(--accent); }
  .chip strong { color: #e1f5fe; margin-left: 4px; }
  .note { margin-top: 10px; font-size: 12px; color: var(--muted); }
  .empty { color: var(--muted); text-align: center; padding: 2rem; }
  @media (max-width: 720px) { main { padding: 20px 18px 48px; } body > header { padding: 24px 18px 20px; } }
</style>
</head>
<body>
  <header>
    <h1>Weekly NBA Excitement Dashboard</h1>
    <p>Each card shows how wild the win-probability swings were without revealing final scores. The excitement bar is scaled 0-10, with colors shifting from calm (left) to chaos (right).</p>
  </header>
  <main>
"#;

const DASHBOARD_TAIL: &str = "  </main>\n</body>\n</html>\n";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::fixtures::sample_report;

    #[test]
    fn test_render_orders_cards_by_rank() {
        let html = render_dashboard(&sample_report(), false);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>2025-11-01</h2>"));
        let first = html.find("1. New York Knicks at Boston Celtics").unwrap();
        let second = html.find("2. Denver Nuggets at Utah Jazz").unwrap();
        assert!(first < second);
        assert!(html.contains("style='width:100.0%;'"));
        assert!(html.contains("Exciting &nbsp;&bull;&nbsp; 10.00/10 excitement"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_render_newest_date_first() {
        let mut report = sample_report();
        let older = report.clone();
        let moved: Vec<_> = older.days.into_values().collect();
        report
            .days
            .insert(chrono::NaiveDate::from_ymd_opt(2025, 10, 30), moved[0].clone());
        let html = render_dashboard(&report, false);
        assert!(html.find("2025-11-01").unwrap() < html.find("2025-10-30").unwrap());
    }

    #[test]
    fn test_render_empty_report() {
        let html = render_dashboard(&RankingReport::default(), true);
        assert!(html.contains("No games with win probability data."));
        assert!(!html.contains("<section>"));
    }

    #[test]
    fn test_render_chart_chips() {
        let html = render_dashboard(&sample_report(), true);
        assert!(html.contains(
            "<span class='chip'>Chart saved<strong>2025-11-01_New_York_Knicks_at_Boston_Celtics.svg</strong></span>"
        ));
        assert!(!render_dashboard(&sample_report(), false).contains("Chart saved"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>A & B's</b>"), "&lt;b&gt;A &amp; B&#39;s&lt;/b&gt;");
    }
}
