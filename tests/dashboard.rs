use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serie_a_summary::dashboard::{
    DEFAULT_TREND_TEAMS, Headline, build_dashboard, build_dashboard_with_trend,
    default_trend_teams, result_breakdown,
};
use serie_a_summary::export::{export_view_json, export_view_xlsx};
use serie_a_summary::loader::{read_raw_table, read_raw_table_from};
use serie_a_summary::normalize::normalize;
use serie_a_summary::query::{FilterSelection, GoalRange, GoalsMode};
use serie_a_summary::records::MatchRecord;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn sample_records() -> Vec<MatchRecord> {
    let raw = read_raw_table(&fixture_path("matches_sample.csv")).expect("fixture should load");
    normalize(&raw).expect("fixture should normalize")
}

#[test]
fn headline_totals_over_filtered_set() {
    let h = Headline::from_records(&sample_records());
    assert_eq!(h.matches, 8);
    assert_eq!(h.goals_total, 14);
    assert_eq!(h.goals_per_match, 1.75);
    assert_eq!(h.teams, 4);
    assert_eq!((h.wins, h.draws, h.losses), (4, 2, 1));

    let empty = Headline::from_records(&[]);
    assert_eq!(empty.teams, 0);
    assert_eq!(empty, Headline::default());
}

#[test]
fn result_breakdown_counts_labels() {
    let rows: Vec<(String, usize)> = result_breakdown(&sample_records())
        .into_iter()
        .map(|r| (r.result, r.count))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Victoria".to_string(), 4),
            ("Empate".to_string(), 2),
            ("Derrota".to_string(), 1),
            ("X".to_string(), 1),
        ]
    );
}

#[test]
fn dashboard_trend_defaults_to_first_three_teams() {
    let records = sample_records();

    // Nothing picked: the first three teams by name left after filtering.
    let open = FilterSelection::with_goal_range(GoalRange::new(0, 10));
    let view = build_dashboard(&records, &open, GoalsMode::Total);
    assert_eq!(view.filtered.len(), 8);
    assert_eq!(view.summary.len(), 4);
    let plotted: BTreeSet<&str> = view.trend.iter().map(|p| p.team.as_str()).collect();
    assert_eq!(plotted, BTreeSet::from(["Inter", "Juventus", "Milan"]));
    assert_eq!(view.trend.len(), 4);

    let mut picked = open.clone();
    picked.teams.insert("Inter".to_string());
    let view = build_dashboard(&records, &picked, GoalsMode::Average);
    assert_eq!(view.filtered.len(), 2);
    assert_eq!(view.trend.len(), 1);
    assert_eq!(view.goals_by_team[0].value, 1.0);
    assert_eq!(view.headline.matches, 2);
    assert_eq!(view.headline.teams, 1);
}

#[test]
fn default_trend_teams_take_picker_order() {
    let records = sample_records();
    let mut selection = FilterSelection::with_goal_range(GoalRange::new(0, 10));
    for team in ["Napoli", "Milan", "Juventus", "Inter"] {
        selection.teams.insert(team.to_string());
    }
    let teams = default_trend_teams(&selection, &records);
    assert_eq!(teams.len(), DEFAULT_TREND_TEAMS);
    assert!(!teams.contains("Napoli"));

    assert_eq!(default_trend_teams(&selection, &[]).len(), DEFAULT_TREND_TEAMS);
    let open = FilterSelection::with_goal_range(GoalRange::new(0, 10));
    assert!(default_trend_teams(&open, &[]).is_empty());
}

#[test]
fn explicit_trend_teams_override_default() {
    let records = sample_records();
    let open = FilterSelection::with_goal_range(GoalRange::new(0, 10));
    let only_napoli = BTreeSet::from(["Napoli".to_string()]);
    let view = build_dashboard_with_trend(&records, &open, GoalsMode::Total, Some(&only_napoli));
    assert_eq!(view.trend.len(), 1);
    assert_eq!(view.trend[0].team, "Napoli");
    assert_eq!(view.trend[0].goals_avg, 2.5);
}

#[test]
fn dashboard_with_no_matches_is_empty_not_an_error() {
    let records = sample_records();
    let selection = FilterSelection::with_goal_range(GoalRange::new(50, 60));
    let view = build_dashboard(&records, &selection, GoalsMode::Total);
    assert!(view.is_empty());
    assert!(view.summary.is_empty());
    assert!(view.goals_by_team.is_empty());
    assert!(view.trend.is_empty());
    assert!(view.possession.is_empty());
    assert!(view.results.is_empty());
    assert_eq!(view.headline.goals_per_match, 0.0);
}

#[test]
fn loader_keeps_ragged_rows() {
    let raw = read_raw_table_from("Date,Team\n2021-01-01,Inter,extra\n2021-01-02\n".as_bytes())
        .expect("flexible csv");
    assert_eq!(raw.headers, vec!["Date", "Team"]);
    assert_eq!(raw.rows.len(), 2);
    assert_eq!(raw.rows[1], vec!["2021-01-02"]);
}

#[test]
fn loader_reports_missing_file() {
    assert!(read_raw_table(&fixture_path("does_not_exist.csv")).is_err());
}

#[test]
fn view_exports_to_json_and_xlsx() {
    let records = sample_records();
    let selection = FilterSelection::with_goal_range(GoalRange::new(0, 10));
    let view = build_dashboard(&records, &selection, GoalsMode::Total);
    let dir = tempfile::tempdir().expect("tempdir");

    let json_path = dir.path().join("view.json");
    export_view_json(&json_path, &view).expect("json export");
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("read json"))
            .expect("valid json");
    assert_eq!(parsed["goals_mode"], "total");
    assert_eq!(parsed["summary"][0]["Team"], "Napoli");
    assert_eq!(parsed["trend"][0]["YearMonth"], "2020-09");
    assert_eq!(parsed["headline"]["teams"], 4);
    assert_eq!(parsed["possession"][0]["Team"], "Milan");
    assert_eq!(parsed["possession"][0]["poss_avg"], 56.0);
    assert_eq!(parsed["filtered"].as_array().map(|a| a.len()), Some(8));

    let xlsx_path = dir.path().join("view.xlsx");
    let report = export_view_xlsx(&xlsx_path, &view).expect("xlsx export");
    assert_eq!(report.matches, 8);
    assert_eq!(report.teams, 4);
    assert_eq!(report.trend_points, 4);
    assert!(xlsx_path.exists());
}
