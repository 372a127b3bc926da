use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::query::{
    FilterSelection, GoalsMode, PossessionAvg, TeamSummary, TeamValue, TrendPoint,
    aggregate_by_team, apply_filters, goals_per_team, possession_by_team, trend_series,
};
use crate::records::{MatchRecord, Outcome};

/// KPI strip shown above the charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Headline {
    pub matches: usize,
    pub goals_total: u64,
    pub goals_per_match: f64,
    /// Distinct teams in the filtered set.
    pub teams: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl Headline {
    pub fn from_records(records: &[MatchRecord]) -> Self {
        let mut out = Headline {
            matches: records.len(),
            ..Headline::default()
        };
        let mut teams = HashSet::new();
        for r in records {
            teams.insert(r.team.as_str());
            out.goals_total += u64::from(r.goals_for);
            match r.result {
                Outcome::Win => out.wins += 1,
                Outcome::Draw => out.draws += 1,
                Outcome::Loss => out.losses += 1,
                Outcome::Other(_) => {}
            }
        }
        out.teams = teams.len();
        if out.matches > 0 {
            out.goals_per_match = out.goals_total as f64 / out.matches as f64;
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultCount {
    #[serde(rename = "Result")]
    pub result: String,
    pub count: usize,
}

/// Records per result label, most frequent first.
pub fn result_breakdown(records: &[MatchRecord]) -> Vec<ResultCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in records {
        *counts.entry(r.result.label()).or_insert(0) += 1;
    }
    let mut out: Vec<ResultCount> = counts
        .into_iter()
        .map(|(label, count)| ResultCount {
            result: label.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.result.cmp(&b.result)));
    out
}

/// Everything the presentation layer draws for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filtered: Vec<MatchRecord>,
    pub headline: Headline,
    pub summary: Vec<TeamSummary>,
    pub goals_mode: GoalsMode,
    pub goals_by_team: Vec<TeamValue>,
    pub trend: Vec<TrendPoint>,
    pub possession: Vec<PossessionAvg>,
    pub results: Vec<ResultCount>,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }
}

/// How many teams the trend chart plots when the caller does not pick them.
pub const DEFAULT_TREND_TEAMS: usize = 3;

/// The first [`DEFAULT_TREND_TEAMS`] teams of the team picker in name order.
/// With nothing picked, the candidates are the teams left in `filtered`.
pub fn default_trend_teams(
    selection: &FilterSelection,
    filtered: &[MatchRecord],
) -> BTreeSet<String> {
    let candidates: BTreeSet<&str> = if selection.teams.is_empty() {
        filtered.iter().map(|r| r.team.as_str()).collect()
    } else {
        selection.teams.iter().map(String::as_str).collect()
    };
    candidates
        .into_iter()
        .take(DEFAULT_TREND_TEAMS)
        .map(str::to_string)
        .collect()
}

pub fn build_dashboard(
    records: &[MatchRecord],
    selection: &FilterSelection,
    mode: GoalsMode,
) -> DashboardView {
    build_dashboard_with_trend(records, selection, mode, None)
}

/// Like [`build_dashboard`], with an explicit set of trend teams. `None`
/// falls back to [`default_trend_teams`].
pub fn build_dashboard_with_trend(
    records: &[MatchRecord],
    selection: &FilterSelection,
    mode: GoalsMode,
    trend_teams: Option<&BTreeSet<String>>,
) -> DashboardView {
    let filtered = apply_filters(records, selection);
    let trend_teams = match trend_teams {
        Some(teams) => teams.clone(),
        None => default_trend_teams(selection, &filtered),
    };

    DashboardView {
        headline: Headline::from_records(&filtered),
        summary: aggregate_by_team(&filtered),
        goals_mode: mode,
        goals_by_team: goals_per_team(&filtered, mode),
        trend: trend_series(&filtered, &trend_teams),
        possession: possession_by_team(&filtered),
        results: result_breakdown(&filtered),
        filtered,
    }
}
