use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::records::{MatchRecord, Outcome, Venue, YearMonth};

/// Inclusive bounds on `goals_for`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalRange {
    pub min: u32,
    pub max: u32,
}

impl GoalRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, goals: u32) -> bool {
        self.min <= goals && goals <= self.max
    }
}

/// Inclusive day-granularity bounds on the match date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// What the analyst picked in the sidebar. An empty set on any categorical
/// dimension means "no constraint on that dimension", not "match nothing".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub teams: BTreeSet<String>,
    pub seasons: BTreeSet<String>,
    pub results: BTreeSet<Outcome>,
    pub venues: BTreeSet<Venue>,
    pub goal_range: GoalRange,
    pub date_range: Option<DateRange>,
}

impl FilterSelection {
    /// No categorical constraint, the given goal bounds, no date bounds.
    pub fn with_goal_range(goal_range: GoalRange) -> Self {
        Self {
            teams: BTreeSet::new(),
            seasons: BTreeSet::new(),
            results: BTreeSet::new(),
            venues: BTreeSet::new(),
            goal_range,
            date_range: None,
        }
    }

    /// Every observed value selected and the goal range at its observed
    /// extent. The date range is left open so undated records survive;
    /// applying it to the table the options came from is the identity.
    pub fn spanning(options: &FilterOptions) -> Self {
        Self {
            teams: options.teams.iter().cloned().collect(),
            seasons: options.seasons.iter().cloned().collect(),
            results: options.results.iter().cloned().collect(),
            venues: options.venues.iter().cloned().collect(),
            goal_range: options.goal_range,
            date_range: None,
        }
    }

    pub fn matches(&self, record: &MatchRecord) -> bool {
        in_set_or_unconstrained(&self.teams, &record.team)
            && in_set_or_unconstrained(&self.seasons, &record.season)
            && in_set_or_unconstrained(&self.results, &record.result)
            && in_set_or_unconstrained(&self.venues, &record.venue)
            && self.goal_range.contains(record.goals_for)
            && match self.date_range {
                None => true,
                Some(range) => record.date.is_some_and(|d| range.contains(d)),
            }
    }
}

fn in_set_or_unconstrained<T: Ord>(set: &BTreeSet<T>, value: &T) -> bool {
    set.is_empty() || set.contains(value)
}

/// The domain each filter widget is populated with.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub teams: Vec<String>,
    pub seasons: Vec<String>,
    pub results: Vec<Outcome>,
    pub venues: Vec<Venue>,
    pub goal_range: GoalRange,
    pub date_range: Option<DateRange>,
}

impl FilterOptions {
    pub fn from_records(records: &[MatchRecord]) -> Self {
        let mut teams = BTreeSet::new();
        let mut seasons = BTreeSet::new();
        let mut results = BTreeSet::new();
        let mut venues = BTreeSet::new();
        let mut goals: Option<(u32, u32)> = None;
        let mut dates: Option<(NaiveDate, NaiveDate)> = None;

        for r in records {
            teams.insert(r.team.clone());
            seasons.insert(r.season.clone());
            results.insert(r.result.clone());
            venues.insert(r.venue.clone());
            goals = Some(match goals {
                None => (r.goals_for, r.goals_for),
                Some((lo, hi)) => (lo.min(r.goals_for), hi.max(r.goals_for)),
            });
            if let Some(d) = r.date {
                dates = Some(match dates {
                    None => (d, d),
                    Some((lo, hi)) => (lo.min(d), hi.max(d)),
                });
            }
        }

        let (min, max) = goals.unwrap_or((0, 0));
        Self {
            teams: teams.into_iter().collect(),
            seasons: seasons.into_iter().collect(),
            results: results.into_iter().collect(),
            venues: venues.into_iter().collect(),
            goal_range: GoalRange::new(min, max),
            date_range: dates.map(|(start, end)| DateRange::new(start, end)),
        }
    }
}

pub fn apply_filters(records: &[MatchRecord], selection: &FilterSelection) -> Vec<MatchRecord> {
    let out: Vec<MatchRecord> = records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect();
    debug!(input = records.len(), kept = out.len(), "applied filter selection");
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Partidos")]
    pub match_count: usize,
    #[serde(rename = "Total_Goles")]
    pub goals_total: u64,
    #[serde(rename = "Goles_Promedio")]
    pub goals_avg: f64,
    #[serde(rename = "Victorias")]
    pub wins: usize,
    #[serde(rename = "Empates")]
    pub draws: usize,
    #[serde(rename = "Derrotas")]
    pub losses: usize,
}

impl TeamSummary {
    fn empty(team: &str) -> Self {
        Self {
            team: team.to_string(),
            match_count: 0,
            goals_total: 0,
            goals_avg: 0.0,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }
}

pub fn aggregate_by_team(records: &[MatchRecord]) -> Vec<TeamSummary> {
    let mut by_team: HashMap<&str, TeamSummary> = HashMap::new();
    for r in records {
        let entry = by_team
            .entry(r.team.as_str())
            .or_insert_with(|| TeamSummary::empty(&r.team));
        entry.match_count += 1;
        entry.goals_total += u64::from(r.goals_for);
        match r.result {
            Outcome::Win => entry.wins += 1,
            Outcome::Draw => entry.draws += 1,
            Outcome::Loss => entry.losses += 1,
            Outcome::Other(_) => {}
        }
    }

    let mut out: Vec<TeamSummary> = by_team
        .into_values()
        .map(|mut s| {
            s.goals_avg = mean(s.goals_total as f64, s.match_count);
            s
        })
        .collect();
    out.sort_by(|a, b| {
        b.goals_total
            .cmp(&a.goals_total)
            .then_with(|| a.team.cmp(&b.team))
    });
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalsMode {
    Total,
    Average,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamValue {
    #[serde(rename = "Team")]
    pub team: String,
    pub value: f64,
}

pub fn goals_per_team(records: &[MatchRecord], mode: GoalsMode) -> Vec<TeamValue> {
    let mut sums: HashMap<&str, (u64, usize)> = HashMap::new();
    for r in records {
        let entry = sums.entry(r.team.as_str()).or_default();
        entry.0 += u64::from(r.goals_for);
        entry.1 += 1;
    }
    let rows = sums
        .into_iter()
        .map(|(team, (total, n))| TeamValue {
            team: team.to_string(),
            value: match mode {
                GoalsMode::Total => total as f64,
                GoalsMode::Average => mean(total as f64, n),
            },
        })
        .collect();
    sort_by_value_desc(rows)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PossessionAvg {
    #[serde(rename = "Team")]
    pub team: String,
    pub poss_avg: f64,
}

pub fn possession_by_team(records: &[MatchRecord]) -> Vec<PossessionAvg> {
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for r in records {
        let Some(poss) = r.possession else { continue };
        let entry = sums.entry(r.team.as_str()).or_default();
        entry.0 += poss;
        entry.1 += 1;
    }
    let mut rows: Vec<PossessionAvg> = sums
        .into_iter()
        .map(|(team, (total, n))| PossessionAvg {
            team: team.to_string(),
            poss_avg: mean(total, n),
        })
        .collect();
    rows.sort_by(|a, b| match b.poss_avg.total_cmp(&a.poss_avg) {
        Ordering::Equal => a.team.cmp(&b.team),
        other => other,
    });
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    #[serde(rename = "YearMonth")]
    pub year_month: YearMonth,
    #[serde(rename = "Team")]
    pub team: String,
    pub goals_avg: f64,
}

/// Mean goals per (month, team) for the given teams, oldest month first.
/// Records without a date have no month and are left out. An empty team
/// set yields an empty series.
pub fn trend_series(records: &[MatchRecord], teams: &BTreeSet<String>) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<(YearMonth, &str), (u64, usize)> = BTreeMap::new();
    for r in records {
        if !teams.contains(&r.team) {
            continue;
        }
        let Some(ym) = r.year_month() else { continue };
        let entry = buckets.entry((ym, r.team.as_str())).or_default();
        entry.0 += u64::from(r.goals_for);
        entry.1 += 1;
    }
    buckets
        .into_iter()
        .map(|((year_month, team), (total, n))| TrendPoint {
            year_month,
            team: team.to_string(),
            goals_avg: mean(total as f64, n),
        })
        .collect()
}

fn mean(total: f64, n: usize) -> f64 {
    if n == 0 { 0.0 } else { total / n as f64 }
}

fn sort_by_value_desc(mut rows: Vec<TeamValue>) -> Vec<TeamValue> {
    rows.sort_by(|a, b| match b.value.total_cmp(&a.value) {
        Ordering::Equal => a.team.cmp(&b.team),
        other => other,
    });
    rows
}
