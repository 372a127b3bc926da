use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;

use crate::normalize::parse_date;
use crate::query::{DateRange, FilterOptions, FilterSelection, GoalRange, GoalsMode};
use crate::records::{Outcome, Venue, canonical_season};

pub const CSV_ENV: &str = "SERIE_A_CSV";
const DEFAULT_CSV: &str = "matches_serie_A.csv";

/// Command-line and environment settings for the summary binary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryConfig {
    pub csv_path: PathBuf,
    pub teams: Vec<String>,
    /// Teams plotted on the monthly trend; empty keeps the default picks.
    pub trend_teams: Vec<String>,
    pub seasons: Vec<String>,
    pub results: Vec<Outcome>,
    pub venues: Vec<Venue>,
    pub goals: Option<GoalRange>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub mode: GoalsMode,
    pub json: bool,
    pub xlsx: Option<PathBuf>,
}

impl SummaryConfig {
    /// `env_csv` is the value of `SERIE_A_CSV`, if set. An explicit
    /// `--csv` wins over it.
    pub fn from_args(args: &[String], env_csv: Option<String>) -> Result<Self> {
        let mut cfg = SummaryConfig {
            csv_path: env_csv
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV)),
            teams: Vec::new(),
            trend_teams: Vec::new(),
            seasons: Vec::new(),
            results: Vec::new(),
            venues: Vec::new(),
            goals: None,
            from: None,
            to: None,
            mode: GoalsMode::Total,
            json: false,
            xlsx: None,
        };

        for arg in args {
            if arg == "--average" {
                cfg.mode = GoalsMode::Average;
                continue;
            }
            if arg == "--json" {
                cfg.json = true;
                continue;
            }
            let Some((key, value)) = arg.split_once('=') else {
                bail!("unrecognised argument `{arg}`");
            };
            let value = value.trim();
            if value.is_empty() {
                bail!("empty value for `{key}`");
            }
            match key {
                "--csv" => cfg.csv_path = PathBuf::from(value),
                "--team" => cfg.teams.push(value.to_string()),
                "--trend-team" => cfg.trend_teams.push(value.to_string()),
                // Accept either the short token or the span label.
                "--season" => cfg.seasons.push(canonical_season(value)),
                "--result" => cfg.results.push(Outcome::from_label(value)),
                "--venue" => cfg.venues.push(Venue::from_label(value)),
                "--goals" => cfg.goals = Some(parse_goal_range(value)?),
                "--from" => cfg.from = Some(parse_cli_date(value)?),
                "--to" => cfg.to = Some(parse_cli_date(value)?),
                "--xlsx" => cfg.xlsx = Some(PathBuf::from(value)),
                _ => bail!("unrecognised argument `{key}`"),
            }
        }

        if let (Some(from), Some(to)) = (cfg.from, cfg.to) {
            if from > to {
                bail!("--from {from} is after --to {to}");
            }
        }
        Ok(cfg)
    }

    pub fn trend_teams(&self) -> Option<BTreeSet<String>> {
        if self.trend_teams.is_empty() {
            None
        } else {
            Some(self.trend_teams.iter().cloned().collect())
        }
    }

    /// Build the filter selection, filling unspecified bounds from the
    /// observed data the way the sidebar defaults do.
    pub fn selection(&self, options: &FilterOptions) -> FilterSelection {
        let mut selection =
            FilterSelection::with_goal_range(self.goals.unwrap_or(options.goal_range));
        selection.teams = self.teams.iter().cloned().collect();
        selection.seasons = self.seasons.iter().cloned().collect();
        selection.results = self.results.iter().cloned().collect();
        selection.venues = self.venues.iter().cloned().collect();
        selection.date_range = match (self.from, self.to) {
            (None, None) => None,
            (from, to) => {
                let observed = options.date_range;
                let start = from
                    .or(observed.map(|r| r.start))
                    .unwrap_or(NaiveDate::MIN);
                let end = to.or(observed.map(|r| r.end)).unwrap_or(NaiveDate::MAX);
                Some(DateRange::new(start, end))
            }
        };
        selection
    }
}

fn parse_goal_range(raw: &str) -> Result<GoalRange> {
    let (lo, hi) = raw
        .split_once('-')
        .ok_or_else(|| anyhow!("goal range `{raw}` must look like MIN-MAX"))?;
    let min = lo
        .trim()
        .parse::<u32>()
        .with_context(|| format!("goal range minimum `{lo}`"))?;
    let max = hi
        .trim()
        .parse::<u32>()
        .with_context(|| format!("goal range maximum `{hi}`"))?;
    if min > max {
        bail!("goal range `{raw}` has min above max");
    }
    Ok(GoalRange::new(min, max))
}

fn parse_cli_date(raw: &str) -> Result<NaiveDate> {
    parse_date(raw).ok_or_else(|| anyhow!("date `{raw}` must be YYYY-MM-DD"))
}
