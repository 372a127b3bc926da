use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::records::{MatchRecord, Outcome, RawTable, Venue, canonical_season};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const REQUIRED_COLUMNS: [&str; 7] = ["Date", "Season", "Venue", "Result", "Team", "GF", "Poss"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub rows_in: usize,
    pub records_out: usize,
    pub missing_dates: usize,
    pub missing_possession: usize,
    pub passthrough_seasons: usize,
    pub passthrough_venues: usize,
    pub passthrough_results: usize,
    /// 1-based data row numbers dropped because `GF` was not a
    /// non-negative integer.
    pub skipped_rows: Vec<usize>,
}

struct Columns {
    date: usize,
    season: usize,
    venue: usize,
    result: usize,
    team: usize,
    goals_for: usize,
    possession: usize,
}

impl Columns {
    fn resolve(table: &RawTable) -> Result<Self, EngineError> {
        let find = |column: &'static str| {
            table
                .column_index(column)
                .ok_or(EngineError::MissingColumn { column })
        };
        Ok(Self {
            date: find("Date")?,
            season: find("Season")?,
            venue: find("Venue")?,
            result: find("Result")?,
            team: find("Team")?,
            goals_for: find("GF")?,
            possession: find("Poss")?,
        })
    }
}

pub fn normalize(table: &RawTable) -> Result<Vec<MatchRecord>, EngineError> {
    normalize_with_report(table).map(|(records, _)| records)
}

pub fn normalize_with_report(
    table: &RawTable,
) -> Result<(Vec<MatchRecord>, NormalizeReport), EngineError> {
    let cols = Columns::resolve(table)?;
    let mut report = NormalizeReport {
        rows_in: table.rows.len(),
        ..NormalizeReport::default()
    };
    let mut records = Vec::with_capacity(table.rows.len());

    for (idx, row) in table.rows.iter().enumerate() {
        let cell = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or("");

        let Some(goals_for) = parse_goals(cell(cols.goals_for)) else {
            warn!(row = idx + 1, gf = cell(cols.goals_for), "skipping row with unusable GF");
            report.skipped_rows.push(idx + 1);
            continue;
        };

        let date = parse_date(cell(cols.date));
        if date.is_none() {
            report.missing_dates += 1;
        }
        let possession = parse_possession(cell(cols.possession));
        if possession.is_none() {
            report.missing_possession += 1;
        }

        let raw_season = cell(cols.season);
        let season = canonical_season(raw_season);
        if season == raw_season {
            report.passthrough_seasons += 1;
        }
        let venue = Venue::from_label(cell(cols.venue));
        if matches!(venue, Venue::Other(_)) {
            report.passthrough_venues += 1;
        }
        let result = Outcome::from_label(cell(cols.result));
        if matches!(result, Outcome::Other(_)) {
            report.passthrough_results += 1;
        }

        records.push(MatchRecord {
            date,
            team: cell(cols.team).to_string(),
            season,
            venue,
            result,
            goals_for,
            possession,
        });
    }

    report.records_out = records.len();
    debug!(
        rows = report.rows_in,
        records = report.records_out,
        missing_dates = report.missing_dates,
        passthrough_seasons = report.passthrough_seasons,
        passthrough_venues = report.passthrough_venues,
        passthrough_results = report.passthrough_results,
        skipped = report.skipped_rows.len(),
        "normalized match table"
    );
    Ok((records, report))
}

/// Render normalized records back into the raw column layout. Feeding the
/// result to [`normalize`] yields the same records.
pub fn to_raw_table(records: &[MatchRecord]) -> RawTable {
    let headers = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.date
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_default(),
                r.season.clone(),
                r.venue.label().to_string(),
                r.result.label().to_string(),
                r.team.clone(),
                r.goals_for.to_string(),
                r.possession.map(|p| p.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    RawTable::new(headers, rows)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

fn parse_goals(raw: &str) -> Option<u32> {
    if let Ok(n) = raw.parse::<u32>() {
        return Some(n);
    }
    // Some exports write integer columns as floats ("2.0").
    let v = raw.parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
        Some(v as u32)
    } else {
        None
    }
}

fn parse_possession(raw: &str) -> Option<f64> {
    let v = raw.trim_end_matches('%').trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}
