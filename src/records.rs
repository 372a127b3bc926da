use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};

/// Short season tokens as they appear in the raw export, mapped to the
/// two-year span shown to analysts. Keys and values must never overlap.
pub const SEASON_LABELS: [(&str, &str); 5] = [
    ("2021", "2020/2021"),
    ("2022", "2021/2022"),
    ("2023", "2022/2023"),
    ("2024", "2023/2024"),
    ("2025", "2024/2025"),
];

static SEASON_LOOKUP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| SEASON_LABELS.iter().copied().collect());

/// Canonical season label. Unknown tokens (including already-canonical
/// spans) pass through unchanged.
pub fn canonical_season(raw: &str) -> String {
    SEASON_LOOKUP
        .get(raw)
        .map(|label| (*label).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// A parsed but untyped table: header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Venue {
    Home,
    Away,
    Other(String),
}

impl Venue {
    /// Accepts the raw export vocabulary (`Home`/`Away`) and the display
    /// vocabulary (`Local`/`Visitante`); anything else is kept verbatim.
    pub fn from_label(raw: &str) -> Self {
        match raw {
            "Home" | "Local" => Venue::Home,
            "Away" | "Visitante" => Venue::Away,
            other => Venue::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Venue::Home => "Local",
            Venue::Away => "Visitante",
            Venue::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
    Other(String),
}

impl Outcome {
    /// Accepts `W`/`D`/`L` and the display labels; anything else is kept
    /// verbatim.
    pub fn from_label(raw: &str) -> Self {
        match raw {
            "W" | "Victoria" => Outcome::Win,
            "D" | "Empate" => Outcome::Draw,
            "L" | "Derrota" => Outcome::Loss,
            other => Outcome::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Outcome::Win => "Victoria",
            Outcome::Draw => "Empate",
            Outcome::Loss => "Derrota",
            Outcome::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Venue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Calendar month bucket. Orders chronologically and renders as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One team's participation in one match, after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub date: Option<NaiveDate>,
    pub team: String,
    pub season: String,
    pub venue: Venue,
    pub result: Outcome,
    pub goals_for: u32,
    pub possession: Option<f64>,
}

impl MatchRecord {
    pub fn year_month(&self) -> Option<YearMonth> {
        self.date.map(YearMonth::from_date)
    }
}

#[derive(Serialize)]
struct MatchRow<'a> {
    #[serde(rename = "Date")]
    date: Option<NaiveDate>,
    #[serde(rename = "Team")]
    team: &'a str,
    #[serde(rename = "Season")]
    season: &'a str,
    #[serde(rename = "Venue")]
    venue: &'a Venue,
    #[serde(rename = "Result")]
    result: &'a Outcome,
    #[serde(rename = "GF")]
    goals_for: u32,
    #[serde(rename = "Poss")]
    possession: Option<f64>,
    #[serde(rename = "YearMonth")]
    year_month: Option<YearMonth>,
}

impl Serialize for MatchRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MatchRow {
            date: self.date,
            team: &self.team,
            season: &self.season,
            venue: &self.venue,
            result: &self.result,
            goals_for: self.goals_for,
            possession: self.possession,
            year_month: self.year_month(),
        }
        .serialize(serializer)
    }
}
