use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::dashboard::DashboardView;
use crate::normalize::DATE_FORMAT;
use crate::query::{GoalsMode, PossessionAvg, TeamSummary, TeamValue, TrendPoint};
use crate::records::MatchRecord;

pub struct ExportReport {
    pub matches: usize,
    pub teams: usize,
    pub trend_points: usize,
}

pub fn export_view_xlsx(path: &Path, view: &DashboardView) -> Result<ExportReport> {
    let mut match_rows = vec![header(&[
        "Date", "Season", "Venue", "Result", "Team", "GF", "Poss", "YearMonth",
    ])];
    match_rows.extend(view.filtered.iter().map(match_row));

    let mut summary_rows = vec![header(&[
        "Team",
        "Partidos",
        "Total_Goles",
        "Goles_Promedio",
        "Victorias",
        "Empates",
        "Derrotas",
    ])];
    summary_rows.extend(view.summary.iter().map(summary_row));

    let goals_label = match view.goals_mode {
        GoalsMode::Total => "Total_Goles",
        GoalsMode::Average => "Goles_Promedio",
    };
    let mut goals_rows = vec![header(&["Team", goals_label])];
    goals_rows.extend(view.goals_by_team.iter().map(team_value_row));

    let mut trend_rows = vec![header(&["YearMonth", "Team", "Goles_Promedio"])];
    trend_rows.extend(view.trend.iter().map(trend_row));

    let mut possession_rows = vec![header(&["Team", "Poss_Promedio"])];
    possession_rows.extend(view.possession.iter().map(possession_row));

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Resumen")?;
        write_rows(sheet, &summary_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Goles")?;
        write_rows(sheet, &goals_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Tendencia")?;
        write_rows(sheet, &trend_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Posesion")?;
        write_rows(sheet, &possession_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Partidos")?;
        write_rows(sheet, &match_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        matches: view.filtered.len(),
        teams: view.summary.len(),
        trend_points: view.trend.len(),
    })
}

pub fn export_view_json(path: &Path, view: &DashboardView) -> Result<()> {
    let json = serde_json::to_string_pretty(view).context("serialize dashboard view")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write dashboard json")?;
    fs::rename(&tmp, path).context("swap dashboard json")?;
    Ok(())
}

fn header(cols: &[&str]) -> Vec<String> {
    cols.iter().map(|c| c.to_string()).collect()
}

fn match_row(r: &MatchRecord) -> Vec<String> {
    vec![
        r.date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        r.season.clone(),
        r.venue.label().to_string(),
        r.result.label().to_string(),
        r.team.clone(),
        r.goals_for.to_string(),
        opt_to_string(r.possession),
        opt_to_string(r.year_month()),
    ]
}

fn summary_row(s: &TeamSummary) -> Vec<String> {
    vec![
        s.team.clone(),
        s.match_count.to_string(),
        s.goals_total.to_string(),
        format!("{:.2}", s.goals_avg),
        s.wins.to_string(),
        s.draws.to_string(),
        s.losses.to_string(),
    ]
}

fn team_value_row(v: &TeamValue) -> Vec<String> {
    vec![v.team.clone(), format!("{:.2}", v.value)]
}

fn possession_row(p: &PossessionAvg) -> Vec<String> {
    vec![p.team.clone(), format!("{:.2}", p.poss_avg)]
}

fn trend_row(p: &TrendPoint) -> Vec<String> {
    vec![
        p.year_month.to_string(),
        p.team.clone(),
        format!("{:.2}", p.goals_avg),
    ]
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
