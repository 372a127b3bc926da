use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use serie_a_summary::config::{CSV_ENV, SummaryConfig};
use serie_a_summary::dashboard::{DashboardView, build_dashboard_with_trend};
use serie_a_summary::export::export_view_xlsx;
use serie_a_summary::loader::read_raw_table;
use serie_a_summary::normalize::normalize_with_report;
use serie_a_summary::query::{FilterOptions, GoalsMode};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = SummaryConfig::from_args(&args, std::env::var(CSV_ENV).ok())?;

    let raw = read_raw_table(&cfg.csv_path)?;
    let (records, report) = normalize_with_report(&raw)
        .with_context(|| format!("normalize {}", cfg.csv_path.display()))?;
    if !report.skipped_rows.is_empty() {
        tracing::warn!(
            skipped = report.skipped_rows.len(),
            "rows dropped while normalizing"
        );
    }

    let options = FilterOptions::from_records(&records);
    let selection = cfg.selection(&options);
    let trend_teams = cfg.trend_teams();
    let view = build_dashboard_with_trend(&records, &selection, cfg.mode, trend_teams.as_ref());

    if let Some(path) = cfg.xlsx.as_deref() {
        let exported = export_view_xlsx(path, &view)?;
        eprintln!(
            "Wrote {} ({} matches, {} teams, {} trend points)",
            path.display(),
            exported.matches,
            exported.teams,
            exported.trend_points
        );
    }

    if cfg.json {
        let json = serde_json::to_string_pretty(&view).context("serialize dashboard view")?;
        println!("{json}");
        return Ok(());
    }

    print_view(&view);
    Ok(())
}

fn print_view(view: &DashboardView) {
    if view.is_empty() {
        println!("No matches for the current selection.");
        return;
    }

    let h = &view.headline;
    println!("Resumen Estadístico - Serie A");
    println!(
        "Partidos: {}  Goles: {}  Goles/partido: {:.2}  Equipos: {}  V/E/D: {}/{}/{}",
        h.matches, h.goals_total, h.goals_per_match, h.teams, h.wins, h.draws, h.losses
    );
    println!();

    println!(
        "{:<24} {:>8} {:>11} {:>14} {:>9} {:>7} {:>8}",
        "Team", "Partidos", "Total_Goles", "Goles_Promedio", "Victorias", "Empates", "Derrotas"
    );
    for s in &view.summary {
        println!(
            "{:<24} {:>8} {:>11} {:>14.2} {:>9} {:>7} {:>8}",
            s.team, s.match_count, s.goals_total, s.goals_avg, s.wins, s.draws, s.losses
        );
    }
    println!();

    let label = match view.goals_mode {
        GoalsMode::Total => "Goles totales",
        GoalsMode::Average => "Goles promedio",
    };
    println!("{label} por equipo");
    for row in view.goals_by_team.iter().take(10) {
        println!("  {:<24} {:>8.2}", row.team, row.value);
    }
    println!();

    println!("Posesión promedio");
    for row in view.possession.iter().take(10) {
        println!("  {:<24} {:>7.1}%", row.team, row.poss_avg);
    }
    println!();

    println!("Resultados");
    for row in &view.results {
        println!("  {:<12} {:>6}", row.result, row.count);
    }
    println!();

    println!("Tendencia de goles promedio por mes");
    for point in &view.trend {
        println!(
            "  {}  {:<24} {:>6.2}",
            point.year_month, point.team, point.goals_avg
        );
    }
}
