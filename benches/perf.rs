use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

use serie_a_summary::dashboard::build_dashboard;
use serie_a_summary::normalize::normalize;
use serie_a_summary::query::{
    FilterOptions, FilterSelection, GoalRange, GoalsMode, aggregate_by_team,
};
use serie_a_summary::records::RawTable;

const TEAMS: [&str; 20] = [
    "Atalanta", "Bologna", "Cagliari", "Empoli", "Fiorentina", "Genoa", "Inter", "Juventus",
    "Lazio", "Lecce", "Milan", "Monza", "Napoli", "Roma", "Salernitana", "Sassuolo", "Torino",
    "Udinese", "Verona", "Frosinone",
];

/// Five seasons of 38 rounds, one row per team per match.
fn synthetic_table() -> RawTable {
    let mut rng = StdRng::seed_from_u64(7);
    let headers = ["Date", "Season", "Venue", "Result", "Team", "GF", "Poss"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut rows = Vec::new();
    for season in 2021..=2025 {
        for round in 0..38u32 {
            let month = 8 + round / 4;
            let (year, month) = if month > 12 {
                (season, month - 12)
            } else {
                (season - 1, month)
            };
            let day = 1 + (round % 4) * 7;
            for team in TEAMS {
                let result = ["W", "D", "L"][rng.gen_range(0..3)];
                let venue = if rng.gen_bool(0.5) { "Home" } else { "Away" };
                rows.push(vec![
                    format!("{year:04}-{month:02}-{day:02}"),
                    season.to_string(),
                    venue.to_string(),
                    result.to_string(),
                    team.to_string(),
                    rng.gen_range(0..6u32).to_string(),
                    format!("{:.1}", rng.gen_range(30.0..70.0)),
                ]);
            }
        }
    }
    RawTable::new(headers, rows)
}

fn bench_normalize(c: &mut Criterion) {
    let raw = synthetic_table();
    c.bench_function("normalize_five_seasons", |b| {
        b.iter(|| {
            let records = normalize(black_box(&raw)).unwrap();
            black_box(records.len());
        })
    });
}

fn bench_dashboard(c: &mut Criterion) {
    let records = normalize(&synthetic_table()).unwrap();
    let options = FilterOptions::from_records(&records);
    let mut selection = FilterSelection::spanning(&options);
    selection.teams = ["Inter", "Milan", "Napoli", "Juventus"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    selection.goal_range = GoalRange::new(1, 4);

    c.bench_function("dashboard_recompute", |b| {
        b.iter(|| {
            let view = build_dashboard(
                black_box(&records),
                black_box(&selection),
                GoalsMode::Average,
            );
            black_box(view.summary.len());
        })
    });

    c.bench_function("aggregate_by_team_full", |b| {
        b.iter(|| black_box(aggregate_by_team(black_box(&records))))
    });
}

criterion_group!(benches, bench_normalize, bench_dashboard);
criterion_main!(benches);
