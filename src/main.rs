use std::{fs, str::FromStr};

use clap::Parser;
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use moa_processor::{
    args::Args,
    model::{
        create_model,
        report::{leaderboard, PlayerStanding},
        reweighting::{latest_week, retain_reliable},
        structures::{convergence::FitSummary, position::Position, raw_record::RawGameRecord},
        ModelError
    },
    utils::progress_utils::progress_bar
};

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .init();

    let records = load_records(&args);
    info!(records = records.len(), "records loaded");

    let positions: Vec<Position> = args
        .positions
        .iter()
        .map(|p| Position::from_str(p).expect("clap restricts positions to known values"))
        .collect();

    let bar = progress_bar(positions.len() as u64, "Fitting positions".to_string());

    // Each position owns its own model and matchup copies, so the fits are
    // independent and run in parallel.
    let results: Vec<(Position, Result<(FitSummary, Vec<PlayerStanding>), ModelError>)> = positions
        .par_iter()
        .map(|&position| {
            let outcome = fit_position(position, &records, &args);
            bar.inc(1);
            (position, outcome)
        })
        .collect();
    bar.finish();

    for (position, outcome) in results {
        match outcome {
            Ok((summary, standings)) => print_standings(position, &summary, &standings),
            Err(e) => eprintln!("{position}: fit failed: {e}")
        }
    }
}

fn fit_position(
    position: Position,
    records: &[RawGameRecord],
    args: &Args
) -> Result<(FitSummary, Vec<PlayerStanding>), ModelError> {
    let mut model = create_model(position).with_tuning(args.max_iter, args.tol);

    let prepared = model.position().prepare_data(records);
    let mut matchups = retain_reliable(prepared, args.min_weight);

    // Without an explicit reference week the newest game in the schedule
    // keeps full weight. No parseable weeks means recency is a no-op anyway.
    let reference_week = args
        .reference_week
        .or_else(|| latest_week(&matchups))
        .unwrap_or(0);
    model.apply_recency_weights(&mut matchups, reference_week);
    let summary = model.fit_with_quality_weighting(&mut matchups)?;

    info!(
        %position,
        iterations = summary.iterations,
        converged = summary.converged(),
        league_average = summary.league_average,
        "fit finished"
    );

    Ok((summary, leaderboard(&model, 0.05)))
}

fn print_standings(position: Position, summary: &FitSummary, standings: &[PlayerStanding]) {
    println!(
        "\n{position} leaderboard (league average {:.3}, {} iterations{})",
        summary.league_average,
        summary.iterations,
        if summary.converged() { "" } else { ", unconverged" }
    );

    for standing in standings {
        println!(
            "  {:>3}. {:<12} adjusted {:>7.3}  rating {:>+7.3}  95% CI [{:.3}, {:.3}]",
            standing.rank,
            standing.player_id,
            standing.adjusted_metric,
            standing.rating,
            standing.ci_lower,
            standing.ci_upper
        );
    }
}

fn load_records(args: &Args) -> Vec<RawGameRecord> {
    match &args.records {
        Some(path) => {
            let raw = fs::read_to_string(path).expect("Expected readable records file");
            serde_json::from_str(&raw).expect("Expected records file to be a JSON array of raw game records")
        }
        None => sample_records()
    }
}

/// A small two-position demo schedule used when no records file is given.
fn sample_records() -> Vec<RawGameRecord> {
    let wr = |player_id: &str, opponent_id: &str, game_id: &str, epa: f64, targets: f64, routes: f64| RawGameRecord {
        position: Position::WideReceiver,
        player_id: player_id.to_string(),
        opponent_id: opponent_id.to_string(),
        game_id: game_id.to_string(),
        epa,
        targets,
        routes,
        carries: 0.0
    };
    let rb = |player_id: &str, opponent_id: &str, game_id: &str, epa: f64, carries: f64| RawGameRecord {
        position: Position::RunningBack,
        player_id: player_id.to_string(),
        opponent_id: opponent_id.to_string(),
        game_id: game_id.to_string(),
        epa,
        targets: 0.0,
        routes: 0.0,
        carries
    };

    vec![
        wr("WR1", "DEF1", "2023_1", 12.5, 8.0, 40.0),
        wr("WR1", "DEF2", "2023_2", 8.2, 6.0, 38.0),
        wr("WR2", "DEF1", "2023_1", 6.8, 5.0, 35.0),
        wr("WR2", "DEF3", "2023_3", 15.3, 9.0, 42.0),
        wr("WR3", "DEF2", "2023_2", 4.5, 4.0, 30.0),
        wr("WR3", "DEF3", "2023_3", 9.6, 7.0, 36.0),
        rb("RB1", "RDEF1", "2023_1", 8.5, 15.0),
        rb("RB1", "RDEF2", "2023_2", 12.3, 18.0),
        rb("RB2", "RDEF1", "2023_1", 5.2, 12.0),
        rb("RB2", "RDEF3", "2023_3", 9.8, 16.0),
    ]
}
