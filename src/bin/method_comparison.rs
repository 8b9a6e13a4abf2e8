use anyhow::Result;
use clap::Parser;
use othello_corners::engine::{GameState, DEFAULT_SMALL_RANDOM_MOVES, SMALL_BOARD_SIZE};
use othello_corners::methods::SearchMethod;
use othello_corners::problem::{CornerGoal, OthelloSearchProblem};
use othello_corners::solver::SearchLimits;
use std::collections::HashMap;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compares search methods over seeded random boards", long_about = None)]
struct Args {
    /// Number of random boards to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: u64,

    /// Seed of the first board; board `i` uses `start_seed + i`
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Random moves applied to the opening of each board
    #[clap(short, long, default_value_t = DEFAULT_SMALL_RANDOM_MOVES)]
    random_moves: usize,

    /// Width and height of each board
    #[clap(long, default_value_t = SMALL_BOARD_SIZE)]
    size: usize,

    /// Corners a goal board must have occupied: 1, 2 or 4
    #[clap(short, long, default_value_t = 2)]
    corners: usize,

    /// Give up a search after this many expansions
    #[clap(long, default_value_t = 200_000)]
    max_expansions: usize,
}

#[derive(Default)]
struct MethodStats {
    path_lengths: Vec<usize>,
    expansions: Vec<usize>,
    unsolved: usize,
    stopped: usize,
}

fn average(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<usize>() as f64 / values.len() as f64
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let goal = match args.corners {
        1 => CornerGoal::One,
        2 => CornerGoal::Two,
        4 => CornerGoal::All,
        other => anyhow::bail!("corners must be 1, 2 or 4, got {}", other),
    };
    let limits = SearchLimits::with_max_expansions(args.max_expansions);

    let mut all_stats: HashMap<SearchMethod, MethodStats> = HashMap::new();

    info!(boards = args.boards, %goal, "starting method comparison");

    for board_idx in 0..args.boards {
        let seed = args.start_seed + board_idx;
        let start = GameState::random_with_seed(seed, args.random_moves, args.size, args.size)?;
        let problem = OthelloSearchProblem::new(start, goal);

        println!("\nEvaluating Board {} (Seed: {})", board_idx, seed);

        for method in SearchMethod::ALL {
            let stats = all_stats.entry(method).or_default();
            match method.run(&problem, limits) {
                Ok(Some(solution)) => {
                    println!(
                        "  Method: {:<16} Length: {:<4} Expanded: {}",
                        method.to_string(),
                        solution.actions.len(),
                        solution.expanded
                    );
                    stats.path_lengths.push(solution.actions.len());
                    stats.expansions.push(solution.expanded);
                }
                Ok(None) => {
                    println!("  Method: {:<16} no path", method.to_string());
                    stats.unsolved += 1;
                }
                Err(e) => {
                    warn!(%method, seed, error = %e, "search stopped");
                    stats.stopped += 1;
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards evaluated: {}", args.boards);
    println!("Goal: {}", goal);
    println!("\n--- Averages over solved boards ---");

    let mut rows: Vec<(SearchMethod, &MethodStats)> = SearchMethod::ALL
        .iter()
        .filter_map(|method| all_stats.get(method).map(|stats| (*method, stats)))
        .collect();
    rows.sort_by(|a, b| {
        average(&a.1.path_lengths)
            .total_cmp(&average(&b.1.path_lengths))
            .then_with(|| average(&a.1.expansions).total_cmp(&average(&b.1.expansions)))
    });

    for (method, stats) in rows {
        println!(
            "Method {:<16}: Average Length = {:.2}, Average Expanded = {:.1}, Unsolved = {}, Stopped = {}",
            method.to_string(),
            average(&stats.path_lengths),
            average(&stats.expansions),
            stats.unsolved,
            stats.stopped
        );
    }

    Ok(())
}
