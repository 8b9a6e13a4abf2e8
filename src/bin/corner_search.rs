use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use othello_corners::engine::{GameState, Labels, Position, Side, SMALL_BOARD_SIZE};
use othello_corners::methods::SearchMethod;
use othello_corners::problem::{CornerGoal, OthelloSearchProblem};
use othello_corners::solver::{SearchLimits, Solution};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GoalArg {
    One,
    Two,
    All,
}

impl From<GoalArg> for CornerGoal {
    fn from(goal: GoalArg) -> Self {
        match goal {
            GoalArg::One => CornerGoal::One,
            GoalArg::Two => CornerGoal::Two,
            GoalArg::All => CornerGoal::All,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Board file, one row per line with '.' for empty cells. A random board is used otherwise
    #[clap(short, long)]
    board_file: Option<PathBuf>,

    /// Random moves applied to the opening when no board file is given
    #[clap(short, long, default_value_t = 5)]
    random_moves: usize,

    /// Seed for the random board
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// Height of the random board
    #[clap(long, default_value_t = SMALL_BOARD_SIZE)]
    height: usize,

    /// Width of the random board
    #[clap(long, default_value_t = SMALL_BOARD_SIZE)]
    width: usize,

    /// How many corners a goal board must have occupied
    #[clap(short, long, value_enum, default_value_t = GoalArg::Two)]
    goal: GoalArg,

    /// Search method (bfs, dfs, ucs, astar-min, astar-max, astar-sum, astar-complex,
    /// astar-half-min). Repeat to run several; all run when omitted
    #[clap(short, long)]
    method: Vec<SearchMethod>,

    /// Give up a search after this many expansions
    #[clap(long)]
    max_expansions: Option<usize>,

    /// Print every board along each path found
    #[clap(long)]
    show_path: bool,

    /// Labels of the first and second player
    #[clap(long, default_value = "BW")]
    labels: String,

    /// Label of the player who made the last move on the loaded board
    #[clap(long)]
    last_mover: Option<char>,
}

fn parse_labels(labels: &str) -> Result<Labels> {
    let chars: Vec<char> = labels.chars().collect();
    let &[first, second] = chars.as_slice() else {
        bail!("expected exactly two labels, got '{}'", labels);
    };
    Ok(Labels::new(first, second)?)
}

fn read_board_file(path: &PathBuf, labels: Labels, last_mover: Option<char>) -> Result<GameState> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read board file {}", path.display()))?;

    let lines: Vec<&str> = content
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let height = lines.len();
    let width = lines.first().map_or(0, |line| line.chars().count());

    let current = match last_mover {
        Some(label) => labels
            .side(label)
            .with_context(|| format!("'{}' is not one of the player labels", label))?,
        None => Side::First,
    };

    GameState::from_rows(&lines, labels, current, height, width)
        .with_context(|| format!("Invalid board in {}", path.display()))
}

fn format_path(actions: &[Position]) -> String {
    let moves: Vec<String> = actions.iter().map(|mv| mv.to_string()).collect();
    format!("[{}]", moves.join(", "))
}

fn print_path(start: &GameState, method: SearchMethod, solution: &Solution<Position>) -> Result<()> {
    println!("Path found by {}:", method);
    let states = start.replay(&solution.actions)?;
    for (i, (state, mv)) in states.iter().zip(&solution.actions).enumerate() {
        let plural = if i > 0 { "s" } else { "" };
        println!(
            "After {} move{} (last moved by {}): {}",
            i + 1,
            plural,
            state.labels().label(state.current()),
            mv
        );
        println!("{}\n", state);
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let labels = parse_labels(&args.labels)?;

    let start = match &args.board_file {
        Some(path) => {
            let state = read_board_file(path, labels, args.last_mover)?;
            info!(path = %path.display(), "loaded board");
            state
        }
        None => {
            info!(seed = args.seed, moves = args.random_moves, "generating random board");
            GameState::random_with_seed(args.seed, args.random_moves, args.height, args.width)?
                .with_labels(labels)
        }
    };

    println!("Initial board:\n{}\n", start);

    let problem = OthelloSearchProblem::new(start.clone(), args.goal.into());
    println!("Problem to be solved: reach {}\n", problem.goal());

    let limits = SearchLimits {
        max_expansions: args.max_expansions,
    };
    let methods = if args.method.is_empty() {
        SearchMethod::ALL.to_vec()
    } else {
        args.method.clone()
    };

    let mut found = Vec::new();
    for method in methods {
        let timer = Instant::now();
        let result = method.run(&problem, limits);
        let elapsed = timer.elapsed();

        match result {
            Ok(Some(solution)) => {
                println!(
                    "{} found a path of {} moves in {:?} ({} expansions): {}",
                    method,
                    solution.actions.len(),
                    elapsed,
                    solution.expanded,
                    format_path(&solution.actions)
                );
                found.push((method, solution));
            }
            Ok(None) => println!("{} found no path in {:?}", method, elapsed),
            Err(e) => warn!(%method, error = %e, "search stopped"),
        }
    }

    if args.show_path {
        println!();
        for (method, solution) in &found {
            print_path(&start, *method, solution)?;
        }
    }

    Ok(())
}
