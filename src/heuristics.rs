use crate::engine::{GameState, Position};
use crate::problem::OthelloSearchProblem;

/// Manhattan distances from every occupied cell to every corner.
///
/// # Returns
/// One entry per (piece, corner) pair, pieces in `(x, y)` order and corners in the order
/// of [`GameState::corners`]. Empty for a board without pieces.
pub fn corner_distances(state: &GameState) -> Vec<usize> {
    let corners = state.corners();
    state
        .board()
        .positions()
        .flat_map(|pos| corners.iter().map(move |&corner| pos.manhattan(corner)))
        .collect()
}

/// Distance from each piece to its nearest corner, pieces in `(x, y)` order.
pub fn nearest_corner_distances(state: &GameState) -> Vec<usize> {
    let corners = state.corners();
    state
        .board()
        .positions()
        .map(|pos| nearest(pos, &corners))
        .collect()
}

fn nearest(pos: Position, corners: &[Position; 4]) -> usize {
    corners
        .iter()
        .map(|&corner| pos.manhattan(corner))
        .min()
        .unwrap_or(0)
}

/// Smallest piece-to-corner distance, or 0 on an empty board.
///
/// Not admissible: one placement can move a piece two steps closer to a corner.
pub fn corner_heuristic_min(state: &GameState, _problem: &OthelloSearchProblem) -> f64 {
    corner_distances(state).into_iter().min().unwrap_or(0) as f64
}

/// Largest piece-to-corner distance, or 0 on an empty board.
///
/// Overestimates whenever a piece sits far from some corner, including on goal states.
pub fn corner_heuristic_max(state: &GameState, _problem: &OthelloSearchProblem) -> f64 {
    corner_distances(state).into_iter().max().unwrap_or(0) as f64
}

/// Sum of all piece-to-corner distances, or 0 on an empty board. Not admissible.
pub fn corner_heuristic_sum(state: &GameState, _problem: &OthelloSearchProblem) -> f64 {
    corner_distances(state).into_iter().sum::<usize>() as f64
}

/// Combines distance to the closest corner, corners already taken and piece spread:
///
/// `max(0, min_distance - 2 * occupied_corners + 0.1 * sum_of_nearest_distances)`
///
/// The corner bonus makes it non-admissible; it is meant for greedy guidance only.
pub fn corner_heuristic_complex(state: &GameState, _problem: &OthelloSearchProblem) -> f64 {
    if state.board().is_empty() {
        return 0.0;
    }
    let distances = nearest_corner_distances(state);
    let min_distance = distances.iter().copied().min().unwrap_or(0) as f64;
    let corner_bonus = -2.0 * state.corners_occupied() as f64;
    let spread_penalty = 0.1 * distances.iter().sum::<usize>() as f64;

    (min_distance + corner_bonus + spread_penalty).max(0.0)
}

/// `ceil(min_distance / 2)`, or 0 on an empty board.
///
/// Every move adds exactly one piece next to (8-neighbourhood) an existing one, so the
/// closest piece gets at most two Manhattan steps nearer to a corner per move. This bound
/// never exceeds the number of moves left before any corner is occupied, which makes it
/// admissible and consistent for every corner goal.
pub fn corner_heuristic_half_min(state: &GameState, _problem: &OthelloSearchProblem) -> f64 {
    let min_distance = nearest_corner_distances(state).into_iter().min().unwrap_or(0);
    min_distance.div_ceil(2) as f64
}

/// The corner heuristics, by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CornerHeuristic {
    Min,
    Max,
    Sum,
    Complex,
    HalfMin,
}

impl CornerHeuristic {
    pub const ALL: [CornerHeuristic; 5] = [
        CornerHeuristic::Min,
        CornerHeuristic::Max,
        CornerHeuristic::Sum,
        CornerHeuristic::Complex,
        CornerHeuristic::HalfMin,
    ];

    pub fn evaluate(self, state: &GameState, problem: &OthelloSearchProblem) -> f64 {
        match self {
            CornerHeuristic::Min => corner_heuristic_min(state, problem),
            CornerHeuristic::Max => corner_heuristic_max(state, problem),
            CornerHeuristic::Sum => corner_heuristic_sum(state, problem),
            CornerHeuristic::Complex => corner_heuristic_complex(state, problem),
            CornerHeuristic::HalfMin => corner_heuristic_half_min(state, problem),
        }
    }

    /// Short name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            CornerHeuristic::Min => "min",
            CornerHeuristic::Max => "max",
            CornerHeuristic::Sum => "sum",
            CornerHeuristic::Complex => "complex",
            CornerHeuristic::HalfMin => "half-min",
        }
    }
}
