//! Search-problem view of the Othello model.
//!
//! [`SearchProblem`] is the contract any graph-search routine in [`crate::solver`]
//! consumes. [`OthelloSearchProblem`] implements it over [`GameState`], with the goal
//! parameterised by how many corners must be occupied.
use crate::engine::{GameState, Position};
use std::fmt;
use std::hash::Hash;

/// What a graph-search routine needs from a problem.
pub trait SearchProblem {
    /// A search node. Equality and hashing are used to skip already-expanded states.
    type State: Clone + Eq + Hash;
    /// The label of an edge between two states.
    type Action: Clone;

    fn start_state(&self) -> Self::State;

    fn is_goal_state(&self, state: &Self::State) -> bool;

    /// `(successor, action, step_cost)` triples reachable from `state` in one step.
    fn successors(&self, state: &Self::State) -> Vec<(Self::State, Self::Action, u32)>;

    /// Total cost of an action sequence.
    fn cost_of_actions(&self, actions: &[Self::Action]) -> u32;
}

/// How many corners a goal state must have occupied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CornerGoal {
    One,
    Two,
    All,
}

impl CornerGoal {
    pub fn min_corners(self) -> usize {
        match self {
            CornerGoal::One => 1,
            CornerGoal::Two => 2,
            CornerGoal::All => 4,
        }
    }
}

impl fmt::Display for CornerGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CornerGoal::One => write!(f, "one corner"),
            CornerGoal::Two => write!(f, "two corners"),
            CornerGoal::All => write!(f, "all corners"),
        }
    }
}

/// Corner-capture search over Othello positions.
///
/// The problem holds nothing but its root and goal; every query takes the state it
/// is about.
///
/// # Examples
/// ```
/// use othello_corners::engine::GameState;
/// use othello_corners::problem::{OthelloSearchProblem, SearchProblem};
///
/// let problem = OthelloSearchProblem::one_corner(GameState::opening(8, 8));
/// let start = problem.start_state();
/// assert!(!problem.is_goal_state(&start));
/// assert_eq!(problem.successors(&start).len(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct OthelloSearchProblem {
    start: GameState,
    goal: CornerGoal,
}

impl OthelloSearchProblem {
    pub fn new(start: GameState, goal: CornerGoal) -> Self {
        OthelloSearchProblem { start, goal }
    }

    /// Goal: at least one corner occupied.
    pub fn one_corner(start: GameState) -> Self {
        Self::new(start, CornerGoal::One)
    }

    /// Goal: at least two corners occupied.
    pub fn two_corners(start: GameState) -> Self {
        Self::new(start, CornerGoal::Two)
    }

    /// Goal: all four corners occupied.
    pub fn all_corners(start: GameState) -> Self {
        Self::new(start, CornerGoal::All)
    }

    pub fn goal(&self) -> CornerGoal {
        self.goal
    }
}

impl SearchProblem for OthelloSearchProblem {
    type State = GameState;
    type Action = Position;

    fn start_state(&self) -> GameState {
        self.start.clone()
    }

    fn is_goal_state(&self, state: &GameState) -> bool {
        state.is_goal(self.goal.min_corners())
    }

    /// One successor per legal move, each with unit cost, in move order.
    fn successors(&self, state: &GameState) -> Vec<(GameState, Position, u32)> {
        state
            .legal_moves()
            .into_iter()
            .map(|mv| (state.apply_move(mv), mv, 1))
            .collect()
    }

    /// The number of actions. Legality is not re-checked here.
    fn cost_of_actions(&self, actions: &[Position]) -> u32 {
        u32::try_from(actions.len()).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Labels, Side};

    fn state_from(rows: &[&str]) -> GameState {
        GameState::from_rows(rows, Labels::default(), Side::First, rows.len(), rows[0].len())
            .unwrap()
    }

    #[test]
    fn test_start_state_is_root() {
        let root = GameState::random_with_seed(9, 5, 6, 6).unwrap();
        let problem = OthelloSearchProblem::two_corners(root.clone());
        assert_eq!(problem.start_state(), root);
        assert_eq!(problem.goal(), CornerGoal::Two);
    }

    #[test]
    fn test_successors_pair_moves_with_results() {
        let root = GameState::opening(8, 8);
        let problem = OthelloSearchProblem::one_corner(root.clone());
        let successors = problem.successors(&root);
        let moves: Vec<Position> = root.legal_moves().into_iter().collect();

        assert_eq!(successors.len(), moves.len());
        for ((next, action, cost), mv) in successors.iter().zip(&moves) {
            assert_eq!(action, mv);
            assert_eq!(*cost, 1);
            assert_eq!(next, &root.apply_move(*mv));
        }
    }

    #[test]
    fn test_successors_dead_end() {
        let problem = OthelloSearchProblem::one_corner(GameState::opening(2, 2));
        assert!(problem.successors(&problem.start_state()).is_empty());
    }

    #[test]
    fn test_cost_of_actions_is_length() {
        let problem = OthelloSearchProblem::one_corner(GameState::opening(8, 8));
        assert_eq!(problem.cost_of_actions(&[]), 0);
        let actions = [Position::new(4, 3), Position::new(1, 1), Position::new(9, 9)];
        assert_eq!(problem.cost_of_actions(&actions), 3);
    }

    #[test]
    fn test_goal_arity_variants() {
        let three = state_from(&["B..W", "....", "....", "B..."]);
        assert!(OthelloSearchProblem::one_corner(three.clone()).is_goal_state(&three));
        assert!(OthelloSearchProblem::two_corners(three.clone()).is_goal_state(&three));
        assert!(!OthelloSearchProblem::all_corners(three.clone()).is_goal_state(&three));

        let four = state_from(&["B..W", "....", "....", "B..W"]);
        assert!(OthelloSearchProblem::all_corners(four.clone()).is_goal_state(&four));
    }

    #[test]
    fn test_all_corners_needs_each_corner() {
        let full = ["W..B", "....", "....", "B..W"];
        let corners = [(0, 0), (0, 3), (3, 0), (3, 3)];
        for (row, col) in corners {
            let mut rows: Vec<String> = full.iter().map(|r| r.to_string()).collect();
            rows[row].replace_range(col..col + 1, ".");
            let state = GameState::from_rows(&rows, Labels::default(), Side::First, 4, 4).unwrap();
            let problem = OthelloSearchProblem::all_corners(state.clone());
            assert!(!problem.is_goal_state(&state), "missing corner at row {} col {}", row, col);
        }
    }

    #[test]
    fn test_corner_goal_min_corners() {
        assert_eq!(CornerGoal::One.min_corners(), 1);
        assert_eq!(CornerGoal::Two.min_corners(), 2);
        assert_eq!(CornerGoal::All.min_corners(), 4);
        assert_eq!(CornerGoal::All.to_string(), "all corners");
    }
}
