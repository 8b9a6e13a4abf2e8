//! Graph search over any [`SearchProblem`].
//!
//! All four strategies share one loop: pop a node, return it if it is a goal, skip it
//! if its state was already expanded, otherwise push its successors. They differ only in
//! the frontier discipline (FIFO, LIFO, or lowest priority first).
use crate::error::SearchError;
use crate::problem::SearchProblem;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use tracing::{debug, instrument, trace};

/// A path found by a search.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<A> {
    /// Actions leading from the start state to a goal state.
    pub actions: Vec<A>,
    /// Sum of step costs along `actions`.
    pub cost: u32,
    /// Number of states expanded before the goal was popped.
    pub expanded: usize,
}

/// Resource limits for a single search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Stop with [`SearchError::BudgetExhausted`] after this many expansions.
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        SearchLimits::default()
    }

    pub fn with_max_expansions(max_expansions: usize) -> Self {
        SearchLimits {
            max_expansions: Some(max_expansions),
        }
    }
}

/// Outcome of a search: `Ok(None)` when the frontier empties without reaching a goal.
pub type SearchResult<A> = Result<Option<Solution<A>>, SearchError>;

struct Node<S, A> {
    state: S,
    actions: Vec<A>,
    cost: u32,
}

trait Frontier<N> {
    fn push(&mut self, node: N, priority: f64);
    fn pop(&mut self) -> Option<N>;
}

struct Fifo<N>(VecDeque<N>);

impl<N> Frontier<N> for Fifo<N> {
    fn push(&mut self, node: N, _priority: f64) {
        self.0.push_back(node);
    }

    fn pop(&mut self) -> Option<N> {
        self.0.pop_front()
    }
}

struct Lifo<N>(Vec<N>);

impl<N> Frontier<N> for Lifo<N> {
    fn push(&mut self, node: N, _priority: f64) {
        self.0.push(node);
    }

    fn pop(&mut self) -> Option<N> {
        self.0.pop()
    }
}

struct Prioritized<N> {
    priority: f64,
    seq: u64,
    node: N,
}

impl<N> PartialEq for Prioritized<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N> Eq for Prioritized<N> {}

impl<N> PartialOrd for Prioritized<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> Ord for Prioritized<N> {
    // Reversed: `BinaryHeap` is a max-heap and the lowest priority must pop first.
    // Ties go to the earliest push.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct PriorityQueue<N> {
    heap: BinaryHeap<Prioritized<N>>,
    seq: u64,
}

impl<N> PriorityQueue<N> {
    fn new() -> Self {
        PriorityQueue {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }
}

impl<N> Frontier<N> for PriorityQueue<N> {
    fn push(&mut self, node: N, priority: f64) {
        self.heap.push(Prioritized {
            priority,
            seq: self.seq,
            node,
        });
        self.seq += 1;
    }

    fn pop(&mut self) -> Option<N> {
        self.heap.pop().map(|entry| entry.node)
    }
}

#[instrument(level = "debug", skip_all, fields(strategy = strategy))]
fn graph_search<P, F>(
    problem: &P,
    mut frontier: F,
    priority: impl Fn(&P::State, u32) -> f64,
    limits: SearchLimits,
    strategy: &'static str,
) -> SearchResult<P::Action>
where
    P: SearchProblem,
    F: Frontier<Node<P::State, P::Action>>,
{
    let start = problem.start_state();
    let start_priority = priority(&start, 0);
    frontier.push(
        Node {
            state: start,
            actions: Vec::new(),
            cost: 0,
        },
        start_priority,
    );

    let mut closed: HashSet<P::State> = HashSet::new();
    let mut expanded = 0;

    while let Some(node) = frontier.pop() {
        if problem.is_goal_state(&node.state) {
            debug!(expanded, cost = node.cost, length = node.actions.len(), "goal reached");
            return Ok(Some(Solution {
                actions: node.actions,
                cost: node.cost,
                expanded,
            }));
        }
        if !closed.insert(node.state.clone()) {
            continue;
        }
        if limits.max_expansions.is_some_and(|max| expanded >= max) {
            debug!(expanded, "expansion budget exhausted");
            return Err(SearchError::BudgetExhausted { expanded });
        }
        expanded += 1;
        trace!(expanded, depth = node.actions.len(), cost = node.cost, "expanding");

        for (successor, action, step_cost) in problem.successors(&node.state) {
            if closed.contains(&successor) {
                continue;
            }
            let cost = node.cost + step_cost;
            let successor_priority = priority(&successor, cost);
            let mut actions = node.actions.clone();
            actions.push(action);
            frontier.push(
                Node {
                    state: successor,
                    actions,
                    cost,
                },
                successor_priority,
            );
        }
    }

    debug!(expanded, "frontier exhausted without reaching a goal");
    Ok(None)
}

/// Shallowest goal first. Optimal when every step costs the same.
pub fn breadth_first_search<P: SearchProblem>(
    problem: &P,
    limits: SearchLimits,
) -> SearchResult<P::Action> {
    graph_search(problem, Fifo(VecDeque::new()), |_, _| 0.0, limits, "bfs")
}

/// Deepest node first. Returns some path, not necessarily a short one.
pub fn depth_first_search<P: SearchProblem>(
    problem: &P,
    limits: SearchLimits,
) -> SearchResult<P::Action> {
    graph_search(problem, Lifo(Vec::new()), |_, _| 0.0, limits, "dfs")
}

/// Cheapest accumulated cost first.
pub fn uniform_cost_search<P: SearchProblem>(
    problem: &P,
    limits: SearchLimits,
) -> SearchResult<P::Action> {
    graph_search(
        problem,
        PriorityQueue::new(),
        |_, cost| f64::from(cost),
        limits,
        "ucs",
    )
}

/// Lowest `cost + heuristic(state, problem)` first.
///
/// The returned path is optimal when `heuristic` is consistent.
///
/// # Examples
/// ```
/// use othello_corners::engine::GameState;
/// use othello_corners::heuristics::corner_heuristic_half_min;
/// use othello_corners::problem::OthelloSearchProblem;
/// use othello_corners::solver::{a_star_search, SearchLimits};
///
/// let problem = OthelloSearchProblem::one_corner(GameState::opening(4, 4));
/// let solution = a_star_search(&problem, corner_heuristic_half_min, SearchLimits::unlimited())
///     .unwrap()
///     .expect("a corner is reachable");
/// assert_eq!(solution.cost, 2);
/// ```
pub fn a_star_search<P, H>(problem: &P, heuristic: H, limits: SearchLimits) -> SearchResult<P::Action>
where
    P: SearchProblem,
    H: Fn(&P::State, &P) -> f64,
{
    graph_search(
        problem,
        PriorityQueue::new(),
        |state, cost| f64::from(cost) + heuristic(state, problem),
        limits,
        "astar",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{GameState, Labels, Position, Side};
    use crate::heuristics::{corner_heuristic_half_min, corner_heuristic_max, CornerHeuristic};
    use crate::problem::OthelloSearchProblem;

    fn unlimited() -> SearchLimits {
        SearchLimits::unlimited()
    }

    fn replay_reaches_goal(problem: &OthelloSearchProblem, actions: &[Position]) -> bool {
        let start = problem.start_state();
        let states = start.replay(actions).unwrap();
        let last = states.last().unwrap_or(&start);
        problem.is_goal_state(last)
    }

    #[test]
    fn test_bfs_one_corner_small_board() {
        let problem = OthelloSearchProblem::one_corner(GameState::opening(4, 4));
        let solution = breadth_first_search(&problem, unlimited()).unwrap().unwrap();
        assert_eq!(solution.cost, 2);
        assert_eq!(solution.actions.len(), 2);
        assert_eq!(problem.cost_of_actions(&solution.actions), solution.cost);
        assert!(replay_reaches_goal(&problem, &solution.actions));
    }

    #[test]
    fn test_start_already_goal() {
        let problem = OthelloSearchProblem::one_corner(GameState::opening(3, 3));
        let solution = breadth_first_search(&problem, unlimited()).unwrap().unwrap();
        assert!(solution.actions.is_empty());
        assert_eq!(solution.cost, 0);
        assert_eq!(solution.expanded, 0);
    }

    #[test]
    fn test_frontier_exhausted_returns_none() {
        // Only the first side has pieces, and the second side is about to move.
        let state = GameState::from_rows(
            &["....", ".BB.", ".BB.", "...."],
            Labels::default(),
            Side::First,
            4,
            4,
        )
        .unwrap();
        let problem = OthelloSearchProblem::one_corner(state);
        assert_eq!(breadth_first_search(&problem, unlimited()), Ok(None));
        assert_eq!(depth_first_search(&problem, unlimited()), Ok(None));
        assert_eq!(uniform_cost_search(&problem, unlimited()), Ok(None));
        assert_eq!(
            a_star_search(&problem, corner_heuristic_half_min, unlimited()),
            Ok(None)
        );
    }

    #[test]
    fn test_budget_exhausted() {
        let problem = OthelloSearchProblem::all_corners(GameState::opening(8, 8));
        let result = breadth_first_search(&problem, SearchLimits::with_max_expansions(3));
        assert_eq!(result, Err(SearchError::BudgetExhausted { expanded: 3 }));
    }

    #[test]
    fn test_dfs_path_is_valid() {
        let problem = OthelloSearchProblem::two_corners(GameState::opening(4, 4));
        let solution = depth_first_search(&problem, unlimited())
            .unwrap()
            .expect("two corners are reachable on 4x4");
        assert_eq!(solution.cost as usize, solution.actions.len());
        assert!(replay_reaches_goal(&problem, &solution.actions));
    }

    #[test]
    fn test_optimal_strategies_agree() {
        let mut problems = vec![OthelloSearchProblem::two_corners(GameState::opening(4, 4))];
        for seed in 0..4 {
            let start = GameState::random_with_seed(seed, 3, 5, 5).unwrap();
            problems.push(OthelloSearchProblem::one_corner(start));
        }
        for (case, problem) in problems.iter().enumerate() {
            let bfs = breadth_first_search(problem, unlimited()).unwrap();
            let ucs = uniform_cost_search(problem, unlimited()).unwrap();
            let astar =
                a_star_search(problem, corner_heuristic_half_min, unlimited()).unwrap();

            let costs: Vec<Option<u32>> = [&bfs, &ucs, &astar]
                .iter()
                .map(|s| s.as_ref().map(|s| s.cost))
                .collect();
            assert_eq!(costs[0], costs[1], "case {} ucs", case);
            assert_eq!(costs[0], costs[2], "case {} astar", case);

            for solution in [bfs, ucs, astar].into_iter().flatten() {
                assert!(replay_reaches_goal(problem, &solution.actions));
            }
        }
    }

    #[test]
    fn test_every_heuristic_finds_valid_paths() {
        let problems = [
            OthelloSearchProblem::one_corner(GameState::opening(4, 4)),
            OthelloSearchProblem::two_corners(GameState::opening(4, 4)),
        ];
        for problem in &problems {
            for heuristic in CornerHeuristic::ALL {
                let solution = a_star_search(
                    problem,
                    |state: &GameState, p: &OthelloSearchProblem| heuristic.evaluate(state, p),
                    unlimited(),
                )
                .unwrap()
                .unwrap_or_else(|| panic!("{} found no path", heuristic.name()));
                assert!(!solution.actions.is_empty());
                assert!(replay_reaches_goal(problem, &solution.actions), "{}", heuristic.name());
            }
        }
    }

    #[test]
    fn test_half_min_never_exceeds_true_distance() {
        // Every state up to two plies from the 4x4 opening, checked against BFS.
        let root = GameState::opening(4, 4);
        let mut states = vec![root.clone()];
        for first in root.legal_moves() {
            let child = root.apply_move(first);
            for second in child.legal_moves() {
                states.push(child.apply_move(second));
            }
            states.push(child);
        }

        let mut max_overestimates = false;
        for state in states {
            let problem = OthelloSearchProblem::one_corner(state.clone());
            let Some(solution) = breadth_first_search(&problem, unlimited()).unwrap() else {
                continue;
            };
            let distance = f64::from(solution.cost);
            assert!(corner_heuristic_half_min(&state, &problem) <= distance);
            if corner_heuristic_max(&state, &problem) > distance {
                max_overestimates = true;
            }
        }
        assert!(max_overestimates);
    }
}
