//! Named search methods for the corner problems, as selected by the binaries.
use crate::engine::Position;
use crate::heuristics::CornerHeuristic;
use crate::problem::OthelloSearchProblem;
use crate::solver::{
    a_star_search, breadth_first_search, depth_first_search, uniform_cost_search, SearchLimits,
    SearchResult,
};
use std::fmt;
use std::str::FromStr;

/// A search strategy, with its heuristic for A*.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchMethod {
    BreadthFirst,
    DepthFirst,
    UniformCost,
    AStar(CornerHeuristic),
}

impl SearchMethod {
    /// Every method, uninformed ones first.
    pub const ALL: [SearchMethod; 8] = [
        SearchMethod::BreadthFirst,
        SearchMethod::DepthFirst,
        SearchMethod::UniformCost,
        SearchMethod::AStar(CornerHeuristic::Min),
        SearchMethod::AStar(CornerHeuristic::Max),
        SearchMethod::AStar(CornerHeuristic::Sum),
        SearchMethod::AStar(CornerHeuristic::Complex),
        SearchMethod::AStar(CornerHeuristic::HalfMin),
    ];

    pub fn run(self, problem: &OthelloSearchProblem, limits: SearchLimits) -> SearchResult<Position> {
        match self {
            SearchMethod::BreadthFirst => breadth_first_search(problem, limits),
            SearchMethod::DepthFirst => depth_first_search(problem, limits),
            SearchMethod::UniformCost => uniform_cost_search(problem, limits),
            SearchMethod::AStar(heuristic) => a_star_search(
                problem,
                |state, problem| heuristic.evaluate(state, problem),
                limits,
            ),
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMethod::BreadthFirst => write!(f, "bfs"),
            SearchMethod::DepthFirst => write!(f, "dfs"),
            SearchMethod::UniformCost => write!(f, "ucs"),
            SearchMethod::AStar(heuristic) => write!(f, "astar-{}", heuristic.name()),
        }
    }
}

impl FromStr for SearchMethod {
    type Err = String;

    /// Parses the names produced by `Display`, e.g. `bfs` or `astar-half-min`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchMethod::ALL
            .into_iter()
            .find(|method| method.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<String> = SearchMethod::ALL.iter().map(|m| m.to_string()).collect();
                format!("unknown method '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GameState;

    #[test]
    fn test_method_names_round_trip() {
        for method in SearchMethod::ALL {
            assert_eq!(method.to_string().parse::<SearchMethod>(), Ok(method));
        }
        assert_eq!("BFS".parse::<SearchMethod>(), Ok(SearchMethod::BreadthFirst));
        assert!("greedy".parse::<SearchMethod>().unwrap_err().contains("unknown method"));
    }

    #[test]
    fn test_every_method_solves_small_opening() {
        let start = GameState::opening(4, 4);
        let problem = OthelloSearchProblem::one_corner(start.clone());
        for method in SearchMethod::ALL {
            let solution = method
                .run(&problem, SearchLimits::unlimited())
                .unwrap()
                .unwrap_or_else(|| panic!("{} found no path", method));
            let states = start.replay(&solution.actions).unwrap();
            assert!(states.last().is_some_and(|s| s.is_goal(1)), "{}", method);
        }
    }
}
