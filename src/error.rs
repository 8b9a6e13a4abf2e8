//! Error types for board construction and search.

use derive_more::{Display, Error};

use crate::engine::Position;

/// Errors raised while building or mutating a board from external input.
///
/// Text boards come from files or command-line arguments, so every shape or
/// label problem is reported instead of silently repaired.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// A row has a different length than the first row.
    #[display("Wrong configuration of the board: row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A cell holds a character that is neither empty nor a player label.
    #[display("Unrecognized label '{label}' at {position}")]
    UnknownLabel { label: char, position: Position },
    /// A cell lies outside the declared board dimensions.
    #[display("Position {position} is outside a {width}x{height} board")]
    OutOfBounds {
        position: Position,
        width: usize,
        height: usize,
    },
    /// Both players were given the same label, or a label collides with the empty marker.
    #[display("Player labels must be distinct and not '.': got '{first}' and '{second}'")]
    InvalidLabels { first: char, second: char },
    /// A generated board is too small to hold the starting pieces.
    #[display("A {width}x{height} board cannot hold the starting pieces")]
    BoardTooSmall { height: usize, width: usize },
    /// A replayed move is not legal for the side about to move.
    #[display("Illegal move {position}")]
    IllegalMove { position: Position },
}

/// Errors raised by the graph-search engine.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SearchError {
    /// The configured expansion budget ran out before a goal was found.
    #[display("Search budget exhausted after {expanded} expansions")]
    BudgetExhausted { expanded: usize },
}
