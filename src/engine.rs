//! Core game model for Othello corner-capture search.
//!
//! This module defines the game's fundamental components:
//! - `Side`: The two players, with `opponent` as a total function.
//! - `Labels`: The characters used to print and parse each side.
//! - `Position`: A 1-indexed `(x, y)` cell, `x` being the column.
//! - `Board`: The occupied cells of a position. Absent cells are empty.
//! - `GameState`: An immutable board plus the side that moved last, its labels and its
//!   dimensions. Every transition returns a new `GameState`.
//!
//! Capture directions are scanned in the fixed order of [`AXES`], each axis forward
//! then backward, and move candidates are kept in a `BTreeSet` ordered by `(x, y)`.
//! Search results built on top of this model are therefore reproducible.
use rand::rngs::SmallRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::{debug, instrument};

use crate::error::BoardError;
use crate::utils::{self, LabelMap, EMPTY_CELL};

/// Default width and height of a full board.
pub const BOARD_SIZE: usize = 8;

/// Width and height of the small boards used for quick searches.
pub const SMALL_BOARD_SIZE: usize = 6;

/// Random moves applied by [`random_board`] when the caller has no preference.
pub const DEFAULT_RANDOM_MOVES: usize = 100;

/// Random moves applied by [`small_random_board`] when the caller has no preference.
pub const DEFAULT_SMALL_RANDOM_MOVES: usize = 10;

/// The four line directions a capture can follow. Each is also scanned in reverse.
pub const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, -1), (1, 1)];

const NEIGHBOURS: [(isize, isize); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// One of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    /// The player printed with the first label (`'B'` by default).
    First,
    /// The player printed with the second label (`'W'` by default).
    Second,
}

impl Side {
    /// Returns the other player.
    ///
    /// # Examples
    /// ```
    /// use othello_corners::engine::Side;
    /// assert_eq!(Side::First.opponent(), Side::Second);
    /// assert_eq!(Side::Second.opponent(), Side::First);
    /// ```
    pub fn opponent(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// Characters used for each side when boards are parsed or printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Labels {
    first: char,
    second: char,
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            first: 'B',
            second: 'W',
        }
    }
}

impl Labels {
    /// Creates a label pair.
    ///
    /// # Returns
    /// * `Err(BoardError::InvalidLabels)` if both labels are equal or either one is the
    ///   empty-cell marker `'.'`, since the board text could not be read back otherwise.
    pub fn new(first: char, second: char) -> Result<Self, BoardError> {
        if first == second || first == EMPTY_CELL || second == EMPTY_CELL {
            return Err(BoardError::InvalidLabels { first, second });
        }
        Ok(Labels { first, second })
    }

    /// Returns the character printed for `side`.
    pub fn label(&self, side: Side) -> char {
        match side {
            Side::First => self.first,
            Side::Second => self.second,
        }
    }

    /// Returns the side printed as `label`, if any.
    pub fn side(&self, label: char) -> Option<Side> {
        if label == self.first {
            Some(Side::First)
        } else if label == self.second {
            Some(Side::Second)
        } else {
            None
        }
    }
}

/// A board cell. Both coordinates are 1-indexed; `x` is the column and `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    /// Creates a position from a column and a row.
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Returns the position shifted by `(dx, dy)`, or `None` if a coordinate would
    /// become negative. Upper bounds are the caller's concern.
    pub fn offset(self, dx: isize, dy: isize) -> Option<Position> {
        Some(Position {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }

    /// Manhattan distance between two positions.
    pub fn manhattan(self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Position { x, y }
    }
}

/// Letter used for column `x` in headers and move listings (`1` is `'a'`).
pub fn column_letter(x: usize) -> char {
    u32::try_from(x)
        .ok()
        .and_then(|x| char::from_u32(96 + x))
        .unwrap_or('?')
}

impl fmt::Display for Position {
    /// Formats the position in algebraic form, e.g. `(3, 2)` as `c2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (1..=26).contains(&self.x) {
            write!(f, "{}{}", column_letter(self.x), self.y)
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}

/// The occupied cells of a position.
///
/// Equality and hashing are defined over the cell mapping itself, so two boards reached
/// through different move orders compare equal when every occupied cell matches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    cells: BTreeMap<Position, Side>,
}

impl Board {
    /// Creates a board with no pieces.
    pub fn new() -> Self {
        Board::default()
    }

    /// Returns the side occupying `pos`, or `None` if the cell is empty.
    pub fn get(&self, pos: Position) -> Option<Side> {
        self.cells.get(&pos).copied()
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over occupied cells in `(x, y)` order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Side)> + '_ {
        self.cells.iter().map(|(&pos, &side)| (pos, side))
    }

    /// Iterates over occupied positions in `(x, y)` order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.keys().copied()
    }

    fn place(&mut self, pos: Position, side: Side) {
        self.cells.insert(pos, side);
    }
}

impl FromIterator<(Position, Side)> for Board {
    fn from_iter<I: IntoIterator<Item = (Position, Side)>>(iter: I) -> Self {
        Board {
            cells: iter.into_iter().collect(),
        }
    }
}

/// An immutable Othello position.
///
/// `current` is the side that made the most recent move; its opponent is the next
/// mover. Two states are equal if and only if their boards are equal, because labels and
/// dimensions stay fixed for the duration of a search.
///
/// # Examples
/// ```
/// use othello_corners::engine::{GameState, Labels, Position, Side};
///
/// let state = GameState::from_rows(
///     &["......", "......", "..WB..", "..BW..", "......", "......"],
///     Labels::default(),
///     Side::First,
///     6,
///     6,
/// )
/// .unwrap();
/// assert_eq!(state.next_mover(), Side::Second);
/// assert!(state.legal_moves().contains(&Position::new(4, 2)));
///
/// let next = state.apply_move(Position::new(4, 2));
/// assert_eq!(next.current(), Side::Second);
/// assert_eq!(next.board().get(Position::new(4, 3)), Some(Side::Second));
/// // The original state is untouched.
/// assert_eq!(state.board().get(Position::new(4, 3)), Some(Side::First));
/// ```
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    labels: Labels,
    current: Side,
    height: usize,
    width: usize,
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
    }
}

impl Eq for GameState {}

impl Hash for GameState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.board.hash(state);
    }
}

impl GameState {
    /// Creates a state from an existing board.
    ///
    /// # Returns
    /// * `Err(BoardError::OutOfBounds)` if any occupied cell lies outside
    ///   `[1, width] x [1, height]`.
    pub fn new(
        board: Board,
        labels: Labels,
        current: Side,
        height: usize,
        width: usize,
    ) -> Result<Self, BoardError> {
        if let Some(position) = board
            .positions()
            .find(|p| !(1..=width).contains(&p.x) || !(1..=height).contains(&p.y))
        {
            return Err(BoardError::OutOfBounds {
                position,
                width,
                height,
            });
        }
        Ok(GameState {
            board,
            labels,
            current,
            height,
            width,
        })
    }

    /// Builds a state from text rows (see [`utils::board_from_str_array`]).
    ///
    /// Every occupied character must be one of `labels`; anything else is reported as
    /// `BoardError::UnknownLabel`. Ragged rows are reported as `BoardError::RaggedRows`.
    #[instrument(level = "debug", skip(rows), fields(rows = rows.len()))]
    pub fn from_rows<S: AsRef<str>>(
        rows: &[S],
        labels: Labels,
        current: Side,
        height: usize,
        width: usize,
    ) -> Result<Self, BoardError> {
        let label_map = utils::board_from_str_array(rows)?;
        Self::from_label_map(&label_map, labels, current, height, width)
    }

    /// Builds a state from a position-to-label mapping.
    pub fn from_label_map(
        label_map: &LabelMap,
        labels: Labels,
        current: Side,
        height: usize,
        width: usize,
    ) -> Result<Self, BoardError> {
        let board = label_map
            .iter()
            .map(|(&position, &label)| {
                labels
                    .side(label)
                    .map(|side| (position, side))
                    .ok_or(BoardError::UnknownLabel { label, position })
            })
            .collect::<Result<Board, _>>()?;
        Self::new(board, labels, current, height, width)
    }

    /// The four-piece starting layout, centred on a `width x height` board.
    ///
    /// The first side occupies the anti-diagonal of the centre square and the second
    /// side its diagonal, as in the classic `..WB.. / ..BW..` setup. `current` is the
    /// first side, so the second side makes the first move.
    ///
    /// # Panics
    /// Panics if the board is smaller than 2x2.
    pub fn opening(height: usize, width: usize) -> Self {
        assert!(
            height >= 2 && width >= 2,
            "an opening needs at least a 2x2 board"
        );
        let (cx, cy) = (width / 2, height / 2);
        let board = [
            (Position::new(cx, cy), Side::Second),
            (Position::new(cx + 1, cy), Side::First),
            (Position::new(cx, cy + 1), Side::First),
            (Position::new(cx + 1, cy + 1), Side::Second),
        ]
        .into_iter()
        .collect();
        GameState {
            board,
            labels: Labels::default(),
            current: Side::First,
            height,
            width,
        }
    }

    /// The layout random walks start from: the classic `..WB.. / ..BW..` block with its
    /// top-left piece at `(3, 3)`, whatever the board size.
    ///
    /// Boards narrower or shorter than 4 cells fall back to [`GameState::opening`].
    ///
    /// # Returns
    /// * `Err(BoardError::BoardTooSmall)` if the board is smaller than 2x2.
    pub fn random_start(height: usize, width: usize) -> Result<Self, BoardError> {
        if height < 2 || width < 2 {
            return Err(BoardError::BoardTooSmall { height, width });
        }
        if height < 4 || width < 4 {
            return Ok(Self::opening(height, width));
        }
        Ok(Self::classic_start(height, width))
    }

    fn classic_start(height: usize, width: usize) -> Self {
        let board = [
            (Position::new(3, 3), Side::Second),
            (Position::new(4, 3), Side::First),
            (Position::new(3, 4), Side::First),
            (Position::new(4, 4), Side::Second),
        ]
        .into_iter()
        .collect();
        GameState {
            board,
            labels: Labels::default(),
            current: Side::First,
            height,
            width,
        }
    }

    /// Plays `moves` uniformly random legal moves from [`GameState::random_start`].
    ///
    /// The walk stops early if a position without legal moves is reached.
    pub fn random_walk<R: Rng + ?Sized>(
        rng: &mut R,
        moves: usize,
        height: usize,
        width: usize,
    ) -> Result<Self, BoardError> {
        let start = Self::random_start(height, width)?;
        Ok(start.walk(rng, moves))
    }

    /// Same as [`GameState::random_walk`], with a `SmallRng` seeded from `seed`.
    ///
    /// The same seed always produces the same state.
    pub fn random_with_seed(
        seed: u64,
        moves: usize,
        height: usize,
        width: usize,
    ) -> Result<Self, BoardError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        Self::random_walk(&mut rng, moves, height, width)
    }

    fn walk<R: Rng + ?Sized>(self, rng: &mut R, moves: usize) -> Self {
        let mut state = self;
        for step in 0..moves {
            let Some(mv) = state.legal_moves().into_iter().choose(&mut *rng) else {
                debug!(step, "random walk reached a position without legal moves");
                break;
            };
            state = state.apply_move(mv);
        }
        state
    }

    /// Returns the same position printed with different labels.
    pub fn with_labels(self, labels: Labels) -> Self {
        GameState { labels, ..self }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn labels(&self) -> Labels {
        self.labels
    }

    /// The side that made the most recent move.
    pub fn current(&self) -> Side {
        self.current
    }

    /// The side about to move.
    pub fn next_mover(&self) -> Side {
        self.current.opponent()
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns `true` if `pos` lies on the board.
    pub fn contains(&self, pos: Position) -> bool {
        (1..=self.width).contains(&pos.x) && (1..=self.height).contains(&pos.y)
    }

    /// The corner cells, in the order `(1, 1)`, `(1, h)`, `(w, 1)`, `(w, h)`.
    pub fn corners(&self) -> [Position; 4] {
        [
            Position::new(1, 1),
            Position::new(1, self.height),
            Position::new(self.width, 1),
            Position::new(self.width, self.height),
        ]
    }

    /// Number of corners occupied by either side.
    pub fn corners_occupied(&self) -> usize {
        self.corners()
            .iter()
            .filter(|&&corner| self.board.get(corner).is_some())
            .count()
    }

    /// Number of pieces owned by `side`.
    pub fn piece_count(&self, side: Side) -> usize {
        self.board.iter().filter(|&(_, s)| s == side).count()
    }

    /// Returns `true` if at least `min_corners` corners are occupied, by either side.
    ///
    /// Corner ownership is not checked: the goal is board saturation, not a win.
    pub fn is_goal(&self, min_corners: usize) -> bool {
        self.corners_occupied() >= min_corners
    }

    /// Opposing pieces captured if `player` placed a piece at `mv`.
    ///
    /// Each axis of [`AXES`] is walked forward and then backward from `mv`. A run of
    /// opposing pieces counts only when it ends on one of `player`'s pieces; a run that
    /// reaches an empty cell or the board edge contributes nothing.
    pub fn capture_runs(&self, mv: Position, player: Side) -> Vec<Position> {
        AXES.iter()
            .flat_map(|&(dx, dy)| {
                let mut runs = self.run_in_direction(mv, player, dx, dy);
                runs.extend(self.run_in_direction(mv, player, -dx, -dy));
                runs
            })
            .collect()
    }

    fn run_in_direction(&self, from: Position, player: Side, dx: isize, dy: isize) -> Vec<Position> {
        let enemy = player.opponent();
        let mut run = Vec::new();
        let mut cursor = from.offset(dx, dy).filter(|&p| self.contains(p));
        while let Some(pos) = cursor {
            match self.board.get(pos) {
                Some(side) if side == enemy => {
                    run.push(pos);
                    cursor = pos.offset(dx, dy).filter(|&p| self.contains(p));
                }
                Some(_) => return run,
                None => break,
            }
        }
        Vec::new()
    }

    /// Legal moves for the side about to move.
    ///
    /// Returns an empty set on a board without pieces, or when the next mover cannot
    /// capture anything. Neither case is an error.
    pub fn legal_moves(&self) -> BTreeSet<Position> {
        self.legal_moves_for(self.next_mover())
    }

    /// Legal moves for `player`: empty cells next to a piece that capture at least one run.
    pub fn legal_moves_for(&self, player: Side) -> BTreeSet<Position> {
        let candidates: BTreeSet<Position> = self
            .board
            .positions()
            .flat_map(|pos| NEIGHBOURS.iter().filter_map(move |&(dx, dy)| pos.offset(dx, dy)))
            .filter(|&adj| self.contains(adj) && self.board.get(adj).is_none())
            .collect();

        candidates
            .into_iter()
            .filter(|&pos| !self.capture_runs(pos, player).is_empty())
            .collect()
    }

    /// Plays `mv` for the next mover and returns the resulting state.
    ///
    /// The piece is placed, every captured run is flipped, and the mover becomes
    /// `current` in the new state. `self` is never modified.
    ///
    /// Legality is not re-checked: `mv` must come from [`GameState::legal_moves`].
    /// Use [`GameState::play`] for untrusted input.
    pub fn apply_move(&self, mv: Position) -> GameState {
        let mover = self.next_mover();
        let mut board = self.board.clone();
        board.place(mv, mover);
        for captured in self.capture_runs(mv, mover) {
            board.place(captured, mover);
        }
        GameState {
            board,
            labels: self.labels,
            current: mover,
            height: self.height,
            width: self.width,
        }
    }

    /// Checked version of [`GameState::apply_move`].
    ///
    /// # Returns
    /// * `Err(BoardError::IllegalMove)` if `mv` is not among the legal moves.
    pub fn play(&self, mv: Position) -> Result<GameState, BoardError> {
        if !self.contains(mv) || self.board.get(mv).is_some() {
            return Err(BoardError::IllegalMove { position: mv });
        }
        if self.capture_runs(mv, self.next_mover()).is_empty() {
            return Err(BoardError::IllegalMove { position: mv });
        }
        Ok(self.apply_move(mv))
    }

    /// Plays `actions` in order and returns every state reached, excluding `self`.
    ///
    /// Stops at the first illegal move.
    pub fn replay(&self, actions: &[Position]) -> Result<Vec<GameState>, BoardError> {
        let mut states: Vec<GameState> = Vec::with_capacity(actions.len());
        for &mv in actions {
            let next = states.last().unwrap_or(self).play(mv)?;
            states.push(next);
        }
        Ok(states)
    }

    /// The board as a position-to-label mapping.
    pub fn label_map(&self) -> LabelMap {
        self.board
            .iter()
            .map(|(pos, side)| (pos, self.labels.label(side)))
            .collect()
    }

    /// The board as text rows (see [`utils::board_to_str_array`]).
    pub fn to_rows(&self) -> Vec<String> {
        utils::board_to_str_array(&self.label_map(), self.height, self.width)
    }

    /// Renders the board with a column-letter header and row numbers on the left.
    ///
    /// Empty cells that are legal moves for the side about to move are drawn as `'_'`.
    pub fn to_ascii(&self) -> String {
        let moves = self.legal_moves();
        let mut lines = Vec::with_capacity(self.height + 1);

        let mut header = String::from("  ");
        header.extend((1..=self.width).map(column_letter));
        lines.push(header);

        for y in 1..=self.height {
            let mut row = format!("{} ", y);
            for x in 1..=self.width {
                let pos = Position::new(x, y);
                row.push(match self.board.get(pos) {
                    Some(side) => self.labels.label(side),
                    None if moves.contains(&pos) => '_',
                    None => EMPTY_CELL,
                });
            }
            lines.push(row);
        }
        lines.join("\n")
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii())
    }
}

/// A `SMALL_BOARD_SIZE` square board after `moves` random moves from the classic start.
pub fn small_random_board<R: Rng + ?Sized>(rng: &mut R, moves: usize) -> GameState {
    GameState::classic_start(SMALL_BOARD_SIZE, SMALL_BOARD_SIZE).walk(rng, moves)
}

/// A `BOARD_SIZE` square board after `moves` random moves from the classic start.
pub fn random_board<R: Rng + ?Sized>(rng: &mut R, moves: usize) -> GameState {
    GameState::classic_start(BOARD_SIZE, BOARD_SIZE).walk(rng, moves)
}
