use crate::engine::Position;
use crate::error::BoardError;
use std::collections::BTreeMap;
use tracing::instrument;

/// Character used for an empty cell in board text.
pub const EMPTY_CELL: char = '.';

/// Board cells keyed by position, holding the raw label character of each occupied cell.
pub type LabelMap = BTreeMap<Position, char>;

/// Parses text rows into a position-to-label mapping.
///
/// Each string is a row, starting from the top. Row `i` and column `j` (both 0-based in
/// the input) become `Position { x: j + 1, y: i + 1 }`. `'.'` is an empty cell; every other
/// character is stored as a label, whether or not it names a player. Label validation
/// happens in [`crate::engine::GameState::from_label_map`].
///
/// # Arguments
/// * `rows`: The board rows. All rows must have the same number of characters.
///
/// # Returns
/// * `Ok(LabelMap)` with one entry per occupied cell. An empty slice yields an empty map.
/// * `Err(BoardError::RaggedRows)` if a row's length differs from the first row's.
///
/// # Examples
/// ```
/// use othello_corners::engine::Position;
/// use othello_corners::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["..W", "B.."]).unwrap();
/// assert_eq!(board.get(&Position::new(3, 1)), Some(&'W'));
/// assert_eq!(board.get(&Position::new(1, 2)), Some(&'B'));
/// assert_eq!(board.len(), 2);
///
/// assert!(board_from_str_array(&["...", ".."]).is_err());
/// ```
#[instrument(level = "trace", skip(rows), fields(rows = rows.len()))]
pub fn board_from_str_array<S: AsRef<str>>(rows: &[S]) -> Result<LabelMap, BoardError> {
    let expected = rows.first().map_or(0, |row| row.as_ref().chars().count());
    let mut board = LabelMap::new();

    for (i, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        let found = row.chars().count();
        if found != expected {
            return Err(BoardError::RaggedRows {
                row: i,
                expected,
                found,
            });
        }
        for (j, label) in row.chars().enumerate() {
            if label != EMPTY_CELL {
                board.insert(Position::new(j + 1, i + 1), label);
            }
        }
    }
    Ok(board)
}

/// Writes a position-to-label mapping as `height` rows of `width` characters.
///
/// Cells missing from `board` are written as `'.'`. Entries outside the requested
/// dimensions are not written.
///
/// # Examples
/// ```
/// use othello_corners::engine::Position;
/// use othello_corners::utils::{board_to_str_array, LabelMap};
///
/// let board: LabelMap = [(Position::new(2, 1), 'W')].into_iter().collect();
/// assert_eq!(board_to_str_array(&board, 2, 3), vec![".W.", "..."]);
/// ```
pub fn board_to_str_array(board: &LabelMap, height: usize, width: usize) -> Vec<String> {
    (1..=height)
        .map(|y| {
            (1..=width)
                .map(|x| {
                    board
                        .get(&Position::new(x, y))
                        .copied()
                        .unwrap_or(EMPTY_CELL)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_from_str_array_valid() {
        let board = board_from_str_array(&["......", "......", "..WB..", "..BW..", "......", "......"])
            .unwrap();
        assert_eq!(board.len(), 4);
        assert_eq!(board[&Position::new(3, 3)], 'W');
        assert_eq!(board[&Position::new(4, 3)], 'B');
        assert_eq!(board[&Position::new(3, 4)], 'B');
        assert_eq!(board[&Position::new(4, 4)], 'W');
    }

    #[test]
    fn test_board_from_str_array_keeps_unknown_labels() {
        let board = board_from_str_array(&["X.", ".O"]).unwrap();
        assert_eq!(board[&Position::new(1, 1)], 'X');
        assert_eq!(board[&Position::new(2, 2)], 'O');
    }

    #[test]
    fn test_board_from_str_array_ragged_rows() {
        let result = board_from_str_array(&["....", "...", "...."]);
        assert_eq!(
            result,
            Err(BoardError::RaggedRows {
                row: 1,
                expected: 4,
                found: 3
            })
        );

        let longer = board_from_str_array(&["..", "..."]);
        assert!(matches!(longer, Err(BoardError::RaggedRows { row: 1, .. })));
    }

    #[test]
    fn test_board_from_str_array_empty_input() {
        let rows: [&str; 0] = [];
        assert!(board_from_str_array(&rows).unwrap().is_empty());
    }

    #[test]
    fn test_board_to_str_array_pads_empty_cells() {
        let board: LabelMap = [(Position::new(1, 1), 'B'), (Position::new(3, 2), 'W')]
            .into_iter()
            .collect();
        assert_eq!(board_to_str_array(&board, 3, 3), vec!["B..", "..W", "..."]);
    }

    #[test]
    fn test_round_trip_through_rows() {
        let rows = ["B..W.", ".WWB.", "....B", "W...."];
        let board = board_from_str_array(&rows).unwrap();
        let written = board_to_str_array(&board, rows.len(), rows[0].len());
        assert_eq!(written, rows);
        assert_eq!(board_from_str_array(&written).unwrap(), board);
    }
}
