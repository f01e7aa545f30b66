//! External string interfaces (§6): the flat, tag-prefixed wire grammar
//! shared by the puzzle description string, the move description string,
//! and the solver move string. Grounded on `hazyfossa-battleships`'s
//! `Point::deserialize` (hand-rolled tag parsing instead of `serde`,
//! appropriate here since the wire format is a custom flat grammar, not a
//! structured shape `serde` would help with).
//!
//! Ordering between tags is not significant (§6.2); unrecognized
//! characters are skipped rather than rejected, matching "Unrecognized
//! characters are skipped" verbatim.

use crate::cell::CellState;
use crate::clues::{Clues, Solution};
use crate::error::ClueError;
use crate::grid::Board;

/// A single scanned `tag<int>` pair, or the bare `S` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    Tagged(char, i64),
    Solver,
}

const TAGS_WITH_DIGITS: [char; 7] = ['s', 'r', 'c', 'y', 'x', 'z', 'd'];

/// Scan `input` into a flat stream of tagged tokens. A recognized tag not
/// immediately followed by at least one digit (optional leading `-`) is a
/// [`ClueError::MissingDigits`]; every other character is silently
/// skipped, including whitespace and stray punctuation.
fn tokenize(input: &str) -> Result<Vec<RawToken>, ClueError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == 'S' {
            tokens.push(RawToken::Solver);
            i += 1;
            continue;
        }
        if TAGS_WITH_DIGITS.contains(&c) {
            let start = i;
            let mut j = i + 1;
            let neg = j < chars.len() && chars[j] == '-';
            if neg {
                j += 1;
            }
            let digits_start = j;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            if j == digits_start {
                return Err(ClueError::MissingDigits { tag: c, pos: start });
            }
            let text: String = chars[digits_start..j].iter().collect();
            let mut value: i64 = text
                .parse()
                .map_err(|_| ClueError::IntegerTooLarge { tag: c, pos: start })?;
            if neg {
                value = -value;
            }
            tokens.push(RawToken::Tagged(c, value));
            i = j;
            continue;
        }
        i += 1;
    }
    Ok(tokens)
}

/// Decode a puzzle description string (§6.2) into [`Clues`]. `h`/`w` are
/// known ahead of time (they were the generator's own request parameters)
/// and used only to validate the `r`/`c` counts and bounds.
pub fn parse_puzzle_description(input: &str, h: usize, w: usize) -> Result<Clues, ClueError> {
    let tokens = tokenize(input)?;

    let mut ships: Vec<i64> = Vec::new();
    let mut rows: Vec<i64> = Vec::new();
    let mut cols: Vec<i64> = Vec::new();
    let mut disclosures: Vec<(i64, i64, i64)> = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            RawToken::Solver => {
                i += 1;
            }
            RawToken::Tagged('s', v) => {
                ships.push(v);
                i += 1;
            }
            RawToken::Tagged('r', v) => {
                rows.push(v);
                i += 1;
            }
            RawToken::Tagged('c', v) => {
                cols.push(v);
                i += 1;
            }
            RawToken::Tagged('y', yv) => {
                let xv = match tokens.get(i + 1) {
                    Some(RawToken::Tagged('x', v)) => *v,
                    _ => return Err(ClueError::DisclosureArityMismatch('x')),
                };
                let zv = match tokens.get(i + 2) {
                    Some(RawToken::Tagged('z', v)) => *v,
                    _ => return Err(ClueError::DisclosureArityMismatch('z')),
                };
                disclosures.push((yv, xv, zv));
                i += 3;
            }
            RawToken::Tagged(other, _) => {
                return Err(ClueError::UnrecognizedMove(other));
            }
        }
    }

    if ships.is_empty() || ships.iter().any(|&s| s < 1) {
        return Err(ClueError::NoShips(ships.len()));
    }
    let max_len = h.min(w);
    for &s in &ships {
        if s < 1 || (s as usize) > max_len {
            return Err(ClueError::ShipLengthOutOfRange(s, max_len));
        }
    }
    if rows.len() != h {
        return Err(ClueError::RowCountMismatch {
            expected: h,
            found: rows.len(),
        });
    }
    if cols.len() != w {
        return Err(ClueError::ColCountMismatch {
            expected: w,
            found: cols.len(),
        });
    }
    for &r in &rows {
        if r < -1 || (r as usize) > w {
            return Err(ClueError::RowTotalOutOfRange(r, w));
        }
    }
    for &c in &cols {
        if c < -1 || (c as usize) > h {
            return Err(ClueError::ColTotalOutOfRange(c, h));
        }
    }

    let mut init = Board::new(h, w);
    for (yv, xv, zv) in disclosures {
        if yv < 0 || xv < 0 || (yv as usize) >= h || (xv as usize) >= w {
            return Err(ClueError::DisclosureOutOfBounds {
                y: yv,
                x: xv,
                h,
                w,
            });
        }
        let state = CellState::from_code(zv as i32)
            .ok_or(ClueError::StateCodeOutOfRange(zv))?;
        init.set(yv as usize, xv as usize, state);
    }

    let mut ships: Vec<usize> = ships.into_iter().map(|s| s as usize).collect();
    ships.sort_unstable_by(|a, b| b.cmp(a));

    Ok(Clues {
        h,
        w,
        ships,
        rows: rows.into_iter().map(|r| if r == -1 { None } else { Some(r as usize) }).collect(),
        cols: cols.into_iter().map(|c| if c == -1 { None } else { Some(c as usize) }).collect(),
        init,
    })
}

/// Encode [`Clues`] as a puzzle description string (inverse of
/// [`parse_puzzle_description`]), for the generator's own output (§6.2).
pub fn render_puzzle_description(clues: &Clues) -> String {
    let mut out = String::new();
    for &len in &clues.ships {
        out.push_str(&format!("s{len}"));
    }
    for row in &clues.rows {
        out.push_str(&format!("r{}", row.map(|v| v as i64).unwrap_or(-1)));
    }
    for col in &clues.cols {
        out.push_str(&format!("c{}", col.map(|v| v as i64).unwrap_or(-1)));
    }
    for y in 0..clues.h {
        for x in 0..clues.w {
            let state = clues.init.get(y, x);
            if let Some(code) = state.to_code() {
                out.push_str(&format!("y{y}x{x}z{code}"));
            }
        }
    }
    out
}

/// A decoded move description (§6.3).
#[derive(Debug, Clone, PartialEq)]
pub enum Move {
    /// Rectangular drag over Vacant marks; `clear = true` erases them
    /// rather than setting them (tag `d<0|1>`).
    Drag {
        clear: bool,
        y0: usize,
        x0: usize,
        y1: usize,
        x1: usize,
    },
    /// A single-cell write.
    Cell { y: usize, x: usize, state: CellState },
    /// Toggle the "marked done" flag on a row.
    ToggleRow(usize),
    /// Toggle the "marked done" flag on a column.
    ToggleCol(usize),
    /// A solver-produced move: the entire solution, one typed cell per
    /// triple (§6.3's "leading `S`... supplies the entire solution").
    Solver(Vec<(usize, usize, CellState)>),
}

/// Decode a move description string (§6.3).
pub fn parse_move(input: &str) -> Result<Move, ClueError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ClueError::UnrecognizedMove(' '));
    }

    if matches!(tokens[0], RawToken::Solver) {
        let mut triples = Vec::new();
        let mut i = 1;
        while i < tokens.len() {
            let yv = match tokens[i] {
                RawToken::Tagged('y', v) => v,
                _ => return Err(ClueError::DisclosureArityMismatch('y')),
            };
            let xv = match tokens.get(i + 1) {
                Some(RawToken::Tagged('x', v)) => *v,
                _ => return Err(ClueError::DisclosureArityMismatch('x')),
            };
            let zv = match tokens.get(i + 2) {
                Some(RawToken::Tagged('z', v)) => *v,
                _ => return Err(ClueError::DisclosureArityMismatch('z')),
            };
            let state = CellState::from_code(zv as i32).ok_or(ClueError::StateCodeOutOfRange(zv))?;
            if yv < 0 || xv < 0 {
                return Err(ClueError::DisclosureOutOfBounds {
                    y: yv,
                    x: xv,
                    h: 0,
                    w: 0,
                });
            }
            triples.push((yv as usize, xv as usize, state));
            i += 3;
        }
        return Ok(Move::Solver(triples));
    }

    match tokens[0] {
        RawToken::Tagged('d', flag) => {
            let clear = match flag {
                0 => false,
                1 => true,
                _ => return Err(ClueError::StateCodeOutOfRange(flag)),
            };
            let mut coords = [0i64; 4];
            for (k, slot) in coords.iter_mut().enumerate() {
                let expected_tag = if k % 2 == 0 { 'y' } else { 'x' };
                match tokens.get(1 + k) {
                    Some(RawToken::Tagged(t, v)) if *t == expected_tag => *slot = *v,
                    _ => return Err(ClueError::DisclosureArityMismatch(expected_tag)),
                }
            }
            Ok(Move::Drag {
                clear,
                y0: coords[0] as usize,
                x0: coords[1] as usize,
                y1: coords[2] as usize,
                x1: coords[3] as usize,
            })
        }
        RawToken::Tagged('y', yv) => {
            let xv = match tokens.get(1) {
                Some(RawToken::Tagged('x', v)) => *v,
                _ => return Err(ClueError::DisclosureArityMismatch('x')),
            };
            let zv = match tokens.get(2) {
                Some(RawToken::Tagged('z', v)) => *v,
                _ => return Err(ClueError::DisclosureArityMismatch('z')),
            };
            if yv < 0 || xv < 0 {
                return Err(ClueError::DisclosureOutOfBounds { y: yv, x: xv, h: 0, w: 0 });
            }
            let state = CellState::from_code(zv as i32).ok_or(ClueError::StateCodeOutOfRange(zv))?;
            Ok(Move::Cell {
                y: yv as usize,
                x: xv as usize,
                state,
            })
        }
        RawToken::Tagged('r', v) => Ok(Move::ToggleRow(v as usize)),
        RawToken::Tagged('c', v) => Ok(Move::ToggleCol(v as usize)),
        RawToken::Tagged(other, _) => Err(ClueError::UnrecognizedMove(other)),
        RawToken::Solver => unreachable!("handled above"),
    }
}

/// Encode the solver move string (§6.4): `S` followed by `ships_sum`
/// `y..x..z..` triples listing every occupied cell, fully typed.
pub fn render_solver_move(clues: &Clues, solution: &Solution) -> String {
    let board = solution.to_board(clues);
    let mut out = String::from("S");
    for y in 0..clues.h {
        for x in 0..clues.w {
            let state = board.get(y, x);
            if state.is_occupied() {
                let code = state.to_code().expect("occupied cell always has a code");
                out.push_str(&format!("y{y}x{x}z{code}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Orientation, ShipPlacement};

    #[test]
    fn round_trips_puzzle_description() {
        let mut init = Board::new(7, 7);
        init.set(2, 3, CellState::One);
        let clues = Clues {
            h: 7,
            w: 7,
            ships: vec![4, 4, 3, 3, 2, 2, 2],
            rows: vec![Some(2); 7],
            cols: vec![None; 7],
            init,
        };
        let encoded = render_puzzle_description(&clues);
        let decoded = parse_puzzle_description(&encoded, 7, 7).unwrap();
        assert_eq!(decoded.ships, clues.ships);
        assert_eq!(decoded.rows, clues.rows);
        assert_eq!(decoded.cols, clues.cols);
        assert_eq!(decoded.init.get(2, 3), CellState::One);
    }

    #[test]
    fn rejects_row_count_mismatch() {
        let input = "s1r0r0c0c0c0";
        assert_eq!(
            parse_puzzle_description(input, 3, 3),
            Err(ClueError::RowCountMismatch { expected: 3, found: 2 })
        );
    }

    #[test]
    fn rejects_missing_digits() {
        let input = "sr0";
        assert_eq!(
            parse_puzzle_description(input, 1, 1),
            Err(ClueError::MissingDigits { tag: 's', pos: 0 })
        );
    }

    #[test]
    fn rejects_integer_too_large_instead_of_panicking() {
        let input = "r99999999999999999999999999999999";
        assert_eq!(
            parse_puzzle_description(input, 1, 1),
            Err(ClueError::IntegerTooLarge { tag: 'r', pos: 0 })
        );
    }

    #[test]
    fn rejects_negative_cell_move_coordinates() {
        assert_eq!(
            parse_move("y-1x0z0"),
            Err(ClueError::DisclosureOutOfBounds { y: -1, x: 0, h: 0, w: 0 })
        );
    }

    #[test]
    fn unrecognized_characters_are_skipped() {
        let input = "s1 -- r0 | c0";
        // Whitespace and punctuation between tags are ignored.
        let parsed = parse_puzzle_description(input, 1, 1).unwrap();
        assert_eq!(parsed.ships, vec![1]);
    }

    #[test]
    fn parses_drag_and_cell_moves() {
        assert_eq!(
            parse_move("d1y0x0y2x2").unwrap(),
            Move::Drag {
                clear: true,
                y0: 0,
                x0: 0,
                y1: 2,
                x1: 2
            }
        );
        assert_eq!(
            parse_move("y1x1z0").unwrap(),
            Move::Cell {
                y: 1,
                x: 1,
                state: CellState::Occ
            }
        );
        assert_eq!(parse_move("r3").unwrap(), Move::ToggleRow(3));
    }

    #[test]
    fn renders_solver_move_string() {
        let clues = Clues {
            h: 3,
            w: 3,
            ships: vec![1],
            rows: vec![None; 3],
            cols: vec![None; 3],
            init: Board::new(3, 3),
        };
        let solution = Solution::new(vec![ShipPlacement::new(Orientation::Horizontal, 1, 1)]);
        let rendered = render_solver_move(&clues, &solution);
        assert_eq!(rendered, "Sy1x1z5");
        let decoded = parse_move(&rendered).unwrap();
        assert_eq!(decoded, Move::Solver(vec![(1, 1, CellState::One)]));
    }
}
