//! Win and draw detection
//!
//! A five or longer run through the last stone wins for either side. Overlines
//! win too; the attacker is kept from making one by the forbidden check, which
//! runs at validation time before a stone ever reaches this module.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos, Stone};

use super::Direction;

/// Outcome of checking the stone just placed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinResult {
    pub is_win: bool,
    /// Deduplicated union of every qualifying run, in direction order
    pub win_line: Vec<Pos>,
    pub is_draw: bool,
}

/// Contiguous run of `player` through `pos` along `dir`, ordered from the
/// negative end to the positive end. `pos` itself always counts as `player`.
pub fn collect_run(board: &Board, pos: Pos, player: Stone, dir: Direction) -> Vec<Pos> {
    let (dx, dy) = dir.delta();
    let size = board.size();
    let owned = |p: &Pos| board.get(*p) == player;

    let backward: Vec<Pos> = (1..)
        .map_while(|step| pos.offset(-dx, -dy, step, size).filter(owned))
        .collect();
    let forward = (1..).map_while(|step| pos.offset(dx, dy, step, size).filter(owned));

    let mut run: Vec<Pos> = backward.into_iter().rev().collect();
    run.push(pos);
    run.extend(forward);
    run
}

/// Length of the run through `pos` along `dir`, counting `pos` as `player`
#[inline]
pub fn run_length(board: &Board, pos: Pos, player: Stone, dir: Direction) -> usize {
    let (dx, dy) = dir.delta();
    let size = board.size();
    let count_side = |sx: i32, sy: i32| {
        (1..)
            .take_while(|&step| {
                pos.offset(sx, sy, step, size)
                    .is_some_and(|p| board.get(p) == player)
            })
            .count()
    };
    1 + count_side(dx, dy) + count_side(-dx, -dy)
}

/// Check whether a stone of `player` at `pos` wins, or fills the board.
///
/// ```
/// use renju::{Board, Pos, Stone};
/// use renju::rules::check_win;
///
/// let mut board = Board::new();
/// for x in 4..8 {
///     board.place_stone(Pos::new(x, 7), Stone::Black);
/// }
/// board.place_stone(Pos::new(8, 7), Stone::Black);
///
/// let result = check_win(&board, Pos::new(8, 7), Stone::Black);
/// assert!(result.is_win);
/// assert_eq!(result.win_line.len(), 5);
/// ```
pub fn check_win(board: &Board, pos: Pos, player: Stone) -> WinResult {
    let mut win_line: Vec<Pos> = Vec::new();
    for dir in Direction::ALL {
        let run = collect_run(board, pos, player, dir);
        if run.len() >= 5 {
            for p in run {
                if !win_line.contains(&p) {
                    win_line.push(p);
                }
            }
        }
    }

    if !win_line.is_empty() {
        return WinResult {
            is_win: true,
            win_line,
            is_draw: false,
        };
    }

    // `pos` counts as occupied even if the caller has not placed it yet
    let remaining = board.empty_count() - usize::from(board.is_empty(pos));
    WinResult {
        is_win: false,
        win_line,
        is_draw: remaining == 0,
    }
}
