//! Forbidden move rules for the attacking side
//!
//! Three shapes are forbidden for the attacker:
//! - Long line: a contiguous run of six or more
//! - Double-three: open threes in two or more directions at once
//! - Double-four: two or more fours (open or closed) at once
//!
//! Each direction is read as an 11-token [`LineSignature`] centered on the
//! candidate point, and shapes are counted only where they cover that point.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos, Stone};

use super::win::run_length;
use super::Direction;

/// Cells read on each side of the candidate
pub const SIGNATURE_RANGE: usize = 5;
const SIGNATURE_LEN: usize = 2 * SIGNATURE_RANGE + 1;
const CENTER: usize = SIGNATURE_RANGE;

const OWN: u8 = b'x';
const EMPTY: u8 = b'.';
const OPPONENT: u8 = b'o';
const OFF_BOARD: u8 = b'#';
/// Shape wildcard: opponent stone or board edge
const BLOCKED: u8 = b'!';

const OPEN_THREE: &[&[u8]] = &[b".xxx.", b".xx.x.", b".x.xx."];
const OPEN_FOUR: &[&[u8]] = &[b".xxxx."];
const CLOSED_FOUR: &[&[u8]] = &[b"xxx.x", b"xx.xx", b"x.xxx", b".xxxx!", b"!xxxx."];

/// Token sequence along one direction with the candidate overlaid at the center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSignature {
    tokens: [u8; SIGNATURE_LEN],
}

impl LineSignature {
    pub fn build(board: &Board, pos: Pos, player: Stone, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        let mut tokens = [OFF_BOARD; SIGNATURE_LEN];
        for (i, token) in tokens.iter_mut().enumerate() {
            let step = i as i32 - SIGNATURE_RANGE as i32;
            let x = pos.x as i32 + dx * step;
            let y = pos.y as i32 + dy * step;
            *token = match board.get_xy(x, y) {
                None => OFF_BOARD,
                Some(_) if step == 0 => OWN,
                Some(stone) if stone == player => OWN,
                Some(Stone::Empty) => EMPTY,
                Some(_) => OPPONENT,
            };
        }
        Self { tokens }
    }

    /// Parse a signature from its textual form (testing and debugging aid)
    pub fn from_text(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != SIGNATURE_LEN
            || !bytes.iter().all(|b| matches!(*b, OWN | EMPTY | OPPONENT | OFF_BOARD))
        {
            return None;
        }
        let mut tokens = [OFF_BOARD; SIGNATURE_LEN];
        tokens.copy_from_slice(bytes);
        Some(Self { tokens })
    }

    /// Number of `(shape, offset)` matches that cover the center cell
    pub fn count(&self, shapes: &[&[u8]]) -> usize {
        shapes
            .iter()
            .map(|shape| {
                (0..=SIGNATURE_LEN - shape.len())
                    .filter(|&start| start <= CENTER && CENTER < start + shape.len())
                    .filter(|&start| self.matches_at(shape, start))
                    .count()
            })
            .sum()
    }

    fn matches_at(&self, shape: &[u8], start: usize) -> bool {
        shape
            .iter()
            .zip(&self.tokens[start..])
            .all(|(&want, &have)| match want {
                BLOCKED => have == OPPONENT || have == OFF_BOARD,
                _ => want == have,
            })
    }
}

impl fmt::Display for LineSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &token in &self.tokens {
            write!(f, "{}", token as char)?;
        }
        Ok(())
    }
}

/// Which forbidden rule fired, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForbiddenKind {
    #[default]
    None,
    LongLine,
    DoubleThree,
    DoubleFour,
}

impl fmt::Display for ForbiddenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ForbiddenKind::None => "none",
            ForbiddenKind::LongLine => "long-line",
            ForbiddenKind::DoubleThree => "double-three",
            ForbiddenKind::DoubleFour => "double-four",
        })
    }
}

/// Open threes found along one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeDetail {
    pub direction: Direction,
    pub count: usize,
}

/// Fours found along one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FourDetail {
    pub direction: Direction,
    pub open: usize,
    pub closed: usize,
}

/// Result of a forbidden-move analysis, with per-direction supporting counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenVerdict {
    pub kind: ForbiddenKind,
    pub open_threes: Vec<ThreeDetail>,
    pub fours: Vec<FourDetail>,
    pub long_line: bool,
    /// Longest contiguous run through the point across all directions
    pub longest_run: usize,
}

impl ForbiddenVerdict {
    #[inline]
    pub fn is_forbidden(&self) -> bool {
        self.kind != ForbiddenKind::None
    }

    pub fn open_three_total(&self) -> usize {
        self.open_threes.iter().map(|d| d.count).sum()
    }

    /// Number of distinct directions holding an open three
    pub fn open_three_directions(&self) -> usize {
        self.open_threes.len()
    }

    pub fn open_four_total(&self) -> usize {
        self.fours.iter().map(|d| d.open).sum()
    }

    pub fn closed_four_total(&self) -> usize {
        self.fours.iter().map(|d| d.closed).sum()
    }

    pub fn four_total(&self) -> usize {
        self.open_four_total() + self.closed_four_total()
    }
}

/// Analyse a hypothetical stone of `player` at `pos` without touching the board.
///
/// Precedence, first match wins: long line, double-three, double-four.
pub fn detect_forbidden(board: &Board, pos: Pos, player: Stone) -> ForbiddenVerdict {
    let mut verdict = ForbiddenVerdict::default();

    for dir in Direction::ALL {
        let signature = LineSignature::build(board, pos, player, dir);

        let threes = signature.count(OPEN_THREE);
        if threes > 0 {
            verdict.open_threes.push(ThreeDetail {
                direction: dir,
                count: threes,
            });
        }

        let open = signature.count(OPEN_FOUR);
        let closed = signature.count(CLOSED_FOUR);
        if open + closed > 0 {
            verdict.fours.push(FourDetail {
                direction: dir,
                open,
                closed,
            });
        }

        let run = run_length(board, pos, player, dir);
        verdict.longest_run = verdict.longest_run.max(run);
        if run >= 6 {
            verdict.long_line = true;
        }
    }

    verdict.kind = if verdict.long_line {
        ForbiddenKind::LongLine
    } else if verdict.open_three_directions() >= 2 {
        ForbiddenKind::DoubleThree
    } else if verdict.four_total() >= 2 {
        ForbiddenKind::DoubleFour
    } else {
        ForbiddenKind::None
    };
    verdict
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(black: &[(u8, u8)], white: &[(u8, u8)]) -> Board {
        let mut board = Board::new();
        for &(x, y) in black {
            board.place_stone(Pos::new(x, y), Stone::Black);
        }
        for &(x, y) in white {
            board.place_stone(Pos::new(x, y), Stone::White);
        }
        board
    }

    #[test]
    fn test_signature_encoding() {
        let board = board_with(&[(1, 0), (3, 0)], &[(4, 0)]);
        let sig = LineSignature::build(&board, Pos::new(2, 0), Stone::Black, Direction::Horizontal);
        assert_eq!(sig.to_string(), "###.xxxo...");

        let sig = LineSignature::build(&board, Pos::new(2, 0), Stone::White, Direction::Horizontal);
        assert_eq!(sig.to_string(), "###.oxox...", "Tokens are relative to the player");
    }

    #[test]
    fn test_signature_counts_cover_center() {
        // Open three away from the center is not created by this placement
        let sig = LineSignature::from_text(".xxx.x.....").unwrap();
        assert_eq!(sig.count(OPEN_THREE), 0);

        let sig = LineSignature::from_text("...xxx.....").unwrap();
        assert_eq!(sig.count(OPEN_THREE), 1);
    }

    #[test]
    fn test_closed_four_lookaround() {
        let sig = LineSignature::from_text("..oxxxx....").unwrap();
        assert_eq!(sig.count(CLOSED_FOUR), 1);
        assert_eq!(sig.count(OPEN_FOUR), 0);

        let sig = LineSignature::from_text("....xxxx.##").unwrap();
        assert_eq!(sig.count(OPEN_FOUR), 1);
        assert_eq!(sig.count(CLOSED_FOUR), 0);

        let sig = LineSignature::from_text("..xx.x.....").unwrap();
        assert_eq!(sig.count(CLOSED_FOUR), 0, "Three stones are not a four");
    }

    #[test]
    fn test_from_text_rejects_bad_input() {
        assert!(LineSignature::from_text("xxx").is_none());
        assert!(LineSignature::from_text("...xxy.....").is_none());
    }

    #[test]
    fn test_long_line_scenario() {
        let board = board_with(&[(0, 5), (1, 5), (2, 5), (3, 5), (4, 5)], &[]);
        let verdict = detect_forbidden(&board, Pos::new(5, 5), Stone::Black);
        assert!(verdict.is_forbidden());
        assert_eq!(verdict.kind, ForbiddenKind::LongLine);
        assert!(verdict.long_line);
        assert_eq!(verdict.longest_run, 6);
    }

    #[test]
    fn test_exact_five_not_forbidden() {
        let board = board_with(&[(1, 5), (2, 5), (3, 5), (4, 5)], &[]);
        let verdict = detect_forbidden(&board, Pos::new(5, 5), Stone::Black);
        assert!(!verdict.is_forbidden(), "Five is a win, not a long line: {:?}", verdict);
    }

    #[test]
    fn test_double_three() {
        let board = board_with(&[(5, 7), (6, 7), (7, 5), (7, 6)], &[]);
        let verdict = detect_forbidden(&board, Pos::new(7, 7), Stone::Black);
        assert_eq!(verdict.kind, ForbiddenKind::DoubleThree);
        assert_eq!(verdict.open_three_directions(), 2);
        let dirs: Vec<_> = verdict.open_threes.iter().map(|d| d.direction).collect();
        assert_eq!(dirs, vec![Direction::Horizontal, Direction::Vertical]);
    }

    #[test]
    fn test_single_three_allowed() {
        let board = board_with(&[(5, 7), (6, 7)], &[]);
        let verdict = detect_forbidden(&board, Pos::new(7, 7), Stone::Black);
        assert_eq!(verdict.kind, ForbiddenKind::None);
        assert_eq!(verdict.open_three_directions(), 1);
    }

    #[test]
    fn test_broken_three_counts_as_open() {
        // .xx.x. horizontally plus .xxx. vertically
        let board = board_with(&[(5, 7), (6, 7), (7, 5), (7, 6)], &[]);
        let verdict = detect_forbidden(&board, Pos::new(8, 7), Stone::Black);
        assert_eq!(verdict.open_three_directions(), 1, "Only the horizontal line is touched");

        let board = board_with(&[(5, 7), (6, 7), (8, 5), (8, 6)], &[]);
        let verdict = detect_forbidden(&board, Pos::new(8, 7), Stone::Black);
        assert_eq!(verdict.kind, ForbiddenKind::DoubleThree);
    }

    #[test]
    fn test_blocked_three_not_open() {
        let board = board_with(&[(5, 7), (6, 7), (7, 5), (7, 6)], &[(4, 7)]);
        let verdict = detect_forbidden(&board, Pos::new(7, 7), Stone::Black);
        assert_eq!(verdict.kind, ForbiddenKind::None, "{:?}", verdict);
    }

    #[test]
    fn test_double_four() {
        let board = board_with(&[(4, 7), (5, 7), (6, 7), (7, 4), (7, 5), (7, 6)], &[]);
        let verdict = detect_forbidden(&board, Pos::new(7, 7), Stone::Black);
        assert_eq!(verdict.kind, ForbiddenKind::DoubleFour);
        assert_eq!(verdict.open_four_total(), 2);
    }

    #[test]
    fn test_double_four_closed_pair() {
        // Both fours blocked on one side still count
        let board = board_with(
            &[(4, 7), (5, 7), (6, 7), (7, 4), (7, 5), (7, 6)],
            &[(3, 7), (7, 3)],
        );
        let verdict = detect_forbidden(&board, Pos::new(7, 7), Stone::Black);
        assert_eq!(verdict.kind, ForbiddenKind::DoubleFour);
        assert_eq!(verdict.closed_four_total(), 2);
        assert_eq!(verdict.open_four_total(), 0);
    }

    #[test]
    fn test_long_line_precedes_other_rules() {
        // Overline horizontally plus an open three vertically
        let board = board_with(
            &[(2, 7), (3, 7), (4, 7), (5, 7), (6, 7), (7, 5), (7, 6)],
            &[],
        );
        let verdict = detect_forbidden(&board, Pos::new(7, 7), Stone::Black);
        assert_eq!(verdict.kind, ForbiddenKind::LongLine);
    }

    #[test]
    fn test_detect_does_not_mutate() {
        let board = board_with(&[(5, 7), (6, 7), (7, 5), (7, 6)], &[]);
        let before = board.clone();
        let _ = detect_forbidden(&board, Pos::new(7, 7), Stone::Black);
        assert_eq!(board, before);
    }
}
