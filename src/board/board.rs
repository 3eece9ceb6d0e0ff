//! Board structure with scoped placement

use std::ops::{Deref, DerefMut};

use super::bitboard::Bitboard;
use super::{Pos, Stone, BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};

/// Game board: one bitboard per color over a square grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// Black stones bitboard
    pub black: Bitboard,
    /// White stones bitboard
    pub white: Bitboard,
}

impl Board {
    /// Standard 15x15 board
    pub fn new() -> Self {
        Self::with_size(BOARD_SIZE)
    }

    /// Board of the given size, clamped to the supported range
    pub fn with_size(size: usize) -> Self {
        Self {
            size: size.clamp(MIN_BOARD_SIZE, MAX_BOARD_SIZE),
            black: Bitboard::new(),
            white: Bitboard::new(),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Center cell (`floor(size / 2)` on both axes)
    #[inline]
    pub fn center(&self) -> Pos {
        let c = (self.size / 2) as u8;
        Pos::new(c, c)
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        Pos::is_valid(x, y, self.size)
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        let idx = pos.to_index(self.size);
        if self.black.get(idx) {
            Stone::Black
        } else if self.white.get(idx) {
            Stone::White
        } else {
            Stone::Empty
        }
    }

    /// Get stone at signed coordinates, `None` when off the board
    #[inline]
    pub fn get_xy(&self, x: i32, y: i32) -> Option<Stone> {
        if self.contains(x, y) {
            Some(self.get(Pos::new(x as u8, y as u8)))
        } else {
            None
        }
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        let idx = pos.to_index(self.size);
        !self.black.get(idx) && !self.white.get(idx)
    }

    /// Place a stone, overwriting whatever was there
    #[inline]
    pub fn place_stone(&mut self, pos: Pos, stone: Stone) {
        let idx = pos.to_index(self.size);
        match stone {
            Stone::Black => {
                self.white.clear(idx);
                self.black.set(idx);
            }
            Stone::White => {
                self.black.clear(idx);
                self.white.set(idx);
            }
            Stone::Empty => self.remove_stone(pos),
        }
    }

    /// Remove a stone
    #[inline]
    pub fn remove_stone(&mut self, pos: Pos) {
        let idx = pos.to_index(self.size);
        self.black.clear(idx);
        self.white.clear(idx);
    }

    /// Place a stone for the lifetime of the returned guard
    ///
    /// The guard derefs to the board, so callers can keep reading or
    /// mutating through it; the stone is removed when it drops.
    ///
    /// ```
    /// use renju::{Board, Pos, Stone};
    ///
    /// let mut board = Board::new();
    /// let pos = Pos::new(7, 7);
    /// {
    ///     let placed = board.place_scoped(pos, Stone::Black);
    ///     assert_eq!(placed.get(pos), Stone::Black);
    /// }
    /// assert!(board.is_empty(pos));
    /// ```
    pub fn place_scoped(&mut self, pos: Pos, stone: Stone) -> Placement<'_> {
        self.place_stone(pos, stone);
        Placement { board: self, pos }
    }

    /// Get bitboard for a color (returns None for Empty)
    #[inline]
    pub fn stones(&self, stone: Stone) -> Option<&Bitboard> {
        match stone {
            Stone::Black => Some(&self.black),
            Stone::White => Some(&self.white),
            Stone::Empty => None,
        }
    }

    /// Positions held by a color in row-major order
    pub fn positions(&self, stone: Stone) -> impl Iterator<Item = Pos> + '_ {
        let size = self.size;
        self.stones(stone)
            .into_iter()
            .flat_map(|bb| bb.iter_ones())
            .map(move |idx| Pos::from_index(idx, size))
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        let size = self.size;
        let occupied = self.black.union(&self.white);
        (0..size * size)
            .filter(move |&idx| !occupied.get(idx))
            .map(move |idx| Pos::from_index(idx, size))
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    #[inline]
    pub fn empty_count(&self) -> usize {
        self.size * self.size - self.stone_count() as usize
    }

    /// Check if board is empty
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// A stone placed by [`Board::place_scoped`], removed on drop
pub struct Placement<'a> {
    board: &'a mut Board,
    pos: Pos,
}

impl Placement<'_> {
    /// The position this guard owns
    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }
}

impl Deref for Placement<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl DerefMut for Placement<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        &mut *self.board
    }
}

impl Drop for Placement<'_> {
    fn drop(&mut self) {
        self.board.remove_stone(self.pos);
    }
}
