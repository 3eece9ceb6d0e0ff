//! Human readable move notation (`H8` style)

use super::{Pos, MAX_BOARD_SIZE};

const LETTERS: &[u8; MAX_BOARD_SIZE] = b"ABCDEFGHIJKLMNOPQRS";

/// Column letter plus 1-based row, or `"x,y"` for points off the board
pub fn position_to_notation(x: i32, y: i32, size: usize) -> String {
    if Pos::is_valid(x, y, size) {
        format!("{}{}", LETTERS[x as usize] as char, y + 1)
    } else {
        format!("{},{}", x, y)
    }
}

/// Parse `H8` style notation (case-insensitive) back into a position
pub fn notation_to_position(notation: &str, size: usize) -> Option<Pos> {
    let notation = notation.trim();
    let mut chars = notation.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let digits = chars.as_str();
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let x = LETTERS.iter().position(|&l| l as char == letter)?;
    let row: usize = digits.parse().ok()?;
    if x >= size || row == 0 || row > size {
        return None;
    }
    Some(Pos::new(x as u8, (row - 1) as u8))
}
