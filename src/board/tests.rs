use super::*;

#[test]
fn test_stone_opponent() {
    assert_eq!(Stone::Black.opponent(), Stone::White);
    assert_eq!(Stone::White.opponent(), Stone::Black);
    assert_eq!(Stone::Empty.opponent(), Stone::Empty);
}

#[test]
fn test_pos_conversion() {
    let pos = Pos::new(7, 7); // Center of 15x15
    assert_eq!(pos.to_index(15), 7 * 15 + 7);
    assert_eq!(Pos::from_index(112, 15), pos);

    // x is the column, y the row
    let pos = Pos::new(3, 1);
    assert_eq!(pos.to_index(15), 18);
}

#[test]
fn test_pos_validity() {
    assert!(Pos::is_valid(0, 0, 15));
    assert!(Pos::is_valid(14, 14, 15));
    assert!(!Pos::is_valid(-1, 0, 15));
    assert!(!Pos::is_valid(0, -1, 15));
    assert!(!Pos::is_valid(15, 0, 15));
    assert!(!Pos::is_valid(0, 15, 15));
}

#[test]
fn test_pos_offset() {
    let pos = Pos::new(0, 5);
    assert_eq!(pos.offset(1, 0, 2, 15), Some(Pos::new(2, 5)));
    assert_eq!(pos.offset(-1, 0, 1, 15), None);
    assert_eq!(pos.offset(1, -1, 3, 15), Some(Pos::new(3, 2)));
}

#[test]
fn test_board_place_and_remove() {
    let mut board = Board::new();
    let pos = Pos::new(3, 4);
    assert!(board.is_empty(pos));

    board.place_stone(pos, Stone::Black);
    assert_eq!(board.get(pos), Stone::Black);
    assert_eq!(board.stone_count(), 1);

    board.place_stone(pos, Stone::White);
    assert_eq!(board.get(pos), Stone::White, "Placing overwrites the cell");
    assert_eq!(board.stone_count(), 1);

    board.remove_stone(pos);
    assert!(board.is_board_empty());
}

#[test]
fn test_board_size_clamped() {
    assert_eq!(Board::new().size(), BOARD_SIZE);
    assert_eq!(Board::with_size(19).size(), 19);
    assert_eq!(Board::with_size(40).size(), MAX_BOARD_SIZE);
    assert_eq!(Board::with_size(2).size(), MIN_BOARD_SIZE);
}

#[test]
fn test_board_center() {
    assert_eq!(Board::new().center(), Pos::new(7, 7));
    assert_eq!(Board::with_size(19).center(), Pos::new(9, 9));
    assert_eq!(Board::with_size(6).center(), Pos::new(3, 3));
}

#[test]
fn test_get_xy_off_board() {
    let mut board = Board::new();
    board.place_stone(Pos::new(14, 0), Stone::White);
    assert_eq!(board.get_xy(14, 0), Some(Stone::White));
    assert_eq!(board.get_xy(15, 0), None);
    assert_eq!(board.get_xy(0, -1), None);
}

#[test]
fn test_scoped_placement_restores() {
    let mut board = Board::new();
    let pos = Pos::new(7, 7);
    {
        let mut placed = board.place_scoped(pos, Stone::Black);
        assert_eq!(placed.get(pos), Stone::Black);
        assert_eq!(placed.pos(), pos);

        // Nested placements through the guard
        let inner = placed.place_scoped(Pos::new(8, 8), Stone::White);
        assert_eq!(inner.stone_count(), 2);
    }
    assert!(board.is_board_empty(), "Guards must remove their stones on drop");
}

#[test]
fn test_empty_cells_row_major() {
    let mut board = Board::with_size(5);
    let all: Vec<Pos> = board.empty_cells().collect();
    for pos in all {
        if pos != Pos::new(4, 4) && pos != Pos::new(2, 0) {
            board.place_stone(pos, Stone::Black);
        }
    }
    let empties: Vec<_> = board.empty_cells().collect();
    assert_eq!(empties, vec![Pos::new(2, 0), Pos::new(4, 4)]);
    assert_eq!(board.empty_count(), 2);
    assert!(!board.is_full());
}

#[test]
fn test_positions_by_color() {
    let mut board = Board::new();
    board.place_stone(Pos::new(5, 2), Stone::Black);
    board.place_stone(Pos::new(1, 0), Stone::Black);
    board.place_stone(Pos::new(3, 3), Stone::White);

    let black: Vec<_> = board.positions(Stone::Black).collect();
    assert_eq!(black, vec![Pos::new(1, 0), Pos::new(5, 2)]);
    assert_eq!(board.positions(Stone::Empty).count(), 0);
}

#[test]
fn test_positional_weight() {
    assert_eq!(positional_weight(15, Pos::new(7, 7)), 7.5);
    assert_eq!(positional_weight(15, Pos::new(0, 0)), 0.0);
    assert_eq!(positional_weight(15, Pos::new(0, 7)), 0.5);
    assert!(positional_weight(15, Pos::new(6, 7)) < positional_weight(15, Pos::new(7, 7)));
}
