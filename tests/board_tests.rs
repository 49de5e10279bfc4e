use battleships::{
    Board, BoardError, Cell, Orientation, Response, ShipPlacement, ShotOutcome, TargetBoard,
};

#[test]
fn test_place_and_sink() {
    let mut board = Board::new();
    assert!(board.place(&ShipPlacement::new(1, 1, Orientation::Horizontal)));
    assert_eq!(board.intact(), 3);

    for x in 0..3 {
        assert_eq!(board.shoot(x, 1).unwrap(), ShotOutcome::Hit);
    }
    assert_eq!(board.hits(), 3);
    assert_eq!(board.intact(), 0);
}

#[test]
fn test_vertical_ship_cells() {
    let mut board = Board::new();
    board.place(&ShipPlacement::new(2, 2, Orientation::Vertical));
    assert_eq!(board.cells_in(Cell::Occupied), vec![(2, 1), (2, 2), (2, 3)]);
    assert_eq!(board.shoot(2, 2).unwrap(), ShotOutcome::Hit);
    assert_eq!(board.shoot(1, 2).unwrap(), ShotOutcome::Miss);
}

#[test]
fn test_out_of_bounds_placement_is_ignored() {
    let mut board = Board::new();
    for orientation in Orientation::ALL {
        assert!(!board.place(&ShipPlacement::new(0, 0, orientation)));
    }
    // Horizontal at the right edge sticks out by one column.
    assert!(!board.place(&ShipPlacement::new(3, 1, Orientation::Horizontal)));
    assert_eq!(board, Board::new());
}

#[test]
fn test_repeat_shot_cannot_rescore() {
    let mut board = Board::new();
    board.place(&ShipPlacement::new(1, 1, Orientation::DiagonalFalling));
    assert_eq!(board.shoot(0, 0).unwrap(), ShotOutcome::Hit);
    assert_eq!(board.shoot(0, 0).unwrap(), ShotOutcome::Miss);
    assert_eq!(board.cell(0, 0).unwrap(), Cell::Hit);
    assert_eq!(board.hits(), 1);
}

#[test]
fn test_shot_off_the_board() {
    let mut board = Board::new();
    assert_eq!(
        board.shoot(4, 0).unwrap_err(),
        BoardError::OutOfBounds { x: 4, y: 0 }
    );
}

#[test]
fn test_server_board_rendering() {
    let mut board = Board::new();
    board.place(&ShipPlacement::new(1, 1, Orientation::Horizontal));
    board.shoot(0, 1).unwrap();
    board.shoot(3, 3).unwrap();
    assert_eq!(board.to_string(), ". . . . \nX S S . \n. . . . \n. . . O \n");
}

#[test]
fn test_target_board_keeps_hits_on_miss() {
    let mut view = TargetBoard::new();
    view.record(2, 2, Response::Hit).unwrap();
    view.record(2, 2, Response::Miss).unwrap();
    view.record(0, 3, Response::Miss).unwrap();
    assert_eq!(view.cell(2, 2).unwrap(), Cell::Hit);
    assert_eq!(view.cell(0, 3).unwrap(), Cell::Miss);
    assert_eq!(view.hits(), 1);
    assert_eq!(view.to_string(), ". . . . \n. . . . \n. . X . \nO . . . \n");
}

#[test]
fn test_target_board_counts_winning_shot() {
    let mut view = TargetBoard::new();
    view.record(1, 0, Response::Won).unwrap();
    assert_eq!(view.cell(1, 0).unwrap(), Cell::Hit);
    assert_eq!(view.hits(), 1);
}

#[test]
fn test_target_board_rejects_off_grid_record() {
    let mut view = TargetBoard::new();
    let err = view.record(0, 4, Response::Hit).unwrap_err();
    assert_eq!(err, BoardError::OutOfBounds { x: 0, y: 4 });
    assert_eq!(view.hits(), 0);

    let err = battleships::SessionError::from(err);
    assert_eq!(err.to_string(), "Coordinate (0, 4) is out of bounds");
}
