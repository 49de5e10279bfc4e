use battleships::{Board, Cell, Orientation, ShipPlacement, ShotOutcome, DIMENSION};
use proptest::prelude::*;

fn orientation() -> impl Strategy<Value = Orientation> {
    prop::sample::select(Orientation::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn valid_placement_covers_three_cells_around_center(
        x in 0..DIMENSION,
        y in 0..DIMENSION,
        o in orientation(),
    ) {
        let ship = ShipPlacement::new(x, y, o);
        let mut board = Board::new();
        let placed = board.place(&ship);
        prop_assert_eq!(placed, ship.cells().is_some());

        if let Some(cells) = ship.cells() {
            prop_assert_eq!(board.intact(), 3);
            prop_assert!(cells.contains(&(x, y)));
            for (cx, cy) in cells {
                prop_assert!(cx < DIMENSION && cy < DIMENSION);
                prop_assert!(cx.abs_diff(x) <= 1 && cy.abs_diff(y) <= 1);
            }
            prop_assert_eq!(board.cells_in(Cell::Occupied).len(), 3);
        } else {
            prop_assert_eq!(board, Board::new());
        }
    }

    #[test]
    fn raw_out_of_range_is_never_placed(
        x in -5i32..10,
        y in -5i32..10,
        o in -2i32..7,
    ) {
        let mut board = Board::new();
        match ShipPlacement::from_raw(x, y, o) {
            Some(ship) => {
                prop_assert!((0..4).contains(&o));
                board.place(&ship);
            }
            None => prop_assert_eq!(&board, &Board::new()),
        }
        prop_assert!(board.intact() == 0 || board.intact() == 3);
    }

    #[test]
    fn hits_only_grow_once_per_cell(
        x in 1..DIMENSION - 1,
        y in 1..DIMENSION - 1,
        o in orientation(),
        shots in prop::collection::vec((0..DIMENSION, 0..DIMENSION), 0..40),
    ) {
        let mut board = Board::new();
        board.place(&ShipPlacement::new(x, y, o));
        let mut scored = std::collections::HashSet::new();
        for (sx, sy) in shots {
            let outcome = board.shoot(sx, sy).unwrap();
            if outcome == ShotOutcome::Hit {
                prop_assert!(scored.insert((sx, sy)), "cell ({}, {}) scored twice", sx, sy);
            }
            prop_assert_eq!(board.hits(), scored.len());
            prop_assert_eq!(board.hits() + board.intact(), 3);
        }
    }
}
