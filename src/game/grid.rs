use super::heading::Heading;
use std::num::NonZeroU16;

/// A single square on the board, counted from the top-left corner
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct Cell {
    pub(crate) x: u16,
    pub(crate) y: u16,
}

impl Cell {
    pub(crate) const fn new(x: u16, y: u16) -> Cell {
        Cell { x, y }
    }
}

/// The square playing field.  Cells with both coordinates in `0..size` are on
/// the board; everything else is wall.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Board {
    size: NonZeroU16,
}

impl Board {
    pub(crate) fn new(size: NonZeroU16) -> Board {
        Board { size }
    }

    /// Number of cells along each edge
    pub(crate) fn size(self) -> u16 {
        self.size.get()
    }

    pub(crate) fn cell_count(self) -> usize {
        let side = usize::from(self.size());
        side * side
    }

    pub(crate) fn contains(self, cell: Cell) -> bool {
        cell.x < self.size() && cell.y < self.size()
    }

    /// The cell in which a new snake starts
    pub(crate) fn center(self) -> Cell {
        Cell::new(self.size() / 2, self.size() / 2)
    }

    /// Iterate over every cell on the board, row by row
    pub(crate) fn cells(self) -> impl Iterator<Item = Cell> {
        let size = self.size();
        (0..size).flat_map(move |y| (0..size).map(move |x| Cell::new(x, y)))
    }

    /// Return the cell one step from `cell` in direction `heading`, or `None`
    /// if that would leave the board.
    pub(crate) fn step(self, cell: Cell, heading: Heading) -> Option<Cell> {
        let (dx, dy) = heading.delta();
        let x = cell.x.checked_add_signed(dx)?;
        let y = cell.y.checked_add_signed(dy)?;
        Some(Cell::new(x, y)).filter(|&c| self.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn board(size: u16) -> Board {
        Board::new(NonZeroU16::new(size).expect("board size should be nonzero"))
    }

    #[rstest]
    #[case(Heading::Up, Cell::new(2, 7), Some(Cell::new(2, 6)))]
    #[case(Heading::Down, Cell::new(2, 7), Some(Cell::new(2, 8)))]
    #[case(Heading::Left, Cell::new(2, 7), Some(Cell::new(1, 7)))]
    #[case(Heading::Right, Cell::new(2, 7), Some(Cell::new(3, 7)))]
    #[case(Heading::Up, Cell::new(2, 0), None)]
    #[case(Heading::Down, Cell::new(2, 9), None)]
    #[case(Heading::Left, Cell::new(0, 7), None)]
    #[case(Heading::Right, Cell::new(9, 7), None)]
    #[case(Heading::Right, Cell::new(8, 9), Some(Cell::new(9, 9)))]
    fn test_step(#[case] h: Heading, #[case] cell: Cell, #[case] r: Option<Cell>) {
        assert_eq!(board(10).step(cell, h), r);
    }

    #[rstest]
    #[case(Cell::new(0, 0), true)]
    #[case(Cell::new(19, 19), true)]
    #[case(Cell::new(20, 0), false)]
    #[case(Cell::new(0, 20), false)]
    #[case(Cell::new(u16::MAX, 3), false)]
    fn test_contains(#[case] cell: Cell, #[case] r: bool) {
        assert_eq!(board(20).contains(cell), r);
    }

    #[test]
    fn cells_cover_board() {
        let b = board(4);
        let cells = b.cells().collect::<Vec<_>>();
        assert_eq!(cells.len(), b.cell_count());
        assert_eq!(cells.first(), Some(&Cell::new(0, 0)));
        assert_eq!(cells.get(1), Some(&Cell::new(1, 0)));
        assert_eq!(cells.last(), Some(&Cell::new(3, 3)));
        assert!(cells.iter().all(|&c| b.contains(c)));
    }

    #[test]
    fn center() {
        assert_eq!(board(20).center(), Cell::new(10, 10));
        assert_eq!(board(1).center(), Cell::new(0, 0));
    }
}
