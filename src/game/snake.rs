use super::grid::Cell;
use super::heading::Heading;
use std::collections::VecDeque;

/// Snake state.  Snate.
///
/// The cells are kept in a ring buffer with the head at the front and the
/// tail at the back, so that each move only touches the two ends.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    /// The cells occupied by the snake, head first.  Never empty, and no cell
    /// appears twice.
    pub(super) cells: VecDeque<Cell>,

    /// The direction in which the snake is moving, or `None` if it hasn't
    /// started moving yet
    pub(super) heading: Option<Heading>,
}

impl Snake {
    /// Create a new, motionless snake consisting of just a head at `head`
    pub(crate) fn new(head: Cell) -> Snake {
        Snake {
            cells: VecDeque::from([head]),
            heading: None,
        }
    }

    /// Return the position of the snake's head
    pub(crate) fn head(&self) -> Cell {
        *self
            .cells
            .front()
            .expect("snake should always have at least one cell")
    }

    /// Iterate over the snake's cells from head to tail
    pub(crate) fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// Iterate over the snake's cells other than the head
    pub(crate) fn body(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells().skip(1)
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn occupies(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub(crate) fn heading(&self) -> Option<Heading> {
        self.heading
    }

    pub(super) fn set_heading(&mut self, heading: Heading) {
        self.heading = Some(heading);
    }

    /// Move the head to `next`.  Unless `grow` is true, the tail cell is
    /// dropped so that the length stays the same.
    pub(super) fn advance(&mut self, next: Cell, grow: bool) {
        self.cells.push_front(next);
        if !grow {
            let _ = self.cells.pop_back();
        }
    }
}
