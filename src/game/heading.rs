/// The direction in which the snake is moving
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    /// Return the unit `(dx, dy)` offset for one step in this direction.  `y`
    /// grows downwards.
    pub(crate) fn delta(self) -> (i16, i16) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    pub(crate) fn reverse(self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    pub(crate) fn is_reverse_of(self, other: Heading) -> bool {
        self.reverse() == other
    }
}
