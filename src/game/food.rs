use super::grid::{Board, Cell};
use super::snake::Snake;
use rand::{seq::IteratorRandom, Rng};

/// How many random cells to try before falling back to picking from the list
/// of free cells
const MAX_SAMPLES: usize = 64;

/// Choose a cell not occupied by `snake`, uniformly at random.  Returns `None`
/// if the snake covers the whole board.
pub(crate) fn place_food<R: Rng>(rng: &mut R, board: Board, snake: &Snake) -> Option<Cell> {
    if snake.len() >= board.cell_count() {
        return None;
    }
    for _ in 0..MAX_SAMPLES {
        let cell = Cell::new(
            rng.random_range(0..board.size()),
            rng.random_range(0..board.size()),
        );
        if !snake.occupies(cell) {
            return Some(cell);
        }
    }
    // Crowded board: rejection sampling is unlikely to hit soon.
    board
        .cells()
        .filter(|&c| !snake.occupies(c))
        .choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::collections::VecDeque;
    use std::num::NonZeroU16;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn board(size: u16) -> Board {
        Board::new(NonZeroU16::new(size).expect("board size should be nonzero"))
    }

    fn snake_of(cells: impl IntoIterator<Item = Cell>) -> Snake {
        Snake {
            cells: cells.into_iter().collect(),
            heading: None,
        }
    }

    #[test]
    fn never_on_snake() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let b = board(5);
        let snake = snake_of((0..5).flat_map(|y| (0..4).map(move |x| Cell::new(x, y))));
        for _ in 0..200 {
            let food = place_food(&mut rng, b, &snake).expect("free cells remain");
            assert!(b.contains(food));
            assert!(!snake.occupies(food));
            assert_eq!(food.x, 4);
        }
    }

    #[test]
    fn single_free_cell() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let b = board(6);
        let hole = Cell::new(2, 3);
        let snake = snake_of(b.cells().filter(|&c| c != hole));
        assert_eq!(place_food(&mut rng, b, &snake), Some(hole));
    }

    #[test]
    fn full_board() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let b = board(3);
        let snake = snake_of(b.cells());
        assert_eq!(place_food(&mut rng, b, &snake), None);
    }

    #[test]
    fn covers_every_free_cell() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let b = board(3);
        let snake = snake_of(VecDeque::from([Cell::new(1, 1)]));
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.extend(place_food(&mut rng, b, &snake));
        }
        assert_eq!(seen.len(), 8);
    }
}
