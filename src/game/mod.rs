//! The game proper: board, snake, food, scoring, and the state machine that
//! ties them together.  Nothing in here touches the terminal or the
//! filesystem.
mod food;
mod grid;
mod heading;
mod levels;
mod snake;
mod timer;
pub(crate) use self::grid::{Board, Cell};
pub(crate) use self::heading::Heading;
pub(crate) use self::levels::Progression;
use self::food::place_food;
use self::snake::Snake;
use self::timer::TickTimer;
use rand::Rng;
use std::time::{Duration, Instant};

/// The fixed parameters of a game
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Rules {
    pub(crate) board: Board,
    pub(crate) progression: Progression,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GameState {
    /// Waiting for the player to pick a first direction
    Ready,
    Playing,
    Paused,
    GameOver,
}

/// Requests from the player
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Input {
    Turn(Heading),
    Start,
    Pause,
    Resume,
    Restart,
    ToggleSound,
}

/// Things that happened during a tick that the front end may want to react
/// to
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Notification {
    FoodEaten,
    LevelUp(u32),
    GameOver { new_high_score: bool },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Game<R> {
    rng: R,
    rules: Rules,
    snake: Snake,
    food: Option<Cell>,
    score: u32,
    level: u32,
    high_score: u32,
    state: GameState,
    /// A turn requested since the last tick; at most one is accepted per tick
    pending: Option<Heading>,
    /// Where the snake crashed, if it did
    collision: Option<Cell>,
    timer: TickTimer,
    sound: bool,
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(rules: Rules, high_score: u32, sound: bool, rng: R) -> Game<R> {
        let mut game = Game {
            rng,
            rules,
            snake: Snake::new(rules.board.center()),
            food: None,
            score: 0,
            level: 1,
            high_score,
            state: GameState::Ready,
            pending: None,
            collision: None,
            timer: TickTimer::new(rules.progression.speed_for(1)),
            sound,
        };
        game.reset();
        game
    }

    /// Put the snake, food, score, level, and speed back to their starting
    /// values and return to `Ready`.  The high score and sound setting are
    /// kept.
    fn reset(&mut self) {
        self.snake = Snake::new(self.rules.board.center());
        self.food = place_food(&mut self.rng, self.rules.board, &self.snake);
        self.score = 0;
        self.level = 1;
        self.pending = None;
        self.collision = None;
        self.timer = TickTimer::new(self.rules.progression.speed_for(1));
        self.state = GameState::Ready;
    }

    /// Act on a request from the player.  Requests that make no sense in the
    /// current state are ignored.
    pub(crate) fn apply(&mut self, input: Input, now: Instant) {
        match (self.state, input) {
            (_, Input::ToggleSound) => {
                self.sound = !self.sound;
                log::debug!("Sound turned {}", if self.sound { "on" } else { "off" });
            }
            (GameState::Ready | GameState::GameOver, Input::Turn(heading)) => {
                self.start(heading, now);
            }
            (GameState::Playing, Input::Turn(heading)) => self.turn(heading),
            (GameState::Ready, Input::Start) | (GameState::GameOver, Input::Restart) => {
                self.start(Heading::Right, now);
            }
            (GameState::Playing, Input::Pause) => {
                self.timer.stop();
                self.state = GameState::Paused;
                log::info!("Game paused at score {}", self.score);
            }
            (GameState::Paused, Input::Resume) => {
                self.timer.start(now);
                self.state = GameState::Playing;
                log::info!("Game resumed");
            }
            (state, input) => log::trace!("Ignoring {input:?} while {state:?}"),
        }
    }

    fn start(&mut self, heading: Heading, now: Instant) {
        if self.state == GameState::GameOver {
            self.reset();
        }
        self.snake.set_heading(heading);
        self.state = GameState::Playing;
        self.timer.start(now);
        log::info!("New game started heading {heading:?}");
    }

    fn turn(&mut self, heading: Heading) {
        if self.pending.is_some() {
            return;
        }
        match self.snake.heading() {
            Some(current) if current == heading || current.is_reverse_of(heading) => (),
            _ => self.pending = Some(heading),
        }
    }

    /// Run a tick if the timer says one is due
    pub(crate) fn on_timer(&mut self, now: Instant) -> Vec<Notification> {
        if self.state == GameState::Playing && self.timer.fire(now) {
            self.tick(now)
        } else {
            Vec::new()
        }
    }

    /// Advance the game by one step.  Does nothing unless playing.
    pub(crate) fn tick(&mut self, now: Instant) -> Vec<Notification> {
        let mut events = Vec::new();
        if self.state != GameState::Playing {
            return events;
        }
        if let Some(heading) = self.pending.take() {
            self.snake.set_heading(heading);
        }
        let Some(heading) = self.snake.heading() else {
            return events;
        };
        let head = self.snake.head();
        let Some(next) = self.rules.board.step(head, heading) else {
            events.push(self.game_over(head));
            return events;
        };
        if self.snake.occupies(next) {
            events.push(self.game_over(next));
            return events;
        }
        let ate = self.food == Some(next);
        self.snake.advance(next, ate);
        log::trace!("Snake moved to ({}, {})", next.x, next.y);
        if ate {
            self.score += 1;
            events.push(Notification::FoodEaten);
            self.food = place_food(&mut self.rng, self.rules.board, &self.snake);
            if let Some(level) = self.level_up(now) {
                events.push(Notification::LevelUp(level));
            }
            if self.food.is_none() {
                log::info!("Board is full");
                events.push(self.finish());
            }
        }
        events
    }

    /// Recompute the level from the score.  If it went up, speed up the timer
    /// and return the new level.
    fn level_up(&mut self, now: Instant) -> Option<u32> {
        let level = self.rules.progression.level_for(self.score);
        if level <= self.level {
            return None;
        }
        self.level = level;
        let speed = self.rules.progression.speed_for(level);
        self.timer.reschedule(speed, now);
        log::info!("Reached level {level}; tick interval is now {speed:?}");
        Some(level)
    }

    fn game_over(&mut self, collision: Cell) -> Notification {
        log::info!("Snake crashed at ({}, {})", collision.x, collision.y);
        self.collision = Some(collision);
        self.finish()
    }

    fn finish(&mut self) -> Notification {
        self.timer.stop();
        self.pending = None;
        self.state = GameState::GameOver;
        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
        }
        log::info!(
            "Game over with score {}{}",
            self.score,
            if new_high_score { " (new high score)" } else { "" }
        );
        Notification::GameOver { new_high_score }
    }
}

impl<R> Game<R> {
    pub(crate) fn state(&self) -> GameState {
        self.state
    }

    pub(crate) fn high_score(&self) -> u32 {
        self.high_score
    }

    /// When the next tick is due, if the game is running
    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub(crate) fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            board: self.rules.board,
            snake: &self.snake,
            food: self.food,
            score: self.score,
            level: self.level,
            high_score: self.high_score,
            speed: self.timer.interval(),
            state: self.state,
            collision: self.collision,
            sound: self.sound,
        }
    }
}

/// A read-only view of a [`Game`] for drawing
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Snapshot<'a> {
    pub(crate) board: Board,
    pub(crate) snake: &'a Snake,
    pub(crate) food: Option<Cell>,
    pub(crate) score: u32,
    pub(crate) level: u32,
    pub(crate) high_score: u32,
    /// Current tick interval
    pub(crate) speed: Duration,
    pub(crate) state: GameState,
    pub(crate) collision: Option<Cell>,
    pub(crate) sound: bool,
}
