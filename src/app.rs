use crate::command::Command;
use crate::consts;
use crate::game::{Game, GameState, Heading, Input, Notification, Rules};
use crate::highscore::HighScoreStore;
use crate::screen::{PauseMenu, PauseOpt, Screen};
use crate::sound::Bell;
use crate::util::error_chain;
use crossterm::event::{poll, read, Event};
use rand::Rng;
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::Instant;

/// The front end: owns the game, feeds it key presses & timer ticks, and
/// draws it
#[derive(Clone, Debug)]
pub(crate) struct App<R = rand::rngs::ThreadRng> {
    game: Game<R>,
    store: HighScoreStore,
    bell: Bell,
    pause_menu: PauseMenu,
    flash: Option<Flash>,
    quitting: bool,
}

impl App<rand::rngs::ThreadRng> {
    pub(crate) fn new(rules: Rules, store: HighScoreStore, sound: bool) -> Self {
        App::new_with_rng(rules, store, sound, rand::rng())
    }
}

impl<R: Rng> App<R> {
    pub(crate) fn new_with_rng(
        rules: Rules,
        mut store: HighScoreStore,
        sound: bool,
        rng: R,
    ) -> App<R> {
        let high_score = match store.load() {
            Ok(score) => {
                log::info!("Loaded high score {score}");
                score
            }
            Err(e) => {
                log::warn!(
                    "{}; high score will only be kept in memory",
                    error_chain(&e)
                );
                store.disable();
                0
            }
        };
        App {
            game: Game::new_with_rng(rules, high_score, sound, rng),
            store,
            bell: Bell::default(),
            pause_menu: PauseMenu::new(),
            flash: None,
            quitting: false,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting {
            self.draw(&mut terminal)?;
            self.process_input()?;
        }
        Ok(())
    }

    /// Wait for either a key press or the next tick, whichever comes first,
    /// and handle it
    fn process_input(&mut self) -> io::Result<()> {
        if let Some(deadline) = self.game.deadline() {
            let wait = deadline.saturating_duration_since(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                let events = self.game.on_timer(Instant::now());
                self.after_tick(events);
                return Ok(());
            }
        }
        self.handle_event(read()?, Instant::now());
        Ok(())
    }

    fn handle_event(&mut self, event: Event, now: Instant) {
        let state = self.game.state();
        if event == Event::FocusLost {
            if state == GameState::Playing {
                self.pause(now);
            }
            return;
        }
        let Some(cmd) = event.as_key_press_event().and_then(Command::from_key_event) else {
            return;
        };
        match (state, cmd) {
            (_, Command::Quit) => self.quitting = true,
            (_, Command::M) => self.game.apply(Input::ToggleSound, now),
            (GameState::Paused, _) => match self.pause_menu.handle_command(cmd) {
                Some(PauseOpt::Resume) => self.game.apply(Input::Resume, now),
                Some(PauseOpt::Quit) => self.quitting = true,
                None => (),
            },
            (_, Command::Up) => self.play(Input::Turn(Heading::Up), now),
            (_, Command::Down) => self.play(Input::Turn(Heading::Down), now),
            (_, Command::Left) => self.play(Input::Turn(Heading::Left), now),
            (_, Command::Right) => self.play(Input::Turn(Heading::Right), now),
            (GameState::Playing, Command::P | Command::Esc) => self.pause(now),
            (GameState::Ready, Command::Enter | Command::Space) => self.play(Input::Start, now),
            (GameState::GameOver, Command::Enter | Command::Space | Command::R) => {
                self.play(Input::Restart, now);
            }
            (GameState::Ready | GameState::GameOver, Command::Q) => self.quitting = true,
            _ => (),
        }
    }

    /// Pass along an input that may start a new game, clearing any message
    /// left over from the previous one
    fn play(&mut self, input: Input, now: Instant) {
        let was_playing = self.game.state() == GameState::Playing;
        self.game.apply(input, now);
        if !was_playing && self.game.state() == GameState::Playing {
            self.flash = None;
        }
    }

    fn pause(&mut self, now: Instant) {
        self.pause_menu = PauseMenu::new();
        self.game.apply(Input::Pause, now);
    }

    fn after_tick(&mut self, events: Vec<Notification>) {
        if let Some(flash) = self.flash.as_mut() {
            flash.ticks_left = flash.ticks_left.saturating_sub(1);
            if flash.ticks_left == 0 {
                self.flash = None;
            }
        }
        for ev in events {
            self.notify(ev);
        }
    }

    fn notify(&mut self, event: Notification) {
        if self.game.snapshot().sound {
            if let Err(e) = self.bell.ring(event, &mut io::stdout()) {
                log::warn!("Failed to ring terminal bell: {e}");
            }
        }
        match event {
            Notification::FoodEaten => (),
            Notification::LevelUp(level) => self.flash = Some(Flash::new(format!("Level {level}!"))),
            Notification::GameOver {
                new_high_score: false,
            } => self.flash = None,
            Notification::GameOver {
                new_high_score: true,
            } => {
                let text = if self.save_high_score() {
                    "New high score!"
                } else {
                    "New high score! (not saved)"
                };
                self.flash = Some(Flash::new(String::from(text)));
            }
        }
    }

    /// Write the high score to disk.  Returns `false` if it isn't being
    /// persisted.
    fn save_high_score(&mut self) -> bool {
        if !self.store.is_persistent() {
            return false;
        }
        match self.store.save(self.game.high_score()) {
            Ok(()) => {
                log::info!("Saved high score {}", self.game.high_score());
                true
            }
            Err(e) => {
                log::warn!(
                    "{}; high score will only be kept in memory",
                    error_chain(&e)
                );
                self.store.disable();
                false
            }
        }
    }
}

impl<R> App<R> {
    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self.screen(), frame.area()))?;
        Ok(())
    }

    fn screen(&self) -> Screen<'_> {
        let snapshot = self.game.snapshot();
        Screen {
            snapshot,
            pause_menu: (snapshot.state == GameState::Paused).then_some(self.pause_menu),
            flash: self.flash.as_ref().map(|f| f.text.as_str()),
        }
    }
}

/// A message shown for a limited number of ticks
#[derive(Clone, Debug, Eq, PartialEq)]
struct Flash {
    text: String,
    ticks_left: u8,
}

impl Flash {
    fn new(text: String) -> Flash {
        Flash {
            text,
            ticks_left: consts::FLASH_TICKS,
        }
    }
}
