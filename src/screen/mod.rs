//! Drawing the game on the terminal.  Everything here reads a
//! [`Snapshot`]; nothing changes the game.
mod paused;
pub(crate) use self::paused::{PauseMenu, PauseOpt};
use crate::consts;
use crate::game::{Cell, GameState, Heading, Snapshot};
use crate::util::{center_rect, get_display_area};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Position, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
};

/// Everything shown on the game screen
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Screen<'a> {
    pub(crate) snapshot: Snapshot<'a>,

    /// The pause menu, shown while paused
    pub(crate) pause_menu: Option<PauseMenu>,

    /// A short message about something that just happened
    pub(crate) flash: Option<&'a str>,
}

impl Screen<'_> {
    fn status_line(&self) -> Line<'static> {
        let snap = &self.snapshot;
        Line::styled(
            format!(
                " Score: {}   Level: {}   High: {}   Speed: {}ms   Sound: {}",
                snap.score,
                snap.level,
                snap.high_score,
                snap.speed.as_millis(),
                if snap.sound { "on" } else { "off" },
            ),
            consts::STATUS_BAR_STYLE,
        )
    }

    fn message_line(&self) -> Line<'_> {
        match self.snapshot.state {
            GameState::Ready => Line::from_iter([
                Span::raw(" Press "),
                Span::styled("←↓↑→", consts::KEY_STYLE),
                Span::raw(" or "),
                Span::styled("Space", consts::KEY_STYLE),
                Span::raw(" to start — Sound ("),
                Span::styled("m", consts::KEY_STYLE),
                Span::raw(") — Quit ("),
                Span::styled("q", consts::KEY_STYLE),
                Span::raw(")"),
            ]),
            GameState::Playing => match self.flash {
                Some(text) => Line::from_iter([
                    Span::raw(" "),
                    Span::styled(text, consts::FLASH_STYLE),
                ]),
                None => Line::from_iter([
                    Span::raw(" Pause ("),
                    Span::styled("p", consts::KEY_STYLE),
                    Span::raw(") — Sound ("),
                    Span::styled("m", consts::KEY_STYLE),
                    Span::raw(")"),
                ]),
            },
            GameState::Paused => Line::default(),
            GameState::GameOver => {
                let mut line = Line::raw(" — GAME OVER — ");
                if let Some(text) = self.flash {
                    line.push_span(Span::styled(text, consts::FLASH_STYLE));
                    line.push_span(" — ");
                }
                line.push_span("Restart (");
                line.push_span(Span::styled("r", consts::KEY_STYLE));
                line.push_span(") — Quit (");
                line.push_span(Span::styled("q", consts::KEY_STYLE));
                line.push_span(")");
                line
            }
        }
    }
}

impl Widget for Screen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [status_area, board_area, msg_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(display);
        self.status_line().render(status_area, buf);

        let snap = &self.snapshot;
        let side = snap.board.size();
        let block_size = Size {
            width: side.saturating_mul(consts::CELL_WIDTH).saturating_add(2),
            height: side.saturating_add(2),
        };
        let block_area = center_rect(board_area, block_size);
        Block::bordered().render(block_area, buf);

        let mut board = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        if let Some(food) = snap.food {
            board.draw_cell(food, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
        }
        for cell in snap.snake.body() {
            board.draw_cell(cell, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        board.draw_cell(
            snap.snake.head(),
            head_symbol(snap.snake.heading()),
            consts::SNAKE_STYLE,
        );
        // Drawn last so that it covers whatever the snake ran into
        if let Some(cell) = snap.collision {
            board.draw_cell(cell, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
        }

        self.message_line().render(msg_area, buf);

        if let Some(menu) = self.pause_menu {
            let menu_area = center_rect(
                display,
                Size {
                    width: PauseMenu::WIDTH,
                    height: PauseMenu::HEIGHT,
                },
            );
            menu.render(menu_area, buf);
        }
    }
}

/// Return the glyph to use for drawing the snake's head
fn head_symbol(heading: Option<Heading>) -> char {
    match heading {
        Some(Heading::Up) => consts::SNAKE_HEAD_NORTH_SYMBOL,
        Some(Heading::Down) => consts::SNAKE_HEAD_SOUTH_SYMBOL,
        Some(Heading::Right) => consts::SNAKE_HEAD_EAST_SYMBOL,
        Some(Heading::Left) => consts::SNAKE_HEAD_WEST_SYMBOL,
        None => consts::SNAKE_HEAD_IDLE_SYMBOL,
    }
}

/// The inside of the board's border, addressed in board cells
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_cell(&mut self, cell: Cell, symbol: char, style: Style) {
        let Some(x) = cell
            .x
            .checked_mul(consts::CELL_WIDTH)
            .and_then(|x| self.area.x.checked_add(x))
        else {
            return;
        };
        let Some(y) = self.area.y.checked_add(cell.y) else {
            return;
        };
        if !self.area.contains(Position::new(x, y)) {
            return;
        }
        if let Some(c) = self.buf.cell_mut((x, y)) {
            c.set_char(symbol);
            c.set_style(Style::reset().patch(style));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Game, Input, Progression, Rules};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use ratatui::style::Modifier;
    use std::num::NonZeroU16;
    use std::time::{Duration, Instant};

    const RNG_SEED: u64 = 0x0123456789ABCDEF;
    const AREA: Rect = Rect::new(0, 0, 80, 24);

    fn new_game(size: u16) -> Game<ChaCha12Rng> {
        let rules = Rules {
            board: Board::new(NonZeroU16::new(size).expect("board size should be nonzero")),
            progression: Progression::default(),
        };
        Game::new_with_rng(rules, 17, true, ChaCha12Rng::seed_from_u64(RNG_SEED))
    }

    fn render(screen: Screen<'_>) -> Buffer {
        let mut buffer = Buffer::empty(AREA);
        screen.render(AREA, &mut buffer);
        buffer
    }

    fn row(buffer: &Buffer, y: u16) -> String {
        (0..AREA.width)
            .filter_map(|x| buffer.cell((x, y)))
            .map(ratatui::buffer::Cell::symbol)
            .collect::<String>()
            .trim_end()
            .to_owned()
    }

    fn symbol_at(buffer: &Buffer, x: u16, y: u16) -> &str {
        buffer.cell((x, y)).map_or("", ratatui::buffer::Cell::symbol)
    }

    /// Screen position of a board cell on a 20×20 board
    fn screen_pos(cell: Cell) -> (u16, u16) {
        (20 + 2 * cell.x, 2 + cell.y)
    }

    #[test]
    fn ready_screen() {
        let game = new_game(20);
        let snap = game.snapshot();
        let buffer = render(Screen {
            snapshot: snap,
            pause_menu: None,
            flash: None,
        });
        assert_eq!(
            row(&buffer, 0),
            " Score: 0   Level: 1   High: 17   Speed: 150ms   Sound: on"
        );
        assert_eq!(
            buffer.cell((79, 0)).map(|c| c.modifier),
            Some(Modifier::REVERSED)
        );
        assert_eq!(symbol_at(&buffer, 19, 1), "┌");
        assert_eq!(symbol_at(&buffer, 60, 1), "┐");
        assert_eq!(symbol_at(&buffer, 19, 22), "└");
        assert_eq!(symbol_at(&buffer, 60, 22), "┘");
        assert_eq!(symbol_at(&buffer, 40, 12), "o");
        assert_eq!(
            buffer.cell((40, 12)).map(|c| c.fg),
            consts::SNAKE_STYLE.fg
        );
        let food = snap.food.expect("food should be placed");
        let (fx, fy) = screen_pos(food);
        assert_eq!(symbol_at(&buffer, fx, fy), "●");
        assert_eq!(
            row(&buffer, 23),
            " Press ←↓↑→ or Space to start — Sound (m) — Quit (q)"
        );
    }

    #[test]
    fn playing_screen() {
        let mut game = new_game(20);
        let now = Instant::now();
        game.apply(Input::Turn(Heading::Up), now);
        game.apply(Input::ToggleSound, now);
        game.tick(now + Duration::from_millis(150));
        let snap = game.snapshot();
        let buffer = render(Screen {
            snapshot: snap,
            pause_menu: None,
            flash: None,
        });
        assert_eq!(
            row(&buffer, 0),
            format!(
                " Score: {}   Level: 1   High: 17   Speed: 150ms   Sound: off",
                snap.score
            )
        );
        assert_eq!(symbol_at(&buffer, 40, 11), "v");
        if snap.score == 0 {
            assert_eq!(symbol_at(&buffer, 40, 12), " ");
        } else {
            assert_eq!(symbol_at(&buffer, 40, 12), "⚬");
        }
        assert_eq!(row(&buffer, 23), " Pause (p) — Sound (m)");
    }

    #[test]
    fn flash_while_playing() {
        let mut game = new_game(20);
        game.apply(Input::Start, Instant::now());
        let buffer = render(Screen {
            snapshot: game.snapshot(),
            pause_menu: None,
            flash: Some("Level 2!"),
        });
        assert_eq!(row(&buffer, 23), " Level 2!");
        assert_eq!(
            buffer.cell((1, 23)).map(|c| c.fg),
            consts::FLASH_STYLE.fg
        );
    }

    #[test]
    fn paused_screen() {
        let mut game = new_game(20);
        let now = Instant::now();
        game.apply(Input::Start, now);
        game.apply(Input::Pause, now);
        let buffer = render(Screen {
            snapshot: game.snapshot(),
            pause_menu: Some(PauseMenu::new()),
            flash: None,
        });
        assert!(row(&buffer, 10).contains("PAUSED"));
        assert!(row(&buffer, 11).contains("│ » Resume (Esc) │"));
        assert!(row(&buffer, 12).contains("│   Quit (q)     │"));
        assert_eq!(row(&buffer, 23), "");
    }

    #[test]
    fn game_over_screen() {
        let mut game = new_game(20);
        let mut now = Instant::now();
        game.apply(Input::Turn(Heading::Left), now);
        while game.state() == GameState::Playing {
            now += Duration::from_millis(150);
            game.tick(now);
        }
        let snap = game.snapshot();
        let crash = snap.collision.expect("snake should have crashed");
        assert_eq!(crash.x, 0);
        let buffer = render(Screen {
            snapshot: snap,
            pause_menu: None,
            flash: Some("New high score!"),
        });
        let (cx, cy) = screen_pos(crash);
        assert_eq!(symbol_at(&buffer, cx, cy), "×");
        let crash_cell = buffer.cell((cx, cy)).expect("crash should be on screen");
        assert_eq!(Some(crash_cell.fg), consts::COLLISION_STYLE.fg);
        assert!(crash_cell.modifier.contains(Modifier::REVERSED));
        assert_eq!(
            row(&buffer, 23),
            " — GAME OVER — New high score! — Restart (r) — Quit (q)"
        );
    }

    #[test]
    fn head_symbols() {
        assert_eq!(head_symbol(None), 'o');
        assert_eq!(head_symbol(Some(Heading::Up)), 'v');
        assert_eq!(head_symbol(Some(Heading::Down)), '^');
        assert_eq!(head_symbol(Some(Heading::Left)), '>');
        assert_eq!(head_symbol(Some(Heading::Right)), '<');
    }
}
