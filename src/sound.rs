use crate::game::Notification;
use enum_map::{enum_map, Enum, EnumMap};
use std::io::{self, Write};

/// Sound effects, played by ringing the terminal bell
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Bell {
    /// How many times to ring for each kind of event
    rings: EnumMap<Chime, usize>,
}

impl Bell {
    pub(crate) fn ring<W: Write>(&self, event: Notification, out: &mut W) -> io::Result<()> {
        let n = self.rings[Chime::from(event)];
        if n > 0 {
            out.write_all(&b"\x07".repeat(n))?;
            out.flush()?;
        }
        Ok(())
    }
}

impl Default for Bell {
    fn default() -> Bell {
        Bell {
            rings: enum_map! {
                Chime::Food => 1,
                Chime::LevelUp => 2,
                Chime::GameOver => 1,
                Chime::HighScore => 3,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
enum Chime {
    Food,
    LevelUp,
    GameOver,
    HighScore,
}

impl From<Notification> for Chime {
    fn from(event: Notification) -> Chime {
        match event {
            Notification::FoodEaten => Chime::Food,
            Notification::LevelUp(_) => Chime::LevelUp,
            Notification::GameOver {
                new_high_score: false,
            } => Chime::GameOver,
            Notification::GameOver {
                new_high_score: true,
            } => Chime::HighScore,
        }
    }
}
