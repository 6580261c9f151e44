use std::num::NonZeroU32;
use std::time::Duration;

/// How the level and tick interval follow from the score
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Progression {
    /// Points needed to advance one level
    pub(crate) points_per_level: NonZeroU32,

    /// Tick interval at level 1
    pub(crate) initial_speed: Duration,

    /// Amount by which the tick interval shrinks with each level
    pub(crate) speed_increment: Duration,

    /// The shortest allowed tick interval
    pub(crate) min_speed: Duration,
}

impl Progression {
    /// Return the level reached with `score` points.  Levels start at 1.
    pub(crate) fn level_for(&self, score: u32) -> u32 {
        score / self.points_per_level + 1
    }

    /// Return the tick interval for `level`.  This never increases as the
    /// level goes up and never drops below `min_speed`.
    pub(crate) fn speed_for(&self, level: u32) -> Duration {
        self.speed_increment
            .checked_mul(level.saturating_sub(1))
            .map_or(Duration::ZERO, |cut| {
                self.initial_speed.saturating_sub(cut)
            })
            .max(self.min_speed)
    }
}

impl Default for Progression {
    fn default() -> Progression {
        Progression {
            points_per_level: NonZeroU32::new(5).expect("5 should be nonzero"),
            initial_speed: Duration::from_millis(150),
            speed_increment: Duration::from_millis(10),
            min_speed: Duration::from_millis(50),
        }
    }
}
