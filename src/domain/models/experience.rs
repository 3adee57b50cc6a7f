//! Experience and leveling model.
//!
//! Levels follow a quadratic curve: reaching level `n` takes `n^2 * 100` XP,
//! so each level costs proportionally more than the last.

use serde::{Deserialize, Serialize};

/// XP required per unit of the squared level.
pub const XP_PER_LEVEL_UNIT: u64 = 100;

/// Level derived from a cumulative XP total: `floor(sqrt(xp / 100))`.
pub fn level_for_xp(xp: u64) -> u32 {
    let units = xp / XP_PER_LEVEL_UNIT;
    // Integer square root; f64 sqrt can be off by one for large inputs.
    let mut level = (units as f64).sqrt() as u64;
    while level * level > units {
        level -= 1;
    }
    while (level + 1) * (level + 1) <= units {
        level += 1;
    }
    level as u32
}

/// Total XP at which `level + 1` is reached: `(level + 1)^2 * 100`.
///
/// Saturates at `u64::MAX` for levels whose threshold does not fit.
pub fn xp_for_next_level(level: u32) -> u64 {
    level_threshold(u64::from(level) + 1)
}

fn level_threshold(level: u64) -> u64 {
    level.saturating_mul(level).saturating_mul(XP_PER_LEVEL_UNIT)
}

/// Highest level reachable with a `u64` XP total.
pub const MAX_LEVEL: u32 = 429_496_729;

/// A user's cumulative experience and derived level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub user_id: i64,
    pub current_xp: u64,
    pub level: u32,
}

impl ExperienceRecord {
    /// Zero-initialised record for a user with no XP yet.
    pub const fn new(user_id: i64) -> Self {
        Self {
            user_id,
            current_xp: 0,
            level: 0,
        }
    }

    /// Build a record from an XP total, deriving the level.
    pub fn from_xp(user_id: i64, current_xp: u64) -> Self {
        Self {
            user_id,
            current_xp,
            level: level_for_xp(current_xp),
        }
    }

    /// XP earned since the current level was reached, and XP still needed
    /// for the next one.
    pub fn progress_to_next_level(&self) -> (u64, u64) {
        let floor = level_threshold(u64::from(self.level));
        let next = xp_for_next_level(self.level);
        (
            self.current_xp.saturating_sub(floor),
            next.saturating_sub(self.current_xp),
        )
    }
}
