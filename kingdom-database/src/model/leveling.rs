use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Accent color members get on their rank embed before picking their own.
pub const DEFAULT_CARD_COLOR: &str = "#5865F2";

/// Announcement template; `{user}` and `{level}` are filled in at send time.
pub const DEFAULT_LEVEL_UP_MESSAGE: &str = "🎉 {user} leveled up to **Level {level}**!";

/// A member's standing in one guild's ladder.
#[derive(Clone, Debug)]
pub struct MemberLevel {
    pub user_id: u64,
    pub xp: u64,
    pub level: u64,
    pub messages: u64,
    pub total_xp: u64,
    pub card_color: Option<String>,
}

/// One leaderboard row, ordered by XP descending.
#[derive(Clone, Copy, Debug)]
pub struct LeaderboardEntry {
    pub rank: u64,
    pub user_id: u64,
    pub xp: u64,
    pub level: u64,
    pub messages: u64,
}

/// Outcome of an XP write against a member row.
#[derive(Clone, Copy, Debug)]
pub struct XpAward {
    pub xp: u64,
    pub total_xp: u64,
    pub old_level: u64,
    pub new_level: u64,
}

impl XpAward {
    /// Whether this write pushed the member over a level threshold.
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.old_level
    }
}

/// A role granted when members reach `level`.
#[derive(Clone, Copy, Debug)]
pub struct LevelRoleReward {
    pub level: u64,
    pub role_id: u64,
}

/// Per-guild leveling configuration.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LevelingConfig {
    pub guild_id: i64,
    pub enabled: bool,
    pub xp_rate: f64,
    pub xp_min: i64,
    pub xp_max: i64,
    pub cooldown_seconds: i64,
    pub announce_level_up: bool,
    pub announce_channel_id: Option<i64>,
    pub level_up_message: String,
    pub no_xp_channels: Vec<i64>,
    pub no_xp_roles: Vec<i64>,
    pub double_xp_roles: Vec<i64>,
    pub stack_level_roles: bool,
}

impl LevelingConfig {
    /// What a guild runs on before it ever saves a config row.
    pub fn default_for(guild_id: u64) -> Self {
        Self {
            guild_id: guild_id as i64,
            enabled: true,
            xp_rate: 1.0,
            xp_min: 15,
            xp_max: 25,
            cooldown_seconds: 60,
            announce_level_up: true,
            announce_channel_id: None,
            level_up_message: DEFAULT_LEVEL_UP_MESSAGE.to_owned(),
            no_xp_channels: Vec::new(),
            no_xp_roles: Vec::new(),
            double_xp_roles: Vec::new(),
            stack_level_roles: false,
        }
    }

    /// Inclusive roll bounds for a message award. Hand-edited rows with
    /// negative or inverted bounds collapse to something still rollable.
    pub fn xp_roll_bounds(&self) -> (u64, u64) {
        let min = self.xp_min.max(0) as u64;
        let max = self.xp_max.max(self.xp_min).max(0) as u64;
        (min, max)
    }

    pub fn is_no_xp_channel(&self, channel_id: u64) -> bool {
        self.no_xp_channels.iter().any(|&id| id as u64 == channel_id)
    }

    pub fn is_no_xp_role(&self, role_id: u64) -> bool {
        self.no_xp_roles.iter().any(|&id| id as u64 == role_id)
    }

    pub fn is_double_xp_role(&self, role_id: u64) -> bool {
        self.double_xp_roles.iter().any(|&id| id as u64 == role_id)
    }
}

#[cfg(test)]
mod tests {
    use super::LevelingConfig;

    #[test]
    fn default_roll_bounds_are_fifteen_to_twenty_five() {
        let config = LevelingConfig::default_for(1);
        assert_eq!(config.xp_roll_bounds(), (15, 25));
    }

    #[test]
    fn inverted_or_negative_bounds_collapse() {
        let mut config = LevelingConfig::default_for(1);
        config.xp_min = 30;
        config.xp_max = 10;
        assert_eq!(config.xp_roll_bounds(), (30, 30));

        config.xp_min = -5;
        config.xp_max = -1;
        assert_eq!(config.xp_roll_bounds(), (0, 0));
    }
}
