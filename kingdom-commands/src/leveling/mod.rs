pub mod doublexp;
pub mod leaderboard;
pub mod levelconfig;
pub mod levelroles;
pub mod noxp;
pub mod rank;
pub mod rankcard;
pub mod xp;

pub(crate) mod embeds;
