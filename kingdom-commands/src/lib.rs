pub mod leveling;
pub mod utility;

use kingdom_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    utility::usage::META,
    leveling::rank::META,
    leveling::leaderboard::META,
    leveling::rankcard::META,
    leveling::xp::META,
    leveling::levelconfig::META,
    leveling::levelroles::META,
    leveling::noxp::META,
    leveling::doublexp::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::help::help(),
        utility::usage::usage(),
        leveling::rank::rank(),
        leveling::leaderboard::leaderboard(),
        leveling::rankcard::rankcard(),
        leveling::xp::xp(),
        leveling::levelconfig::levelconfig(),
        leveling::levelroles::levelroles(),
        leveling::noxp::noxp(),
        leveling::doublexp::doublexp(),
    ]
}
