pub mod help;
pub mod ping;
pub mod usage;

pub(crate) mod embeds;
