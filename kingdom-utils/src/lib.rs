/// Shared confirmation prompt helpers.
pub mod confirmation;
/// Shared embed styling.
pub mod embed;
/// Shared formatting helpers (progress bars, counts, templates, durations).
pub mod formatting;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Shared pagination helper utilities.
pub mod pagination;
/// Pure parser helpers.
pub mod parse;
/// Permission helper utilities.
pub mod permissions;
