/// Embed accent color shared across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x58_65_F2;
