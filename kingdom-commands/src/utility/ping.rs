use kingdom_core::{Context, Error};

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Check that the bot is alive.",
    category: "utility",
    usage: "!ping",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("Pong! The kingdom stands.").await?;
    Ok(())
}
