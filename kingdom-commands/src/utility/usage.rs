use kingdom_core::{Context, Error};
use kingdom_utils::COMMAND_PREFIX;

use crate::{COMMANDS, CommandMeta};

pub const META: CommandMeta = CommandMeta {
    name: "usage",
    desc: "Look up the usage line for a command.",
    category: "utility",
    usage: "!usage <command>",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn usage(
    ctx: Context<'_>,
    #[description = "Command name"] command: Option<String>,
) -> Result<(), Error> {
    let Some(raw) = command else {
        ctx.say(format!("Usage: `{}`", META.usage)).await?;
        return Ok(());
    };

    let name = raw
        .trim()
        .trim_start_matches(COMMAND_PREFIX)
        .to_ascii_lowercase();

    let reply = match COMMANDS.iter().find(|meta| meta.name == name) {
        Some(meta) => format!("Usage: `{}`", meta.usage),
        None => format!("No command named `{name}`. Try `!help`."),
    };

    ctx.say(reply).await?;
    Ok(())
}
