use crate::CommandMeta;
use crate::leveling::embeds::guild_only_message;
use kingdom_core::{Context, Error};
use kingdom_database::impls::leveling::{clear_card_color, set_card_color};
use kingdom_database::model::leveling::DEFAULT_CARD_COLOR;
use kingdom_utils::parse::parse_hex_color;

pub const META: CommandMeta = CommandMeta {
    name: "rankcard",
    desc: "Personalize your rank card.",
    category: "leveling",
    usage: "!rankcard <color|reset>",
};

/// Personalize your rank card.
#[poise::command(
    prefix_command,
    slash_command,
    category = "Leveling",
    subcommands("color", "reset")
)]
pub async fn rankcard(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(
        "Usage:\n\
         `!rankcard color <hex>` — set your rank card accent (e.g. `#FF5733`)\n\
         `!rankcard reset` — go back to the default accent",
    )
    .await?;

    Ok(())
}

/// Set your rank card accent color.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn color(
    ctx: Context<'_>,
    #[description = "Hex color like #FF5733"]
    #[rest]
    input: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let Some(raw) = input.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        ctx.say("Usage: `!rankcard color <hex>` (e.g. `#FF5733`)")
            .await?;
        return Ok(());
    };

    let Some(value) = parse_hex_color(raw) else {
        ctx.say("Invalid color. Use a six-digit hex code like `#FF5733`.")
            .await?;
        return Ok(());
    };

    let normalized = format!("#{:06X}", value);
    set_card_color(&ctx.data().db, guild_id.get(), ctx.author().id.get(), &normalized).await?;
    ctx.say(format!("Rank card color set to **{}**.", normalized))
        .await?;

    Ok(())
}

/// Reset your rank card accent to the default.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn reset(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if clear_card_color(&ctx.data().db, guild_id.get(), ctx.author().id.get()).await? {
        ctx.say(format!(
            "Rank card color reset to the default **{}**.",
            DEFAULT_CARD_COLOR
        ))
        .await?;
    } else {
        ctx.say("You haven't set a custom rank card color.").await?;
    }

    Ok(())
}
