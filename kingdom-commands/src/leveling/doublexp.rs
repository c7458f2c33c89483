use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::leveling::embeds::guild_only_message;
use kingdom_core::{Context, Error};
use kingdom_database::impls::leveling_config::{
    add_double_xp_role, get_leveling_config, remove_double_xp_role,
};
use kingdom_utils::embed::DEFAULT_EMBED_COLOR;
use kingdom_utils::parse::parse_role_id;
use kingdom_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "doublexp",
    desc: "Manage roles that earn double XP.",
    category: "leveling",
    usage: "!doublexp <add|remove>",
};

/// Manage roles that earn double XP.
#[poise::command(
    prefix_command,
    slash_command,
    category = "Leveling",
    subcommands("add", "remove")
)]
pub async fn doublexp(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MANAGE_GUILD,
    )
    .await?
    {
        return Ok(());
    }

    let config = get_leveling_config(&ctx.data().db, guild_id.get()).await?;

    let roles_block = if config.double_xp_roles.is_empty() {
        "None".to_owned()
    } else {
        config
            .double_xp_roles
            .iter()
            .map(|id| format!("<@&{}>", id))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let embed = serenity::CreateEmbed::new()
        .title("Double-XP Roles")
        .description(format!("**Roles :** {}", roles_block))
        .color(DEFAULT_EMBED_COLOR)
        .footer(serenity::CreateEmbedFooter::new(
            "Subcommands: add <role>, remove <role>",
        ));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Grant a role double XP on every award.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Role mention or id"]
    #[rest]
    input: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MANAGE_GUILD,
    )
    .await?
    {
        return Ok(());
    }

    let Some(role_id) = input.as_deref().and_then(parse_role_id) else {
        ctx.say("Usage: `!doublexp add <@role>`").await?;
        return Ok(());
    };

    if add_double_xp_role(&ctx.data().db, guild_id.get(), role_id).await? {
        ctx.say(format!("Members with <@&{}> now earn **double XP**.", role_id))
            .await?;
    } else {
        ctx.say(format!("<@&{}> already earns double XP.", role_id))
            .await?;
    }

    Ok(())
}

/// Remove a role's double XP bonus.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Role mention or id"]
    #[rest]
    input: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MANAGE_GUILD,
    )
    .await?
    {
        return Ok(());
    }

    let Some(role_id) = input.as_deref().and_then(parse_role_id) else {
        ctx.say("Usage: `!doublexp remove <@role>`").await?;
        return Ok(());
    };

    if remove_double_xp_role(&ctx.data().db, guild_id.get(), role_id).await? {
        ctx.say(format!("<@&{}> no longer earns double XP.", role_id))
            .await?;
    } else {
        ctx.say(format!("<@&{}> was not earning double XP.", role_id))
            .await?;
    }

    Ok(())
}
