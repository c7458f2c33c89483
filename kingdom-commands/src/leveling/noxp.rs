use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::leveling::embeds::guild_only_message;
use kingdom_core::{Context, Error};
use kingdom_database::impls::leveling_config::{
    add_no_xp_channel, add_no_xp_role, get_leveling_config, remove_no_xp_channel,
    remove_no_xp_role,
};
use kingdom_utils::embed::DEFAULT_EMBED_COLOR;
use kingdom_utils::parse::{parse_channel_id, parse_role_id};
use kingdom_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "noxp",
    desc: "Manage channels and roles that never earn XP.",
    category: "leveling",
    usage: "!noxp <addchannel|removechannel|addrole|removerole>",
};

/// Manage channels and roles that never earn XP.
#[poise::command(
    prefix_command,
    slash_command,
    category = "Leveling",
    subcommands("addchannel", "removechannel", "addrole", "removerole")
)]
pub async fn noxp(ctx: Context<'_>) -> Result<(), Error> {
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

    let channels_block = if config.no_xp_channels.is_empty() {
        "None".to_owned()
    } else {
        config
            .no_xp_channels
            .iter()
            .map(|id| format!("<#{}>", id))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let roles_block = if config.no_xp_roles.is_empty() {
        "None".to_owned()
    } else {
        config
            .no_xp_roles
            .iter()
            .map(|id| format!("<@&{}>", id))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let embed = serenity::CreateEmbed::new()
        .title("No-XP Lists")
        .description(format!(
            "**Channels :** {}\n**Roles :** {}",
            channels_block, roles_block
        ))
        .color(DEFAULT_EMBED_COLOR)
        .footer(serenity::CreateEmbedFooter::new(
            "Subcommands: addchannel, removechannel, addrole, removerole",
        ));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Stop a channel from granting XP.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn addchannel(
    ctx: Context<'_>,
    #[description = "Channel mention or id"]
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

    let Some(channel_id) = input.as_deref().and_then(parse_channel_id) else {
        ctx.say("Usage: `!noxp addchannel <#channel>`").await?;
        return Ok(());
    };

    if add_no_xp_channel(&ctx.data().db, guild_id.get(), channel_id).await? {
        ctx.say(format!("<#{}> no longer grants XP.", channel_id))
            .await?;
    } else {
        ctx.say(format!("<#{}> is already on the no-XP list.", channel_id))
            .await?;
    }

    Ok(())
}

/// Let a channel grant XP again.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn removechannel(
    ctx: Context<'_>,
    #[description = "Channel mention or id"]
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

    let Some(channel_id) = input.as_deref().and_then(parse_channel_id) else {
        ctx.say("Usage: `!noxp removechannel <#channel>`").await?;
        return Ok(());
    };

    if remove_no_xp_channel(&ctx.data().db, guild_id.get(), channel_id).await? {
        ctx.say(format!("<#{}> grants XP again.", channel_id))
            .await?;
    } else {
        ctx.say(format!("<#{}> was not on the no-XP list.", channel_id))
            .await?;
    }

    Ok(())
}

/// Stop members with a role from earning XP.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn addrole(
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
        ctx.say("Usage: `!noxp addrole <@role>`").await?;
        return Ok(());
    };

    if add_no_xp_role(&ctx.data().db, guild_id.get(), role_id).await? {
        ctx.say(format!("Members with <@&{}> no longer earn XP.", role_id))
            .await?;
    } else {
        ctx.say(format!("<@&{}> is already on the no-XP list.", role_id))
            .await?;
    }

    Ok(())
}

/// Let members with a role earn XP again.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn removerole(
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
        ctx.say("Usage: `!noxp removerole <@role>`").await?;
        return Ok(());
    };

    if remove_no_xp_role(&ctx.data().db, guild_id.get(), role_id).await? {
        ctx.say(format!("Members with <@&{}> earn XP again.", role_id))
            .await?;
    } else {
        ctx.say(format!("<@&{}> was not on the no-XP list.", role_id))
            .await?;
    }

    Ok(())
}
