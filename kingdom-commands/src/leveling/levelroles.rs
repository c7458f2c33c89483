use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::leveling::embeds::guild_only_message;
use kingdom_core::{Context, Error};
use kingdom_database::impls::level_roles::{list_level_roles, remove_level_role, set_level_role};
use kingdom_database::impls::leveling_config::{get_leveling_config, set_stack_level_roles};
use kingdom_utils::embed::DEFAULT_EMBED_COLOR;
use kingdom_utils::parse::parse_role_id;
use kingdom_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "levelroles",
    desc: "Manage roles awarded at level milestones.",
    category: "leveling",
    usage: "!levelroles <set|remove|stack>",
};

const MAX_REWARD_LEVEL: u64 = 500;

/// Manage roles awarded at level milestones.
#[poise::command(
    prefix_command,
    slash_command,
    category = "Leveling",
    subcommands("set", "remove", "stack")
)]
pub async fn levelroles(ctx: Context<'_>) -> Result<(), Error> {
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

    let db = &ctx.data().db;
    let rewards = list_level_roles(db, guild_id.get()).await?;
    let config = get_leveling_config(db, guild_id.get()).await?;

    let rewards_block = if rewards.is_empty() {
        "No level roles configured.".to_owned()
    } else {
        rewards
            .iter()
            .map(|reward| format!("**Level {} :** <@&{}>", reward.level, reward.role_id))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mode = if config.stack_level_roles {
        "Stack (members keep every earned role)"
    } else {
        "Replace (members keep only the highest earned role)"
    };

    let embed = serenity::CreateEmbed::new()
        .title("Level Roles")
        .description(format!("{}\n\n**Mode :** {}", rewards_block, mode))
        .color(DEFAULT_EMBED_COLOR)
        .footer(serenity::CreateEmbedFooter::new(
            "Subcommands: set <level> <role>, remove <level>, stack <on|off>",
        ));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Bind a role reward to a level.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn set(
    ctx: Context<'_>,
    #[description = "Level that earns the role"] level: Option<String>,
    #[description = "Role mention or id"] role: Option<String>,
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

    let parsed_level = level
        .as_deref()
        .map(str::trim)
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|value| (1..=MAX_REWARD_LEVEL).contains(value));
    let parsed_role = role.as_deref().and_then(parse_role_id);

    let (Some(level), Some(role_id)) = (parsed_level, parsed_role) else {
        ctx.say(format!(
            "Usage: `!levelroles set <level> <role>` (level 1-{})",
            MAX_REWARD_LEVEL
        ))
        .await?;
        return Ok(());
    };

    set_level_role(&ctx.data().db, guild_id.get(), level, role_id).await?;
    ctx.say(format!(
        "Members reaching **Level {}** now receive <@&{}>.",
        level, role_id
    ))
    .await?;

    Ok(())
}

/// Remove the role reward bound to a level.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Level to unbind"]
    #[rest]
    level: Option<String>,
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

    let Some(level) = level
        .as_deref()
        .map(str::trim)
        .and_then(|raw| raw.parse::<u64>().ok())
    else {
        ctx.say("Usage: `!levelroles remove <level>`").await?;
        return Ok(());
    };

    if remove_level_role(&ctx.data().db, guild_id.get(), level).await? {
        ctx.say(format!("Removed the role reward for **Level {}**.", level))
            .await?;
    } else {
        ctx.say(format!("No role reward is bound to **Level {}**.", level))
            .await?;
    }

    Ok(())
}

/// Choose whether members keep every earned role or only the highest.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn stack(
    ctx: Context<'_>,
    #[description = "`on` to stack, `off` to keep only the highest"]
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

    let choice = input
        .as_deref()
        .map(str::trim)
        .map(str::to_ascii_lowercase);
    let stack = match choice.as_deref() {
        Some("on") | Some("true") | Some("yes") => true,
        Some("off") | Some("false") | Some("no") => false,
        _ => {
            ctx.say("Usage: `!levelroles stack <on|off>`").await?;
            return Ok(());
        }
    };

    set_stack_level_roles(&ctx.data().db, guild_id.get(), stack).await?;
    if stack {
        ctx.say("Level roles now **stack**: members keep every role they earn.")
            .await?;
    } else {
        ctx.say("Level roles no longer stack: members keep only their **highest** earned role.")
            .await?;
    }

    Ok(())
}
