use std::time::Duration;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::leveling::embeds::{bot_target_message, guild_only_message, usage_message};
use kingdom_core::{Context, Error};
use kingdom_database::impls::leveling::{
    grant_xp, reset_guild_xp, reset_member_xp, set_xp, take_xp,
};
use kingdom_database::model::leveling::XpAward;
use kingdom_utils::confirmation::confirm_or_cancel;
use kingdom_utils::embed::DEFAULT_EMBED_COLOR;
use kingdom_utils::formatting::format_count;
use kingdom_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "xp",
    desc: "Manage member XP (add, remove, set, reset).",
    category: "leveling",
    usage: "!xp <add|remove|set|reset|resetall>",
};

/// Largest amount a single admin operation may move.
const MAX_XP_ADJUSTMENT: u64 = 1_000_000;

const RESET_ALL_TIMEOUT_SECS: u64 = 60;

/// Manage member XP.
#[poise::command(
    prefix_command,
    slash_command,
    category = "Leveling",
    subcommands("add", "remove", "set", "reset", "resetall")
)]
pub async fn xp(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(
        "Usage:\n\
         `!xp add <user> <amount>` — add XP to a member\n\
         `!xp remove <user> <amount>` — remove XP from a member\n\
         `!xp set <user> <amount>` — set a member's XP exactly\n\
         `!xp reset <user>` — reset one member to zero\n\
         `!xp resetall` — wipe the whole server's XP",
    )
    .await?;

    Ok(())
}

/// Add XP to a member.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Member to award XP to"] user: serenity::User,
    #[description = "Amount of XP"] amount: Option<String>,
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

    if user.bot {
        ctx.say(bot_target_message()).await?;
        return Ok(());
    }

    let Some(amount) = parse_xp_amount(amount.as_deref()) else {
        ctx.say(usage_message("!xp add <user> <amount>")).await?;
        return Ok(());
    };

    let award = grant_xp(&ctx.data().db, guild_id.get(), user.id.get(), amount).await?;
    ctx.say(format!(
        "Added **{}** XP to <@{}>. {}",
        format_count(amount),
        user.id.get(),
        standing_line(&award),
    ))
    .await?;

    Ok(())
}

/// Remove XP from a member.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Member to take XP from"] user: serenity::User,
    #[description = "Amount of XP"] amount: Option<String>,
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

    let Some(amount) = parse_xp_amount(amount.as_deref()) else {
        ctx.say(usage_message("!xp remove <user> <amount>")).await?;
        return Ok(());
    };

    let award = take_xp(&ctx.data().db, guild_id.get(), user.id.get(), amount).await?;
    match award {
        Some(award) => {
            ctx.say(format!(
                "Removed **{}** XP from <@{}>. {}",
                format_count(amount),
                user.id.get(),
                standing_line(&award),
            ))
            .await?;
        }
        None => {
            ctx.say(format!("<@{}> has no XP to remove.", user.id.get()))
                .await?;
        }
    }

    Ok(())
}

/// Set a member's XP to an exact amount.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn set(
    ctx: Context<'_>,
    #[description = "Member to adjust"] user: serenity::User,
    #[description = "New XP total"] amount: Option<String>,
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

    if user.bot {
        ctx.say(bot_target_message()).await?;
        return Ok(());
    }

    // `set` additionally allows zero, unlike add/remove.
    let parsed = amount
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|value| *value <= MAX_XP_ADJUSTMENT);
    let Some(amount) = parsed else {
        ctx.say(usage_message("!xp set <user> <amount>")).await?;
        return Ok(());
    };

    let award = set_xp(&ctx.data().db, guild_id.get(), user.id.get(), amount).await?;
    ctx.say(format!(
        "Set <@{}>'s XP to **{}**. {}",
        user.id.get(),
        format_count(amount),
        standing_line(&award),
    ))
    .await?;

    Ok(())
}

/// Reset one member's XP to zero.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn reset(
    ctx: Context<'_>,
    #[description = "Member to reset"] user: serenity::User,
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

    if reset_member_xp(&ctx.data().db, guild_id.get(), user.id.get()).await? {
        ctx.say(format!("Reset <@{}>'s XP to zero.", user.id.get()))
            .await?;
    } else {
        ctx.say(format!("<@{}> has no XP to reset.", user.id.get()))
            .await?;
    }

    Ok(())
}

/// Wipe every member's XP in this server.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn resetall(ctx: Context<'_>) -> Result<(), Error> {
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

    let embed = serenity::CreateEmbed::new()
        .title("Reset all XP?")
        .color(DEFAULT_EMBED_COLOR)
        .description(
            "This deletes **every** member's XP, levels, and message counts \
             in this server. It cannot be undone.",
        );

    let confirmed = confirm_or_cancel(
        ctx,
        "Full XP reset pending confirmation.",
        embed,
        Duration::from_secs(RESET_ALL_TIMEOUT_SECS),
        "Reset timed out. No XP was touched.",
        "Reset cancelled. No XP was touched.",
        "Resetting...",
    )
    .await?;

    if confirmed.is_none() {
        return Ok(());
    }

    let wiped = reset_guild_xp(&ctx.data().db, guild_id.get()).await?;
    ctx.say(format!(
        "Leaderboard wiped. Removed XP for **{}** member(s).",
        format_count(wiped)
    ))
    .await?;

    Ok(())
}

fn parse_xp_amount(raw: Option<&str>) -> Option<u64> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())?
        .parse::<u64>()
        .ok()
        .filter(|value| (1..=MAX_XP_ADJUSTMENT).contains(value))
}

fn standing_line(award: &XpAward) -> String {
    format!(
        "They are now **Level {}** with **{}** XP.",
        award.new_level,
        format_count(award.xp)
    )
}
