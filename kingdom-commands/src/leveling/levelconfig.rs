use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::leveling::embeds::guild_only_message;
use kingdom_core::{Context, Error};
use kingdom_database::impls::leveling_config::{
    get_leveling_config, set_announce_channel, set_announce_level_up, set_level_up_message,
    set_leveling_enabled, set_xp_cooldown, set_xp_range, set_xp_rate,
};
use kingdom_utils::embed::DEFAULT_EMBED_COLOR;
use kingdom_utils::formatting::format_compact_duration;
use kingdom_utils::parse::{parse_channel_id, parse_duration_seconds};
use kingdom_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "levelconfig",
    desc: "Configure how members earn XP and level up.",
    category: "leveling",
    usage: "!levelconfig <enable|disable|rate|range|cooldown|announce|channel|message>",
};

const MAX_TEMPLATE_LENGTH: usize = 500;

/// Configure how members earn XP and level up.
#[poise::command(
    prefix_command,
    slash_command,
    category = "Leveling",
    subcommands(
        "enable",
        "disable",
        "rate",
        "range",
        "cooldown",
        "announce",
        "channel",
        "message"
    )
)]
pub async fn levelconfig(ctx: Context<'_>) -> Result<(), Error> {
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

    let status = if config.enabled { "Enabled" } else { "Disabled" };
    let announce = if config.announce_level_up { "On" } else { "Off" };
    let announce_channel = match config.announce_channel_id {
        Some(channel_id) => format!("<#{}>", channel_id),
        None => "Same channel as the message".to_owned(),
    };
    let (roll_min, roll_max) = config.xp_roll_bounds();

    let embed = serenity::CreateEmbed::new()
        .title("Leveling Config")
        .description(format!(
            "**Status :** {}\n\
             **XP Per Message :** {}-{}\n\
             **XP Rate :** {:.2}x\n\
             **Cooldown :** {}\n\
             **Announcements :** {}\n\
             **Announce Channel :** {}\n\
             **Level-Up Message :** {}\n\
             **No-XP Channels :** {}\n\
             **No-XP Roles :** {}\n\
             **Double-XP Roles :** {}\n\
             **Stack Level Roles :** {}",
            status,
            roll_min,
            roll_max,
            config.xp_rate,
            format_compact_duration(config.cooldown_seconds.max(0) as u64),
            announce,
            announce_channel,
            config.level_up_message.replace('@', "@\u{200B}"),
            config.no_xp_channels.len(),
            config.no_xp_roles.len(),
            config.double_xp_roles.len(),
            if config.stack_level_roles { "Yes" } else { "No" },
        ))
        .color(DEFAULT_EMBED_COLOR)
        .footer(serenity::CreateEmbedFooter::new(
            "Subcommands: enable, disable, rate, range, cooldown, announce, channel, message",
        ));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Turn leveling on for this server.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn enable(ctx: Context<'_>) -> Result<(), Error> {
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

    set_leveling_enabled(&ctx.data().db, guild_id.get(), true).await?;
    ctx.say("Leveling has been **enabled**.").await?;

    Ok(())
}

/// Turn leveling off for this server.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn disable(ctx: Context<'_>) -> Result<(), Error> {
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

    set_leveling_enabled(&ctx.data().db, guild_id.get(), false).await?;
    ctx.say("Leveling has been **disabled**.").await?;

    Ok(())
}

/// Set the XP multiplier applied to every award.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn rate(
    ctx: Context<'_>,
    #[description = "Multiplier between 0.1 and 10"]
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

    let Some(raw) = input.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        ctx.say("Usage: `!levelconfig rate <multiplier>` (e.g. `1.5`)")
            .await?;
        return Ok(());
    };

    let Ok(rate) = raw.parse::<f64>() else {
        ctx.say("Invalid number. Usage: `!levelconfig rate <multiplier>` (e.g. `0.5`, `2`)")
            .await?;
        return Ok(());
    };

    if !rate.is_finite() || !(0.1..=10.0).contains(&rate) {
        ctx.say("Rate must be between 0.1 and 10.").await?;
        return Ok(());
    }

    set_xp_rate(&ctx.data().db, guild_id.get(), rate).await?;
    ctx.say(format!("XP rate set to **{:.2}x**.", rate)).await?;

    Ok(())
}

/// Set the random XP range rolled per message.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn range(
    ctx: Context<'_>,
    #[description = "Minimum XP per message"] min: Option<String>,
    #[description = "Maximum XP per message"] max: Option<String>,
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

    let parsed_min = min.as_deref().map(str::trim).and_then(|s| s.parse::<u64>().ok());
    let parsed_max = max.as_deref().map(str::trim).and_then(|s| s.parse::<u64>().ok());
    let (Some(min), Some(max)) = (parsed_min, parsed_max) else {
        ctx.say("Usage: `!levelconfig range <min> <max>` (e.g. `15 25`)")
            .await?;
        return Ok(());
    };

    if !(1..=1000).contains(&min) || !(1..=1000).contains(&max) {
        ctx.say("Both bounds must be between 1 and 1000.").await?;
        return Ok(());
    }

    if min > max {
        ctx.say("Minimum cannot be above maximum.").await?;
        return Ok(());
    }

    set_xp_range(&ctx.data().db, guild_id.get(), min, max).await?;
    ctx.say(format!(
        "Messages now roll between **{}** and **{}** XP.",
        min, max
    ))
    .await?;

    Ok(())
}

/// Set how long members wait between XP awards.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn cooldown(
    ctx: Context<'_>,
    #[description = "Duration (e.g. 60s, 2m) or 0 to disable"]
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

    let Some(raw) = input.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        ctx.say("Usage: `!levelconfig cooldown <duration>` (e.g. `60s`, `2m`, `0`)")
            .await?;
        return Ok(());
    };

    let seconds = if raw == "0" {
        Some(0)
    } else {
        parse_duration_seconds(raw)
    };

    let Some(seconds) = seconds.filter(|value| *value <= 86_400) else {
        ctx.say("Invalid cooldown. Examples: `0`, `30s`, `2m`, `1h` (max `1d`)")
            .await?;
        return Ok(());
    };

    set_xp_cooldown(&ctx.data().db, guild_id.get(), seconds).await?;
    if seconds == 0 {
        ctx.say("XP cooldown **disabled**. Every message can earn XP.")
            .await?;
    } else {
        ctx.say(format!(
            "XP cooldown set to **{}**.",
            format_compact_duration(seconds)
        ))
        .await?;
    }

    Ok(())
}

/// Toggle level-up announcements.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn announce(
    ctx: Context<'_>,
    #[description = "`on` or `off`"]
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
    let announce = match choice.as_deref() {
        Some("on") | Some("true") | Some("yes") => true,
        Some("off") | Some("false") | Some("no") => false,
        _ => {
            ctx.say("Usage: `!levelconfig announce <on|off>`").await?;
            return Ok(());
        }
    };

    set_announce_level_up(&ctx.data().db, guild_id.get(), announce).await?;
    if announce {
        ctx.say("Level-up announcements are **on**.").await?;
    } else {
        ctx.say("Level-up announcements are **off**.").await?;
    }

    Ok(())
}

/// Route announcements to a fixed channel, or clear to announce in place.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn channel(
    ctx: Context<'_>,
    #[description = "Channel mention/id, or 'clear'"]
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

    let Some(input) = input.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        ctx.say("Usage: `!levelconfig channel <#channel|clear>`")
            .await?;
        return Ok(());
    };

    if input.eq_ignore_ascii_case("clear") {
        set_announce_channel(&ctx.data().db, guild_id.get(), None).await?;
        ctx.say("Level-ups will be announced in the channel where they happen.")
            .await?;
        return Ok(());
    }

    let Some(channel_id) = parse_channel_id(input) else {
        ctx.say("Provide a valid channel mention/id, or `clear`.")
            .await?;
        return Ok(());
    };

    set_announce_channel(&ctx.data().db, guild_id.get(), Some(channel_id)).await?;
    ctx.say(format!("Level-ups will be announced in <#{}>.", channel_id))
        .await?;

    Ok(())
}

/// Set the level-up announcement template.
#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn message(
    ctx: Context<'_>,
    #[description = "Template; {user} and {level} are substituted"]
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

    let Some(template) = input.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        ctx.say(
            "Usage: `!levelconfig message <template>`\n\
             Placeholders: `{user}` mentions the member, `{level}` is the new level.",
        )
        .await?;
        return Ok(());
    };

    if template.chars().count() > MAX_TEMPLATE_LENGTH {
        ctx.say(format!(
            "Template is too long (max {} characters).",
            MAX_TEMPLATE_LENGTH
        ))
        .await?;
        return Ok(());
    }

    set_level_up_message(&ctx.data().db, guild_id.get(), template).await?;
    ctx.say("Level-up message updated.").await?;

    Ok(())
}
