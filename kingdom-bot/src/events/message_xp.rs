use poise::serenity_prelude as serenity;
use rand::Rng;
use tracing::{error, warn};

use kingdom_core::Data;
use kingdom_database::impls::level_roles::rewards_up_to;
use kingdom_database::impls::leveling::{award_message_xp, scale_message_xp};
use kingdom_database::impls::leveling_config::get_leveling_config_if_enabled;
use kingdom_database::model::leveling::{LevelingConfig, XpAward};
use kingdom_utils::formatting::format_level_up_message;

/// Award XP for an incoming guild message and handle any resulting level-up:
/// the announcement and the level role sync.
pub async fn handle_message_xp(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
) {
    // Ignore bots and webhooks.
    if message.author.bot || message.webhook_id.is_some() {
        return;
    }

    let Some(guild_id) = message.guild_id else {
        return;
    };

    // Check if leveling is enabled for this guild.
    let config = match get_leveling_config_if_enabled(&data.db, guild_id.get()).await {
        Ok(Some(cfg)) => cfg,
        Ok(None) => return,
        Err(source) => {
            error!(?source, "failed to read leveling config");
            return;
        }
    };

    if config.is_no_xp_channel(message.channel_id.get()) {
        return;
    }

    // Gateway message events carry the author's roles on the partial member.
    let roles = member_role_ids(message);
    if roles.iter().any(|role| config.is_no_xp_role(role.get())) {
        return;
    }
    let double_xp = roles.iter().any(|role| config.is_double_xp_role(role.get()));

    let (min, max) = config.xp_roll_bounds();
    let roll = rand::thread_rng().gen_range(min..=max);
    let amount = scale_message_xp(roll, config.xp_rate, double_xp);

    let cooldown_seconds = config.cooldown_seconds.max(0) as u64;
    let award = match award_message_xp(
        &data.db,
        guild_id.get(),
        message.author.id.get(),
        amount,
        cooldown_seconds,
    )
    .await
    {
        Ok(Some(award)) => award,
        // Still on cooldown; the message earns nothing.
        Ok(None) => return,
        Err(source) => {
            error!(?source, "failed to award message XP");
            return;
        }
    };

    if !award.leveled_up() {
        return;
    }

    if config.announce_level_up {
        announce_level_up(ctx, &config, message, award.new_level).await;
    }

    sync_level_roles(ctx, data, guild_id, message, &config, &award).await;
}

async fn announce_level_up(
    ctx: &serenity::Context,
    config: &LevelingConfig,
    message: &serenity::Message,
    new_level: u64,
) {
    let channel_id = match config.announce_channel_id {
        Some(id) if id > 0 => serenity::ChannelId::new(id as u64),
        _ => message.channel_id,
    };

    let mention = format!("<@{}>", message.author.id.get());
    let content = format_level_up_message(&config.level_up_message, &mention, new_level);

    if let Err(source) = channel_id
        .send_message(&ctx.http, serenity::CreateMessage::new().content(content))
        .await
    {
        warn!(?source, "failed to send level-up announcement");
    }
}

/// Bring the member's reward roles in line with their new level.
///
/// In stack mode every reward at or below the new level is granted. In
/// replace mode only the highest earned reward is kept and lower reward
/// roles the member still holds are taken away.
async fn sync_level_roles(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: serenity::GuildId,
    message: &serenity::Message,
    config: &LevelingConfig,
    award: &XpAward,
) {
    let rewards = match rewards_up_to(&data.db, guild_id.get(), award.new_level).await {
        Ok(rewards) => rewards,
        Err(source) => {
            error!(?source, "failed to load level role rewards");
            return;
        }
    };

    let Some(highest) = rewards.last().copied() else {
        return;
    };

    let roles = member_role_ids(message);
    let has_role = |role_id: u64| roles.iter().any(|role| role.get() == role_id);
    let user_id = message.author.id;

    if config.stack_level_roles {
        for reward in &rewards {
            if !has_role(reward.role_id) {
                grant_reward_role(ctx, guild_id, user_id, reward.role_id).await;
            }
        }
        return;
    }

    if !has_role(highest.role_id) {
        grant_reward_role(ctx, guild_id, user_id, highest.role_id).await;
    }

    for reward in &rewards {
        if reward.role_id != highest.role_id && has_role(reward.role_id) {
            if let Err(source) = ctx
                .http
                .remove_member_role(
                    guild_id,
                    user_id,
                    serenity::RoleId::new(reward.role_id),
                    Some("Outgrown level role reward"),
                )
                .await
            {
                warn!(
                    role_id = reward.role_id,
                    ?source,
                    "failed to remove outgrown level role"
                );
            }
        }
    }
}

async fn grant_reward_role(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    role_id: u64,
) {
    if let Err(source) = ctx
        .http
        .add_member_role(
            guild_id,
            user_id,
            serenity::RoleId::new(role_id),
            Some("Level role reward"),
        )
        .await
    {
        warn!(
            role_id,
            ?source,
            "failed to grant level role reward (check role hierarchy)"
        );
    }
}

fn member_role_ids(message: &serenity::Message) -> &[serenity::RoleId] {
    message
        .member
        .as_deref()
        .map(|member| member.roles.as_slice())
        .unwrap_or(&[])
}
