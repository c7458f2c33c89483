use anyhow::Context as _;

use crate::cache::{CONFIG_CACHE_TTL, invalidate_leveling_config, leveling_config_key};
use crate::database::Database;
use crate::model::leveling::LevelingConfig;

const CONFIG_COLUMNS: &str = "guild_id, enabled, xp_rate, xp_min, xp_max, cooldown_seconds, \
     announce_level_up, announce_channel_id, level_up_message, \
     no_xp_channels, no_xp_roles, double_xp_roles, stack_level_roles";

/// Fetch a guild's leveling config, falling back to defaults when the guild
/// has never saved one. Served from cache on the message hot path.
pub async fn get_leveling_config(db: &Database, guild_id: u64) -> anyhow::Result<LevelingConfig> {
    let cache_key = leveling_config_key(db.cache(), guild_id);
    db.cache()
        .read_json_or_load(&cache_key, CONFIG_CACHE_TTL, || async {
            let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

            let row = sqlx::query_as::<_, LevelingConfig>(&format!(
                "SELECT {CONFIG_COLUMNS} FROM guild_leveling_config WHERE guild_id = $1"
            ))
            .bind(guild_id_i64)
            .fetch_optional(db.pool())
            .await?;

            Ok(row.unwrap_or_else(|| LevelingConfig::default_for(guild_id)))
        })
        .await
}

/// Fetch the config only when leveling is switched on for the guild.
pub async fn get_leveling_config_if_enabled(
    db: &Database,
    guild_id: u64,
) -> anyhow::Result<Option<LevelingConfig>> {
    let config = get_leveling_config(db, guild_id).await?;
    if config.enabled {
        Ok(Some(config))
    } else {
        Ok(None)
    }
}

pub async fn set_leveling_enabled(
    db: &Database,
    guild_id: u64,
    enabled: bool,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO guild_leveling_config (guild_id, enabled)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE SET enabled = EXCLUDED.enabled",
    )
    .bind(guild_id_i64)
    .bind(enabled)
    .execute(db.pool())
    .await?;

    invalidate_leveling_config(db.cache(), guild_id).await?;

    Ok(())
}

pub async fn set_xp_rate(db: &Database, guild_id: u64, rate: f64) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO guild_leveling_config (guild_id, xp_rate)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE SET xp_rate = EXCLUDED.xp_rate",
    )
    .bind(guild_id_i64)
    .bind(rate)
    .execute(db.pool())
    .await?;

    invalidate_leveling_config(db.cache(), guild_id).await?;

    Ok(())
}

/// Set the inclusive roll range for message XP.
pub async fn set_xp_range(db: &Database, guild_id: u64, min: u64, max: u64) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let min_i64 = i64::try_from(min).context("xp_min out of i64 range")?;
    let max_i64 = i64::try_from(max).context("xp_max out of i64 range")?;

    sqlx::query(
        "INSERT INTO guild_leveling_config (guild_id, xp_min, xp_max)
         VALUES ($1, $2, $3)
         ON CONFLICT (guild_id) DO UPDATE SET
            xp_min = EXCLUDED.xp_min,
            xp_max = EXCLUDED.xp_max",
    )
    .bind(guild_id_i64)
    .bind(min_i64)
    .bind(max_i64)
    .execute(db.pool())
    .await?;

    invalidate_leveling_config(db.cache(), guild_id).await?;

    Ok(())
}

pub async fn set_xp_cooldown(db: &Database, guild_id: u64, seconds: u64) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let seconds_i64 = i64::try_from(seconds).context("cooldown out of i64 range")?;

    sqlx::query(
        "INSERT INTO guild_leveling_config (guild_id, cooldown_seconds)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE SET cooldown_seconds = EXCLUDED.cooldown_seconds",
    )
    .bind(guild_id_i64)
    .bind(seconds_i64)
    .execute(db.pool())
    .await?;

    invalidate_leveling_config(db.cache(), guild_id).await?;

    Ok(())
}

pub async fn set_announce_level_up(
    db: &Database,
    guild_id: u64,
    announce: bool,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO guild_leveling_config (guild_id, announce_level_up)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE SET announce_level_up = EXCLUDED.announce_level_up",
    )
    .bind(guild_id_i64)
    .bind(announce)
    .execute(db.pool())
    .await?;

    invalidate_leveling_config(db.cache(), guild_id).await?;

    Ok(())
}

/// Route level-up announcements to a fixed channel, or back to the channel
/// the triggering message was sent in when `None`.
pub async fn set_announce_channel(
    db: &Database,
    guild_id: u64,
    channel_id: Option<u64>,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let channel_id_i64 = channel_id
        .map(i64::try_from)
        .transpose()
        .context("channel_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO guild_leveling_config (guild_id, announce_channel_id)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE SET announce_channel_id = EXCLUDED.announce_channel_id",
    )
    .bind(guild_id_i64)
    .bind(channel_id_i64)
    .execute(db.pool())
    .await?;

    invalidate_leveling_config(db.cache(), guild_id).await?;

    Ok(())
}

pub async fn set_level_up_message(
    db: &Database,
    guild_id: u64,
    template: &str,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO guild_leveling_config (guild_id, level_up_message)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE SET level_up_message = EXCLUDED.level_up_message",
    )
    .bind(guild_id_i64)
    .bind(template)
    .execute(db.pool())
    .await?;

    invalidate_leveling_config(db.cache(), guild_id).await?;

    Ok(())
}

pub async fn set_stack_level_roles(db: &Database, guild_id: u64, stack: bool) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO guild_leveling_config (guild_id, stack_level_roles)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE SET stack_level_roles = EXCLUDED.stack_level_roles",
    )
    .bind(guild_id_i64)
    .bind(stack)
    .execute(db.pool())
    .await?;

    invalidate_leveling_config(db.cache(), guild_id).await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// No-XP and double-XP lists
// ---------------------------------------------------------------------------

/// Add a channel to the no-XP list. Returns `false` if it was already listed.
pub async fn add_no_xp_channel(db: &Database, guild_id: u64, channel_id: u64) -> anyhow::Result<bool> {
    add_list_id(db, guild_id, "no_xp_channels", channel_id).await
}

/// Remove a channel from the no-XP list. Returns `false` if it was not listed.
pub async fn remove_no_xp_channel(
    db: &Database,
    guild_id: u64,
    channel_id: u64,
) -> anyhow::Result<bool> {
    remove_list_id(db, guild_id, "no_xp_channels", channel_id).await
}

pub async fn add_no_xp_role(db: &Database, guild_id: u64, role_id: u64) -> anyhow::Result<bool> {
    add_list_id(db, guild_id, "no_xp_roles", role_id).await
}

pub async fn remove_no_xp_role(db: &Database, guild_id: u64, role_id: u64) -> anyhow::Result<bool> {
    remove_list_id(db, guild_id, "no_xp_roles", role_id).await
}

pub async fn add_double_xp_role(db: &Database, guild_id: u64, role_id: u64) -> anyhow::Result<bool> {
    add_list_id(db, guild_id, "double_xp_roles", role_id).await
}

pub async fn remove_double_xp_role(
    db: &Database,
    guild_id: u64,
    role_id: u64,
) -> anyhow::Result<bool> {
    remove_list_id(db, guild_id, "double_xp_roles", role_id).await
}

/// Append `id` to one of the config's BIGINT[] list columns unless already
/// present. `column` is a compile-time constant chosen by the public wrappers.
async fn add_list_id(
    db: &Database,
    guild_id: u64,
    column: &'static str,
    id: u64,
) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let id_i64 = i64::try_from(id).context("list id out of i64 range")?;

    let changed: Option<i64> = sqlx::query_scalar(&format!(
        "INSERT INTO guild_leveling_config (guild_id, {column})
         VALUES ($1, ARRAY[$2]::BIGINT[])
         ON CONFLICT (guild_id) DO UPDATE SET
            {column} = array_append(guild_leveling_config.{column}, $2)
         WHERE NOT $2 = ANY (guild_leveling_config.{column})
         RETURNING guild_id"
    ))
    .bind(guild_id_i64)
    .bind(id_i64)
    .fetch_optional(db.pool())
    .await?;

    invalidate_leveling_config(db.cache(), guild_id).await?;

    Ok(changed.is_some())
}

async fn remove_list_id(
    db: &Database,
    guild_id: u64,
    column: &'static str,
    id: u64,
) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let id_i64 = i64::try_from(id).context("list id out of i64 range")?;

    let removed = sqlx::query(&format!(
        "UPDATE guild_leveling_config
         SET {column} = array_remove({column}, $2)
         WHERE guild_id = $1 AND $2 = ANY ({column})"
    ))
    .bind(guild_id_i64)
    .bind(id_i64)
    .execute(db.pool())
    .await?
    .rows_affected();

    invalidate_leveling_config(db.cache(), guild_id).await?;

    Ok(removed > 0)
}
