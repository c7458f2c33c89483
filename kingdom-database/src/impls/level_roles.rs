use anyhow::Context as _;

use crate::database::Database;
use crate::model::leveling::LevelRoleReward;

#[derive(sqlx::FromRow)]
struct LevelRoleRow {
    level: i64,
    role_id: i64,
}

/// Bind a role reward to a level. One reward per level; setting again
/// replaces the role.
pub async fn set_level_role(
    db: &Database,
    guild_id: u64,
    level: u64,
    role_id: u64,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let level_i64 = i64::try_from(level).context("level out of i64 range")?;
    let role_id_i64 = i64::try_from(role_id).context("role_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO level_role_rewards (guild_id, level, role_id)
         VALUES ($1, $2, $3)
         ON CONFLICT (guild_id, level) DO UPDATE SET role_id = EXCLUDED.role_id",
    )
    .bind(guild_id_i64)
    .bind(level_i64)
    .bind(role_id_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}

/// Remove the reward bound to a level. Returns `false` when none was set.
pub async fn remove_level_role(db: &Database, guild_id: u64, level: u64) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let level_i64 = i64::try_from(level).context("level out of i64 range")?;

    let deleted = sqlx::query("DELETE FROM level_role_rewards WHERE guild_id = $1 AND level = $2")
        .bind(guild_id_i64)
        .bind(level_i64)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

/// All rewards for a guild, lowest level first.
pub async fn list_level_roles(db: &Database, guild_id: u64) -> anyhow::Result<Vec<LevelRoleReward>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let rows: Vec<LevelRoleRow> = sqlx::query_as(
        "SELECT level, role_id FROM level_role_rewards
         WHERE guild_id = $1
         ORDER BY level ASC",
    )
    .bind(guild_id_i64)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(reward_from_row).collect()
}

/// Rewards a member at `level` has earned, lowest level first. The last entry
/// is the highest reward, which replace-mode role sync keeps.
pub async fn rewards_up_to(
    db: &Database,
    guild_id: u64,
    level: u64,
) -> anyhow::Result<Vec<LevelRoleReward>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let level_i64 = i64::try_from(level).context("level out of i64 range")?;

    let rows: Vec<LevelRoleRow> = sqlx::query_as(
        "SELECT level, role_id FROM level_role_rewards
         WHERE guild_id = $1 AND level <= $2
         ORDER BY level ASC",
    )
    .bind(guild_id_i64)
    .bind(level_i64)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(reward_from_row).collect()
}

fn reward_from_row(row: LevelRoleRow) -> anyhow::Result<LevelRoleReward> {
    Ok(LevelRoleReward {
        level: u64::try_from(row.level).context("level row out of u64 range")?,
        role_id: u64::try_from(row.role_id).context("role_id row out of u64 range")?,
    })
}
