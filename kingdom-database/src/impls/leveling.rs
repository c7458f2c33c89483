use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;

use crate::{
    curve,
    database::Database,
    model::leveling::{LeaderboardEntry, MemberLevel, XpAward},
};

#[derive(sqlx::FromRow)]
struct MemberXpRow {
    xp: i64,
    level: i64,
    total_xp: i64,
}

#[derive(sqlx::FromRow)]
struct MemberLevelRow {
    user_id: i64,
    xp: i64,
    level: i64,
    messages: i64,
    total_xp: i64,
    card_color: Option<String>,
}

#[derive(sqlx::FromRow)]
struct LeaderboardRow {
    user_id: i64,
    xp: i64,
    level: i64,
    messages: i64,
}

/// Apply the guild multiplier and any double-XP bonus to a rolled base amount.
/// Non-positive or non-finite rates are treated as 1.0 so a bad config row
/// never zeroes out or explodes awards.
pub fn scale_message_xp(base_xp: u64, xp_rate: f64, double_xp: bool) -> u64 {
    let rate = if xp_rate.is_finite() && xp_rate > 0.0 {
        xp_rate
    } else {
        1.0
    };

    let scaled = (base_xp as f64 * rate) as u64;

    if double_xp {
        scaled.saturating_mul(2)
    } else {
        scaled
    }
}

/// Credit message XP to a member, honoring the per-member cooldown.
///
/// Returns `None` when the member is still on cooldown. Otherwise the member
/// row is upserted (creating it at level 0 on first message), `messages` and
/// `total_xp` are bumped, and the stored level is re-derived from the new
/// total.
pub async fn award_message_xp(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    amount: u64,
    cooldown_seconds: u64,
) -> anyhow::Result<Option<XpAward>> {
    let now = now_unix_secs();
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let amount_i64 = i64::try_from(amount).context("xp amount out of i64 range")?;
    let now_i64 = i64::try_from(now).context("timestamp out of i64 range")?;
    let cooldown_i64 = i64::try_from(cooldown_seconds).context("cooldown out of i64 range")?;

    // The DO UPDATE arm only fires once the cooldown has elapsed; a filtered
    // conflict returns no row, which signals "on cooldown" to the caller.
    let row: Option<MemberXpRow> = sqlx::query_as(
        "INSERT INTO member_levels
            (guild_id, user_id, xp, level, messages, total_xp, last_xp_at, created_at, updated_at)
         VALUES ($1, $2, $3, 0, 1, $3, $4, $4, $4)
         ON CONFLICT (guild_id, user_id) DO UPDATE SET
            xp = member_levels.xp + EXCLUDED.xp,
            messages = member_levels.messages + 1,
            total_xp = member_levels.total_xp + EXCLUDED.xp,
            last_xp_at = EXCLUDED.last_xp_at,
            updated_at = EXCLUDED.updated_at
         WHERE member_levels.last_xp_at IS NULL
            OR member_levels.last_xp_at <= EXCLUDED.last_xp_at - $5
         RETURNING xp, level, total_xp",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(amount_i64)
    .bind(now_i64)
    .bind(cooldown_i64)
    .fetch_optional(db.pool())
    .await?;

    match row {
        Some(row) => {
            let award = finish_level_sync(db, guild_id_i64, user_id_i64, row, now_i64).await?;
            Ok(Some(award))
        }
        None => Ok(None),
    }
}

/// Add XP to a member unconditionally. Creates the row if missing. Does not
/// count as a message and does not touch the cooldown clock.
pub async fn grant_xp(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    amount: u64,
) -> anyhow::Result<XpAward> {
    let now = now_unix_secs();
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let amount_i64 = i64::try_from(amount).context("xp amount out of i64 range")?;
    let now_i64 = i64::try_from(now).context("timestamp out of i64 range")?;

    let row: MemberXpRow = sqlx::query_as(
        "INSERT INTO member_levels
            (guild_id, user_id, xp, level, messages, total_xp, created_at, updated_at)
         VALUES ($1, $2, $3, 0, 0, $3, $4, $4)
         ON CONFLICT (guild_id, user_id) DO UPDATE SET
            xp = member_levels.xp + EXCLUDED.xp,
            total_xp = member_levels.total_xp + EXCLUDED.xp,
            updated_at = EXCLUDED.updated_at
         RETURNING xp, level, total_xp",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(amount_i64)
    .bind(now_i64)
    .fetch_one(db.pool())
    .await?;

    finish_level_sync(db, guild_id_i64, user_id_i64, row, now_i64).await
}

/// Remove XP from a member, clamping at zero. Returns `None` when the member
/// has no XP row.
pub async fn take_xp(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    amount: u64,
) -> anyhow::Result<Option<XpAward>> {
    let now = now_unix_secs();
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let amount_i64 = i64::try_from(amount).context("xp amount out of i64 range")?;
    let now_i64 = i64::try_from(now).context("timestamp out of i64 range")?;

    let row: Option<MemberXpRow> = sqlx::query_as(
        "UPDATE member_levels
         SET xp = GREATEST(member_levels.xp - $3, 0), updated_at = $4
         WHERE guild_id = $1 AND user_id = $2
         RETURNING xp, level, total_xp",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(amount_i64)
    .bind(now_i64)
    .fetch_optional(db.pool())
    .await?;

    match row {
        Some(row) => {
            let award = finish_level_sync(db, guild_id_i64, user_id_i64, row, now_i64).await?;
            Ok(Some(award))
        }
        None => Ok(None),
    }
}

/// Set a member's XP to an exact amount. `total_xp` never decreases so the
/// lifetime counter stays monotonic.
pub async fn set_xp(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    amount: u64,
) -> anyhow::Result<XpAward> {
    let now = now_unix_secs();
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let amount_i64 = i64::try_from(amount).context("xp amount out of i64 range")?;
    let now_i64 = i64::try_from(now).context("timestamp out of i64 range")?;

    let row: MemberXpRow = sqlx::query_as(
        "INSERT INTO member_levels
            (guild_id, user_id, xp, level, messages, total_xp, created_at, updated_at)
         VALUES ($1, $2, $3, 0, 0, $3, $4, $4)
         ON CONFLICT (guild_id, user_id) DO UPDATE SET
            xp = EXCLUDED.xp,
            total_xp = GREATEST(member_levels.total_xp, EXCLUDED.xp),
            updated_at = EXCLUDED.updated_at
         RETURNING xp, level, total_xp",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(amount_i64)
    .bind(now_i64)
    .fetch_one(db.pool())
    .await?;

    finish_level_sync(db, guild_id_i64, user_id_i64, row, now_i64).await
}

/// Zero a member's XP, level, and message count. Returns false when the
/// member has no XP row. Lifetime `total_xp` is preserved.
pub async fn reset_member_xp(db: &Database, guild_id: u64, user_id: u64) -> anyhow::Result<bool> {
    let now = now_unix_secs();
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let now_i64 = i64::try_from(now).context("timestamp out of i64 range")?;

    let updated = sqlx::query(
        "UPDATE member_levels
         SET xp = 0, level = 0, messages = 0, updated_at = $3
         WHERE guild_id = $1 AND user_id = $2",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(now_i64)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok(updated > 0)
}

/// Delete every XP row in a guild and return how many were removed.
pub async fn reset_guild_xp(db: &Database, guild_id: u64) -> anyhow::Result<u64> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let deleted = sqlx::query("DELETE FROM member_levels WHERE guild_id = $1")
        .bind(guild_id_i64)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted)
}

pub async fn get_member_level(
    db: &Database,
    guild_id: u64,
    user_id: u64,
) -> anyhow::Result<Option<MemberLevel>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;

    let row: Option<MemberLevelRow> = sqlx::query_as(
        "SELECT user_id, xp, level, messages, total_xp, card_color
         FROM member_levels
         WHERE guild_id = $1 AND user_id = $2",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .fetch_optional(db.pool())
    .await?;

    match row {
        Some(row) => Ok(Some(member_level_from_row(row)?)),
        None => Ok(None),
    }
}

/// 1-based standing of a member holding `xp` points: one plus the number of
/// members strictly above them.
pub async fn member_rank(db: &Database, guild_id: u64, xp: u64) -> anyhow::Result<u64> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let xp_i64 = i64::try_from(xp).context("xp out of i64 range")?;

    let above: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM member_levels WHERE guild_id = $1 AND xp > $2")
            .bind(guild_id_i64)
            .bind(xp_i64)
            .fetch_one(db.pool())
            .await?;

    let above = u64::try_from(above).context("rank count out of u64 range")?;
    Ok(above + 1)
}

/// One page of the guild leaderboard, ordered by XP descending with user id
/// as the tiebreak so pagination is stable.
pub async fn leaderboard_page(
    db: &Database,
    guild_id: u64,
    limit: u64,
    offset: u64,
) -> anyhow::Result<Vec<LeaderboardEntry>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let limit_i64 = i64::try_from(limit).context("limit out of i64 range")?;
    let offset_i64 = i64::try_from(offset).context("offset out of i64 range")?;

    let rows: Vec<LeaderboardRow> = sqlx::query_as(
        "SELECT user_id, xp, level, messages
         FROM member_levels
         WHERE guild_id = $1
         ORDER BY xp DESC, user_id ASC
         LIMIT $2 OFFSET $3",
    )
    .bind(guild_id_i64)
    .bind(limit_i64)
    .bind(offset_i64)
    .fetch_all(db.pool())
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        let user_id = u64::try_from(row.user_id).context("user_id row out of u64 range")?;
        let xp = u64::try_from(row.xp).context("xp row out of u64 range")?;
        let level = u64::try_from(row.level).context("level row out of u64 range")?;
        let messages = u64::try_from(row.messages).context("messages row out of u64 range")?;
        entries.push(LeaderboardEntry {
            rank: offset + index as u64 + 1,
            user_id,
            xp,
            level,
            messages,
        });
    }

    Ok(entries)
}

pub async fn count_ranked_members(db: &Database, guild_id: u64) -> anyhow::Result<u64> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member_levels WHERE guild_id = $1")
        .bind(guild_id_i64)
        .fetch_one(db.pool())
        .await?;

    u64::try_from(count).context("member count out of u64 range")
}

/// Store a member's rank card accent color (normalized `#rrggbb`). Creates
/// the XP row at zero if the member has never earned XP.
pub async fn set_card_color(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    color: &str,
) -> anyhow::Result<()> {
    let now = now_unix_secs();
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let now_i64 = i64::try_from(now).context("timestamp out of i64 range")?;

    sqlx::query(
        "INSERT INTO member_levels (guild_id, user_id, card_color, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $4)
         ON CONFLICT (guild_id, user_id) DO UPDATE SET
            card_color = EXCLUDED.card_color,
            updated_at = EXCLUDED.updated_at",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(color)
    .bind(now_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}

/// Clear a member's rank card color. Returns false when nothing was set.
pub async fn clear_card_color(db: &Database, guild_id: u64, user_id: u64) -> anyhow::Result<bool> {
    let now = now_unix_secs();
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let user_id_i64 = i64::try_from(user_id).context("user_id out of i64 range")?;
    let now_i64 = i64::try_from(now).context("timestamp out of i64 range")?;

    let updated = sqlx::query(
        "UPDATE member_levels
         SET card_color = NULL, updated_at = $3
         WHERE guild_id = $1 AND user_id = $2 AND card_color IS NOT NULL",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(now_i64)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok(updated > 0)
}

/// Re-derive the stored level from the row's new XP total and persist it when
/// it moved. The `level` column in `row` still holds the pre-write value, so
/// the pair gives us both sides of a level-up.
async fn finish_level_sync(
    db: &Database,
    guild_id_i64: i64,
    user_id_i64: i64,
    row: MemberXpRow,
    now_i64: i64,
) -> anyhow::Result<XpAward> {
    let xp = u64::try_from(row.xp).context("xp row out of u64 range")?;
    let old_level = u64::try_from(row.level).context("level row out of u64 range")?;
    let total_xp = u64::try_from(row.total_xp).context("total_xp row out of u64 range")?;

    let new_level = curve::level_for_xp(xp);

    if new_level != old_level {
        let new_level_i64 = i64::try_from(new_level).context("level out of i64 range")?;

        sqlx::query(
            "UPDATE member_levels SET level = $3, updated_at = $4
             WHERE guild_id = $1 AND user_id = $2",
        )
        .bind(guild_id_i64)
        .bind(user_id_i64)
        .bind(new_level_i64)
        .bind(now_i64)
        .execute(db.pool())
        .await?;
    }

    Ok(XpAward {
        xp,
        total_xp,
        old_level,
        new_level,
    })
}

fn member_level_from_row(row: MemberLevelRow) -> anyhow::Result<MemberLevel> {
    Ok(MemberLevel {
        user_id: u64::try_from(row.user_id).context("user_id row out of u64 range")?,
        xp: u64::try_from(row.xp).context("xp row out of u64 range")?,
        level: u64::try_from(row.level).context("level row out of u64 range")?,
        messages: u64::try_from(row.messages).context("messages row out of u64 range")?,
        total_xp: u64::try_from(row.total_xp).context("total_xp row out of u64 range")?,
        card_color: row.card_color,
    })
}

pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

#[cfg(test)]
mod tests {
    use super::scale_message_xp;

    #[test]
    fn unit_rate_passes_the_roll_through() {
        assert_eq!(scale_message_xp(20, 1.0, false), 20);
    }

    #[test]
    fn fractional_rate_truncates() {
        assert_eq!(scale_message_xp(15, 0.5, false), 7);
    }

    #[test]
    fn boosted_rate_scales_up() {
        assert_eq!(scale_message_xp(20, 1.5, false), 30);
    }

    #[test]
    fn double_xp_doubles_after_scaling() {
        assert_eq!(scale_message_xp(15, 1.0, true), 30);
        assert_eq!(scale_message_xp(15, 0.5, true), 14);
    }

    #[test]
    fn bad_rates_fall_back_to_unscaled() {
        assert_eq!(scale_message_xp(20, 0.0, false), 20);
        assert_eq!(scale_message_xp(20, -3.0, false), 20);
        assert_eq!(scale_message_xp(20, f64::NAN, false), 20);
    }
}
