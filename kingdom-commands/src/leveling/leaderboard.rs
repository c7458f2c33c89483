use crate::CommandMeta;
use crate::leveling::embeds::{guild_only_message, rank_medal};
use kingdom_core::{Context, Error};
use kingdom_database::impls::leveling::{count_ranked_members, leaderboard_page};
use kingdom_utils::formatting::format_count;
use kingdom_utils::pagination::send_paged_embed_with_icon;

pub const META: CommandMeta = CommandMeta {
    name: "leaderboard",
    desc: "Show the server XP leaderboard.",
    category: "leveling",
    usage: "!leaderboard [page]",
};

const MEMBERS_PER_PAGE: usize = 10;
const LEADERBOARD_FETCH_LIMIT: u64 = 200;

#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn leaderboard(
    ctx: Context<'_>,
    #[description = "Page number"] page: Option<usize>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let db = &ctx.data().db;
    let total_ranked = count_ranked_members(db, guild_id.get()).await?;
    if total_ranked == 0 {
        ctx.say("Nobody has earned XP here yet.").await?;
        return Ok(());
    }

    let rows = leaderboard_page(db, guild_id.get(), LEADERBOARD_FETCH_LIMIT, 0).await?;

    let total_pages = rows.len().div_ceil(MEMBERS_PER_PAGE);
    let mut pages = Vec::with_capacity(total_pages);

    for chunk in rows.chunks(MEMBERS_PER_PAGE) {
        let mut body = format!("Ranked members: **{}**\n\n", format_count(total_ranked));
        for entry in chunk {
            body.push_str(&format!(
                "{} <@{}> — Level {} • {} XP\n",
                rank_medal(entry.rank),
                entry.user_id,
                entry.level,
                format_count(entry.xp),
            ));
        }
        pages.push(body.trim_end().to_owned());
    }

    let guild_icon_url = match guild_id.to_partial_guild(ctx.http()).await {
        Ok(guild) => guild.icon_url(),
        Err(_) => None,
    };

    let requested_page = page.unwrap_or(1).max(1);
    send_paged_embed_with_icon(
        ctx,
        "XP Leaderboard",
        &pages,
        requested_page,
        guild_icon_url.as_deref(),
    )
    .await?;

    Ok(())
}
