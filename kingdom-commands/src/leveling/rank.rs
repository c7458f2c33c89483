use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::leveling::embeds::{
    bot_target_message, guild_only_message, no_xp_yet_message, rank_embed, target_profile_from_user,
};
use kingdom_core::{Context, Error};
use kingdom_database::impls::leveling::{get_member_level, member_rank};

pub const META: CommandMeta = CommandMeta {
    name: "rank",
    desc: "Show a member's level, XP progress, and server rank.",
    category: "leveling",
    usage: "!rank [user]",
};

#[poise::command(prefix_command, slash_command, category = "Leveling")]
pub async fn rank(
    ctx: Context<'_>,
    #[description = "Member to look up (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let target = user.as_ref().unwrap_or_else(|| ctx.author());
    if target.bot {
        ctx.say(bot_target_message()).await?;
        return Ok(());
    }

    let db = &ctx.data().db;
    let Some(member) = get_member_level(db, guild_id.get(), target.id.get()).await? else {
        ctx.say(no_xp_yet_message(target.id)).await?;
        return Ok(());
    };

    let rank = member_rank(db, guild_id.get(), member.xp).await?;
    let profile = target_profile_from_user(target);

    ctx.send(poise::CreateReply::default().embed(rank_embed(&profile, target.id, &member, rank)))
        .await?;

    Ok(())
}
