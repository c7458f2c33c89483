use poise::serenity_prelude as serenity;

use kingdom_database::curve;
use kingdom_database::model::leveling::{DEFAULT_CARD_COLOR, MemberLevel};
use kingdom_utils::embed::DEFAULT_EMBED_COLOR;
use kingdom_utils::formatting::{format_count, progress_bar};
use kingdom_utils::parse::parse_hex_color;

pub const PROGRESS_BAR_SEGMENTS: usize = 10;

#[derive(Clone, Debug)]
pub struct TargetProfile {
    pub display_name: String,
    pub avatar_url: Option<String>,
}

pub fn target_profile_from_user(user: &serenity::User) -> TargetProfile {
    TargetProfile {
        display_name: user
            .global_name
            .clone()
            .unwrap_or_else(|| user.name.clone()),
        avatar_url: Some(user.face()),
    }
}

/// Rank card rendered as an embed: standing, level, progress toward the next
/// threshold, and lifetime counters. Tinted with the member's chosen color.
pub fn rank_embed(
    profile: &TargetProfile,
    user_id: serenity::UserId,
    member: &MemberLevel,
    rank: u64,
) -> serenity::CreateEmbed {
    let percent = curve::progress_percent(member.xp, member.level);
    let into_level = curve::xp_into_level(member.xp, member.level);
    let span = curve::xp_span_of_level(member.level);

    let description = format!(
        "**Member :** <@{}>\n\
         **Rank :** #{}\n\
         **Level :** {}\n\
         **Progress :** {} {:.0}% ({} / {} XP)\n\
         **Total XP :** {}\n\
         **Messages :** {}",
        user_id.get(),
        rank,
        member.level,
        progress_bar(percent, PROGRESS_BAR_SEGMENTS),
        percent,
        format_count(into_level),
        format_count(span),
        format_count(member.total_xp),
        format_count(member.messages),
    );

    let mut embed = serenity::CreateEmbed::new()
        .color(card_color_value(member.card_color.as_deref()))
        .description(description);

    if let Some(url) = profile.avatar_url.as_deref() {
        embed = embed.author(serenity::CreateEmbedAuthor::new(&profile.display_name).icon_url(url));
    } else {
        embed = embed.title(profile.display_name.clone());
    }

    embed
}

/// Resolve a stored card color to an embed color, falling back to the default
/// accent when unset or unparseable.
pub fn card_color_value(stored: Option<&str>) -> u32 {
    stored
        .or(Some(DEFAULT_CARD_COLOR))
        .and_then(parse_hex_color)
        .unwrap_or(DEFAULT_EMBED_COLOR)
}

/// Medal emoji for podium places, `#n` for everyone else.
pub fn rank_medal(rank: u64) -> String {
    match rank {
        1 => "🥇".to_owned(),
        2 => "🥈".to_owned(),
        3 => "🥉".to_owned(),
        other => format!("#{}", other),
    }
}

pub fn usage_message(usage: &str) -> String {
    format!("Usage: `{usage}`")
}

pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub fn bot_target_message() -> &'static str {
    "Bots don't earn XP."
}

pub fn no_xp_yet_message(user_id: serenity::UserId) -> String {
    format!("<@{}> hasn't earned any XP yet.", user_id.get())
}

#[cfg(test)]
mod tests {
    use super::{card_color_value, rank_medal};
    use kingdom_utils::embed::DEFAULT_EMBED_COLOR;

    #[test]
    fn podium_ranks_get_medals() {
        assert_eq!(rank_medal(1), "🥇");
        assert_eq!(rank_medal(2), "🥈");
        assert_eq!(rank_medal(3), "🥉");
        assert_eq!(rank_medal(4), "#4");
        assert_eq!(rank_medal(11), "#11");
    }

    #[test]
    fn card_colors_fall_back_to_the_default_accent() {
        assert_eq!(card_color_value(Some("#FF0000")), 0xFF_00_00);
        assert_eq!(card_color_value(None), 0x58_65_F2);
        assert_eq!(card_color_value(Some("not-a-color")), DEFAULT_EMBED_COLOR);
    }
}
