use poise::serenity_prelude as serenity;

/// Effective guild permissions for a user, resolved from their roles.
///
/// The guild owner always resolves to the full permission set.
pub async fn resolve_user_permissions(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<serenity::Permissions> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(serenity::Permissions::all());
    }

    let member = guild_id.member(http, user_id).await?;
    let roles = guild_id.roles(http).await?;

    // The @everyone role shares the guild's id.
    let everyone_role = serenity::RoleId::new(guild_id.get());

    let resolved = roles
        .values()
        .filter(|role| role.id == everyone_role || member.roles.contains(&role.id))
        .fold(serenity::Permissions::empty(), |held, role| {
            held | role.permissions
        });

    Ok(resolved)
}

/// Whether the user holds `required` (or `ADMINISTRATOR`, which implies it).
pub async fn has_user_permission(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    required: serenity::Permissions,
) -> anyhow::Result<bool> {
    let held = resolve_user_permissions(http, guild_id, user_id).await?;
    if held.contains(serenity::Permissions::ADMINISTRATOR) {
        return Ok(true);
    }

    Ok(held.contains(required))
}
